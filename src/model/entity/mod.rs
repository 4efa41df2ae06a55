mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod reseller;
pub use reseller::{Reseller, ResellerCreateUpdate};

mod consumer;
pub use consumer::{Consumer, ConsumerCreateUpdate};

mod brand;
pub use brand::{Brand, BrandCreateUpdate};

mod product;
pub use product::{Product, ProductCreateUpdate};
