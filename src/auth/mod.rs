mod password;
pub use password::{hash_password, verify_password};
mod jwt;
pub use jwt::{UserClaims, generate_token, process_token, session_claims};
mod crypt;
pub use crypt::{PaymentUrlCipher, decrypt_payment_url, encrypt_payment_url};
mod error;
pub use error::{CryptError, CryptResult};
