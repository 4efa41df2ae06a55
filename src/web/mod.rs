mod context;
pub use context::{AccountStatus, AuthenticatedUser, RequestContext, UnknownRole, UserRole};

mod error;
pub use error::{ErrorResponse, WebError, WebResult};

mod guard;
pub use guard::{guard, require_admin, require_create, resolve_owner};

mod response;
pub use response::ApiResponse;

pub mod dto;

pub mod middlewares;

mod state;
pub use state::AppState;

pub mod routes;

pub mod doc;
