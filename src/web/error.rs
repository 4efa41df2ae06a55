use std::collections::BTreeMap;

use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    model::{DatabaseError, DenyReason, ResourceType},
    validation::ValidationErrors,
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("ConflictEmailTaken: {resource_type}")]
    ConflictEmailTaken { resource_type: ResourceType },
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationTokenInvalid. Error: {error}")]
    AuthenticationTokenInvalid { error: jsonwebtoken::errors::Error },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationInvalidCredentials")]
    AuthenticationInvalidCredentials,

    #[error("AuthenticationAccountDeactivated")]
    AuthenticationAccountDeactivated,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceForbidden: {resource_type}")]
    ResourceForbidden { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type}. Reason: {reason}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] crate::auth::CryptError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        String::from("Internal server error.")
    }
}

impl ConflictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ConflictEmailTaken { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ConflictEmailTaken { .. } => {
                String::from("Conflict, this email is already in use.")
            }
        }
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationTokenInvalid { .. } => {
                String::from("Authentication error, session is invalid or expired.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
            Self::AuthenticationInvalidCredentials => {
                String::from("Authentication error, user not found or password is invalid.")
            }
            Self::AuthenticationAccountDeactivated => {
                String::from("Authentication error, account is deactivated.")
            }
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceForbidden { .. } => StatusCode::FORBIDDEN,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceForbidden { .. } => String::from("Resource error, resource forbidden."),
            Self::ResourceFetchError { .. } => String::from("Internal server error."),
            Self::ResourceBadRequest { reason, .. } => format!("Resource error, {reason}."),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("ConflictError - {0}")]
    ConflictError(#[from] ConflictError),
    #[error("ValidationError - {0}")]
    ValidationError(ValidationErrors),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl From<ValidationErrors> for WebError {
    fn from(value: ValidationErrors) -> Self {
        Self::ValidationError(value)
    }
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_forbidden(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceForbidden {
            resource_type: r#type,
        })
    }

    /// Datastore failure. Unique violations on email columns surface as 409 and dangling
    /// user references as 400 instead of 500.
    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        if error.is_unique_violation() {
            return Self::conflict_email_taken(r#type);
        }
        if error.is_foreign_key_violation() {
            return Self::resource_bad_request(r#type, "referenced user does not exist");
        }

        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn resource_bad_request(r#type: ResourceType, reason: &'static str) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            reason,
        })
    }

    pub fn access_denied(r#type: ResourceType, reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => Self::auth_required(),
            DenyReason::Forbidden => Self::resource_forbidden(r#type),
            DenyReason::NotFound => Self::resource_not_found(r#type),
        }
    }

    pub fn auth_token_invalid(error: jsonwebtoken::errors::Error) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationTokenInvalid { error })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn auth_invalid_credentials() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationInvalidCredentials)
    }

    pub fn auth_account_deactivated() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationAccountDeactivated)
    }

    pub fn conflict_email_taken(r#type: ResourceType) -> Self {
        Self::ConflictError(ConflictError::ConflictEmailTaken {
            resource_type: r#type,
        })
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ResourceError(ResourceError::ResourceNotFound { .. })
        )
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::ConflictError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::ConflictError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::ValidationError(_) => {
                String::from("Validation error, please correct the highlighted fields.")
            }
            Self::ServerError(e) => e.client_display(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub error: String,
    /// Per-field messages, only for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log_error(&self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = ErrorResponse {
            error: self.client_display(),
            fields: match &self {
                Self::ValidationError(errors) => Some(errors.to_map()),
                _ => None,
            },
        };

        (status_code, Json(body)).into_response()
    }
}
