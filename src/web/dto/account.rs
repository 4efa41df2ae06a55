use serde::{Deserialize, Serialize};

use crate::{
    model::entity::UserEntity,
    validation::{Validate, ValidationErrors, is_valid_email},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SigninBody {
    pub email: String,
    pub password: String,
}

impl Validate for SigninBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("email", is_valid_email(&self.email), "invalid email address");
        errors.check("password", !self.password.is_empty(), "password is required");
        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub user: UserEntity,
    /// Same value as the `SID` cookie, for clients using `Authorization: Bearer`.
    pub token: String,
}
