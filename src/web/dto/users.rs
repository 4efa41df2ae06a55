use serde::Deserialize;

use crate::{
    validation::{
        Validate, ValidationErrors, check_contact, is_valid_email, is_valid_person_name,
    },
    web::{AccountStatus, UserRole},
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserCreateBody {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserUpdateBody {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    /// Leave out to keep the current password.
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserRolesBody {
    pub roles: Vec<UserRole>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserStatusBody {
    pub status: AccountStatus,
}

fn check_profile(
    errors: &mut ValidationErrors,
    email: &str,
    full_name: &str,
    phone: Option<&str>,
    country: Option<&str>,
) {
    errors.check("email", is_valid_email(email), "invalid email address");
    errors.check(
        "full_name",
        is_valid_person_name(full_name),
        "name must be 2-100 letters",
    );
    check_contact(errors, phone, country);
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    errors.check(
        "password",
        password.chars().count() >= MIN_PASSWORD_LEN,
        "password must be at least 8 characters",
    );
}

impl Validate for UserCreateBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_profile(
            &mut errors,
            &self.email,
            &self.full_name,
            self.phone.as_deref(),
            self.country.as_deref(),
        );
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

impl Validate for UserUpdateBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_profile(
            &mut errors,
            &self.email,
            &self.full_name,
            self.phone.as_deref(),
            self.country.as_deref(),
        );
        if let Some(password) = &self.password {
            check_password(&mut errors, password);
        }
        errors.into_result()
    }
}

impl Validate for UserRolesBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("roles", !self.roles.is_empty(), "at least one role is required");
        errors.into_result()
    }
}
