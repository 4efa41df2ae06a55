use serde::Deserialize;
use uuid::Uuid;

use crate::validation::{
    Validate, ValidationErrors, check_contact, is_valid_email, is_valid_person_name,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ConsumerBody {
    /// Referring reseller account. Admin only; resellers always refer their own consumers.
    pub referred_by: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

impl Validate for ConsumerBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "full_name",
            is_valid_person_name(&self.full_name),
            "name must be 2-100 letters",
        );
        errors.check("email", is_valid_email(&self.email), "invalid email address");
        check_contact(&mut errors, self.phone.as_deref(), self.country.as_deref());
        errors.into_result()
    }
}
