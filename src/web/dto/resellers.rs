use serde::Deserialize;
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, check_contact, is_valid_email, is_valid_org_name};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResellerBody {
    /// Console account operating the reseller. Admin only; ignored for other callers.
    pub owner_user_id: Option<Uuid>,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub commission_rate: f64,
}

impl Validate for ResellerBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "company_name",
            is_valid_org_name(&self.company_name),
            "company name must be 2-100 characters",
        );
        errors.check("email", is_valid_email(&self.email), "invalid email address");
        errors.check(
            "commission_rate",
            (0.0..=100.0).contains(&self.commission_rate),
            "commission rate must be between 0 and 100",
        );
        check_contact(&mut errors, self.phone.as_deref(), self.country.as_deref());
        errors.into_result()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn commission_bounds() {
        let mut body = ResellerBody {
            owner_user_id: None,
            company_name: String::from("Northwind Traders"),
            email: String::from("sales@northwind.example"),
            phone: None,
            country: Some(String::from("GB")),
            commission_rate: 12.5,
        };
        assert!(body.validate().is_ok());

        body.commission_rate = 120.0;
        assert!(body.validate().unwrap_err().get("commission_rate").is_some());

        body.commission_rate = f64::NAN;
        assert!(body.validate().is_err());
    }
}
