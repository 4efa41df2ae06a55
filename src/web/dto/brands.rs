use serde::Deserialize;
use uuid::Uuid;

use crate::{
    validation::{Validate, ValidationErrors, is_valid_org_name},
    web::dto::is_http_url,
};

pub const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BrandBody {
    /// Admin only; other callers always own what they create.
    pub owner_user_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub website: Option<String>,
}

impl Validate for BrandBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "name",
            is_valid_org_name(&self.name),
            "name must be 2-100 characters",
        );
        errors.check(
            "description",
            self.description.chars().count() <= MAX_DESCRIPTION_LEN,
            "description is too long",
        );
        if let Some(website) = &self.website {
            errors.check("website", is_http_url(website), "website must be an http(s) url");
        }
        errors.into_result()
    }
}
