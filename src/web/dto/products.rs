use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::PaymentUrlCipher,
    model::entity::Product,
    validation::{Validate, ValidationErrors, is_valid_currency, is_valid_org_name},
    web::dto::{brands::MAX_DESCRIPTION_LEN, is_http_url},
};

fn default_currency() -> String {
    String::from("USD")
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ProductBody {
    /// Admin only; other callers always own what they create.
    pub owner_user_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Plain payment URL; stored encrypted.
    pub payment_url: Option<String>,
}

impl Validate for ProductBody {
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
        errors.check("price_cents", self.price_cents >= 0, "price cannot be negative");
        errors.check(
            "currency",
            is_valid_currency(&self.currency),
            "currency must be a 3-letter ISO code",
        );
        if let Some(url) = &self.payment_url {
            errors.check(
                "payment_url",
                is_http_url(url),
                "payment url must be an http(s) url",
            );
        }
        errors.into_result()
    }
}

/// Product as returned to the console, with the payment URL decrypted.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductView {
    pub id: Uuid,
    pub owner_user_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub payment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductView {
    /// A stored token that no longer decrypts (e.g. after a key rotation) is reported as
    /// missing rather than failing the whole response.
    pub fn new(product: &Product, cipher: &PaymentUrlCipher) -> Self {
        let payment_url = product.payment_url_enc().and_then(|token| {
            cipher
                .decrypt(token)
                .inspect_err(|e| {
                    tracing::warn!(product_id = %product.id(), "payment url unreadable: {e}")
                })
                .ok()
        });

        Self {
            id: product.id(),
            owner_user_id: product.owner_user_id(),
            brand_id: product.brand_id(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price_cents: product.price_cents(),
            currency: product.currency().to_string(),
            payment_url,
            created_at: product.created_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaymentLinkResponse {
    pub product_id: Uuid,
    /// Opaque encrypted token for checkout pages.
    pub token: String,
}
