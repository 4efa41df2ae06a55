use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Product {
    id: Uuid,
    owner_user_id: Option<Uuid>,
    brand_id: Option<Uuid>,
    name: String,
    description: String,
    price_cents: i64,
    currency: String,
    /// AES-encrypted payment URL token; never sent to clients as-is.
    #[serde(skip)]
    payment_url_enc: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProductCreateUpdate {
    pub owner_user_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub payment_url_enc: Option<String>,
}

impl ResourceTyped for Product {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Product
    }
}

impl Product {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_user_id(&self) -> Option<Uuid> {
        self.owner_user_id
    }

    pub fn brand_id(&self) -> Option<Uuid> {
        self.brand_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn payment_url_enc(&self) -> Option<&str> {
        self.payment_url_enc.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[async_trait]
impl CrudRepository<Product, ProductCreateUpdate, Uuid> for Product {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ProductCreateUpdate,
    ) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO products \
             (id, owner_user_id, brand_id, name, description, price_cents, currency, payment_url_enc) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_user_id)
        .bind(data.brand_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(&data.currency)
        .bind(&data.payment_url_enc)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ProductCreateUpdate,
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            "UPDATE products SET owner_user_id = $1, brand_id = $2, name = $3, description = $4, \
             price_cents = $5, currency = $6, payment_url_enc = $7 WHERE id = $8 RETURNING *",
        )
        .bind(data.owner_user_id)
        .bind(data.brand_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(&data.currency)
        .bind(&data.payment_url_enc)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM products WHERE $1 OR owner_user_id = $2 \
             ORDER BY created_at, id LIMIT $3 OFFSET $4",
        )
        .bind(actor.is_admin())
        .bind(actor.user_id())
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE $1 OR owner_user_id = $2")
                .bind(actor.is_admin())
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Product, ProductCreateUpdate, Uuid);

#[async_trait]
impl HasOwner for Product {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_user_id
    }

    async fn lookup(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        Self::find_by_id(mm, &AuthenticatedUser::admin(), id).await
    }
}
