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

/// An end customer. Ownership is the referral: `referred_by` holds the user id of the reseller
/// account that brought the consumer in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Consumer {
    id: Uuid,
    referred_by: Option<Uuid>,
    full_name: String,
    email: String,
    phone: Option<String>,
    country: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ConsumerCreateUpdate {
    pub referred_by: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

impl ResourceTyped for Consumer {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Consumer
    }
}

impl Consumer {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn referred_by(&self) -> Option<Uuid> {
        self.referred_by
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

#[async_trait]
impl CrudRepository<Consumer, ConsumerCreateUpdate, Uuid> for Consumer {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ConsumerCreateUpdate,
    ) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO consumers (id, referred_by, full_name, email, phone, country) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.referred_by)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.country)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ConsumerCreateUpdate,
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            "UPDATE consumers SET referred_by = $1, full_name = $2, email = $3, phone = $4, \
             country = $5 WHERE id = $6 RETURNING *",
        )
        .bind(data.referred_by)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.country)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM consumers WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM consumers WHERE id = $1")
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
            "SELECT * FROM consumers WHERE $1 OR referred_by = $2 \
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
            sqlx::query_scalar("SELECT COUNT(*) FROM consumers WHERE $1 OR referred_by = $2")
                .bind(actor.is_admin())
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Consumer, ConsumerCreateUpdate, Uuid);

#[async_trait]
impl HasOwner for Consumer {
    fn owner_id(&self) -> Option<Uuid> {
        self.referred_by
    }

    async fn lookup(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        Self::find_by_id(mm, &AuthenticatedUser::admin(), id).await
    }
}
