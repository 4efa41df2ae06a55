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

/// A reseller company. `owner_user_id` is the console account that operates it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Reseller {
    id: Uuid,
    owner_user_id: Option<Uuid>,
    company_name: String,
    email: String,
    phone: Option<String>,
    country: Option<String>,
    commission_rate: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ResellerCreateUpdate {
    pub owner_user_id: Option<Uuid>,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub commission_rate: f64,
}

impl ResourceTyped for Reseller {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Reseller
    }
}

impl Reseller {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_user_id(&self) -> Option<Uuid> {
        self.owner_user_id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }
}

#[async_trait]
impl CrudRepository<Reseller, ResellerCreateUpdate, Uuid> for Reseller {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ResellerCreateUpdate,
    ) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO resellers (id, owner_user_id, company_name, email, phone, country, commission_rate) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_user_id)
        .bind(&data.company_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.country)
        .bind(data.commission_rate)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ResellerCreateUpdate,
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            "UPDATE resellers SET owner_user_id = $1, company_name = $2, email = $3, phone = $4, \
             country = $5, commission_rate = $6 WHERE id = $7 RETURNING *",
        )
        .bind(data.owner_user_id)
        .bind(&data.company_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.country)
        .bind(data.commission_rate)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM resellers WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM resellers WHERE id = $1")
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
            "SELECT * FROM resellers WHERE $1 OR owner_user_id = $2 \
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
            sqlx::query_scalar("SELECT COUNT(*) FROM resellers WHERE $1 OR owner_user_id = $2")
                .bind(actor.is_admin())
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Reseller, ResellerCreateUpdate, Uuid);

#[async_trait]
impl HasOwner for Reseller {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_user_id
    }

    async fn lookup(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        Self::find_by_id(mm, &AuthenticatedUser::admin(), id).await
    }
}
