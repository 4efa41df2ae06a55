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
pub struct Brand {
    id: Uuid,
    owner_user_id: Option<Uuid>,
    name: String,
    description: String,
    website: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BrandCreateUpdate {
    pub owner_user_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
}

impl ResourceTyped for Brand {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Brand
    }
}

impl Brand {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_user_id(&self) -> Option<Uuid> {
        self.owner_user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[async_trait]
impl CrudRepository<Brand, BrandCreateUpdate, Uuid> for Brand {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: BrandCreateUpdate,
    ) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO brands (id, owner_user_id, name, description, website) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_user_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.website)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: BrandCreateUpdate,
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            "UPDATE brands SET owner_user_id = $1, name = $2, description = $3, website = $4 \
             WHERE id = $5 RETURNING *",
        )
        .bind(data.owner_user_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.website)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM brands WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM brands WHERE id = $1")
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
            "SELECT * FROM brands WHERE $1 OR owner_user_id = $2 \
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
            sqlx::query_scalar("SELECT COUNT(*) FROM brands WHERE $1 OR owner_user_id = $2")
                .bind(actor.is_admin())
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Brand, BrandCreateUpdate, Uuid);

#[async_trait]
impl HasOwner for Brand {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_user_id
    }

    async fn lookup(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        Self::find_by_id(mm, &AuthenticatedUser::admin(), id).await
    }
}
