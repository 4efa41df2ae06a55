use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::web::{AccountStatus, AuthenticatedUser, UserRole};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{
    ModelManager,
    error::{DatabaseError, DatabaseResult},
    repo::CrudRepository,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserEntity {
    id: Uuid,
    email: String,
    full_name: String,
    phone: Option<String>,
    country: Option<String>,
    roles: Vec<String>,
    status: String,
    #[serde(skip)]
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserEntityCreateUpdate {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    /// Used on create only; roles change through [`UserEntity::set_roles`].
    pub roles: Vec<UserRole>,
    /// Required on create, `None` keeps the current hash on update.
    pub password_hash: Option<String>,
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> crate::model::repo::ResourceType {
        crate::model::repo::ResourceType::User
    }
}

fn role_names(roles: &[UserRole]) -> Vec<String> {
    let mut names: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    names.sort();
    names.dedup();
    names
}

impl UserEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn hash(&self) -> &str {
        &self.password_hash
    }

    pub fn roles(&self) -> Vec<UserRole> {
        self.roles
            .iter()
            .filter_map(|r| match r.parse() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(user_id = %self.id, "skipping role: {e}");
                    None
                }
            })
            .collect()
    }

    pub fn status(&self) -> AccountStatus {
        AccountStatus::from(self.status.as_str())
    }

    /// The user as a request actor; deactivated accounts can't act.
    pub fn as_actor(&self) -> Option<AuthenticatedUser> {
        match self.status() {
            AccountStatus::Active => Some(AuthenticatedUser::new(self.id, self.roles())),
            AccountStatus::Deactivated => None,
        }
    }
}

#[async_trait::async_trait]
impl CrudRepository<UserEntity, UserEntityCreateUpdate, Uuid> for UserEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreateUpdate,
    ) -> DatabaseResult<Self> {
        let password_hash = data
            .password_hash
            .ok_or(DatabaseError::MissingField("password_hash"))?;
        let roles = if data.roles.is_empty() {
            vec![UserRole::User]
        } else {
            data.roles
        };

        let created = sqlx::query_as(
            "INSERT INTO users (id, email, full_name, phone, country, roles, status, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(&data.country)
        .bind(role_names(&roles))
        .bind(AccountStatus::Active.as_str())
        .bind(password_hash)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreateUpdate,
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            "UPDATE users SET email = $1, full_name = $2, phone = $3, country = $4, \
             password_hash = COALESCE($5, password_hash) WHERE id = $6 RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(&data.country)
        .bind(&data.password_hash)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
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
            "SELECT * FROM users WHERE $1 OR id = $2 ORDER BY created_at, id LIMIT $3 OFFSET $4",
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
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE $1 OR id = $2")
            .bind(actor.is_admin())
            .bind(actor.user_id())
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(UserEntity, UserEntityCreateUpdate, Uuid);

#[async_trait]
impl HasOwner for UserEntity {
    fn owner_id(&self) -> Option<Uuid> {
        Some(self.id) // owners of users are themselves
    }

    async fn lookup(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        Self::find_by_id(mm, &AuthenticatedUser::admin(), id).await
    }
}

impl UserEntity {
    pub async fn find_by_email(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        email: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn set_roles(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        roles: &[UserRole],
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as("UPDATE users SET roles = $1 WHERE id = $2 RETURNING *")
            .bind(role_names(roles))
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;
        Ok(updated)
    }

    pub async fn set_status(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        status: AccountStatus,
    ) -> DatabaseResult<Self> {
        let updated = sqlx::query_as("UPDATE users SET status = $1 WHERE id = $2 RETURNING *")
            .bind(status.as_str())
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;
        Ok(updated)
    }
}
