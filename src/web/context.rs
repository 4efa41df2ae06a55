//! Request context, e.g. user id, its roles, etc.
//!

use std::str::FromStr;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::web::{WebResult, error::WebError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: uuid::Uuid,
    roles: Vec<UserRole>,
}

impl AuthenticatedUser {
    pub fn new(user_id: uuid::Uuid, roles: Vec<UserRole>) -> Self {
        Self { user_id, roles }
    }

    /// Internal actor for lookups that must not be scoped (guard, bootstrap, cli).
    pub fn admin() -> Self {
        Self {
            roles: vec![UserRole::Admin],
            user_id: uuid::Uuid::max(), // admin ID
        }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.user_id
    }

    pub fn roles(&self) -> &[UserRole] {
        &self.roles
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Reseller,
    Consumer,
    Viewer,
    Support,
    User,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Reseller => "reseller",
            Self::Consumer => "consumer",
            Self::Viewer => "viewer",
            Self::Support => "support",
            Self::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "reseller" => Ok(Self::Reseller),
            "consumer" => Ok(Self::Consumer),
            "viewer" => Ok(Self::Viewer),
            "support" => Ok(Self::Support),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Deactivated,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deactivated => "deactivated",
        }
    }
}

impl From<&str> for AccountStatus {
    // anything the db doesn't call active is treated as locked out
    fn from(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Deactivated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    maybe_user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(maybe_user: Option<AuthenticatedUser>) -> Self {
        Self { maybe_user }
    }

    pub fn admin() -> Self {
        Self::new(Some(AuthenticatedUser::admin()))
    }

    pub fn maybe_user(&self) -> Option<&AuthenticatedUser> {
        self.maybe_user.as_ref()
    }

    pub fn user(&self) -> WebResult<&AuthenticatedUser> {
        self.maybe_user.as_ref().ok_or(WebError::auth_required())
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<RequestContext>();
        if let Some(ctx) = ctx {
            Ok(ctx.clone())
        } else {
            Ok(RequestContext::new(None))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roles_parse_from_closed_set() {
        assert_eq!("support".parse::<UserRole>(), Ok(UserRole::Support));
        assert_eq!(
            "superuser".parse::<UserRole>(),
            Err(UnknownRole(String::from("superuser")))
        );
        assert_eq!(UserRole::Reseller.to_string(), "reseller");
    }

    #[test]
    fn status_defaults_to_locked_out() {
        assert_eq!(AccountStatus::from("active"), AccountStatus::Active);
        assert_eq!(AccountStatus::from("banned"), AccountStatus::Deactivated);
    }

    #[test]
    fn context_without_user_requires_auth() {
        let ctx = RequestContext::new(None);
        assert!(ctx.user().is_err());
        assert!(RequestContext::admin().user().unwrap().is_admin());
    }
}
