//! Resource authorization guard.
//!
//! A request may read, update or delete a resource iff the actor is an admin or the actor's id
//! equals the resource's ownership field. The decision is recomputed from fresh lookups on
//! every call; nothing here is cached.

use uuid::Uuid;

use crate::{
    model::{
        ModelManager, ResourceType,
        entity::UserEntity,
        error::DatabaseResult,
        repo::{CrudRepository, ResourceTyped},
    },
    web::{AuthenticatedUser, UserRole},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
    NotFound,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Resources carrying an ownership reference to a user.
#[async_trait::async_trait]
pub trait HasOwner: ResourceTyped + Sized + Send + Sync {
    /// The user id considered the owner. `None` means only admins may touch the record.
    fn owner_id(&self) -> Option<Uuid>;

    /// Unscoped lookup used by the guard.
    async fn lookup(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>>;
}

/// Outcome of [`authorize`]. On allow, the freshly loaded actor and resource are handed back
/// so the caller doesn't fetch them again.
#[derive(Debug)]
pub enum Authorization<T> {
    Allowed {
        actor: AuthenticatedUser,
        resource: T,
    },
    Denied(DenyReason),
}

impl<T> Authorization<T> {
    pub fn decision(&self) -> AccessDecision {
        match self {
            Self::Allowed { .. } => AccessDecision::Allow,
            Self::Denied(reason) => AccessDecision::Deny(*reason),
        }
    }
}

/// Pure decision over already loaded records. `actor` is `None` when the caller doesn't
/// exist or is deactivated.
pub fn evaluate<T: HasOwner>(actor: Option<&AuthenticatedUser>, resource: Option<&T>) -> AccessDecision {
    let Some(actor) = actor else {
        return AccessDecision::Deny(DenyReason::Unauthenticated);
    };
    let Some(resource) = resource else {
        return AccessDecision::Deny(DenyReason::NotFound);
    };

    // admin can access all resources
    if actor.is_admin() {
        return AccessDecision::Allow;
    }

    match resource.owner_id() {
        Some(owner) if owner == actor.user_id() => AccessDecision::Allow,
        _ => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Loads the actor and the resource concurrently and decides. Lookup errors are returned as
/// errors, never turned into an allow.
#[tracing::instrument(skip(mm))]
pub async fn authorize<T: HasOwner>(
    mm: &ModelManager,
    actor_id: Uuid,
    resource_id: Uuid,
    op: Operation,
) -> DatabaseResult<Authorization<T>> {
    let system = AuthenticatedUser::admin();
    let (actor, resource) = tokio::try_join!(
        UserEntity::find_by_id(mm, &system, actor_id),
        T::lookup(mm, resource_id),
    )?;

    let actor = actor.and_then(|user| user.as_actor());
    let decision = evaluate(actor.as_ref(), resource.as_ref());
    tracing::debug!(resource_type = %T::get_resource_type(), ?decision, "authorization decided");

    Ok(match (decision, actor, resource) {
        (AccessDecision::Allow, Some(actor), Some(resource)) => {
            Authorization::Allowed { actor, resource }
        }
        (AccessDecision::Deny(reason), _, _) => Authorization::Denied(reason),
        // evaluate() only allows when both records are present
        _ => Authorization::Denied(DenyReason::NotFound),
    })
}

/// Who may create which resource. Admins create anything; resellers manage their own brands,
/// products and referred consumers.
pub fn can_create(actor: &AuthenticatedUser, resource_type: ResourceType) -> AccessDecision {
    if actor.is_admin() {
        return AccessDecision::Allow;
    }

    let reseller_owned = matches!(
        resource_type,
        ResourceType::Brand | ResourceType::Product | ResourceType::Consumer
    );
    if reseller_owned && actor.has_role(UserRole::Reseller) {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::Forbidden)
    }
}
