use uuid::Uuid;

use crate::{
    model::{AccessDecision, Authorization, HasOwner, Operation, ResourceType, authorize, can_create},
    web::{AppState, AuthenticatedUser, RequestContext, WebError, WebResult},
};

/// Runs the authorization guard for `id` and returns the acting user together with the loaded
/// resource, or the matching 401/403/404/500 error.
pub async fn guard<T: HasOwner>(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    op: Operation,
) -> WebResult<(AuthenticatedUser, T)> {
    let user = ctx.user()?;

    let authorization = authorize::<T>(state.pool(), user.user_id(), id, op)
        .await
        .map_err(|e| WebError::resource_fetch_error(T::get_resource_type(), e))?;

    match authorization {
        Authorization::Allowed { actor, resource } => Ok((actor, resource)),
        Authorization::Denied(reason) => {
            tracing::info!(
                user_id = %user.user_id(),
                resource_id = %id,
                ?op,
                reason = reason.code(),
                "access denied"
            );
            Err(WebError::access_denied(T::get_resource_type(), reason))
        }
    }
}

pub fn require_create(actor: &AuthenticatedUser, resource_type: ResourceType) -> WebResult<()> {
    match can_create(actor, resource_type) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => Err(WebError::access_denied(resource_type, reason)),
    }
}

pub fn require_admin(actor: &AuthenticatedUser, resource_type: ResourceType) -> WebResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(WebError::resource_forbidden(resource_type))
    }
}

/// Ownership field to persist. Admins may assign any owner (keeping the current one when none
/// is given); everyone else owns what they create and can't hand records over.
pub fn resolve_owner(
    actor: &AuthenticatedUser,
    requested: Option<Uuid>,
    current: Option<Uuid>,
) -> Option<Uuid> {
    if actor.is_admin() {
        requested.or(current)
    } else {
        current.or(Some(actor.user_id()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::web::UserRole;

    #[test]
    fn non_admin_always_owns_new_records() {
        let reseller = AuthenticatedUser::new(Uuid::new_v4(), vec![UserRole::Reseller]);
        let other = Uuid::new_v4();
        assert_eq!(
            resolve_owner(&reseller, Some(other), None),
            Some(reseller.user_id())
        );
    }

    #[test]
    fn non_admin_cannot_transfer() {
        let reseller = AuthenticatedUser::new(Uuid::new_v4(), vec![UserRole::Reseller]);
        let owner = Some(reseller.user_id());
        assert_eq!(resolve_owner(&reseller, Some(Uuid::new_v4()), owner), owner);
    }

    #[test]
    fn admin_assigns_or_keeps() {
        let admin = AuthenticatedUser::new(Uuid::new_v4(), vec![UserRole::Admin]);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(resolve_owner(&admin, Some(a), Some(b)), Some(a));
        assert_eq!(resolve_owner(&admin, None, Some(b)), Some(b));
        assert_eq!(resolve_owner(&admin, None, None), None);
    }

    #[test]
    fn only_admins_pass_admin_gate() {
        let support = AuthenticatedUser::new(Uuid::new_v4(), vec![UserRole::Support]);
        assert!(require_admin(&support, ResourceType::User).is_err());
        assert!(require_admin(&AuthenticatedUser::admin(), ResourceType::User).is_ok());
    }
}
