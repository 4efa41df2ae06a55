use crate::{
    auth::hash_password,
    config::Bootstrap,
    error::{AppError, AppResult},
    model::{
        CrudRepository, ModelManager,
        entity::{UserEntity, UserEntityCreateUpdate},
    },
    validation::is_valid_email,
    web::{AuthenticatedUser, UserRole, dto::users::MIN_PASSWORD_LEN},
};

/// Applies the account rules the API enforces to the configured admin and returns the
/// normalized email.
fn checked_admin_email(bootstrap: &Bootstrap) -> AppResult<String> {
    let email = bootstrap.admin_email().trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::InvalidInput(format!(
            "bootstrap.admin_email `{email}` is not a valid email address"
        )));
    }
    if bootstrap.admin_password().chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "bootstrap.admin_password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(email)
}

/// Creates the configured administrator unless a user with that email already exists.
/// Returns `true` when an account was created.
#[tracing::instrument(skip_all)]
pub async fn ensure_bootstrap_admin(mm: &ModelManager, bootstrap: &Bootstrap) -> AppResult<bool> {
    let email = checked_admin_email(bootstrap)?;
    let system = AuthenticatedUser::admin();
    if UserEntity::find_by_email(mm, &system, &email).await?.is_some() {
        tracing::debug!("bootstrap admin already present");
        return Ok(false);
    }

    let hash = hash_password(bootstrap.admin_password())?;
    let created = UserEntity::create(
        mm,
        &system,
        UserEntityCreateUpdate {
            email,
            full_name: String::from("Administrator"),
            phone: None,
            country: None,
            roles: vec![UserRole::Admin],
            password_hash: Some(hash),
        },
    )
    .await?;

    tracing::info!(user_id = %created.id(), "bootstrap admin created");
    Ok(true)
}
