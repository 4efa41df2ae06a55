use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::model::entity::{UserEntity, UserEntityCreateUpdate};
use crate::model::{CrudRepository, Operation, Page, PaginatableRepository, ResourceTyped};
use crate::validation::{Validate, normalize_phone};
use crate::web::dto::users::{UserCreateBody, UserRolesBody, UserStatusBody, UserUpdateBody};
use crate::web::error::ErrorResponse;
use crate::web::routes::PaginationQuery;
use crate::web::{
    AccountStatus, ApiResponse, AppState, RequestContext, UserRole, WebError, WebResult, guard,
    middlewares, require_admin, require_create,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(users_list_handler).post(users_create_handler))
        .route(
            "/{id}",
            get(users_get_handler)
                .put(users_update_handler)
                .delete(users_delete_handler),
        )
        .route("/{id}/roles", put(users_set_roles_handler))
        .route("/{id}/status", put(users_set_status_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    description = "Console accounts. Admins see everyone, other users only themselves.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of users", body = Page<UserEntity>),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_list_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (limit, offset) = page.bounds();

    let users = UserEntity::page(state.pool(), user, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    Ok(ApiResponse::ok(users))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    description = "Create a console account. Admin only. Without roles the account gets `user`.",
    request_body = UserCreateBody,
    responses(
        (status = 201, description = "User created", body = UserEntity),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Only admins create users", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_create_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<UserCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    require_create(user, UserEntity::get_resource_type())?;
    body.validate()?;

    let hash = hash_password(&body.password).map_err(WebError::server_crypt_error)?;
    let data = UserEntityCreateUpdate {
        email: body.email.trim().to_lowercase(),
        full_name: body.full_name.trim().to_string(),
        phone: body.phone.as_deref().map(normalize_phone),
        country: body.country.map(|c| c.to_uppercase()),
        roles: body.roles,
        password_hash: Some(hash),
    };

    let created = UserEntity::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    tracing::info!(user_id = %created.id(), created_by = %user.user_id(), "user created");
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "User found", body = UserEntity),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (_, found) = guard::<UserEntity>(&state, &ctx, id, Operation::Read).await?;
    Ok(ApiResponse::ok(found))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}",
    description = "Update profile fields and optionally the password. Roles and status have their own routes.",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    request_body = UserUpdateBody,
    responses(
        (status = 200, description = "User updated", body = UserEntity),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<UserUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let (actor, found) = guard::<UserEntity>(&state, &ctx, id, Operation::Update).await?;
    body.validate()?;

    let password_hash = body
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(WebError::server_crypt_error)?;

    let data = UserEntityCreateUpdate {
        email: body.email.trim().to_lowercase(),
        full_name: body.full_name.trim().to_string(),
        phone: body.phone.as_deref().map(normalize_phone),
        country: body.country.map(|c| c.to_uppercase()),
        roles: Vec::new(),
        password_hash,
    };

    let updated = found
        .update(state.pool(), &actor, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    description = "Delete an account. Records it owned are kept and become admin-only.",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (actor, found) = guard::<UserEntity>(&state, &ctx, id, Operation::Delete).await?;

    found
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    tracing::info!(user_id = %id, deleted_by = %actor.user_id(), "user deleted");
    Ok(ApiResponse::ok(()))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/roles",
    description = "Replace the role list. Admin only; admins can't drop their own admin role.",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    request_body = UserRolesBody,
    responses(
        (status = 200, description = "Roles replaced", body = UserEntity),
        (status = 400, description = "Empty role list or self-demotion", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_set_roles_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<UserRolesBody>,
) -> WebResult<impl IntoResponse> {
    let rt = UserEntity::get_resource_type();
    require_admin(ctx.user()?, rt)?;

    let (actor, found) = guard::<UserEntity>(&state, &ctx, id, Operation::Update).await?;
    require_admin(&actor, rt)?;
    body.validate()?;

    if found.id() == actor.user_id() && !body.roles.contains(&UserRole::Admin) {
        return Err(WebError::resource_bad_request(
            rt,
            "you cannot remove your own admin role",
        ));
    }

    let updated = found
        .set_roles(state.pool(), &actor, &body.roles)
        .await
        .map_err(|e| WebError::resource_fetch_error(rt, e))?;

    tracing::info!(user_id = %id, roles = ?body.roles, changed_by = %actor.user_id(), "roles replaced");
    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/status",
    description = "Activate or deactivate an account. Admin only; admins can't deactivate themselves.",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    request_body = UserStatusBody,
    responses(
        (status = 200, description = "Status changed", body = UserEntity),
        (status = 400, description = "Self-deactivation", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub async fn users_set_status_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<UserStatusBody>,
) -> WebResult<impl IntoResponse> {
    let rt = UserEntity::get_resource_type();
    require_admin(ctx.user()?, rt)?;

    let (actor, found) = guard::<UserEntity>(&state, &ctx, id, Operation::Update).await?;
    require_admin(&actor, rt)?;

    if found.id() == actor.user_id() && body.status == AccountStatus::Deactivated {
        return Err(WebError::resource_bad_request(
            rt,
            "you cannot deactivate your own account",
        ));
    }

    let updated = found
        .set_status(state.pool(), &actor, body.status)
        .await
        .map_err(|e| WebError::resource_fetch_error(rt, e))?;

    tracing::info!(user_id = %id, status = body.status.as_str(), changed_by = %actor.user_id(), "status changed");
    Ok(ApiResponse::ok(updated))
}
