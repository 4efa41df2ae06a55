use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::model::entity::{Reseller, ResellerCreateUpdate};
use crate::model::{CrudRepository, Operation, Page, PaginatableRepository, ResourceTyped};
use crate::validation::{Validate, normalize_phone};
use crate::web::dto::resellers::ResellerBody;
use crate::web::error::ErrorResponse;
use crate::web::routes::PaginationQuery;
use crate::web::{
    ApiResponse, AppState, AuthenticatedUser, RequestContext, WebError, WebResult, guard,
    middlewares, require_create, resolve_owner,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(resellers_list_handler).post(resellers_create_handler))
        .route(
            "/{id}",
            get(resellers_get_handler)
                .put(resellers_update_handler)
                .delete(resellers_delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

fn into_data(
    actor: &AuthenticatedUser,
    body: ResellerBody,
    current_owner: Option<Uuid>,
) -> ResellerCreateUpdate {
    ResellerCreateUpdate {
        owner_user_id: resolve_owner(actor, body.owner_user_id, current_owner),
        company_name: body.company_name.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        phone: body.phone.as_deref().map(normalize_phone),
        country: body.country.map(|c| c.to_uppercase()),
        commission_rate: body.commission_rate,
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/resellers",
    description = "Resellers visible to the caller. Non-admins only see the reseller they operate.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of resellers", body = Page<Reseller>),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "resellers"
)]
pub async fn resellers_list_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (limit, offset) = page.bounds();

    let resellers = Reseller::page(state.pool(), user, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Reseller::get_resource_type(), e))?;

    Ok(ApiResponse::ok(resellers))
}

#[utoipa::path(
    post,
    path = "/api/admin/resellers",
    description = "Register a reseller company. Admin only.",
    request_body = ResellerBody,
    responses(
        (status = 201, description = "Reseller created", body = Reseller),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role may not create resellers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "resellers"
)]
pub async fn resellers_create_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<ResellerBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    require_create(user, Reseller::get_resource_type())?;
    body.validate()?;

    let created = Reseller::create(state.pool(), user, into_data(user, body, None))
        .await
        .map_err(|e| WebError::resource_fetch_error(Reseller::get_resource_type(), e))?;

    tracing::info!(reseller_id = %created.id(), "reseller created");
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    get,
    path = "/api/admin/resellers/{reseller_id}",
    params(
        ("reseller_id" = Uuid, Path, description = "ID of the reseller")
    ),
    responses(
        (status = 200, description = "Reseller found", body = Reseller),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Reseller is operated by someone else", body = ErrorResponse),
        (status = 404, description = "Reseller not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "resellers"
)]
pub async fn resellers_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (_, reseller) = guard::<Reseller>(&state, &ctx, id, Operation::Read).await?;
    Ok(ApiResponse::ok(reseller))
}

#[utoipa::path(
    put,
    path = "/api/admin/resellers/{reseller_id}",
    params(
        ("reseller_id" = Uuid, Path, description = "ID of the reseller")
    ),
    request_body = ResellerBody,
    responses(
        (status = 200, description = "Reseller updated", body = Reseller),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Reseller is operated by someone else", body = ErrorResponse),
        (status = 404, description = "Reseller not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "resellers"
)]
pub async fn resellers_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<ResellerBody>,
) -> WebResult<impl IntoResponse> {
    let (actor, reseller) = guard::<Reseller>(&state, &ctx, id, Operation::Update).await?;
    body.validate()?;

    let data = into_data(&actor, body, reseller.owner_user_id());

    let updated = reseller
        .update(state.pool(), &actor, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Reseller::get_resource_type(), e))?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/resellers/{reseller_id}",
    params(
        ("reseller_id" = Uuid, Path, description = "ID of the reseller")
    ),
    responses(
        (status = 200, description = "Reseller deleted"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Reseller is operated by someone else", body = ErrorResponse),
        (status = 404, description = "Reseller not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "resellers"
)]
pub async fn resellers_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (actor, reseller) = guard::<Reseller>(&state, &ctx, id, Operation::Delete).await?;

    reseller
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(Reseller::get_resource_type(), e))?;

    tracing::info!(reseller_id = %id, user_id = %actor.user_id(), "reseller deleted");
    Ok(ApiResponse::ok(()))
}
