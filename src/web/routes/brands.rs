use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::model::entity::{Brand, BrandCreateUpdate};
use crate::model::{CrudRepository, Operation, Page, PaginatableRepository, ResourceTyped};
use crate::validation::Validate;
use crate::web::dto::brands::BrandBody;
use crate::web::error::ErrorResponse;
use crate::web::routes::PaginationQuery;
use crate::web::{
    ApiResponse, AppState, RequestContext, WebError, WebResult, guard, middlewares,
    require_create, resolve_owner,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(brands_list_handler).post(brands_create_handler))
        .route(
            "/{id}",
            get(brands_get_handler)
                .put(brands_update_handler)
                .delete(brands_delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/admin/brands",
    description = "Brands visible to the caller. Admins see every brand, others only their own.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of brands", body = Page<Brand>),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "brands"
)]
pub async fn brands_list_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (limit, offset) = page.bounds();

    let brands = Brand::page(state.pool(), user, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Brand::get_resource_type(), e))?;

    Ok(ApiResponse::ok(brands))
}

#[utoipa::path(
    post,
    path = "/api/admin/brands",
    description = "Create a brand. Resellers always own the brands they create.",
    request_body = BrandBody,
    responses(
        (status = 201, description = "Brand created", body = Brand),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role may not create brands", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "brands"
)]
pub async fn brands_create_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<BrandBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    require_create(user, Brand::get_resource_type())?;
    body.validate()?;

    let data = BrandCreateUpdate {
        owner_user_id: resolve_owner(user, body.owner_user_id, None),
        name: body.name.trim().to_string(),
        description: body.description,
        website: body.website,
    };

    let created = Brand::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Brand::get_resource_type(), e))?;

    tracing::info!(brand_id = %created.id(), user_id = %user.user_id(), "brand created");
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    get,
    path = "/api/admin/brands/{brand_id}",
    params(
        ("brand_id" = Uuid, Path, description = "ID of the brand")
    ),
    responses(
        (status = 200, description = "Brand found", body = Brand),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Brand belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Brand not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "brands"
)]
pub async fn brands_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (_, brand) = guard::<Brand>(&state, &ctx, id, Operation::Read).await?;
    Ok(ApiResponse::ok(brand))
}

#[utoipa::path(
    put,
    path = "/api/admin/brands/{brand_id}",
    params(
        ("brand_id" = Uuid, Path, description = "ID of the brand")
    ),
    request_body = BrandBody,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Brand belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Brand not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "brands"
)]
pub async fn brands_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<BrandBody>,
) -> WebResult<impl IntoResponse> {
    let (actor, brand) = guard::<Brand>(&state, &ctx, id, Operation::Update).await?;
    body.validate()?;

    let data = BrandCreateUpdate {
        owner_user_id: resolve_owner(&actor, body.owner_user_id, brand.owner_user_id()),
        name: body.name.trim().to_string(),
        description: body.description,
        website: body.website,
    };

    let updated = brand
        .update(state.pool(), &actor, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Brand::get_resource_type(), e))?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/brands/{brand_id}",
    description = "Delete a brand. Its products stay and lose the brand reference.",
    params(
        ("brand_id" = Uuid, Path, description = "ID of the brand")
    ),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Brand belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Brand not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "brands"
)]
pub async fn brands_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (actor, brand) = guard::<Brand>(&state, &ctx, id, Operation::Delete).await?;

    brand
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(Brand::get_resource_type(), e))?;

    tracing::info!(brand_id = %id, user_id = %actor.user_id(), "brand deleted");
    Ok(ApiResponse::ok(()))
}
