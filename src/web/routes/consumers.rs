use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::model::entity::{Consumer, ConsumerCreateUpdate};
use crate::model::{CrudRepository, Operation, Page, PaginatableRepository, ResourceTyped};
use crate::validation::{Validate, normalize_phone};
use crate::web::dto::consumers::ConsumerBody;
use crate::web::error::ErrorResponse;
use crate::web::routes::PaginationQuery;
use crate::web::{
    ApiResponse, AppState, AuthenticatedUser, RequestContext, WebError, WebResult, guard,
    middlewares, require_create, resolve_owner,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(consumers_list_handler).post(consumers_create_handler))
        .route(
            "/{id}",
            get(consumers_get_handler)
                .put(consumers_update_handler)
                .delete(consumers_delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

fn into_data(
    actor: &AuthenticatedUser,
    body: ConsumerBody,
    current_referrer: Option<Uuid>,
) -> ConsumerCreateUpdate {
    ConsumerCreateUpdate {
        referred_by: resolve_owner(actor, body.referred_by, current_referrer),
        full_name: body.full_name.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        phone: body.phone.as_deref().map(normalize_phone),
        country: body.country.map(|c| c.to_uppercase()),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/consumers",
    description = "Consumers visible to the caller. Resellers see the consumers they referred.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of consumers", body = Page<Consumer>),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "consumers"
)]
pub async fn consumers_list_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (limit, offset) = page.bounds();

    let consumers = Consumer::page(state.pool(), user, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Consumer::get_resource_type(), e))?;

    Ok(ApiResponse::ok(consumers))
}

#[utoipa::path(
    post,
    path = "/api/admin/consumers",
    description = "Register a consumer. A reseller creating one becomes its referrer.",
    request_body = ConsumerBody,
    responses(
        (status = 201, description = "Consumer created", body = Consumer),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role may not create consumers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "consumers"
)]
pub async fn consumers_create_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<ConsumerBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    require_create(user, Consumer::get_resource_type())?;
    body.validate()?;

    let created = Consumer::create(state.pool(), user, into_data(user, body, None))
        .await
        .map_err(|e| WebError::resource_fetch_error(Consumer::get_resource_type(), e))?;

    tracing::info!(
        consumer_id = %created.id(),
        referred_by = ?created.referred_by(),
        "consumer created"
    );
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    get,
    path = "/api/admin/consumers/{consumer_id}",
    params(
        ("consumer_id" = Uuid, Path, description = "ID of the consumer")
    ),
    responses(
        (status = 200, description = "Consumer found", body = Consumer),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Consumer was referred by someone else", body = ErrorResponse),
        (status = 404, description = "Consumer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "consumers"
)]
pub async fn consumers_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (_, consumer) = guard::<Consumer>(&state, &ctx, id, Operation::Read).await?;
    Ok(ApiResponse::ok(consumer))
}

#[utoipa::path(
    put,
    path = "/api/admin/consumers/{consumer_id}",
    params(
        ("consumer_id" = Uuid, Path, description = "ID of the consumer")
    ),
    request_body = ConsumerBody,
    responses(
        (status = 200, description = "Consumer updated", body = Consumer),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Consumer was referred by someone else", body = ErrorResponse),
        (status = 404, description = "Consumer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "consumers"
)]
pub async fn consumers_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<ConsumerBody>,
) -> WebResult<impl IntoResponse> {
    let (actor, consumer) = guard::<Consumer>(&state, &ctx, id, Operation::Update).await?;
    body.validate()?;

    let data = into_data(&actor, body, consumer.referred_by());
    let updated = consumer
        .update(state.pool(), &actor, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Consumer::get_resource_type(), e))?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/consumers/{consumer_id}",
    params(
        ("consumer_id" = Uuid, Path, description = "ID of the consumer")
    ),
    responses(
        (status = 200, description = "Consumer deleted"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Consumer was referred by someone else", body = ErrorResponse),
        (status = 404, description = "Consumer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "consumers"
)]
pub async fn consumers_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (actor, consumer) = guard::<Consumer>(&state, &ctx, id, Operation::Delete).await?;

    consumer
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(Consumer::get_resource_type(), e))?;

    tracing::info!(consumer_id = %id, user_id = %actor.user_id(), "consumer deleted");
    Ok(ApiResponse::ok(()))
}
