use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::model::entity::{Brand, Product, ProductCreateUpdate};
use crate::model::{CrudRepository, Operation, Page, PaginatableRepository, ResourceTyped};
use crate::validation::Validate;
use crate::web::dto::products::{PaymentLinkResponse, ProductBody, ProductView};
use crate::web::error::ErrorResponse;
use crate::web::routes::PaginationQuery;
use crate::web::{
    ApiResponse, AppState, AuthenticatedUser, RequestContext, WebError, WebResult, guard,
    middlewares, require_create, resolve_owner,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(products_list_handler).post(products_create_handler))
        .route(
            "/{id}",
            get(products_get_handler)
                .put(products_update_handler)
                .delete(products_delete_handler),
        )
        .route("/{id}/payment-link", get(products_payment_link_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

/// A product may only reference a brand the caller can read. A missing brand is the
/// caller's mistake, not a missing product, so it comes back as 400.
async fn check_brand(
    state: &AppState,
    ctx: &RequestContext,
    brand_id: Option<Uuid>,
) -> WebResult<()> {
    let Some(brand_id) = brand_id else {
        return Ok(());
    };

    match guard::<Brand>(state, ctx, brand_id, Operation::Read).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => Err(WebError::resource_bad_request(
            Product::get_resource_type(),
            "brand does not exist",
        )),
        Err(e) => Err(e),
    }
}

fn into_data(
    state: &AppState,
    actor: &AuthenticatedUser,
    body: ProductBody,
    current_owner: Option<Uuid>,
) -> WebResult<ProductCreateUpdate> {
    let payment_url_enc = body
        .payment_url
        .as_deref()
        .map(|url| state.cipher().encrypt(url))
        .transpose()
        .map_err(WebError::server_crypt_error)?;

    Ok(ProductCreateUpdate {
        owner_user_id: resolve_owner(actor, body.owner_user_id, current_owner),
        brand_id: body.brand_id,
        name: body.name.trim().to_string(),
        description: body.description,
        price_cents: body.price_cents,
        currency: body.currency,
        payment_url_enc,
    })
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    description = "Products visible to the caller, with payment URLs decrypted.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of products", body = Page<ProductView>),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "products"
)]
pub async fn products_list_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (limit, offset) = page.bounds();

    let products = Product::page(state.pool(), user, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Product::get_resource_type(), e))?
        .map(|p| ProductView::new(&p, state.cipher()));

    Ok(ApiResponse::ok(products))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    description = "Create a product. The payment URL is encrypted before it is stored.",
    request_body = ProductBody,
    responses(
        (status = 201, description = "Product created", body = ProductView),
        (status = 400, description = "Validation failed or unknown brand", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role may not create products, or brand is not yours", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "products"
)]
pub async fn products_create_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<ProductBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    require_create(user, Product::get_resource_type())?;
    body.validate()?;
    check_brand(&state, &ctx, body.brand_id).await?;

    let data = into_data(&state, user, body, None)?;
    let created = Product::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Product::get_resource_type(), e))?;

    tracing::info!(product_id = %created.id(), user_id = %user.user_id(), "product created");
    Ok(ApiResponse::created(ProductView::new(&created, state.cipher())))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "ID of the product")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductView),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Product belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "products"
)]
pub async fn products_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (_, product) = guard::<Product>(&state, &ctx, id, Operation::Read).await?;
    Ok(ApiResponse::ok(ProductView::new(&product, state.cipher())))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{product_id}",
    description = "Replace a product. Leaving out `payment_url` removes the stored link.",
    params(
        ("product_id" = Uuid, Path, description = "ID of the product")
    ),
    request_body = ProductBody,
    responses(
        (status = 200, description = "Product updated", body = ProductView),
        (status = 400, description = "Validation failed or unknown brand", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Product or brand belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "products"
)]
pub async fn products_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(body): Json<ProductBody>,
) -> WebResult<impl IntoResponse> {
    let (actor, product) = guard::<Product>(&state, &ctx, id, Operation::Update).await?;
    body.validate()?;
    if body.brand_id != product.brand_id() {
        check_brand(&state, &ctx, body.brand_id).await?;
    }

    let data = into_data(&state, &actor, body, product.owner_user_id())?;
    let updated = product
        .update(state.pool(), &actor, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Product::get_resource_type(), e))?;

    Ok(ApiResponse::ok(ProductView::new(&updated, state.cipher())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "ID of the product")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Product belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "products"
)]
pub async fn products_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (actor, product) = guard::<Product>(&state, &ctx, id, Operation::Delete).await?;

    product
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(Product::get_resource_type(), e))?;

    tracing::info!(product_id = %id, user_id = %actor.user_id(), "product deleted");
    Ok(ApiResponse::ok(()))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{product_id}/payment-link",
    description = "Encrypted payment link token for checkout pages",
    params(
        ("product_id" = Uuid, Path, description = "ID of the product")
    ),
    responses(
        (status = 200, description = "Token issued", body = PaymentLinkResponse),
        (status = 400, description = "Product has no payment url", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Product belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "products"
)]
pub async fn products_payment_link_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let (_, product) = guard::<Product>(&state, &ctx, id, Operation::Read).await?;

    let Some(token) = product.payment_url_enc() else {
        return Err(WebError::resource_bad_request(
            Product::get_resource_type(),
            "product has no payment url",
        ));
    };

    Ok(ApiResponse::ok(PaymentLinkResponse {
        product_id: product.id(),
        token: token.to_string(),
    }))
}
