use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time},
};

use crate::{
    auth::{self, session_claims, verify_password},
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    validation::Validate,
    web::{
        AccountStatus, ApiResponse, AppState, AuthenticatedUser, RequestContext, WebError,
        WebResult,
        dto::account::{SessionResponse, SigninBody},
        error::ErrorResponse,
        middlewares::{self, AUTH_TOKEN},
    },
};

pub const SESSION_TTL_DAYS: i64 = 1;

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/me", get(account_me_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/signin", post(account_signin_handler))
        .route("/signout", post(account_signout_handler))
        .merge(protected)
        .with_state(state)
}

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(SESSION_TTL_DAYS));
    cookie
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    description = "Starts a console session. Sets the `SID` cookie and returns the token for bearer use.",
    request_body = SigninBody,
    responses(
        (status = 200, description = "Signed in, wrapped in `{success, data}`", body = SessionResponse),
        (status = 400, description = "Malformed email or empty password", body = ErrorResponse),
        (status = 401, description = "Credentials invalid or account deactivated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn account_signin_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SigninBody>,
) -> WebResult<impl IntoResponse> {
    payload.validate()?;

    let system = AuthenticatedUser::admin();
    let found = UserEntity::find_by_email(state.pool(), &system, &payload.email)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::auth_invalid_credentials());
    };

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;
    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    if found.status() == AccountStatus::Deactivated {
        return Err(WebError::auth_account_deactivated());
    }

    let claims = session_claims(found.id(), Duration::days(SESSION_TTL_DAYS));
    let token = auth::generate_token(claims, state.config().app().jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;

    cookies.add(session_cookie(token.clone()));
    tracing::info!(user_id = %found.id(), "signed in");

    Ok(ApiResponse::ok(SessionResponse { user: found, token }))
}

#[utoipa::path(
    post,
    path = "/api/auth/signout",
    description = "Clears the session cookie",
    responses(
        (status = 200, description = "Signed out"),
    ),
    tag = "auth"
)]
pub async fn account_signout_handler(cookies: Cookies) -> impl IntoResponse {
    let mut cookie = Cookie::new(AUTH_TOKEN, "");
    cookie.set_path("/");
    cookies.remove(cookie);

    ApiResponse::ok(())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    description = "Profile of the signed in user",
    responses(
        (status = 200, description = "Current user, wrapped in `{success, data}`", body = UserEntity),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
pub async fn account_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = UserEntity::find_by_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_required)?;

    Ok(ApiResponse::ok(found))
}
