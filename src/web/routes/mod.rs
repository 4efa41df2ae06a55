use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::Router;
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod brands;
pub mod consumers;
pub mod products;
pub mod resellers;
pub mod users;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    /// `(limit, offset)` clamped to sane values.
    pub fn bounds(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/auth", account::routes(state.clone()))
        .nest("/api/admin/users", users::routes(state.clone()))
        .nest("/api/admin/resellers", resellers::routes(state.clone()))
        .nest("/api/admin/consumers", consumers::routes(state.clone()))
        .nest("/api/admin/products", products::routes(state.clone()))
        .nest("/api/admin/brands", brands::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let q = PaginationQuery {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(q.bounds(), (MAX_PAGE_LIMIT, 0));
        assert_eq!(PaginationQuery::default().bounds(), (DEFAULT_PAGE_LIMIT, 0));
    }
}
