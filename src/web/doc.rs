use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct SessionAuthModifier;

impl Modify for SessionAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "Session JWT set by /api/auth/signin",
                ))),
            );
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::account_signin_handler,
        crate::web::routes::account::account_signout_handler,
        crate::web::routes::account::account_me_handler,
        crate::web::routes::users::users_list_handler,
        crate::web::routes::users::users_create_handler,
        crate::web::routes::users::users_get_handler,
        crate::web::routes::users::users_update_handler,
        crate::web::routes::users::users_delete_handler,
        crate::web::routes::users::users_set_roles_handler,
        crate::web::routes::users::users_set_status_handler,
        crate::web::routes::resellers::resellers_list_handler,
        crate::web::routes::resellers::resellers_create_handler,
        crate::web::routes::resellers::resellers_get_handler,
        crate::web::routes::resellers::resellers_update_handler,
        crate::web::routes::resellers::resellers_delete_handler,
        crate::web::routes::consumers::consumers_list_handler,
        crate::web::routes::consumers::consumers_create_handler,
        crate::web::routes::consumers::consumers_get_handler,
        crate::web::routes::consumers::consumers_update_handler,
        crate::web::routes::consumers::consumers_delete_handler,
        crate::web::routes::brands::brands_list_handler,
        crate::web::routes::brands::brands_create_handler,
        crate::web::routes::brands::brands_get_handler,
        crate::web::routes::brands::brands_update_handler,
        crate::web::routes::brands::brands_delete_handler,
        crate::web::routes::products::products_list_handler,
        crate::web::routes::products::products_create_handler,
        crate::web::routes::products::products_get_handler,
        crate::web::routes::products::products_update_handler,
        crate::web::routes::products::products_delete_handler,
        crate::web::routes::products::products_payment_link_handler,
    ),
    modifiers(&SessionAuthModifier),
    tags(
        (name = "auth", description = "Console sessions"),
        (name = "users", description = "Console accounts and their roles"),
        (name = "resellers", description = "Reseller companies"),
        (name = "consumers", description = "End customers"),
        (name = "brands", description = "Brands"),
        (name = "products", description = "Products and payment links"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/signin",
            "/api/admin/users/{user_id}/roles",
            "/api/admin/resellers",
            "/api/admin/consumers/{consumer_id}",
            "/api/admin/brands",
            "/api/admin/products/{product_id}/payment-link",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }

        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("cookie"));
        assert!(schemes.contains_key("bearer"));
    }
}
