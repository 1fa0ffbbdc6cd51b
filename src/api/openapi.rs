#![allow(clippy::needless_for_each)]

use super::handlers::{health, login};
use crate::auth::AuthenticatedUser;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(health::health, login::login),
    components(schemas(
        health::Health,
        login::LoginRequest,
        login::LoginResponse,
        login::ErrorResponse,
        AuthenticatedUser
    )),
    tags(
        (name = "login", description = "Email and password authentication"),
        (name = "health", description = "Service and database status")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_routes() {
        let doc = openapi();
        assert!(doc.paths.paths.contains_key("/login"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn openapi_documents_schemas() {
        let doc = openapi();
        let schemas = doc.components.map(|c| c.schemas).unwrap_or_default();
        assert!(schemas.contains_key("LoginRequest"));
        assert!(schemas.contains_key("LoginResponse"));
        assert!(schemas.contains_key("AuthenticatedUser"));
    }
}
