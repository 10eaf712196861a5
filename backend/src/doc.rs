//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: the user CRUD endpoints, the health probes, and the
//! shared schemas. The generated specification backs Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, User, UserPayload, Violation};
use crate::inbound::http::users::{MessageEnvelope, UpdateEnvelope, UserEnvelope};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User directory API",
        description = "CRUD over user records with field validation and offset pagination."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        UserPayload,
        Violation,
        Error,
        ErrorCode,
        UserEnvelope,
        MessageEnvelope,
        UpdateEnvelope,
    )),
    tags(
        (name = "users", description = "Operations on user records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_registers_all_user_operations() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/users"));
        assert!(paths.contains_key("/users/{id}"));
        assert!(paths.contains_key("/health/live"));
        assert!(paths.contains_key("/health/ready"));
    }

    #[test]
    fn openapi_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("User"));
        assert!(schemas.contains_key("Violation"));
    }
}
