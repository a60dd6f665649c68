//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, user_handler};
use crate::domain::UserResponse;
use crate::services::TokenResponse;

/// OpenAPI documentation for keygate
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Keygate",
        version = "0.1.0",
        description = "User lookup and token-authentication API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::reset_request,
        // User endpoints
        user_handler::get_user,
        user_handler::list_users,
    ),
    components(
        schemas(
            UserResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::ResetPasswordRequest,
            auth_handler::MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and password reset"),
        (name = "Users", description = "User lookup operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
