//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::register_handler;
use crate::validation::RegisterRequest;

/// OpenAPI documentation for the User Registration API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registration API",
        version = "0.1.0",
        description = "A robust user registration REST API with simulated email verification",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        register_handler::register,
    ),
    components(
        schemas(
            RegisterRequest,
            register_handler::RegisterResponse,
            register_handler::VerificationInfo,
        )
    ),
    tags(
        (name = "Registration", description = "User account registration")
    )
)]
pub struct ApiDoc;
