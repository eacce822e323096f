pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use errors::{ApiError, AuthErrorKind};
pub use handlers::health::{health_handler, metrics_handler};
pub use middleware::{AuthMiddleware, AuthUser, RequestId, RequestIdMiddleware};
pub use routes::{ApiRouteDependencies, configure_api_routes};
