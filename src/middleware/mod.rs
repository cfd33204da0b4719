// Middleware modules
pub mod jwt_auth;
pub mod logging;

// Export JWT auth middleware components
pub use jwt_auth::{jwt_auth_middleware, optional_jwt_auth_middleware, MaybeIdentity};

// Export logging middleware
pub use logging::logging_middleware;
