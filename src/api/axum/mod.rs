mod cors;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use cors::{default as default_cors, permissive as permissive_cors};
pub use error::{AppError, Scope};
pub use middleware::{AuthenticatedUser, authorization_header};
pub use routes::{AppState, auth_routes, resource_routes, router};
