pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use jwt::JwtService;
pub use middleware::{extract_bearer_token, jwt_auth_middleware};
pub use models::*;
pub use service::AuthService;
