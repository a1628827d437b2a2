pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{jwt_auth_middleware, AUTH_TOKEN_HEADER};
pub use extract::JsonBody;
pub use response::{ApiResponse, ApiResult};
