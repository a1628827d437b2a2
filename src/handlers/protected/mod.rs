// Protected handlers: every route here sits behind `jwt_auth_middleware`,
// so handlers can take `Extension<IdentityClaim>` unconditionally
pub mod auth;
pub mod posts;
pub mod profile;
