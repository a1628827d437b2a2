// Public handlers: sign-up, sign-in and read-only profile browsing
pub mod auth;
pub mod profile;
