pub mod github;
pub mod normalize;
pub mod post_service;
pub mod profile_service;
pub mod user_service;

pub use github::GithubClient;
pub use normalize::{build_profile_update, ProfileUpdate};
pub use post_service::PostService;
pub use profile_service::ProfileService;
pub use user_service::UserService;
