use uuid::Uuid;

use super::IdentityClaim;
use crate::error::ApiError;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Forbidden,
}

/// Decide whether the acting identity owns the resource
pub fn check_owner(claim: &IdentityClaim, resource_owner_id: Uuid) -> Access {
    if claim.user_id == resource_owner_id {
        Access::Allow
    } else {
        Access::Forbidden
    }
}

/// Ownership check for delete and other owner-restricted mutations.
/// Appends (like, comment, create) need only a valid identity and never call this.
pub fn authorize_owner_action(
    claim: &IdentityClaim,
    resource_owner_id: Uuid,
) -> Result<(), ApiError> {
    match check_owner(claim, resource_owner_id) {
        Access::Allow => Ok(()),
        Access::Forbidden => {
            tracing::warn!(
                "Ownership check failed: user {} acting on resource owned by {}",
                claim.user_id,
                resource_owner_id
            );
            Err(ApiError::forbidden("User not authorized"))
        }
    }
}
