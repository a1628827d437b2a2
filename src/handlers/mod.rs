// Two security tiers:
// Public (no credential) and Protected (verified credential, `IdentityClaim` in extensions)
pub mod protected;
pub mod public;
