use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error("Password worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Argon2id PHC string for `password` with a fresh random salt.
/// Runs on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    })
    .await?
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable
pub async fn verify_password(
    password: String,
    stored_hash: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let parsed =
            PasswordHash::new(&stored_hash).map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hash = hash_password("s3cret-pass".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret-pass".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong-pass".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let a = hash_password("s3cret-pass".to_string()).await.unwrap();
        let b = hash_password("s3cret-pass".to_string()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unreadable_hash_is_an_error() {
        let err = verify_password("pw".to_string(), "not-a-phc-string".to_string()).await;
        assert!(matches!(err, Err(PasswordError::Hash(_))));
    }
}
