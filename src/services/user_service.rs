use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, IdentityClaim};
use crate::database::{DocumentStore, Repository};
use crate::error::ApiError;
use crate::models::user::password_check;
use crate::models::{LoginInput, RegisterInput, User};
use crate::validation::{self, Validate};

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

#[derive(Clone)]
pub struct UserService {
    users: Repository<User>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Repository::new(store),
        }
    }

    /// Create an account. Emails are unique, compared case-insensitively.
    /// Without a password the account can only use credentials issued out of band.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        avatar: Option<String>,
        password: Option<String>,
    ) -> Result<User, ApiError> {
        validation::run([
            validation::required("name", Some(name), "Name is required"),
            validation::email("email", Some(email)),
            password.as_deref().and_then(|pw| password_check(Some(pw))),
        ])?;

        let email = email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("User already exists"));
        }

        let mut user = User::new(name.trim(), email, avatar);
        if let Some(password) = password {
            user.password_hash = Some(hash_password(password).await?);
        }
        self.users.save(&user).await?;

        tracing::info!("User {} registered", user.id);
        Ok(user)
    }

    /// Self-service sign-up with a password
    pub async fn register(&self, input: RegisterInput) -> Result<User, ApiError> {
        input.validate()?;

        let RegisterInput { name, email, password } = input;
        self.create(
            name.as_deref().unwrap_or_default(),
            email.as_deref().unwrap_or_default(),
            None,
            password,
        )
        .await
    }

    /// Resolve email and password to an account.
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, input: LoginInput) -> Result<User, ApiError> {
        input.validate()?;

        let email = input.email.unwrap_or_default().trim().to_lowercase();
        let password = input.password.unwrap_or_default();

        let Some(user) = self.find_by_email(&email).await? else {
            tracing::debug!("Login for unknown email");
            return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
        };
        let Some(stored_hash) = user.password_hash.clone() else {
            tracing::debug!("Login for account {} without a password", user.id);
            return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !verify_password(password, stored_hash).await? {
            tracing::warn!("Wrong password for account {}", user.id);
            return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, ApiError> {
        Ok(self.users.find_404(id).await?)
    }

    pub async fn current(&self, claim: &IdentityClaim) -> Result<User, ApiError> {
        self.get(claim.user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.list().await?.into_iter().find(|u| u.email == email))
    }
}
