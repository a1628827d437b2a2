use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::database::{Collection, Document};
use crate::error::FieldError;
use crate::validation::{self, Validate};

pub const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_TOO_SHORT: &str = "Please enter a password with 6 or more characters";

/// Stored account. Never serialized into a response; see [`UserView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    /// Argon2 PHC string; `None` for accounts that can only use issued credentials
    #[serde(default)]
    pub password_hash: Option<String>,
    pub date: DateTime<Utc>,
}

impl User {
    /// New account; falls back to the Gravatar for `email` when no avatar is given
    pub fn new(name: impl Into<String>, email: impl Into<String>, avatar: Option<String>) -> Self {
        let email = email.into();
        let avatar = avatar.unwrap_or_else(|| gravatar_url(&email));
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            avatar,
            password_hash: None,
            date: Utc::now(),
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            date: self.date,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;
    const NAME: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.id
    }
}

/// Public part of a user, attached to profile listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Account as shown to its owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for RegisterInput {
    fn checks(&self) -> Vec<Option<FieldError>> {
        vec![
            validation::required("name", self.name.as_deref(), "Name is required"),
            validation::email("email", self.email.as_deref()),
            password_check(self.password.as_deref()),
        ]
    }
}

/// Minimum length rule for a password being set
pub fn password_check(password: Option<&str>) -> Option<FieldError> {
    validation::min_length("password", password, PASSWORD_MIN_LEN, PASSWORD_TOO_SHORT)
}

/// Body of `POST /api/auth`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginInput {
    fn checks(&self) -> Vec<Option<FieldError>> {
        vec![
            validation::email("email", self.email.as_deref()),
            validation::required("password", self.password.as_deref(), "Password is required"),
        ]
    }
}

/// Gravatar image for an address: 200px, PG rated, mystery-person default
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let hash = hasher.finalize();
    format!("https://gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", hash)
}
