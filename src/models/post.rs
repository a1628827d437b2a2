use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entries::{Authored, Entries, Entry, Member};
use super::user::User;
use crate::database::{Collection, Document};
use crate::error::FieldError;
use crate::validation::{self, Validate};

/// One user's like; at most one per user per post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
}

impl Member for Like {
    fn member_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: &User, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: author.id,
            text: text.into(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            date: Utc::now(),
        }
    }
}

impl Entry for Comment {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub likes: Entries<Like>,
    #[serde(default)]
    pub comments: Entries<Comment>,
    pub date: DateTime<Utc>,
}

impl Post {
    /// New post stamped with the author's display name and avatar
    pub fn new(author: &User, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: author.id,
            text: text.into(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Entries::new(),
            comments: Entries::new(),
            date: Utc::now(),
        }
    }
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;
    const NAME: &'static str = "Post";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// Body of `POST /api/posts` and `POST /api/posts/comment/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextInput {
    pub text: Option<String>,
}

impl TextInput {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

impl Validate for TextInput {
    fn checks(&self) -> Vec<Option<FieldError>> {
        vec![validation::required("text", self.text.as_deref(), "Text is required")]
    }
}
