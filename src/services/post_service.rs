use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize_owner_action, IdentityClaim};
use crate::database::{DocumentStore, Repository};
use crate::error::ApiError;
use crate::models::{Comment, Entries, EntryError, Like, Post, TextInput, User};
use crate::validation::Validate;

/// Posts and their embedded likes and comments.
///
/// Every mutation loads the whole post, changes it in memory and writes it back.
#[derive(Clone)]
pub struct PostService {
    posts: Repository<Post>,
    users: Repository<User>,
}

impl PostService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            posts: Repository::new(Arc::clone(&store)),
            users: Repository::new(store),
        }
    }

    async fn acting_user(&self, claim: &IdentityClaim) -> Result<User, ApiError> {
        Ok(self.users.find_404(claim.user_id).await?)
    }

    pub async fn create(
        &self,
        claim: &IdentityClaim,
        input: TextInput,
    ) -> Result<Post, ApiError> {
        input.validate()?;
        let author = self.acting_user(claim).await?;

        let post = Post::new(&author, input.text());
        self.posts.save(&post).await?;

        tracing::debug!("Post {} created by {}", post.id, author.id);
        Ok(post)
    }

    /// Newest first
    pub async fn list(&self) -> Result<Vec<Post>, ApiError> {
        let mut posts = self.posts.list().await?;
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, ApiError> {
        Ok(self.posts.find_404(id).await?)
    }

    /// Only the author may delete a post
    pub async fn delete(&self, claim: &IdentityClaim, id: Uuid) -> Result<(), ApiError> {
        let post = self.get(id).await?;
        authorize_owner_action(claim, post.author_id)?;

        if !self.posts.delete(id).await? {
            return Err(ApiError::not_found("Post not found"));
        }

        tracing::debug!("Post {} removed by {}", id, claim.user_id);
        Ok(())
    }

    pub async fn like(
        &self,
        claim: &IdentityClaim,
        id: Uuid,
    ) -> Result<Entries<Like>, ApiError> {
        let mut post = self.get(id).await?;

        post.likes
            .add_member(Like { user_id: claim.user_id })
            .map_err(|_| ApiError::conflict("Post already liked"))?;
        self.posts.save(&post).await?;

        Ok(post.likes)
    }

    pub async fn unlike(
        &self,
        claim: &IdentityClaim,
        id: Uuid,
    ) -> Result<Entries<Like>, ApiError> {
        let mut post = self.get(id).await?;

        post.likes
            .remove_member(claim.user_id)
            .map_err(|_| ApiError::conflict("Post has not yet been liked"))?;
        self.posts.save(&post).await?;

        Ok(post.likes)
    }

    pub async fn comment(
        &self,
        claim: &IdentityClaim,
        id: Uuid,
        input: TextInput,
    ) -> Result<Entries<Comment>, ApiError> {
        input.validate()?;
        let author = self.acting_user(claim).await?;
        let mut post = self.get(id).await?;

        post.comments.insert_front(Comment::new(&author, input.text()));
        self.posts.save(&post).await?;

        Ok(post.comments)
    }

    /// Only the comment's own author may delete it, not the post's author
    pub async fn delete_comment(
        &self,
        claim: &IdentityClaim,
        id: Uuid,
        comment_id: Uuid,
    ) -> Result<Entries<Comment>, ApiError> {
        let mut post = self.get(id).await?;

        post.comments
            .remove_authored(comment_id, claim)
            .map_err(|e| match e {
                EntryError::Forbidden => {
                    tracing::warn!(
                        "User {} tried to delete comment {} they did not write",
                        claim.user_id,
                        comment_id
                    );
                    e.describe("Comment")
                }
                _ => e.describe("Comment"),
            })?;
        self.posts.save(&post).await?;

        Ok(post.comments)
    }
}
