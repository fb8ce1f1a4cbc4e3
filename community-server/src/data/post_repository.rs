use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// Stores a post under a fresh id that sorts after every existing one.
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn total_posts(&self) -> Result<i64, DomainError>;
}
