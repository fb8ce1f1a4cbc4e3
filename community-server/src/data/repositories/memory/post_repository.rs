use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Default)]
pub(crate) struct MemoryPostRepository {
    inner: RwLock<PostTable>,
}

#[derive(Debug, Default)]
struct PostTable {
    // newest at the front
    posts: VecDeque<Post>,
    last_id: i64,
}

impl MemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut table = self.inner.write().await;
        let id = table.last_id + 1;

        let post = Post::new(id, input.title, input.content, input.author_id, Utc::now())?;
        table.last_id = id;
        table.posts.push_front(post.clone());

        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let table = self.inner.read().await;
        Ok(table.posts.iter().cloned().collect())
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut table = self.inner.write().await;
        let Some(index) = table.posts.iter().position(|post| post.id == id) else {
            return Ok(false);
        };
        table.posts.remove(index);
        Ok(true)
    }

    async fn total_posts(&self) -> Result<i64, DomainError> {
        let table = self.inner.read().await;
        Ok(table.posts.len() as i64)
    }
}
