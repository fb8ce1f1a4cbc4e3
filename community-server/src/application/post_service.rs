use std::sync::Arc;

use tracing::info;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post};

pub(crate) struct PostService<R: PostRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: PostRepository + ?Sized> PostService<R> {
    pub(crate) fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(&self, req: CreatePostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            author_id: req.author_id,
        };
        let post = self.repo.create_post(new_post).await?;

        info!(post_id = post.id, author_id = ?post.author_id, "post created");
        Ok(post)
    }

    pub(crate) async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_posts().await
    }

    pub(crate) async fn delete_post(&self, post_id: i64) -> Result<(), DomainError> {
        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound("Post"));
        }

        info!(post_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn total_posts(&self) -> Result<i64, DomainError> {
        self.repo.total_posts().await
    }
}
