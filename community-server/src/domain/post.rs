use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::DomainError;

const TITLE_MAX_CHARS: usize = 255;
const REQUIRED_MESSAGE: &str = "Title and content are required";

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Raw input for a new post, as it arrives from the client.
#[derive(Debug, Clone, Default)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) author_id: Option<i64>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<ValidPost, DomainError> {
        Ok(ValidPost {
            title: normalize_title(self.title.as_deref())?,
            content: normalize_content(self.content.as_deref())?,
            author_id: self.author_id,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let title = normalize_title(Some(&title.into()))?;
        let content = normalize_content(Some(&content.into()))?;

        Ok(Self {
            id,
            title,
            content,
            author_id,
            created_at,
        })
    }
}

fn normalize_title(title: Option<&str>) -> Result<String, DomainError> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(DomainError::Validation {
            field: "title",
            message: REQUIRED_MESSAGE,
        });
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::Validation {
            field: "title",
            message: "Title must be at most 255 characters",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: Option<&str>) -> Result<String, DomainError> {
    let content = content.map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: REQUIRED_MESSAGE,
        });
    }
    Ok(content.to_string())
}
