//! Error types for page assembly and serialization

use thiserror::Error;

use crate::db::DbError;
use crate::models::ValidationError;

pub type PageResult<T> = Result<T, PageError>;

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Db(#[from] DbError),

    /// The post was serialized with `CommentsAmount::Precomputed` but
    /// `fetch_with_comments_count` never ran over it.
    #[error("comments count was not fetched for post '{slug}'")]
    MissingCommentsCount { slug: String },

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl PageError {
    /// True for lookups that should surface as a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageError::Db(DbError::NotFound { .. }))
    }
}
