//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod identity;
pub mod post;
pub mod tag;
pub mod validation;

pub use identity::Identity;
pub use post::{Comment, NewPost, Post, PostSlug};
pub use tag::{path_segment, Tag, TagTitle};
pub use validation::ValidationError;
