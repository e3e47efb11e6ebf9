//! Identities come from the auth provider; the blog only reads them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An author, commenter, or liker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}
