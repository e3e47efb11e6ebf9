//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs and GROUP BY for counts (no N+1)
//! - Handles duplicates via ON CONFLICT (no check-then-insert)
//! - Batched lookups take id slices bound as `= ANY($1)`

pub mod comments;
pub mod identities;
pub mod posts;
pub mod tags;

pub use comments::CommentRepo;
pub use identities::IdentityRepo;
pub use posts::PostRepo;
pub use tags::TagRepo;
