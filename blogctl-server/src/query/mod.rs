//! Query layer: per-entity helpers that filter, sort, and pre-aggregate.

pub mod posts;
pub mod tags;

pub use posts::PostQuery;
pub use tags::TagQuery;
