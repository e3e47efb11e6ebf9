//! Database layer - store trait, connection pool, and repositories
//!
//! # Design Principles
//!
//! - Connection pool (default 5 connections) - no Arc<Mutex<Connection>>
//! - Counts are aggregated by the store at query time, never persisted
//! - Batched lookups for eager loading - no N+1 on the optimized paths
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod memory;
pub mod migrations;
pub mod pg;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use pool::{create_pool, create_pool_with_options};
pub use store::{BlogStore, DbError};
