//! blogctl-server: blog read model, page assembly, and HTTP server
//!
//! Posts, tags, comments, and likes live behind the `BlogStore` trait.
//! Query helpers shape and pre-aggregate them, serializers flatten them
//! into display records, and the page builders assemble the contexts that
//! the templates (or the JSON API) consume.

pub mod assets;
pub mod config;
pub mod db;
pub mod demo;
pub mod error;
pub mod http;
pub mod models;
pub mod pages;
pub mod query;
pub mod render;
pub mod serialize;

pub use assets::AssetStorage;
pub use config::BlogConfig;
pub use db::{BlogStore, DbError, MemoryStore, PgStore};
pub use error::{PageError, PageResult};
pub use pages::{IndexContext, Page, Pages, PostDetailContext, TagFilterContext};
pub use render::{AskamaRenderer, PageRenderer};
pub use serialize::{CommentsAmount, Serializer};
