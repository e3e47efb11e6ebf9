//! Post listings

use anyhow::Result;
use blogctl_server::db::BlogStore;
use blogctl_server::query::PostQuery;
use blogctl_server::serialize::PostView;
use blogctl_server::{AssetStorage, BlogConfig, CommentsAmount, Pages, Serializer};
use clap::{Args, Subcommand};

use super::{connect, print_json};

#[derive(Args, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Subcommand, Debug)]
pub enum PostsCommand {
    /// Posts published in a calendar year (UTC), oldest first
    Year {
        /// Four-digit year
        year: i32,
    },
    /// Most liked posts
    Popular {
        /// Number of posts to list
        #[arg(long, short = 'n', default_value_t = 5)]
        limit: i64,
    },
    /// Full post-detail context for a slug
    Show {
        /// Post slug
        slug: String,
    },
}

pub async fn run_posts(args: PostsArgs, config: &BlogConfig) -> Result<()> {
    let store = connect(config).await?;
    let assets = AssetStorage::new(&config.media_url);

    match args.command {
        PostsCommand::Year { year } => {
            let posts = PostQuery::new(&store).year(year).await?;
            print_json(&serialize_batch(&store, &assets, posts).await?)?;
        }
        PostsCommand::Popular { limit } => {
            let posts = PostQuery::new(&store).popular(limit).await?;
            print_json(&serialize_batch(&store, &assets, posts).await?)?;
        }
        PostsCommand::Show { slug } => {
            let context = Pages::new(&store, &assets).post_detail(&slug).await?;
            print_json(&context)?;
        }
    }
    Ok(())
}

/// Eager-load relations and counts, then serialize.
async fn serialize_batch(
    store: &dyn BlogStore,
    assets: &AssetStorage,
    posts: Vec<blogctl_server::models::Post>,
) -> Result<Vec<PostView>> {
    let query = PostQuery::new(store);
    let posts = query.prefetch_authors_and_tags_with_posts_count(posts).await?;
    let posts = query.fetch_with_comments_count(posts).await?;
    tracing::debug!(posts = posts.len(), "serializing posts");

    Ok(Serializer::new(store, assets)
        .posts(&posts, CommentsAmount::Precomputed)
        .await?)
}
