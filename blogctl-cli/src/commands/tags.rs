//! Tag listing and creation

use anyhow::Result;
use blogctl_server::db::BlogStore;
use blogctl_server::models::TagTitle;
use blogctl_server::query::TagQuery;
use blogctl_server::{AssetStorage, BlogConfig, Serializer};
use clap::{Args, Subcommand};

use super::{connect, print_json};

#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// Tags with the most posts
    Popular {
        /// Number of tags to list
        #[arg(long, short = 'n', default_value_t = 5)]
        limit: i64,
    },
    /// Create a tag (returns the existing tag if the title is taken)
    Add {
        /// Tag title, stored lowercase (max 20 characters)
        title: String,
    },
}

pub async fn run_tags(args: TagsArgs, config: &BlogConfig) -> Result<()> {
    match args.command {
        TagsCommand::Popular { limit } => {
            let store = connect(config).await?;
            let assets = AssetStorage::new(&config.media_url);

            let tags = TagQuery::new(&store).popular(limit).await?;
            let views = Serializer::new(&store, &assets).tags(&tags).await?;
            print_json(&views)?;
        }
        TagsCommand::Add { title } => {
            // Validate before connecting
            let title = TagTitle::new(&title)?;
            let store = connect(config).await?;

            let tag = store.create_tag(title).await?;
            tracing::info!(id = tag.id, title = %tag.title, "tag ready");
            print_json(&tag)?;
        }
    }
    Ok(())
}
