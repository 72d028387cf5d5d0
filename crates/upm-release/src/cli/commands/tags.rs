//! Tags command

use clap::Args;
use serde::Serialize;
use tracing::info;

use upm_release_core::CiContext;
use upm_release_git::{GitRunner, TagCatalog, TagInfo};

use super::Session;
use crate::cli::{output, Cli, OutputFormat};

/// List release tags and the commits they point to
#[derive(Debug, Args)]
pub struct TagsCommand {
    /// Fetch remote tags first
    #[arg(long)]
    pub fetch: bool,
}

/// JSON shape of the tag listing
#[derive(Debug, Serialize)]
struct TagListing<'a> {
    tags: Vec<&'a TagInfo>,
    previous_tag: Option<&'a str>,
}

impl TagsCommand {
    /// Execute the tags command
    pub fn execute(&self, cli: &Cli, context: &CiContext) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli, context))
    }

    async fn execute_async(&self, cli: &Cli, context: &CiContext) -> anyhow::Result<()> {
        info!(fetch = self.fetch, "executing tags command");
        let session = Session::open(context).await?;

        if self.fetch {
            session.git.git(&["fetch", "--tags", "--force"]).await?;
        }
        let catalog = TagCatalog::load(&session.git).await?;

        match cli.format {
            OutputFormat::Json => {
                let listing = TagListing {
                    tags: catalog.iter().collect(),
                    previous_tag: catalog.previous_tag(),
                };
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
            OutputFormat::Text => {
                if catalog.is_empty() {
                    if !cli.quiet {
                        output::info("No release tags found");
                    }
                    return Ok(());
                }

                println!("{}", output::header("Release tags"));
                for tag in catalog.iter() {
                    println!(
                        "  {}  {}",
                        output::tag_style().apply_to(&tag.name),
                        console::style(tag.short_hash()).dim()
                    );
                }
                if let Some(previous) = catalog.previous_tag() {
                    println!();
                    println!(
                        "{}",
                        output::key_value(
                            "Previous tag",
                            &output::version_style().apply_to(previous).to_string()
                        )
                    );
                }
            }
        }

        Ok(())
    }
}
