//! Holocron CLI
//!
//! Explorer for the galaxy archive:
//! - Listing any entity collection page by page (`list`)
//! - Looking up a single entity by id (`show`)
//! - Resolving a character's film/starship relations and exporting the
//!   relation graph as JSON, DOT or SVG (`graph`)
//! - Browsing a collection interactively (`browse`)

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use holocron_api::{
    ApiConfig, ApiError, Character, Film, GalaxyApi, GalaxyClient, Kind, Page, Planet,
    ResourceUrl, Species, Starship, Vehicle,
};
use holocron_graph::{project_graph, resolve_details, resolve_details_lenient, DetailOptions};

mod browse;
mod render;

use render::GraphFormat;

#[derive(Parser)]
#[command(name = "holocron")]
#[command(author, version, about = "Holocron: explorer for the galaxy archive")]
struct Cli {
    /// Archive base URL (overrides HOLOCRON_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of a collection.
    List {
        /// Entity kind: people|films|planets|species|starships|vehicles.
        kind: String,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show a single entity by id.
    Show {
        /// Entity kind: people|films|planets|species|starships|vehicles.
        kind: String,

        id: u64,
    },

    /// Resolve a character's films and shared starships, then export the
    /// relation graph.
    Graph {
        /// Character id in the archive.
        id: u64,

        /// Output format: json|dot|svg.
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Swallow fetch failures into an empty relation list instead of
        /// failing (the failure is still logged).
        #[arg(long)]
        lenient: bool,
    },

    /// Browse a collection interactively.
    Browse {
        /// Entity kind: people|films|planets|species|starships|vehicles.
        #[arg(default_value = "people")]
        kind: String,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holocron=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = GalaxyClient::new(load_config(cli.api_url.as_deref())?);

    match cli.command {
        Commands::List { kind, page } => cmd_list(&client, kind.parse()?, page).await,
        Commands::Show { kind, id } => cmd_show(&client, kind.parse()?, id).await,
        Commands::Graph {
            id,
            format,
            out,
            lenient,
        } => cmd_graph(&client, id, &format, out.as_ref(), lenient).await,
        Commands::Browse { kind, page } => browse::cmd_browse(&client, kind.parse()?, page).await,
    }
}

fn load_config(api_url: Option<&str>) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = api_url {
        config.base_url = ApiConfig::new(url)?.base_url;
    }
    Ok(config)
}

/// One display row of a collection page: a label plus the entity's own
/// reference token for later detail resolution.
pub(crate) struct PageItem {
    pub label: String,
    pub url: Option<ResourceUrl>,
}

pub(crate) async fn fetch_page(
    client: &GalaxyClient,
    kind: Kind,
    page_number: u32,
) -> Result<(u64, Vec<PageItem>), ApiError> {
    fn items<T>(page: Page<T>, row: impl Fn(T) -> PageItem) -> (u64, Vec<PageItem>) {
        let count = page.count;
        (count, page.results.into_iter().map(row).collect())
    }

    Ok(match kind {
        Kind::People => items(client.list::<Character>(kind, page_number).await?, |c| {
            PageItem {
                label: c.name,
                url: c.url,
            }
        }),
        Kind::Films => items(client.list::<Film>(kind, page_number).await?, |f| PageItem {
            label: format!("{} (episode {})", f.title, f.episode_id),
            url: f.url,
        }),
        Kind::Planets => items(client.list::<Planet>(kind, page_number).await?, |p| {
            PageItem {
                label: p.name,
                url: p.url,
            }
        }),
        Kind::Species => items(client.list::<Species>(kind, page_number).await?, |s| {
            PageItem {
                label: s.name,
                url: s.url,
            }
        }),
        Kind::Starships => items(client.list::<Starship>(kind, page_number).await?, |s| {
            PageItem {
                label: s.name,
                url: s.url,
            }
        }),
        Kind::Vehicles => items(client.list::<Vehicle>(kind, page_number).await?, |v| {
            PageItem {
                label: v.name,
                url: v.url,
            }
        }),
    })
}

async fn cmd_list(client: &GalaxyClient, kind: Kind, page: u32) -> Result<()> {
    let (count, items) = fetch_page(client, kind, page).await?;
    let total_pages = browse::page_count(count);

    println!(
        "{} (page {page}/{total_pages}, {count} total)",
        kind.plural().green().bold()
    );
    for item in items {
        println!("  {}", item.label);
    }
    Ok(())
}

async fn cmd_show(client: &GalaxyClient, kind: Kind, id: u64) -> Result<()> {
    let value = match kind {
        Kind::People => serde_json::to_value(client.get::<Character>(kind, id).await?)?,
        Kind::Films => serde_json::to_value(client.get::<Film>(kind, id).await?)?,
        Kind::Planets => serde_json::to_value(client.get::<Planet>(kind, id).await?)?,
        Kind::Species => serde_json::to_value(client.get::<Species>(kind, id).await?)?,
        Kind::Starships => serde_json::to_value(client.get::<Starship>(kind, id).await?)?,
        Kind::Vehicles => serde_json::to_value(client.get::<Vehicle>(kind, id).await?)?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn cmd_graph(
    client: &GalaxyClient,
    id: u64,
    format: &str,
    out: Option<&PathBuf>,
    lenient: bool,
) -> Result<()> {
    let format = GraphFormat::parse(format)?;
    let character: Character = client.get(Kind::People, id).await?;
    let options = DetailOptions::from(client.config());

    let details = if lenient {
        resolve_details_lenient(client, &character, &options).await
    } else {
        resolve_details(client, &character, &options).await?
    };

    let graph = project_graph(&details);
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "projected relation graph"
    );

    write_output(&render::render(&graph, format)?, out)
}

fn write_output(rendered: &str, out: Option<&PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, rendered)?;
            eprintln!("{} {}", "wrote".green().bold(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
