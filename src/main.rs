use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use indiacode_ingest::report::write_report;
use indiacode_ingest::runtime::cache::ArtifactCache;
use indiacode_ingest::runtime::fetcher::HttpFetcher;
use indiacode_ingest::runtime::orchestrator::crawl_acts;
use indiacode_ingest::runtime::types::CrawlContext;
use indiacode_ingest::sources::configs::{load_collections, CrawlConfig};
use indiacode_ingest::sources::indiacode::act::{act_details_to_json, build_act_details};
use indiacode_ingest::sources::indiacode::listing::list_collection;
use indiacode_ingest::types::ActListEntry;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ingest", about = "Crawl India Code acts into a local file tree")]
struct Cli {
    /// JSON config file (defaults apply to missing keys). Without it,
    /// INDIACODE_CONFIG is consulted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the browse listing of every collection and write act_infos.json
    List {
        /// JSON array of {"name", "href"} collections
        collections: PathBuf,
    },
    /// Crawl every act listed in an act_infos.json
    Crawl {
        act_infos: PathBuf,
        /// Re-extract act records even when a cached JSON exists
        #[arg(long)]
        refresh: bool,
    },
    /// Extract one saved act page and print its JSON record
    Extract {
        html_file: PathBuf,
        #[arg(long, default_value = "")]
        url: String,
        /// Defaults to the file stem
        #[arg(long)]
        web_number: Option<String>,
    },
    /// Render the Markdown overview of a crawled collection
    Report {
        collection: String,
        #[arg(short, long, default_value = "README.md")]
        output: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CrawlConfig::load_from_file(path),
        None => CrawlConfig::load_default(),
    }
    .map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::List { collections } => {
            let collections = load_collections(&collections).map_err(|e| anyhow!(e))?;
            let fetcher = HttpFetcher::new(&config).map_err(|e| anyhow!(e))?;
            let cache = ArtifactCache::new(&config.website_dir);
            for collection in &collections {
                let acts = list_collection(&fetcher, &cache, &config, collection)
                    .await
                    .map_err(|e| anyhow!(e))?;
                println!("{}: {}", collection.name, acts.len());
            }
        }
        Commands::Crawl { act_infos, refresh } => {
            let content = std::fs::read_to_string(&act_infos)
                .with_context(|| format!("reading {}", act_infos.display()))?;
            let acts: Vec<ActListEntry> = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", act_infos.display()))?;
            let collection = act_infos
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("{} has no collection directory", act_infos.display()))?
                .to_string();

            let fetcher = HttpFetcher::new(&config).map_err(|e| anyhow!(e))?;
            let cache = ArtifactCache::new(&config.website_dir);
            let context = CrawlContext {
                fetcher: &fetcher,
                cache: &cache,
                config: &config,
                collection: &collection,
                refresh,
            };
            let summary = crawl_acts(&context, &acts).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Extract {
            html_file,
            url,
            web_number,
        } => {
            let html = std::fs::read_to_string(&html_file)
                .with_context(|| format!("reading {}", html_file.display()))?;
            let web_number = web_number.unwrap_or_else(|| {
                html_file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let details = build_act_details(&html, &url, &web_number, &config.site_origin)?;
            println!("{}", act_details_to_json(&details)?);
        }
        Commands::Report { collection, output } => {
            write_report(&config.website_dir, &collection, &output).map_err(|e| anyhow!(e))?;
        }
    }

    Ok(())
}
