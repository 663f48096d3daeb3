mod config;
mod enrich;
mod error;
mod fetch;
mod handler;
mod parser;
mod pharmacy;
mod pipeline;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use config::Config;
use fetch::HttpFetcher;
use pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "farmacie_scraper", about = "On-duty pharmacies near an address, via farmaciediturno.org")]
struct Cli {
    #[command(flatten)]
    endpoints: EndpointArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EndpointArgs {
    /// Listing search page
    #[arg(long, env = "FARMACIE_LISTING_URL", default_value = config::LISTING_URL, global = true)]
    listing_url: String,
    /// Pharmacy detail page
    #[arg(long, env = "FARMACIE_DETAIL_URL", default_value = config::DETAIL_URL, global = true)]
    detail_url: String,
    /// Max detail pages fetched at once (default: no limit)
    #[arg(long, env = "FARMACIE_MAX_CONCURRENCY", global = true)]
    max_concurrency: Option<usize>,
    /// HTTP timeout in seconds (default: client default)
    #[arg(long, env = "FARMACIE_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,
}

impl EndpointArgs {
    fn into_config(self) -> Config {
        Config {
            listing_url: self.listing_url,
            detail_url: self.detail_url,
            max_concurrency: self.max_concurrency,
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..Config::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find on-duty pharmacies near an address, with coordinates
    Find {
        address: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a saved listing page without touching the network
    Parse {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Coordinates of a single pharmacy detail page
    Detail { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = cli.endpoints.into_config();
    let pipeline = Pipeline::new(HttpFetcher::new(&config)?, &config)?;

    match cli.command {
        Commands::Find { address, pretty } => {
            let query = HashMap::from([(handler::ADDRESS_PARAM.to_string(), address)]);
            let response = handler::handle(&pipeline, &query).await;
            if !response.is_success() {
                bail!("Request failed: {} {}", response.status_code, response.body);
            }
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&response.body)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", response.body);
            }
        }
        Commands::Parse { file, pretty } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let pharmacies = pipeline.parse_listing(&html);
            print_json(&pharmacies, pretty)?;
        }
        Commands::Detail { id } => match pipeline.lookup(&id).await {
            Some(coords) => println!("{},{}", coords.lat, coords.lon),
            None => bail!("No coordinates for pharmacy {}", id),
        },
    }

    tracing::debug!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
