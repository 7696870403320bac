// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metaport::formats::{self, SourceFormatType};
use metaport::ledger::JsonRpcLedgerClient;
use metaport::module::{codec, Validator};
use metaport::storage::HttpStorageClient;
use metaport::{Config, ConversionPipeline, PublishTerms};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "metaport")]
#[command(author, version, about = "Convert game content archives into anchored metaverse modules", long_about = None)]
struct Cli {
    /// Path to a metaport.toml configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source archive, upload it, and anchor it on the ledger
    Convert {
        /// Path to the source archive
        archive: PathBuf,

        /// Creator wallet address stamped on the module and the anchor
        #[arg(long)]
        creator: String,

        /// Asking price in platform tokens
        #[arg(long, default_value_t = 0, conflicts_with = "free")]
        price: u64,

        /// Offer the module at no cost
        #[arg(long)]
        free: bool,

        /// Marketplace tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Source format override (blockgame, bundle); sniffed when omitted
        #[arg(long)]
        format: Option<String>,

        /// Also write the module document to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse an archive and print the module document without publishing
    Inspect {
        /// Path to the source archive
        archive: PathBuf,

        /// Source format override (blockgame, bundle); sniffed when omitted
        #[arg(long)]
        format: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn parse_format(format: Option<&str>) -> Result<Option<SourceFormatType>> {
    format
        .map(|f| {
            f.parse::<SourceFormatType>().map_err(|_| {
                anyhow::anyhow!("unknown source format: {f} (expected blockgame or bundle)")
            })
        })
        .transpose()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Convert {
            archive,
            creator,
            price,
            free,
            tags,
            format,
            output,
        } => {
            let bytes = std::fs::read(&archive)
                .with_context(|| format!("failed to read {}", archive.display()))?;
            info!("Read {} bytes from {}", bytes.len(), archive.display());

            let format = parse_format(format.as_deref())?;
            let terms = if free {
                PublishTerms::free(creator)
            } else {
                PublishTerms::paid(creator, price)
            }
            .with_tags(tags);

            let storage = Arc::new(HttpStorageClient::new(&config.storage)?);
            let ledger = Arc::new(JsonRpcLedgerClient::new(&config.ledger)?);
            let pipeline = ConversionPipeline::new(&config, storage, ledger);

            let prepared = pipeline.prepare(&bytes, format, &terms)?;
            if let Some(path) = &output {
                std::fs::write(path, codec::encode_pretty(&prepared.record)?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("Module document written to {}", path.display());
            }

            let receipt = pipeline.publish(&prepared).await?;
            println!("Module ID:   {}", receipt.module_id);
            println!("Content ID:  {}", receipt.content_id);
            println!("Transaction: {}", receipt.tx_reference);
            Ok(())
        }
        Commands::Inspect { archive, format } => {
            let bytes = std::fs::read(&archive)
                .with_context(|| format!("failed to read {}", archive.display()))?;

            let format = parse_format(format.as_deref())?;
            let (detected, record) = formats::parse_module(&bytes, format)?;

            match Validator::new(config.validation()).validate(&record) {
                Ok(()) => info!("Module passes validation"),
                Err(e) => warn!("Module would fail validation: {e}"),
            }

            println!("Format: {detected}");
            println!("{}", codec::encode_pretty(&record)?);
            Ok(())
        }
    }
}
