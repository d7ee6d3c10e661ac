//! Campus Compass command line assistant
//!
//! Usage:
//!   campus-compass [--config <path>] [--catalog <path>] [--offline] [--json] [query...]
//!
//! With a query, answers it and exits. Without one, reads one query per line
//! from stdin until EOF.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, BufReader};

use campus_compass::config::{ConfigStore, ConfigStoreConfig};
use campus_compass::embeddings::{
    EmbeddingGateway, EmbeddingProvider, GeminiClient, HashingEmbeddingProvider,
};
use campus_compass::logging::{LogLevel, LoggingSystem};
use campus_compass::responder::{AssistantService, ChatReply, ChatResponder};
use campus_compass::{EmbeddingIndex, JsonFileCatalog, ResolutionOrchestrator};

/// Command line arguments
struct Args {
    /// Configuration file; the platform config dir when absent
    config: Option<PathBuf>,
    /// Catalog file, overriding the configured one
    catalog: Option<PathBuf>,
    /// Use local hashing embeddings and templated replies
    offline: bool,
    /// Print replies as JSON
    json: bool,
    verbose: bool,
    query: Vec<String>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut parsed = Args {
            config: None,
            catalog: None,
            offline: false,
            json: false,
            verbose: false,
            query: Vec::new(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    parsed.config = Some(args.next().ok_or("--config needs a path")?.into());
                }
                "--catalog" => {
                    parsed.catalog = Some(args.next().ok_or("--catalog needs a path")?.into());
                }
                "--offline" => parsed.offline = true,
                "--json" => parsed.json = true,
                "--verbose" | "-v" => parsed.verbose = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--" => parsed.query.extend(args.by_ref()),
                flag if flag.starts_with("--") => {
                    return Err(format!("Unknown argument: {}", flag));
                }
                _ => parsed.query.push(arg),
            }
        }

        Ok(parsed)
    }
}

fn print_help() {
    println!(
        r#"Campus Compass - find campus resources by describing what you need

USAGE:
    campus-compass [OPTIONS] [QUERY...]

OPTIONS:
    -c, --config <PATH>    Configuration file
        --catalog <PATH>   Catalog JSON file (overrides the configuration)
        --offline          Local embeddings and templated replies, no network
        --json             Print replies as JSON
    -v, --verbose          Debug logging
    -h, --help             Print help

ENVIRONMENT:
    CAMPUS_COMPASS_API_KEY / GEMINI_API_KEY    Hosted provider key
    CAMPUS_COMPASS_CATALOG                     Catalog JSON file
    RUST_LOG                                   Log filter"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(2);
        }
    };

    let settings = match &args.config {
        Some(path) => ConfigStoreConfig::at(path),
        None => ConfigStoreConfig::default(),
    };
    let store = ConfigStore::new(settings)
        .await
        .context("failed to load configuration")?;
    let config = store.get().clone();

    let mut logging_config = config.logging.clone();
    if args.verbose {
        logging_config.level = LogLevel::Debug;
    }
    let _logging = LoggingSystem::init(logging_config).context("failed to initialize logging")?;

    let catalog_path = match args.catalog.or_else(|| config.catalog_path.clone()) {
        Some(path) => path,
        None => bail!("no catalog configured; pass --catalog or set CAMPUS_COMPASS_CATALOG"),
    };

    let online = !args.offline && config.provider.has_api_key();
    let (provider, responder): (Arc<dyn EmbeddingProvider>, ChatResponder) = if online {
        let client = Arc::new(GeminiClient::new(config.provider.clone())?);
        let provider: Arc<dyn EmbeddingProvider> = client.clone();
        (provider, ChatResponder::new(client))
    } else {
        if !args.offline {
            tracing::warn!("No provider API key found, running offline");
        }
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbeddingProvider::default());
        (provider, ChatResponder::templated())
    };
    tracing::info!(model = provider.model_id(), catalog = ?catalog_path, "Starting Campus Compass");

    let index = EmbeddingIndex::new(EmbeddingGateway::new(provider), config.search.clone());
    let orchestrator = ResolutionOrchestrator::new(Arc::new(index), config.resolution.clone());
    let service = AssistantService::new(JsonFileCatalog::new(catalog_path), orchestrator, responder);

    let report = service
        .initialize_embeddings()
        .await
        .context("failed to read catalog")?;
    if !report.ready {
        tracing::warn!(
            failed = report.failed.len(),
            "Embedding index unavailable, answering from keywords only"
        );
    }

    if !args.query.is_empty() {
        let reply = service.answer(&args.query.join(" ")).await;
        return print_reply(&reply, args.json);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = service.answer(&line).await;
        print_reply(&reply, args.json)?;
    }

    Ok(())
}

fn print_reply(reply: &ChatReply, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(reply)?);
        return Ok(());
    }

    println!("{}", reply.text);
    for resource in &reply.resources {
        match resource.navigate_to.url() {
            Some(url) => println!("  [{}] {} <{}>", resource.category, resource.name, url),
            None => println!("  [{}] {}", resource.category, resource.name),
        }
    }
    println!();
    Ok(())
}
