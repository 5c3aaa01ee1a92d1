use anyhow::Context;
use clap::{Parser, Subcommand};
use homematch_api::{AppState, RestApi};
use homematch_core::{Catalog, ResourceBundle, SharedResources};
use homematch_matching::{MatchConfig, MatchEngine};
use homematch_storage::{load_dataset, ArtifactStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Conversational property search over a listing catalog
#[derive(Parser, Debug)]
#[command(name = "homematch")]
#[command(about = "Conversational property search", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// JSON engine configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a raw dataset, fit the resources and save the artifacts
    Train {
        /// Raw listings, JSON array or newline-delimited JSON
        #[arg(long)]
        dataset: PathBuf,

        /// Output artifact directory
        #[arg(long, default_value = "./artifacts")]
        artifacts: PathBuf,
    },

    /// Answer a single request from the command line
    Query {
        #[arg(long, default_value = "./artifacts")]
        artifacts: PathBuf,

        /// Number of results to return
        #[arg(long)]
        top_k: Option<usize>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,

        /// The request, e.g. "3 bedroom house in Austin under $400,000"
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Run the HTTP chat API
    Serve {
        #[arg(long, default_value = "./artifacts")]
        artifacts: PathBuf,

        /// HTTP API port
        #[arg(long, default_value_t = 5000)]
        http_port: u16,

        /// Number of results to return
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Train { dataset, artifacts } => train(&dataset, &artifacts),
        Command::Query {
            artifacts,
            top_k,
            json,
            text,
        } => query(&artifacts, with_top_k(config, top_k)?, json, &text.join(" ")),
        Command::Serve {
            artifacts,
            http_port,
            top_k,
        } => serve(artifacts, http_port, with_top_k(config, top_k)?).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MatchConfig> {
    match path {
        Some(path) => {
            let config = MatchConfig::from_file(path)?;
            info!("Loaded engine config from {:?}", path);
            Ok(config)
        }
        None => Ok(MatchConfig::default()),
    }
}

fn with_top_k(mut config: MatchConfig, top_k: Option<usize>) -> anyhow::Result<MatchConfig> {
    if let Some(k) = top_k {
        config.top_k = k;
        config.validate()?;
    }
    Ok(config)
}

fn train(dataset: &Path, artifacts: &Path) -> anyhow::Result<()> {
    info!("Training from {:?}", dataset);
    let rows = load_dataset(dataset)?;
    let catalog = Catalog::from_raw(&rows).context("Failed to build catalog")?;
    info!(
        "Catalog: {} listings, {} cities, {} states",
        catalog.len(),
        catalog.city_encoder().len(),
        catalog.state_encoder().len()
    );

    let bundle = ResourceBundle::fit(catalog)?;
    let manifest = ArtifactStore::new(artifacts).save(&bundle)?;
    info!(
        "Training complete: {} listings written to {:?}",
        manifest.rows, artifacts
    );
    Ok(())
}

fn query(artifacts: &Path, config: MatchConfig, json: bool, text: &str) -> anyhow::Result<()> {
    let bundle = ArtifactStore::new(artifacts)
        .load()
        .with_context(|| format!("Failed to load artifacts from {:?}", artifacts))?;
    let engine = MatchEngine::new(config);
    let response = engine.search(&bundle, text);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.reply(engine.config().top_k));
    }
    Ok(())
}

async fn serve(artifacts: PathBuf, http_port: u16, config: MatchConfig) -> anyhow::Result<()> {
    info!("Starting homematch v{}", env!("CARGO_PKG_VERSION"));
    info!("Artifact directory: {:?}", artifacts);
    info!("HTTP API port: {}", http_port);

    let bundle = ArtifactStore::new(&artifacts)
        .load()
        .with_context(|| format!("Failed to load artifacts from {:?}", artifacts))?;
    info!("Resources loaded: {} listings", bundle.catalog().len());

    let state = Arc::new(
        AppState::new(SharedResources::new(bundle), MatchEngine::new(config))
            .with_artifacts_dir(artifacts),
    );

    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("homematch started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
