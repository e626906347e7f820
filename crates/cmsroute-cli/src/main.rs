//! cmsroute CLI
//!
//! Inspect how a multisite CMS configuration resolves sites, models and tables

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmsroute_config_file::FileConfigStore;
use cmsroute_core::{ConfigStore, ModelKind};
use cmsroute_site::Connector;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "cmsroute")]
#[command(about = "cmsroute - Multisite CMS table and model routing", long_about = None)]
struct Cli {
    /// Path to the YAML or TOML configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "CMSROUTE_CONFIG",
        default_value = "~/.cmsroute/config.yaml",
        global = true
    )]
    config: String,

    /// Connector plugin whose sites are inspected
    #[arg(
        short,
        long,
        value_name = "PLUGIN",
        env = "CMSROUTE_PLUGIN",
        default_value = "WordpressConnector",
        global = true
    )]
    plugin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        value_name = "LEVEL",
        env = "CMSROUTE_LOG_LEVEL",
        default_value = "warn",
        global = true
    )]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured site symbols
    Sites,
    /// Show the configuration a site symbol resolves to
    Site {
        /// Site symbol; the default site when omitted
        symbol: Option<String>,
    },
    /// Resolve a model name for a site
    Locate {
        /// Entity or Table
        kind: ModelKind,
        /// Model name (`Posts`, `Post`)
        name: String,
        #[arg(long)]
        site: Option<String>,
    },
    /// Build a table for a site and show where it points
    Table {
        /// Table alias (`Posts`)
        name: String,
        #[arg(long)]
        site: Option<String>,
    },
    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = Arc::new(
        FileConfigStore::new(&cli.config)
            .await
            .with_context(|| format!("Failed to open configuration {}", cli.config))?,
    );

    let connector = Connector::from_store(&cli.plugin, store.clone()).await?;

    match cli.command {
        Commands::Sites => {
            let default = connector.sites().default_site().await?;
            for symbol in connector.sites().symbols().await? {
                let marker = if Some(&symbol) == default.as_ref() { "*" } else { " " };
                println!("{} {}", marker, symbol);
            }
        }
        Commands::Site { symbol } => {
            let config = connector.sites().resolve_site(symbol.as_deref()).await?;
            println!("{}", config.symbol());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Locate { kind, name, site } => {
            let site = connector.site(site.as_deref()).await?;
            let resolved = site.locate_model(&name, kind);
            println!("site:     {}", site.symbol());
            println!("origin:   {}", resolved.origin);
            println!("location: {}", resolved.location);
            if let Some(target) = resolved.target {
                println!("class:    {}", target);
            }
        }
        Commands::Table { name, site } => {
            let site = connector.site(site.as_deref()).await?;
            let table = site.table(&name)?;
            println!("site:       {}", site.symbol());
            println!("class:      {}", table.class_name());
            println!("table:      {}", table.effective_name());
            println!("connection: {}", table.effective_connection()?);
            let entity = table.entity_class();
            match entity.location() {
                Some(location) => println!("entity:     {} ({})", entity.name(), location),
                None => println!("entity:     {}", entity.name()),
            }
        }
        Commands::Validate => {
            let config = store.get_config().await?;
            store.validate_config(&config).await?;
            println!(
                "{}: OK ({} model implementations)",
                cli.config,
                connector.models().registry().len()
            );
        }
    }

    Ok(())
}
