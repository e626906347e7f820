//! Error types for cmsroute
//!
//! Each failure family has its own enum so callers can match on the
//! specific condition; all of them fold into [`Error`].

use thiserror::Error;

/// Site and model configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Site symbol not provided and no default site configured")]
    NoSiteSpecified,

    #[error("No sites configured")]
    NoSitesConfigured,

    #[error("No site configured for symbol {symbol}. Available symbols: {}", available.join(", "))]
    UnknownSite {
        symbol: String,
        available: Vec<String>,
    },

    #[error("Model kind needs to be either Entity or Table, received \"{0}\"")]
    InvalidKind(String),

    #[error("Invalid configuration for site {symbol}: {reason}")]
    InvalidSiteConfig { symbol: String, reason: String },

    #[error("Configuration source error: {0}")]
    Source(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors raised while a table handle is being initialized
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("No data source was set for {plugin} (site {symbol})")]
    NoDatasource { plugin: String, symbol: String },
}

/// Errors raised while turning a logical table name into a concrete table
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error(
        "Requested table {table} resolves to generic {class}. Make sure a concrete table class exists in {search_path}"
    )]
    GenericFallbackOnly {
        table: String,
        class: String,
        search_path: String,
    },
}

/// Connection pool errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Datasource {name} is not registered. Registered datasources: {}", available.join(", "))]
    MissingDatasource {
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid datasource {name}: {reason}")]
    InvalidDatasource { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Initialization(#[from] InitializationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
