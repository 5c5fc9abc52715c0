//! Application configuration management.
//!
//! Configuration is layered from default values, an optional configuration
//! file, and environment variables, in increasing order of precedence.

use crate::Cli;
use apptrack_engine::CompanyOrder;
use serde::{Deserialize, Serialize};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Database configuration (file path, creation)
    #[serde(default)]
    pub database: apptrack_sqlite::config::SqliteConfig,

    /// Presentation defaults for listings
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Defaults for listing output.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ListingConfig {
    /// How company groups are ordered when `--order` is not given
    #[serde(default)]
    pub order: CompanyOrder,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `APP_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// ```bash
    /// # Keep records in a file instead of memory
    /// export APP_DATABASE__DATABASE_PATH="applications.db"
    ///
    /// # Order company groups by last modification
    /// export APP_LISTING__ORDER="updated_at"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // APP_DATABASE__DATABASE_PATH maps to database.database_path
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
