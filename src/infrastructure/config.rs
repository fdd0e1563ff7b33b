//! Configuration infrastructure
//!
//! Contains configuration loading and validation for a harvest run.
//!
//! Configuration is organized into five sections:
//! 1. `source`  - knowledge-base location and listing-page selectors
//! 2. `http`    - shared client settings (timeouts, in-flight cap, redirects)
//! 3. `seeds`   - seed list locations
//! 4. `output`  - where the aggregate and detail documents go
//! 5. `logging` - tracing subscriber settings

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;

use crate::infrastructure::parsing::config::ListingSelectors;

/// Knowledge-base constants
pub mod malpedia {
    /// Base URL of the Malpedia knowledge base
    pub const BASE_URL: &str = "https://malpedia.caad.fkie.fraunhofer.de";
}

/// Default values shared by the config sections and their tests
pub mod defaults {
    pub const USER_AGENT: &str = "threat-intel-harvester/0.1 (Research Tool)";
    /// Listing pages get the generous session-wide deadline
    pub const LISTING_TIMEOUT_SECONDS: u64 = 300;
    pub const ARTICLE_TIMEOUT_SECONDS: u64 = 30;
    pub const MAX_IN_FLIGHT_REQUESTS: usize = 16;
    pub const MAX_REDIRECTS: usize = 10;
    pub const ACTORS_SEED_FILE: &str = "threat_actors.json";
    pub const FAMILIES_SEED_FILE: &str = "malware_families.json";
    pub const AGGREGATE_FILE: &str = "all_articles.json";
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub http: HttpClientConfig,
    pub seeds: SeedConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Where listing pages live and how to read them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL; listing pages are `<base_url>/actor/<name>` and `<base_url>/details/<name>`
    pub base_url: String,

    /// CSS selectors for listing rows and their fields
    pub listing_selectors: ListingSelectors,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: malpedia::BASE_URL.to_string(),
            listing_selectors: ListingSelectors::default(),
        }
    }
}

/// HTTP client configuration shared by every scrape task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,

    /// Deadline for listing-page requests
    pub listing_timeout_seconds: u64,

    /// Deadline for each article body request
    pub article_timeout_seconds: u64,

    /// Cap on simultaneous requests across all tasks (0 = unlimited)
    pub max_in_flight_requests: usize,

    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            listing_timeout_seconds: defaults::LISTING_TIMEOUT_SECONDS,
            article_timeout_seconds: defaults::ARTICLE_TIMEOUT_SECONDS,
            max_in_flight_requests: defaults::MAX_IN_FLIGHT_REQUESTS,
            follow_redirects: true,
            max_redirects: defaults::MAX_REDIRECTS,
        }
    }
}

/// Seed list locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON array of `{ "Threat Actor": ... }` objects
    pub actors_path: PathBuf,

    /// JSON array of `{ "Name": ... }` objects
    pub families_path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            actors_path: PathBuf::from(defaults::ACTORS_SEED_FILE),
            families_path: PathBuf::from(defaults::FAMILIES_SEED_FILE),
        }
    }
}

/// Output document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,

    /// File name of the aggregate document (every seed entity)
    pub aggregate_file: String,

    /// Also write the per-kind detail files read by the dashboard
    pub write_detail_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            aggregate_file: defaults::AGGREGATE_FILE.to_string(),
            write_detail_files: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut module_filters = HashMap::new();
        module_filters.insert("reqwest".to_string(), "info".to_string());
        module_filters.insert("hyper".to_string(), "warn".to_string());
        module_filters.insert("html5ever".to_string(), "warn".to_string());

        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            module_filters,
        }
    }
}

impl AppConfig {
    /// Check the values a run cannot start without
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.source.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.source.base_url))?;

        if self.http.listing_timeout_seconds == 0 || self.http.article_timeout_seconds == 0 {
            bail!("HTTP timeouts must be greater than 0");
        }

        if self.output.aggregate_file.trim().is_empty() {
            bail!("Aggregate output file name must not be empty");
        }

        self.source
            .listing_selectors
            .compile()
            .context("Invalid listing selectors")?;

        Ok(())
    }
}

/// Loads and saves [`AppConfig`] as JSON
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("threat-intel-harvester");

        Ok(config_dir)
    }

    /// Configuration manager for the default per-user location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("harvester_config.json");
        Ok(Self { config_path })
    }

    /// Configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!(
                "Configuration file not found, using defaults: {:?}",
                self.config_path
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {:?}", self.config_path))?;

        info!("✅ Loaded configuration from {:?}", self.config_path);
        Ok(config)
    }

    /// Load configuration, writing the defaults out first if the file is absent
    pub async fn initialize_on_first_run(&self) -> Result<AppConfig> {
        if fs::try_exists(&self.config_path).await.unwrap_or(false) {
            return self.load_config().await;
        }

        info!("🎉 First run detected - writing default configuration");
        let config = AppConfig::default();
        self.save_config(&config).await?;
        Ok(config)
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("Failed to create config directory {:?}", dir))?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, content)
            .await
            .with_context(|| format!("Failed to write configuration file {:?}", self.config_path))?;

        info!("💾 Saved configuration to {:?}", self.config_path);
        Ok(())
    }
}
