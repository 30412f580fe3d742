//! Application configuration management.

use serde::Deserialize;

use crate::types::SortOrder;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Report generation settings.
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Report generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Ordering of years and months in report output.
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Ledger size at which partitioning runs in parallel. Zero disables it.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Decimal places kept in averages.
    #[serde(default = "default_average_scale")]
    pub average_scale: u32,
    /// Bucket for transactions without a category.
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,
    /// Bucket for transactions without a spending plan.
    #[serde(default = "default_unplanned_label")]
    pub unplanned_label: String,
}

fn default_parallel_threshold() -> usize {
    10_000
}

fn default_average_scale() -> u32 {
    2
}

fn default_uncategorized_label() -> String {
    "uncategorized".to_string()
}

fn default_unplanned_label() -> String {
    "unplanned".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::default(),
            parallel_threshold: default_parallel_threshold(),
            average_scale: default_average_scale(),
            uncategorized_label: default_uncategorized_label(),
            unplanned_label: default_unplanned_label(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "tally=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `TALLY__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
