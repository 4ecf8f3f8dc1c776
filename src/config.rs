use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ledger::StaffColumns;

/// Main configuration structure for the duty-roster bot core
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DutyRosterConfig {
    /// Spreadsheet ledger settings
    pub ledger: LedgerConfig,
    /// Staff roster policy
    pub roster: RosterConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Service-account credentials file (can be set via env var)
    pub credentials_file: Option<String>,
    /// Spreadsheet document name
    pub spreadsheet: String,
    /// Worksheet holding the staff roster
    pub staff_worksheet: String,
    /// Worksheet receiving termination records
    pub employment_worksheet: String,
    /// Column layout of the staff worksheet
    pub columns: StaffColumns,
    /// First column a termination record occupies on the employment sheet
    pub employment_first_column: u32,
    /// Outbound request quota
    pub rate_limit: RateLimitConfig,
    /// Backoff schedule for transient failures
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second limit
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Delays between retry attempts, in milliseconds
    pub backoff_ms: Vec<u64>,
    /// Upper bound on the random jitter added to each delay
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    /// Rank new hires enter the roster with
    pub entry_rank: String,
    /// Direct-message template for warnings; `{reason}` is substituted
    pub warning_dm_template: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable tracing output
    pub tracing_enabled: bool,
    /// Log level
    pub log_level: String,
}

impl Default for DutyRosterConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig {
                credentials_file: None, // Will be read from env var
                spreadsheet: "Staff Database".to_string(),
                staff_worksheet: "Staff Database".to_string(),
                employment_worksheet: "Employment Records".to_string(),
                columns: StaffColumns::default(),
                employment_first_column: 3,
                rate_limit: RateLimitConfig {
                    requests_per_second: 1,
                    burst_capacity: 10,
                },
                retry: RetryConfig {
                    backoff_ms: vec![500, 1000, 2500, 5000],
                    jitter_ms: 100,
                },
            },
            roster: RosterConfig {
                entry_rank: "Baker".to_string(),
                warning_dm_template: "You have received a warning in Creamy Dreams.\n\n\
                    Reason: {reason}\n\n\
                    If you wish to appeal this action, please open up a support ticket \
                    in our communications server."
                    .to_string(),
            },
            observability: ObservabilityConfig {
                tracing_enabled: true,
                log_level: "info".to_string(),
            },
        }
    }
}

impl DutyRosterConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (duty-roster.toml)
    /// 3. Environment variables (prefixed with DUTY_ROSTER_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("duty-roster.toml").exists() {
            builder = builder.add_source(File::with_name("duty-roster"));
        }

        builder = builder.add_source(
            Environment::with_prefix("DUTY_ROSTER")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut roster_config: DutyRosterConfig = config.try_deserialize()?;

        // Special handling for ledger credentials - check multiple sources
        if roster_config.ledger.credentials_file.is_none() {
            if let Ok(path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
                roster_config.ledger.credentials_file = Some(path);
            } else if let Ok(path) = std::env::var("DUTY_ROSTER_LEDGER_CREDENTIALS") {
                roster_config.ledger.credentials_file = Some(path);
            }
        }

        Ok(roster_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<DutyRosterConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = DutyRosterConfig::load_env_file();
        DutyRosterConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static DutyRosterConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
