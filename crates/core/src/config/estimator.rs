//! Estimator runtime configuration with profile support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for fee estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Profile name (for logging/identification)
    #[serde(default = "default_profile_name")]
    pub profile: String,

    /// Chain used when none is given
    #[serde(default = "default_chain")]
    pub default_chain: u64,

    /// Request cache lifetimes
    #[serde(default)]
    pub cache: CacheConfig,

    /// Fiat display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_profile_name() -> String {
    "default".to_string()
}

fn default_chain() -> u64 {
    1
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            profile: default_profile_name(),
            default_chain: default_chain(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Cache TTLs. A TTL of 0 keeps entries until explicitly evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Fee tier snapshot lifetime (seconds)
    #[serde(default = "default_tier_ttl")]
    pub tier_ttl_secs: u64,

    /// Fee estimation lifetime (seconds)
    #[serde(default = "default_estimation_ttl")]
    pub estimation_ttl_secs: u64,

    /// Native asset/price lifetime (seconds)
    #[serde(default = "default_asset_ttl")]
    pub asset_ttl_secs: u64,
}

fn default_tier_ttl() -> u64 {
    15
}
fn default_estimation_ttl() -> u64 {
    30
}
fn default_asset_ttl() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tier_ttl_secs: default_tier_ttl(),
            estimation_ttl_secs: default_estimation_ttl(),
            asset_ttl_secs: default_asset_ttl(),
        }
    }
}

impl CacheConfig {
    fn ttl(secs: u64) -> Option<Duration> {
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    pub fn tier_ttl(&self) -> Option<Duration> {
        Self::ttl(self.tier_ttl_secs)
    }
    pub fn estimation_ttl(&self) -> Option<Duration> {
        Self::ttl(self.estimation_ttl_secs)
    }
    pub fn asset_ttl(&self) -> Option<Duration> {
        Self::ttl(self.asset_ttl_secs)
    }
}

/// Fiat display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// BCP 47 locale tag
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Show the tier-kind label ("EIP-1559", "Optimistic")
    #[serde(default = "default_show_label")]
    pub show_label: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}
fn default_locale() -> String {
    "en-US".to_string()
}
fn default_show_label() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            locale: default_locale(),
            show_label: default_show_label(),
        }
    }
}

impl EstimatorConfig {
    /// Create a testing profile with short cache lifetimes.
    pub fn testing() -> Self {
        Self {
            profile: "testing".to_string(),
            cache: CacheConfig {
                tier_ttl_secs: 1,
                estimation_ttl_secs: 1,
                asset_ttl_secs: 1,
            },
            ..Default::default()
        }
    }

    /// Create a production profile.
    pub fn production() -> Self {
        Self {
            profile: "production".to_string(),
            cache: CacheConfig {
                tier_ttl_secs: 12,
                estimation_ttl_secs: 12,
                asset_ttl_secs: 300,
            },
            ..Default::default()
        }
    }

    /// Get profile from environment variable NETFEE_PROFILE, or default.
    /// Supported values: testing, production
    pub fn from_env() -> Self {
        let profile = std::env::var("NETFEE_PROFILE").unwrap_or_else(|_| "default".to_string());
        match profile.to_lowercase().as_str() {
            "testing" | "test" => Self::testing(),
            "production" | "prod" => Self::production(),
            _ => Self::default(),
        }
    }

    /// Load config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EstimatorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the file named by NETFEE_CONFIG, falling back to the profile.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("NETFEE_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::from_env()),
        }
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        tracing::info!(
            profile = %self.profile,
            default_chain = self.default_chain,
            "Estimator configuration loaded"
        );
        tracing::info!(
            tier_ttl = self.cache.tier_ttl_secs,
            estimation_ttl = self.cache.estimation_ttl_secs,
            asset_ttl = self.cache.asset_ttl_secs,
            "Cache lifetimes"
        );
        tracing::info!(
            currency = %self.display.currency,
            locale = %self.display.locale,
            show_label = self.display.show_label,
            "Display settings"
        );
    }
}
