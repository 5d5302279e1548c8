//! Chain registry: static fee tiers and native assets per chain.

use crate::types::{ChainFeeTiers, ChainId, ClassicTier, Eip1559Tier, FeeKind, NativeAsset, TierSet};
use anyhow::Context;
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Registry of known chains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainRegistry {
    #[serde(default)]
    pub chains: Vec<ChainEntry>,
}

/// One chain's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Chain ID
    pub chain_id: u64,
    /// Human-readable name
    pub name: String,
    /// Fee-tier kind
    #[serde(default)]
    pub kind: FeeKind,
    /// Native token symbol (e.g., "ETH")
    pub native_token: String,
    /// Native token decimals
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Fiat price per native token; may reference ${VAR}
    #[serde(default)]
    pub price: Option<String>,
    /// Classic tiers (wei per gas)
    #[serde(default)]
    pub classic: Option<TierSet<ClassicTierConfig>>,
    /// EIP-1559 tiers (wei per gas)
    #[serde(default)]
    pub eip1559: Option<TierSet<Eip1559TierConfig>>,
}

fn default_decimals() -> u8 {
    18
}

/// Classic tier as written in TOML.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassicTierConfig {
    pub price_per_gas_unit: u64,
    #[serde(default)]
    pub estimation_seconds: Option<u64>,
}

/// EIP-1559 tier as written in TOML.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Eip1559TierConfig {
    pub priority_fee: u64,
    pub max_fee: u64,
    #[serde(default)]
    pub estimation_seconds: Option<u64>,
}

impl From<ClassicTierConfig> for ClassicTier {
    fn from(tier: ClassicTierConfig) -> Self {
        Self {
            price_per_gas_unit: tier.price_per_gas_unit as u128,
            estimation_seconds: tier.estimation_seconds,
        }
    }
}

impl From<Eip1559TierConfig> for Eip1559Tier {
    fn from(tier: Eip1559TierConfig) -> Self {
        Self {
            priority_fee: tier.priority_fee as u128,
            max_fee: tier.max_fee as u128,
            estimation_seconds: tier.estimation_seconds,
        }
    }
}

fn convert_tiers<C: Copy, T: From<C>>(tiers: &TierSet<C>) -> TierSet<T> {
    TierSet {
        rapid: tiers.rapid.map(T::from),
        fast: tiers.fast.map(T::from),
        standard: tiers.standard.map(T::from),
        slow: tiers.slow.map(T::from),
    }
}

impl ChainEntry {
    /// Chain ID.
    pub fn id(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    /// Fee tier snapshot for this chain.
    pub fn fee_tiers(&self) -> ChainFeeTiers {
        ChainFeeTiers {
            chain: self.id(),
            kind: self.kind,
            classic: self.classic.as_ref().map(convert_tiers),
            eip1559: self.eip1559.as_ref().map(convert_tiers),
        }
    }

    /// Native asset with its parsed price.
    ///
    /// An empty price or one still referencing an unset variable is unknown.
    pub fn native_asset(&self) -> anyhow::Result<NativeAsset> {
        let price = match self.price.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.contains("${") => {
                warn!(chain = self.chain_id, price = raw, "Price variable not set");
                None
            }
            Some(raw) => Some(
                raw.parse::<f64>()
                    .with_context(|| format!("invalid price {raw:?} for chain {}", self.chain_id))?,
            ),
        };

        Ok(NativeAsset {
            symbol: self.native_token.clone(),
            decimals: self.decimals,
            price,
        })
    }
}

impl ChainRegistry {
    /// Parse a registry from TOML.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let registry: ChainRegistry = toml::from_str(content)?;
        Ok(registry)
    }

    /// Load a registry from a TOML file and expand environment variables.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading chain registry {}", path.display()))?;
        let mut registry = Self::from_toml_str(&content)
            .with_context(|| format!("parsing chain registry {}", path.display()))?;
        registry.expand_env_vars();

        info!(path = %path.display(), chains = registry.chains.len(), "Chain registry loaded");
        Ok(registry)
    }

    /// Load a registry from a TOML file, or every `*.toml` file in a directory.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::load_from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Load and merge every `*.toml` registry in a directory, in file name order.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("reading chain directory {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.retain(|path| path.extension().map_or(false, |ext| ext == "toml"));
        paths.sort();

        let mut registry = Self::default();
        for path in paths {
            debug!(path = %path.display(), "Loading chain file");
            registry.chains.extend(Self::from_file(&path)?.chains);
        }

        Ok(registry)
    }

    /// Look up a chain.
    pub fn get(&self, chain: ChainId) -> Option<&ChainEntry> {
        self.chains.iter().find(|entry| entry.chain_id == chain.0)
    }

    /// Expand environment variables in price values.
    pub fn expand_env_vars(&mut self) {
        for entry in &mut self.chains {
            if let Some(ref mut price) = entry.price {
                *price = expand_env(price);
            }
        }
    }
}

fn env_var_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").ok()).as_ref()
}

/// Replace `${VAR}` with the variable's value; unset variables are left as written.
fn expand_env(s: &str) -> String {
    let Some(pattern) = env_var_pattern() else {
        return s.to_string();
    };

    pattern
        .replace_all(s, |caps: &Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
        [[chains]]
        chain_id = 1
        name = "Ethereum"
        kind = "eip1559"
        native_token = "ETH"
        price = "2000"

        [chains.classic.fast]
        price_per_gas_unit = 40000000000
        estimation_seconds = 30

        [chains.eip1559.rapid]
        priority_fee = 3000000000
        max_fee = 80000000000
        estimation_seconds = 12

        [chains.eip1559.fast]
        priority_fee = 2000000000
        max_fee = 60000000000
        estimation_seconds = 30

        [[chains]]
        chain_id = 56
        name = "BNB Smart Chain"
        native_token = "BNB"
    "#;

    #[test]
    fn test_parse_registry() {
        let registry = ChainRegistry::from_toml_str(REGISTRY).unwrap();
        assert_eq!(registry.chains.len(), 2);

        let eth = registry.get(ChainId(1)).unwrap();
        let tiers = eth.fee_tiers();
        assert_eq!(tiers.kind, FeeKind::Eip1559);
        assert_eq!(tiers.fast_classic().unwrap().price_per_gas_unit, 40_000_000_000);

        let eip1559 = tiers.eip1559.unwrap();
        assert_eq!(eip1559.rapid.unwrap().estimation_seconds, Some(12));
        assert!(eip1559.standard.is_none());

        let bnb = registry.get(ChainId(56)).unwrap();
        assert_eq!(bnb.kind, FeeKind::Classic);
        assert_eq!(bnb.decimals, 18);
        assert!(bnb.fee_tiers().classic.is_none());
        assert!(registry.get(ChainId(137)).is_none());
    }

    #[test]
    fn test_native_asset_price() {
        let registry = ChainRegistry::from_toml_str(REGISTRY).unwrap();

        let eth = registry.get(ChainId(1)).unwrap().native_asset().unwrap();
        assert_eq!(eth.symbol, "ETH");
        assert_eq!(eth.price, Some(2000.0));

        let bnb = registry.get(ChainId(56)).unwrap().native_asset().unwrap();
        assert_eq!(bnb.price, None);
    }

    #[test]
    fn test_invalid_price_is_error() {
        let mut registry = ChainRegistry::from_toml_str(REGISTRY).unwrap();
        registry.chains[0].price = Some("two thousand".to_string());
        assert!(registry.chains[0].native_asset().is_err());
    }

    #[test]
    fn test_price_from_env() {
        // Use unique var name to avoid conflicts with parallel tests
        std::env::set_var("NETFEE_TEST_ETH_PRICE", "2500.5");
        let mut registry = ChainRegistry::from_toml_str(REGISTRY).unwrap();
        registry.chains[0].price = Some("${NETFEE_TEST_ETH_PRICE}".to_string());
        registry.chains[1].price = Some("${NETFEE_TEST_UNSET_PRICE}".to_string());
        registry.expand_env_vars();
        std::env::remove_var("NETFEE_TEST_ETH_PRICE");

        assert_eq!(registry.chains[0].native_asset().unwrap().price, Some(2500.5));
        assert_eq!(registry.chains[1].native_asset().unwrap().price, None);
    }

    #[test]
    fn test_expand_env() {
        std::env::set_var("NETFEE_CHAIN_TEST_VAR", "test_value");
        assert_eq!(expand_env("${NETFEE_CHAIN_TEST_VAR}"), "test_value");
        assert_eq!(expand_env("a_${NETFEE_CHAIN_TEST_VAR}_b"), "a_test_value_b");
        assert_eq!(expand_env("no_vars"), "no_vars");
        assert_eq!(expand_env("${NETFEE_CHAIN_TEST_UNSET}"), "${NETFEE_CHAIN_TEST_UNSET}");
        std::env::remove_var("NETFEE_CHAIN_TEST_VAR");
    }

    #[test]
    fn test_load_file_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ethereum = dir.path().join("ethereum.toml");
        std::fs::write(
            &ethereum,
            r#"
            [[chains]]
            chain_id = 1
            name = "Ethereum"
            kind = "eip1559"
            native_token = "ETH"
            "#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("bsc.toml"),
            r#"
            [[chains]]
            chain_id = 56
            name = "BNB Smart Chain"
            native_token = "BNB"
            "#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a registry").unwrap();

        let registry = ChainRegistry::load(dir.path()).unwrap();
        let ids: Vec<u64> = registry.chains.iter().map(|entry| entry.chain_id).collect();
        assert_eq!(ids, vec![56, 1]);

        let single = ChainRegistry::load(&ethereum).unwrap();
        assert_eq!(single.chains.len(), 1);
        assert_eq!(single.get(ChainId(1)).unwrap().kind, FeeKind::Eip1559);

        assert!(ChainRegistry::load(dir.path().join("missing.toml")).is_err());
    }
}
