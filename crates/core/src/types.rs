//! Fee domain types shared across the workspace.

use crate::basis::{parse_quantity, FeeBasis};
use crate::error::FeeError;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// EVM chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Fee-tier kind published for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    /// Single gas price
    #[default]
    Classic,
    /// Base fee + priority fee
    Eip1559,
    /// Optimistic rollup fees
    Optimistic,
}

/// Named speed preset, declared fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierName {
    Rapid,
    Fast,
    Standard,
    Slow,
}

impl TierName {
    /// All tiers in descending speed preference.
    pub const ALL: [TierName; 4] = [Self::Rapid, Self::Fast, Self::Standard, Self::Slow];
}

/// One value per named tier, any of which may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSet<T> {
    pub rapid: Option<T>,
    pub fast: Option<T>,
    pub standard: Option<T>,
    pub slow: Option<T>,
}

impl<T> Default for TierSet<T> {
    fn default() -> Self {
        Self {
            rapid: None,
            fast: None,
            standard: None,
            slow: None,
        }
    }
}

impl<T> TierSet<T> {
    /// Get the tier with the given name.
    pub fn get(&self, name: TierName) -> Option<&T> {
        match name {
            TierName::Rapid => self.rapid.as_ref(),
            TierName::Fast => self.fast.as_ref(),
            TierName::Standard => self.standard.as_ref(),
            TierName::Slow => self.slow.as_ref(),
        }
    }

    /// Present tiers in `[rapid, fast, standard, slow]` order.
    pub fn ordered(&self) -> impl Iterator<Item = (TierName, &T)> + '_ {
        TierName::ALL
            .into_iter()
            .filter_map(move |name| self.get(name).map(|tier| (name, tier)))
    }

    /// Check if no tier is present.
    pub fn is_empty(&self) -> bool {
        self.ordered().next().is_none()
    }
}

/// Classic tier: a single price per gas unit (wei).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicTier {
    pub price_per_gas_unit: u128,
    #[serde(default)]
    pub estimation_seconds: Option<u64>,
}

/// EIP-1559 tier: priority fee and max fee per gas unit (wei).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip1559Tier {
    pub priority_fee: u128,
    pub max_fee: u128,
    #[serde(default)]
    pub estimation_seconds: Option<u64>,
}

/// Snapshot of a chain's current fee tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFeeTiers {
    pub chain: ChainId,
    #[serde(default)]
    pub kind: FeeKind,
    #[serde(default)]
    pub classic: Option<TierSet<ClassicTier>>,
    #[serde(default)]
    pub eip1559: Option<TierSet<Eip1559Tier>>,
}

impl ChainFeeTiers {
    /// Create an empty snapshot for a chain.
    pub fn new(chain: ChainId, kind: FeeKind) -> Self {
        Self {
            chain,
            kind,
            classic: None,
            eip1559: None,
        }
    }

    /// Set the classic tier set.
    pub fn with_classic(mut self, tiers: TierSet<ClassicTier>) -> Self {
        self.classic = Some(tiers);
        self
    }

    /// Set the EIP-1559 tier set.
    pub fn with_eip1559(mut self, tiers: TierSet<Eip1559Tier>) -> Self {
        self.eip1559 = Some(tiers);
        self
    }

    /// Fast classic tier, if published.
    pub fn fast_classic(&self) -> Option<ClassicTier> {
        self.classic.as_ref().and_then(|t| t.fast)
    }

    /// Fast EIP-1559 tier, if published.
    pub fn fast_eip1559(&self) -> Option<Eip1559Tier> {
        self.eip1559.as_ref().and_then(|t| t.fast)
    }
}

/// Which pricing model a fee was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeBasisKind {
    Classic,
    Eip1559,
}

/// Fee basis used for estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisSelection {
    /// Basis taken from the transaction itself
    FromTransaction(FeeBasis),
    /// Fallback to the chain's fast tier
    FastTier {
        classic: Option<ClassicTier>,
        eip1559: Option<Eip1559Tier>,
    },
}

impl BasisSelection {
    /// Build the fast-tier fallback. Returns `None` if the chain has no fast tier.
    pub fn fast_tier(tiers: &ChainFeeTiers) -> Option<Self> {
        let classic = tiers.fast_classic();
        let eip1559 = tiers.fast_eip1559();
        if classic.is_none() && eip1559.is_none() {
            return None;
        }
        Some(Self::FastTier { classic, eip1559 })
    }

    /// The transaction's own basis, if that is what was selected.
    pub fn transaction_basis(&self) -> Option<&FeeBasis> {
        match self {
            Self::FromTransaction(basis) => Some(basis),
            Self::FastTier { .. } => None,
        }
    }

    /// Check if this is the tier fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FastTier { .. })
    }
}

/// Fee value computed by the estimation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimation {
    /// Fee in base units (wei)
    pub value: U256,
    /// Basis kind used to compute it
    pub kind: FeeBasisKind,
}

impl FeeEstimation {
    pub fn new(value: U256, kind: FeeBasisKind) -> Self {
        Self { value, kind }
    }
}

/// Native asset of a chain with its current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeAsset {
    /// Token symbol (e.g., "ETH")
    pub symbol: String,
    /// Decimal precision of the base unit
    pub decimals: u8,
    /// Fiat price per whole unit, if known
    #[serde(default)]
    pub price: Option<f64>,
}

/// A pending or incoming transaction, as produced by other subsystems.
///
/// Numeric fields stay strings as chain data carries them, either decimal or
/// `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<Bytes>,
    #[serde(default)]
    pub nonce: Option<u64>,
    #[serde(default)]
    pub gas: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub max_fee_per_gas: Option<String>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<String>,
}

impl Transaction {
    /// Parsed gas amount, if the transaction carries one.
    pub fn estimated_gas(&self) -> Result<Option<u128>, FeeError> {
        self.gas
            .as_deref()
            .map(|gas| parse_quantity("gas", gas))
            .transpose()
    }

    /// Parsed gas amount, failing if absent.
    pub fn required_gas(&self) -> Result<u128, FeeError> {
        self.estimated_gas()?.ok_or(FeeError::MissingGas)
    }
}
