//! Network fee core logic.
//!
//! This crate provides the pure pieces of network fee resolution:
//! - Fee basis extraction (classic gas price vs. EIP-1559 fee pair)
//! - Fee-tier labels
//! - Confirmation time lookup by exact EIP-1559 tier matching
//! - Base-unit to fiat conversion
//! - Duration/currency formatting and the fee display model
//! - Configuration (estimator profiles, chain registry)

mod basis;
pub mod config;
mod display;
mod error;
pub mod format;
mod label;
mod matching;
mod types;
pub mod u256_math;

pub use basis::{extract_fee_basis, parse_quantity, FeeBasis};
pub use config::{CacheConfig, ChainEntry, ChainRegistry, DisplayConfig, EstimatorConfig};
pub use display::{FeeDisplay, FeeSummary, NetworkFee};
pub use error::{error_message, FeeError};
pub use format::{ApproxDurationFormatter, CurrencyFormatter, DurationFormatter, LocaleCurrencyFormatter};
pub use label::resolve_fee_label;
pub use matching::{find_matching_eip1559_tier, match_eip1559_estimation};
pub use types::{
    BasisSelection, ChainFeeTiers, ChainId, ClassicTier, Eip1559Tier, FeeBasisKind, FeeEstimation,
    FeeKind, NativeAsset, TierName, TierSet, Transaction,
};
pub use u256_math::{fee_to_fiat, fee_value, to_common_units, FiatValue};
