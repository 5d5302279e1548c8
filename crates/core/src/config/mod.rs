//! Configuration for fee estimation.
//!
//! This module provides:
//! - Estimator runtime configuration (profiles, cache lifetimes, display)
//! - Chain registry (static fee tiers, native assets and prices)

mod chain;
mod estimator;

pub use chain::{ChainEntry, ChainRegistry, ClassicTierConfig, Eip1559TierConfig};
pub use estimator::{CacheConfig, DisplayConfig, EstimatorConfig};
