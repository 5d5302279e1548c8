//! Network fee estimation layer.
//!
//! This crate provides:
//! - Collaborator traits for fee tiers, fee estimation and native asset prices
//! - A request-deduplicating cache for async fetches
//! - Config-backed fee tier and asset source
//! - Gas-based fee estimation
//! - `NetworkFeeEstimator`, which resolves a transaction's fee end to end

mod cache;
mod estimation;
mod estimator;
mod provider;
mod static_source;

pub use cache::RequestCache;
pub use estimation::GasFeeEstimator;
pub use estimator::NetworkFeeEstimator;
pub use provider::{FeeEstimationService, FeeTierProvider, NativeAssetProvider};
pub use static_source::StaticChainSource;
