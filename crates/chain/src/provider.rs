//! Collaborator interfaces consumed by the fee estimator.
//!
//! Fee tiers, fee estimation and asset prices are produced by other
//! subsystems. These traits are the seams the estimator calls through.

use alloy::primitives::Address;
use anyhow::Result;
use async_trait::async_trait;
use netfee_core::{BasisSelection, ChainFeeTiers, ChainId, FeeEstimation, NativeAsset, Transaction};
use std::fmt::Debug;

/// Source of current fee tiers for a chain.
#[async_trait]
pub trait FeeTierProvider: Send + Sync + Debug {
    /// Fetch the current fee tier snapshot for `chain`.
    async fn chain_fee_tiers(&self, chain: ChainId) -> Result<ChainFeeTiers>;
}

/// Computes the fee a transaction will cost.
#[async_trait]
pub trait FeeEstimationService: Send + Sync + Debug {
    /// Estimate the fee (in base units) for `tx` sent from `address`.
    ///
    /// `selection` is either the transaction's own basis or the fast-tier fallback.
    async fn estimate(
        &self,
        tx: &Transaction,
        address: Address,
        gas: u128,
        tiers: &ChainFeeTiers,
        selection: &BasisSelection,
    ) -> Result<FeeEstimation>;

    /// Get the service name for logging/debugging.
    fn service_name(&self) -> &'static str;
}

/// Source of a chain's native asset and its price.
#[async_trait]
pub trait NativeAssetProvider: Send + Sync + Debug {
    /// Fetch the native asset for `chain`.
    async fn native_asset(&self, chain: ChainId) -> Result<NativeAsset>;
}
