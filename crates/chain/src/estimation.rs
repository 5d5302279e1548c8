//! Gas-based fee estimation.

use crate::provider::FeeEstimationService;
use alloy::primitives::Address;
use anyhow::Result;
use async_trait::async_trait;
use netfee_core::{
    fee_value, BasisSelection, ChainFeeTiers, FeeBasisKind, FeeEstimation, FeeKind, Transaction,
};
use tracing::debug;

/// Estimates `gas * effective gas price`.
///
/// Classic bases price at `price_per_gas_unit`, EIP-1559 bases at `max_fee`
/// (the worst case the sender can be charged).
#[derive(Debug, Clone, Default)]
pub struct GasFeeEstimator {
    /// Gas buffer in basis points (e.g., 1000 = +10%)
    gas_buffer_bps: u16,
}

impl GasFeeEstimator {
    /// Create an estimator without a gas buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gas buffer in basis points.
    pub fn with_gas_buffer_bps(mut self, bps: u16) -> Self {
        self.gas_buffer_bps = bps;
        self
    }

    fn buffered_gas(&self, gas: u128) -> u128 {
        gas.saturating_mul(10_000 + self.gas_buffer_bps as u128) / 10_000
    }

    /// Pick the price for a selection: `(price per gas, kind)`.
    ///
    /// For the fast-tier fallback, EIP-1559 chains (including optimistic
    /// rollups) use the EIP-1559 tier when it exists.
    fn price_for(tiers: &ChainFeeTiers, selection: &BasisSelection) -> Option<(u128, FeeBasisKind)> {
        match selection {
            BasisSelection::FromTransaction(basis) => Some((basis.effective_gas_price(), basis.kind())),
            BasisSelection::FastTier { classic, eip1559 } => {
                let eip1559 = eip1559.map(|tier| (tier.max_fee, FeeBasisKind::Eip1559));
                let classic = classic.map(|tier| (tier.price_per_gas_unit, FeeBasisKind::Classic));
                match tiers.kind {
                    FeeKind::Eip1559 | FeeKind::Optimistic => eip1559.or(classic),
                    FeeKind::Classic => classic.or(eip1559),
                }
            }
        }
    }
}

#[async_trait]
impl FeeEstimationService for GasFeeEstimator {
    async fn estimate(
        &self,
        _tx: &Transaction,
        address: Address,
        gas: u128,
        tiers: &ChainFeeTiers,
        selection: &BasisSelection,
    ) -> Result<FeeEstimation> {
        let (price, kind) = Self::price_for(tiers, selection)
            .ok_or_else(|| anyhow::anyhow!("no fee basis to price chain {}", tiers.chain))?;
        let gas = self.buffered_gas(gas);
        let value = fee_value(gas, price);

        debug!(
            chain = %tiers.chain,
            from = %address,
            gas = gas,
            price = price,
            kind = ?kind,
            value = %value,
            "Estimated fee"
        );

        Ok(FeeEstimation::new(value, kind))
    }

    fn service_name(&self) -> &'static str {
        "gas"
    }
}
