//! Network fee orchestration.
//!
//! Ties the fee tier provider, estimation service and asset provider
//! together behind deduplicating caches:
//! - fee tiers and native assets keyed by chain
//! - fee estimations keyed by (chain, transaction)

use crate::cache::RequestCache;
use crate::provider::{FeeEstimationService, FeeTierProvider, NativeAssetProvider};
use netfee_core::{
    error_message, extract_fee_basis, fee_to_fiat, match_eip1559_estimation, resolve_fee_label,
    BasisSelection, CacheConfig, ChainFeeTiers, ChainId, CurrencyFormatter, DurationFormatter,
    FeeBasis, FeeDisplay, FeeError, FeeEstimation, NativeAsset, NetworkFee, Transaction,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Resolves the user-facing network fee for transactions.
pub struct NetworkFeeEstimator {
    tier_provider: Arc<dyn FeeTierProvider>,
    estimation_service: Arc<dyn FeeEstimationService>,
    asset_provider: Arc<dyn NativeAssetProvider>,
    tier_cache: RequestCache<ChainId, ChainFeeTiers>,
    estimation_cache: RequestCache<(ChainId, Transaction), FeeEstimation>,
    asset_cache: RequestCache<ChainId, NativeAsset>,
}

impl std::fmt::Debug for NetworkFeeEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkFeeEstimator")
            .field("estimation_service", &self.estimation_service.service_name())
            .field("tier_cache", &self.tier_cache)
            .field("estimation_cache", &self.estimation_cache)
            .field("asset_cache", &self.asset_cache)
            .finish()
    }
}

impl NetworkFeeEstimator {
    /// Create an estimator with default cache lifetimes.
    pub fn new(
        tier_provider: Arc<dyn FeeTierProvider>,
        estimation_service: Arc<dyn FeeEstimationService>,
        asset_provider: Arc<dyn NativeAssetProvider>,
    ) -> Self {
        Self::with_cache_config(
            tier_provider,
            estimation_service,
            asset_provider,
            &CacheConfig::default(),
        )
    }

    /// Create an estimator with the given cache lifetimes.
    pub fn with_cache_config(
        tier_provider: Arc<dyn FeeTierProvider>,
        estimation_service: Arc<dyn FeeEstimationService>,
        asset_provider: Arc<dyn NativeAssetProvider>,
        cache: &CacheConfig,
    ) -> Self {
        info!(
            service = estimation_service.service_name(),
            tier_ttl = ?cache.tier_ttl(),
            estimation_ttl = ?cache.estimation_ttl(),
            "Network fee estimator initialized"
        );

        Self {
            tier_provider,
            estimation_service,
            asset_provider,
            tier_cache: RequestCache::new("fee_tiers", cache.tier_ttl()),
            estimation_cache: RequestCache::new("fee_estimation", cache.estimation_ttl()),
            asset_cache: RequestCache::new("native_asset", cache.asset_ttl()),
        }
    }

    /// Current fee tiers for a chain (cached).
    ///
    /// Provider failures are fatal and not retried.
    pub async fn chain_fee_tiers(&self, chain: ChainId) -> Result<ChainFeeTiers, FeeError> {
        let provider = Arc::clone(&self.tier_provider);
        self.tier_cache
            .get_or_fetch(chain, move || async move {
                provider
                    .chain_fee_tiers(chain)
                    .await
                    .map_err(|err| FeeError::TierProvider {
                        chain,
                        message: error_message(&err),
                    })
            })
            .await
    }

    /// Native asset for a chain (cached).
    pub async fn native_asset(&self, chain: ChainId) -> Result<NativeAsset, FeeError> {
        let provider = Arc::clone(&self.asset_provider);
        self.asset_cache
            .get_or_fetch(chain, move || async move {
                provider
                    .native_asset(chain)
                    .await
                    .map_err(|err| FeeError::NativeAsset {
                        chain,
                        message: error_message(&err),
                    })
            })
            .await
    }

    /// Fee estimation for a transaction (cached by chain and transaction).
    async fn fee_estimation(
        &self,
        chain: ChainId,
        tx: &Transaction,
        gas: u128,
        tiers: &ChainFeeTiers,
        selection: BasisSelection,
    ) -> Result<FeeEstimation, FeeError> {
        let service = Arc::clone(&self.estimation_service);
        let owned_tx = tx.clone();
        let tiers = tiers.clone();

        self.estimation_cache
            .get_or_fetch((chain, tx.clone()), move || async move {
                service
                    .estimate(&owned_tx, owned_tx.from, gas, &tiers, &selection)
                    .await
                    .map_err(|err| FeeError::Estimation {
                        chain,
                        message: error_message(&err),
                    })
            })
            .await
    }

    /// Resolve the network fee for `tx` on `chain`.
    ///
    /// The transaction's own fee basis is used when it has one; otherwise the
    /// chain's fast tier. A time estimate is only reported when the
    /// transaction's EIP-1559 basis matches a published tier exactly.
    #[instrument(skip(self, chain, tx), fields(chain = %chain, from = %tx.from))]
    pub async fn estimate(&self, chain: ChainId, tx: &Transaction) -> Result<NetworkFee, FeeError> {
        let gas = tx.required_gas()?;
        let tiers = self.chain_fee_tiers(chain).await?;

        let selection = match extract_fee_basis(tx, Some(gas))? {
            Some(basis) => BasisSelection::FromTransaction(basis),
            None => {
                debug!("Transaction has no fee basis, using fast tier");
                BasisSelection::fast_tier(&tiers).ok_or(FeeError::NoFeeBasis(chain))?
            }
        };

        let estimation_seconds = match (&selection, tiers.eip1559.as_ref()) {
            (
                BasisSelection::FromTransaction(FeeBasis::Eip1559 {
                    priority_fee,
                    max_fee,
                }),
                Some(eip1559),
            ) => match_eip1559_estimation(eip1559, *priority_fee, *max_fee),
            _ => None,
        };

        let (estimation, asset) = futures::try_join!(
            self.fee_estimation(chain, tx, gas, &tiers, selection),
            self.native_asset(chain),
        )?;

        let fiat = fee_to_fiat(estimation.value, asset.decimals, asset.price);

        debug!(
            value = %estimation.value,
            kind = ?estimation.kind,
            estimation_seconds = ?estimation_seconds,
            fiat = ?fiat,
            symbol = %asset.symbol,
            "Network fee resolved"
        );

        Ok(NetworkFee {
            chain,
            selection,
            estimation,
            estimation_seconds,
            fiat,
            label: resolve_fee_label(Some(tiers.kind)),
        })
    }

    /// Display state for `tx` on `chain`.
    ///
    /// Returns [`FeeDisplay::Loading`] while an estimation for the
    /// transaction is in flight; otherwise resolves the fee and renders it.
    pub async fn fee_display(
        &self,
        chain: ChainId,
        tx: &Transaction,
        durations: &dyn DurationFormatter,
        currency: &dyn CurrencyFormatter,
    ) -> Result<FeeDisplay, FeeError> {
        if self.is_pending(chain, tx) {
            return Ok(FeeDisplay::Loading);
        }
        Ok(self.estimate(chain, tx).await?.display(durations, currency))
    }

    /// Check if an estimation for `tx` is in flight.
    pub fn is_pending(&self, chain: ChainId, tx: &Transaction) -> bool {
        self.estimation_cache.is_pending(&(chain, tx.clone()))
    }

    /// Evict the estimation of a transaction that has been replaced.
    pub fn transaction_changed(&self, chain: ChainId, previous: &Transaction) {
        if self.estimation_cache.evict(&(chain, previous.clone())) {
            debug!(chain = %chain, "Evicted estimation for replaced transaction");
        }
    }

    /// Drop everything cached for a chain.
    pub fn invalidate_chain(&self, chain: ChainId) {
        self.tier_cache.evict(&chain);
        self.asset_cache.evict(&chain);
        self.estimation_cache.retain(|(cached_chain, _)| *cached_chain != chain);
    }

    /// Remove expired entries from all caches (call periodically).
    pub fn cleanup(&self) {
        self.tier_cache.cleanup();
        self.estimation_cache.cleanup();
        self.asset_cache.cleanup();
    }
}
