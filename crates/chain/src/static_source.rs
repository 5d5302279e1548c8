//! Config-backed fee tier and native asset source.

use crate::provider::{FeeTierProvider, NativeAssetProvider};
use anyhow::Result;
use async_trait::async_trait;
use netfee_core::{ChainEntry, ChainFeeTiers, ChainId, ChainRegistry, FeeError, NativeAsset};
use tracing::debug;

/// Serves fee tiers and native assets from a [`ChainRegistry`].
#[derive(Debug, Clone, Default)]
pub struct StaticChainSource {
    registry: ChainRegistry,
}

impl StaticChainSource {
    /// Create a source over a loaded registry.
    pub fn new(registry: ChainRegistry) -> Self {
        Self { registry }
    }

    fn entry(&self, chain: ChainId) -> Result<&ChainEntry> {
        Ok(self
            .registry
            .get(chain)
            .ok_or(FeeError::UnknownChain(chain))?)
    }
}

#[async_trait]
impl FeeTierProvider for StaticChainSource {
    async fn chain_fee_tiers(&self, chain: ChainId) -> Result<ChainFeeTiers> {
        let entry = self.entry(chain)?;
        debug!(chain = %chain, name = %entry.name, kind = ?entry.kind, "Serving static fee tiers");
        Ok(entry.fee_tiers())
    }
}

#[async_trait]
impl NativeAssetProvider for StaticChainSource {
    async fn native_asset(&self, chain: ChainId) -> Result<NativeAsset> {
        self.entry(chain)?.native_asset()
    }
}
