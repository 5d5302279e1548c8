//! Error types for fee resolution.

use crate::types::ChainId;
use thiserror::Error;

/// Errors raised while resolving a network fee.
///
/// No-match outcomes (no fee basis on the transaction, no matching tier,
/// no known price) are not errors and are returned as values instead.
///
/// The enum is `Clone` so a single failed request can be handed to every
/// caller waiting on the same deduplicated future.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    /// A numeric chain value could not be parsed.
    #[error("invalid {field} quantity: {value:?}")]
    InvalidQuantity {
        /// Transaction field the value came from
        field: &'static str,
        /// Raw value as received
        value: String,
    },

    /// The transaction carries no gas amount. Callers must guarantee one.
    #[error("transaction has no estimated gas amount")]
    MissingGas,

    /// The fee tier provider failed.
    #[error("fee tier provider failed for chain {chain}: {message}")]
    TierProvider { chain: ChainId, message: String },

    /// The fee estimation service failed.
    #[error("fee estimation failed for chain {chain}: {message}")]
    Estimation { chain: ChainId, message: String },

    /// The native asset provider failed.
    #[error("native asset lookup failed for chain {chain}: {message}")]
    NativeAsset { chain: ChainId, message: String },

    /// Neither the transaction nor the chain's fast tier yields a fee basis.
    #[error("no fee basis available for chain {0}")]
    NoFeeBasis(ChainId),

    /// The chain is not known to the data source.
    #[error("unknown chain {0}")]
    UnknownChain(ChainId),
}

/// Render an `anyhow` chain into a single line for [`FeeError`] messages.
pub fn error_message(err: &anyhow::Error) -> String {
    format!("{err:#}")
}
