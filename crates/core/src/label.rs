//! Display labels for fee-tier kinds.

use crate::types::FeeKind;

/// Label shown next to the fee for a tier kind.
///
/// The default classic tier is unlabeled.
pub fn resolve_fee_label(kind: Option<FeeKind>) -> Option<&'static str> {
    kind.and_then(|kind| kind.label())
}

impl FeeKind {
    /// Get the display label for this kind.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            FeeKind::Classic => None,
            FeeKind::Eip1559 => Some("EIP-1559"),
            FeeKind::Optimistic => Some("Optimistic"),
        }
    }
}
