//! Display model for a resolved network fee.

use crate::format::{CurrencyFormatter, DurationFormatter};
use crate::types::{BasisSelection, ChainId, FeeEstimation};
use crate::u256_math::FiatValue;
use std::fmt;

/// Fully resolved network fee for a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkFee {
    /// Chain the fee was resolved on
    pub chain: ChainId,
    /// Fee basis used for the estimation
    pub selection: BasisSelection,
    /// Fee computed by the estimation service
    pub estimation: FeeEstimation,
    /// Confirmation time of the matched tier
    pub estimation_seconds: Option<u64>,
    /// Fee in fiat
    pub fiat: FiatValue,
    /// Tier-kind label
    pub label: Option<&'static str>,
}

impl NetworkFee {
    /// Build the display model.
    pub fn display(
        &self,
        durations: &dyn DurationFormatter,
        currency: &dyn CurrencyFormatter,
    ) -> FeeDisplay {
        let Some(amount) = self.fiat.amount() else {
            return FeeDisplay::Unavailable;
        };

        let time = self
            .estimation_seconds
            .filter(|secs| *secs > 0)
            .map(|secs| durations.format_duration(secs));

        FeeDisplay::Ready(FeeSummary {
            label: self.label,
            time,
            fiat: currency.format_currency(amount),
        })
    }
}

/// Text pieces of a displayable fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSummary {
    pub label: Option<&'static str>,
    pub time: Option<String>,
    pub fiat: String,
}

/// What the fee row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeDisplay {
    /// Estimation still pending
    Loading,
    /// Fiat value undeterminable; show nothing
    Unavailable,
    /// Time and fiat amount
    Ready(FeeSummary),
}

impl FeeDisplay {
    /// Drop the tier-kind label.
    pub fn without_label(self) -> Self {
        match self {
            FeeDisplay::Ready(summary) => FeeDisplay::Ready(FeeSummary {
                label: None,
                ..summary
            }),
            other => other,
        }
    }

    /// Check if anything is shown besides a loading indicator.
    pub fn is_visible(&self) -> bool {
        matches!(self, FeeDisplay::Ready(_))
    }
}

impl fmt::Display for FeeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeDisplay::Loading => write!(f, "…"),
            FeeDisplay::Unavailable => Ok(()),
            FeeDisplay::Ready(summary) => {
                if let Some(label) = summary.label {
                    write!(f, "[{label}] ")?;
                }
                if let Some(time) = &summary.time {
                    write!(f, "{time} · ")?;
                }
                write!(f, "{}", summary.fiat)
            }
        }
    }
}
