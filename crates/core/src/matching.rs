//! Confirmation time lookup by matching a fee basis against published tiers.

use crate::types::{Eip1559Tier, TierName, TierSet};

/// Find the first tier, fastest first, whose fees equal the target exactly.
///
/// Ties between tiers with identical fees resolve to the faster tier.
pub fn find_matching_eip1559_tier(
    tiers: &TierSet<Eip1559Tier>,
    priority_fee: u128,
    max_fee: u128,
) -> Option<(TierName, &Eip1559Tier)> {
    tiers
        .ordered()
        .find(|(_, tier)| tier.max_fee == max_fee && tier.priority_fee == priority_fee)
}

/// Confirmation time estimate (seconds) for an EIP-1559 fee pair.
///
/// Returns `None` if no tier matches or the matched tier has no estimate.
pub fn match_eip1559_estimation(
    tiers: &TierSet<Eip1559Tier>,
    priority_fee: u128,
    max_fee: u128,
) -> Option<u64> {
    find_matching_eip1559_tier(tiers, priority_fee, max_fee)
        .and_then(|(_, tier)| tier.estimation_seconds)
}
