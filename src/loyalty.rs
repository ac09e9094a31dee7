//! Loyalty Tiers
//!
//! Clients climb tiers as they accumulate points. Each tier has a points threshold; the
//! tier a client holds is the highest one whose threshold they have met.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Loyalty tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    /// Entry tier.
    Bronze,

    /// 500 points.
    Silver,

    /// 1,500 points.
    Gold,

    /// 5,000 points.
    Platinum,
}

/// Tiers in ascending threshold order.
const TIERS: [LoyaltyTier; 4] = [
    LoyaltyTier::Bronze,
    LoyaltyTier::Silver,
    LoyaltyTier::Gold,
    LoyaltyTier::Platinum,
];

impl LoyaltyTier {
    /// Points required to reach this tier.
    #[must_use]
    pub const fn threshold(self) -> u32 {
        match self {
            Self::Bronze => 0,
            Self::Silver => 500,
            Self::Gold => 1_500,
            Self::Platinum => 5_000,
        }
    }

    /// The tier above this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Platinum),
            Self::Platinum => None,
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        })
    }
}

/// The highest tier whose threshold `points` meets.
#[must_use]
pub fn tier_for_points(points: u32) -> LoyaltyTier {
    TIERS
        .into_iter()
        .rev()
        .find(|tier| points >= tier.threshold())
        .unwrap_or(LoyaltyTier::Bronze)
}

/// Points still needed to reach the next tier, `None` at the top tier.
#[must_use]
pub fn points_to_next_tier(points: u32) -> Option<u32> {
    tier_for_points(points)
        .next()
        .map(|next| next.threshold().saturating_sub(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(tier_for_points(0), LoyaltyTier::Bronze);
        assert_eq!(tier_for_points(499), LoyaltyTier::Bronze);
        assert_eq!(tier_for_points(500), LoyaltyTier::Silver);
        assert_eq!(tier_for_points(1_499), LoyaltyTier::Silver);
        assert_eq!(tier_for_points(1_500), LoyaltyTier::Gold);
        assert_eq!(tier_for_points(5_000), LoyaltyTier::Platinum);
        assert_eq!(tier_for_points(u32::MAX), LoyaltyTier::Platinum);
    }

    #[test]
    fn points_to_next_tier_counts_down() {
        assert_eq!(points_to_next_tier(0), Some(500));
        assert_eq!(points_to_next_tier(1_200), Some(300));
        assert_eq!(points_to_next_tier(4_999), Some(1));
        assert_eq!(points_to_next_tier(5_000), None);
    }

    #[test]
    fn tiers_order_by_rank() {
        assert!(LoyaltyTier::Platinum > LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::Gold.to_string(), "Gold");
    }
}
