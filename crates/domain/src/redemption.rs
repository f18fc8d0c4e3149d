use crate::shared::entity::{Entity, ID};
use serde::Serialize;
use std::fmt::Display;

/// Audit record of a single coupon being consumed at a `Branch`.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedeemedCoupon {
    pub id: ID,
    pub user_id: ID,
    pub promotion_id: ID,
    pub branch_id: ID,
    /// One-time token, e.g. embedded in a QR code. Unique per `Promotion`.
    pub nonce: Option<String>,
    pub used_at: i64,
}

impl RedeemedCoupon {
    pub fn new(
        user_id: ID,
        promotion_id: ID,
        branch_id: ID,
        nonce: Option<String>,
        used_at: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            promotion_id,
            branch_id,
            nonce,
            used_at,
        }
    }
}

impl Entity for RedeemedCoupon {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// A `RedeemedCoupon` that should be committed if the `Promotion` admits it
#[derive(Debug, Clone)]
pub struct RedemptionAttempt {
    pub coupon: RedeemedCoupon,
    /// Start of the current local day, used for the daily limit
    pub day_start: i64,
}

/// What has already been redeemed, read under the same lock as the `Promotion`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedemptionHistory {
    pub nonce_already_used: bool,
    pub user_redemptions: i64,
    pub user_redemptions_today: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailability {
    Inactive,
    Ended,
    NotStarted,
    Expired,
}

impl Display for Unavailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::Inactive => "is not active",
            Self::Ended => "has ended",
            Self::NotStarted => "has not started yet",
            Self::Expired => "is past its end date",
        };
        write!(f, "{}", msg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RedemptionRejection {
    NotFound(ID),
    InvalidState(Unavailability),
    OutOfStock,
    ReplayDetected,
    UserLimitExceeded(i64),
    DailyLimitExceeded(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RedemptionOutcome {
    Redeemed(RedeemedCoupon),
    Rejected(RedemptionRejection),
}
