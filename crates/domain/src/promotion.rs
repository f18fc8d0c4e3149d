use crate::{
    redemption::{RedemptionHistory, RedemptionRejection, Unavailability},
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionState {
    Active,
    Inactive,
    Ended,
}

impl PromotionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Ended => "ended",
        }
    }
}

#[derive(Error, Debug)]
#[error("Promotion state: {0} is not valid")]
pub struct InvalidPromotionStateError(String);

impl FromStr for PromotionState {
    type Err = InvalidPromotionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "ended" => Ok(Self::Ended),
            _ => Err(InvalidPromotionStateError(s.to_string())),
        }
    }
}

/// A discount offered by a `Collaborator` with a limited pool of coupons.
///
/// `available_stock` is the single source of truth for how many coupons can
/// still be redeemed and must only be decremented by a redemption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Promotion {
    pub id: ID,
    pub collaborator_id: ID,
    pub title: String,
    /// `None` means that stock is not tracked for this `Promotion`
    pub total_stock: Option<i64>,
    pub available_stock: Option<i64>,
    /// Max amount of redemptions a single `User` can make. Disabled if `None` or 0.
    pub limit_per_user: Option<i64>,
    /// Max amount of redemptions a single `User` can make per local day.
    /// Disabled if `None` or 0.
    pub daily_limit_per_user: Option<i64>,
    pub start_ts: i64,
    pub end_ts: i64,
    pub state: PromotionState,
}

impl Promotion {
    pub fn new(collaborator_id: ID, title: impl Into<String>, start_ts: i64, end_ts: i64) -> Self {
        Self {
            id: Default::default(),
            collaborator_id,
            title: title.into(),
            total_stock: None,
            available_stock: None,
            limit_per_user: None,
            daily_limit_per_user: None,
            start_ts,
            end_ts,
            state: PromotionState::Active,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        let stock = stock.max(0);
        self.total_stock = Some(stock);
        self.available_stock = Some(stock);
        self
    }

    pub fn with_limits(mut self, per_user: Option<i64>, daily_per_user: Option<i64>) -> Self {
        self.limit_per_user = per_user;
        self.daily_limit_per_user = daily_per_user;
        self
    }

    pub fn is_within_window(&self, now: i64) -> bool {
        self.start_ts <= now && now <= self.end_ts
    }

    /// Checks that coupons for this `Promotion` can currently be handed out,
    /// either as a booking or as a redemption.
    pub fn check_availability(&self, now: i64) -> Result<(), RedemptionRejection> {
        match self.state {
            PromotionState::Active => {}
            PromotionState::Inactive => {
                return Err(RedemptionRejection::InvalidState(Unavailability::Inactive))
            }
            PromotionState::Ended => {
                return Err(RedemptionRejection::InvalidState(Unavailability::Ended))
            }
        }
        if now < self.start_ts {
            return Err(RedemptionRejection::InvalidState(Unavailability::NotStarted));
        }
        if now > self.end_ts {
            return Err(RedemptionRejection::InvalidState(Unavailability::Expired));
        }
        match self.available_stock {
            Some(stock) if stock <= 0 => Err(RedemptionRejection::OutOfStock),
            _ => Ok(()),
        }
    }

    /// Runs every redemption precondition in order against a single
    /// consistent view of this `Promotion` and the `User`s redemption
    /// history. Must be called while holding the lock on this `Promotion`.
    pub fn admit_redemption(
        &self,
        now: i64,
        history: &RedemptionHistory,
    ) -> Result<(), RedemptionRejection> {
        self.check_availability(now)?;

        if history.nonce_already_used {
            return Err(RedemptionRejection::ReplayDetected);
        }
        if let Some(limit) = enabled_limit(self.limit_per_user) {
            if history.user_redemptions >= limit {
                return Err(RedemptionRejection::UserLimitExceeded(limit));
            }
        }
        if let Some(limit) = enabled_limit(self.daily_limit_per_user) {
            if history.user_redemptions_today >= limit {
                return Err(RedemptionRejection::DailyLimitExceeded(limit));
            }
        }

        Ok(())
    }

    /// Takes one coupon from the stock. Returns false if the stock is exhausted.
    pub fn take_one(&mut self) -> bool {
        match self.available_stock {
            None => true,
            Some(stock) if stock > 0 => {
                self.available_stock = Some(stock - 1);
                true
            }
            Some(_) => false,
        }
    }
}

fn enabled_limit(limit: Option<i64>) -> Option<i64> {
    limit.filter(|l| *l > 0)
}

impl Entity for Promotion {
    fn id(&self) -> &ID {
        &self.id
    }
}
