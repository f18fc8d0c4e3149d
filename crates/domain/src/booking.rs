use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Error, Debug)]
#[error("Booking status: {0} is not valid")]
pub struct InvalidBookingStatusError(String);

impl FromStr for BookingStatus {
    type Err = InvalidBookingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(InvalidBookingStatusError(s.to_string())),
        }
    }
}

/// Durations in millis that drive the `Booking` lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingTimeouts {
    /// A pending `Booking` is implicitly cancelled this long after it was made
    pub expire_after: i64,
    /// A cancelled `Booking` can not be made again for this long
    pub cooldown: i64,
}

impl Default for BookingTimeouts {
    fn default() -> Self {
        Self {
            expire_after: 20 * 1000,
            cooldown: 15 * 1000,
        }
    }
}

/// A time boxed reservation of one coupon of a `Promotion` for a `User`.
///
/// There is at most one `Booking` per (`User`, `Promotion`) pair. When a
/// reservation is made again after a cancellation the same `Booking` is
/// reopened instead of a new one being created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: ID,
    pub user_id: ID,
    pub promotion_id: ID,
    pub status: BookingStatus,
    pub booking_timestamp: i64,
    pub auto_expire_at: i64,
    pub cooldown_until: Option<i64>,
    pub cancelled_at: Option<i64>,
    /// Caller supplied deadline for redeeming the reserved coupon
    pub limit_use_date: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownActive {
    pub remaining_millis: i64,
}

impl CooldownActive {
    /// Remaining cooldown rounded up to whole seconds
    pub fn remaining_seconds(&self) -> i64 {
        (self.remaining_millis + 999) / 1000
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTransitionError {
    #[error("The booking was cancelled and its cooldown has already elapsed")]
    CooldownElapsed,
}

/// Result of asking the ledger for a `Booking` on a (`User`, `Promotion`) pair
#[derive(Debug, Clone, PartialEq)]
pub enum Reservation {
    /// There already is a pending `Booking`, nothing changed
    Existing(Booking),
    /// A cancelled `Booking` has been reset to pending and must be saved
    Reopened(Booking),
    /// There was no `Booking` for the pair, it must be inserted
    Created(Booking),
}

impl Reservation {
    pub fn booking(&self) -> &Booking {
        match self {
            Self::Existing(b) | Self::Reopened(b) | Self::Created(b) => b,
        }
    }

    pub fn into_booking(self) -> Booking {
        match self {
            Self::Existing(b) | Self::Reopened(b) | Self::Created(b) => b,
        }
    }
}

impl Booking {
    pub fn new(
        user_id: ID,
        promotion_id: ID,
        limit_use_date: Option<i64>,
        now: i64,
        timeouts: &BookingTimeouts,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            promotion_id,
            status: BookingStatus::Pending,
            booking_timestamp: now,
            auto_expire_at: now + timeouts.expire_after,
            cooldown_until: None,
            cancelled_at: None,
            limit_use_date,
        }
    }

    /// Decides what happens when `user_id` tries to reserve a coupon of
    /// `promotion_id` given the `Booking` currently stored for that pair.
    pub fn reserve(
        existing: Option<Booking>,
        user_id: ID,
        promotion_id: ID,
        limit_use_date: Option<i64>,
        now: i64,
        timeouts: &BookingTimeouts,
    ) -> Result<Reservation, CooldownActive> {
        let mut booking = match existing {
            Some(booking) => booking,
            None => {
                return Ok(Reservation::Created(Self::new(
                    user_id,
                    promotion_id,
                    limit_use_date,
                    now,
                    timeouts,
                )))
            }
        };

        booking.expire_if_due(now, timeouts);
        if booking.status == BookingStatus::Pending {
            return Ok(Reservation::Existing(booking));
        }
        if let Some(remaining_millis) = booking.cooldown_remaining(now) {
            return Err(CooldownActive { remaining_millis });
        }

        booking.reopen(limit_use_date, now, timeouts);
        Ok(Reservation::Reopened(booking))
    }

    /// A pending `Booking` is expired once `auto_expire_at` has passed
    pub fn is_expired(&self, now: i64) -> bool {
        self.status == BookingStatus::Pending && now > self.auto_expire_at
    }

    /// Applies the implicit cancellation of an expired `Booking`. The
    /// cancellation is stamped at `auto_expire_at` and not at `now` so that
    /// observing it at different times always yields the same `Booking`.
    /// Returns true if the `Booking` changed.
    pub fn expire_if_due(&mut self, now: i64, timeouts: &BookingTimeouts) -> bool {
        if !self.is_expired(now) {
            return false;
        }
        self.mark_cancelled(self.auto_expire_at, timeouts);
        true
    }

    /// This `Booking` as it should be seen at `now`
    pub fn effective(&self, now: i64, timeouts: &BookingTimeouts) -> Self {
        let mut booking = self.clone();
        booking.expire_if_due(now, timeouts);
        booking
    }

    /// True if `other` is this `Booking` in the same point of its lifecycle.
    /// Every transition changes the status, the `booking_timestamp` or
    /// `cancelled_at`, so a stored `Booking` that still has the same revision
    /// as the one a write was based on has not been changed in between.
    pub fn is_same_revision(&self, other: &Booking) -> bool {
        self.id == other.id
            && self.status == other.status
            && self.booking_timestamp == other.booking_timestamp
            && self.cancelled_at == other.cancelled_at
    }

    /// Millis left before this pair can be reserved again, if any
    pub fn cooldown_remaining(&self, now: i64) -> Option<i64> {
        self.cooldown_until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }

    /// Cancels a pending `Booking`. Cancelling a `Booking` that is already
    /// cancelled leaves it untouched as long as its cooldown is running.
    pub fn cancel(
        &mut self,
        now: i64,
        timeouts: &BookingTimeouts,
    ) -> Result<(), BookingTransitionError> {
        self.expire_if_due(now, timeouts);
        match self.status {
            BookingStatus::Pending => {
                self.mark_cancelled(now, timeouts);
                Ok(())
            }
            BookingStatus::Cancelled if self.cooldown_remaining(now).is_some() => Ok(()),
            BookingStatus::Cancelled => Err(BookingTransitionError::CooldownElapsed),
        }
    }

    fn mark_cancelled(&mut self, at: i64, timeouts: &BookingTimeouts) {
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(at);
        self.cooldown_until = Some(at + timeouts.cooldown);
    }

    fn reopen(&mut self, limit_use_date: Option<i64>, now: i64, timeouts: &BookingTimeouts) {
        self.status = BookingStatus::Pending;
        self.cancelled_at = None;
        self.cooldown_until = None;
        self.booking_timestamp = now;
        self.auto_expire_at = now + timeouts.expire_after;
        if limit_use_date.is_some() {
            self.limit_use_date = limit_use_date;
        }
    }
}

impl Entity for Booking {
    fn id(&self) -> &ID {
        &self.id
    }
}
