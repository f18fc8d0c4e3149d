use crate::{
    booking::Booking,
    date::format_timestamp,
    notification::{
        Alert, NotificationStatus, NotificationType, RecipientType, SegmentCriteria,
        BOOKING_EXPIRING, PROMOTION_EXPIRING,
    },
    promotion::{Promotion, PromotionState},
};
use chrono_tz::Tz;

pub const PROMOTION_EXPIRING_TITLE: &str = "Promotion ending soon";
pub const BOOKING_EXPIRING_TITLE: &str = "Reserved coupon expiring soon";

/// Deadlines up to `until` are considered to be nearing. There is no lower
/// bound: a deadline that already passed between two sweeps still gets its
/// alert, and alerts that already exist are never created twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
    pub now: i64,
    pub until: i64,
}

impl ExpiryWindow {
    pub fn new(now: i64, lookahead: i64) -> Self {
        Self {
            now,
            until: now.saturating_add(lookahead),
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts <= self.until
    }
}

/// Builds the alerts that should exist for active `Promotion`s ending and
/// `Booking`s reaching their use deadline inside `window`. This does not know about
/// alerts that have already been created, deduplication is up to the caller.
pub fn plan_expiry_alerts(
    window: &ExpiryWindow,
    promotions: &[Promotion],
    bookings: &[Booking],
    tz: &Tz,
) -> Vec<Alert> {
    let promotion_alerts = promotions
        .iter()
        .filter(|p| p.state == PromotionState::Active && window.contains(p.end_ts))
        .map(|p| promotion_expiring_alert(p, window.now, tz));

    let booking_alerts = bookings
        .iter()
        .filter_map(|b| b.limit_use_date.map(|deadline| (b, deadline)))
        .filter(|(_, deadline)| window.contains(*deadline))
        .map(|(b, deadline)| booking_expiring_alert(b, deadline, window.now, tz));

    promotion_alerts.chain(booking_alerts).collect()
}

fn promotion_expiring_alert(promotion: &Promotion, now: i64, tz: &Tz) -> Alert {
    Alert {
        id: Default::default(),
        title: PROMOTION_EXPIRING_TITLE.into(),
        message: format!(
            "Your promotion \"{}\" ends on {}",
            promotion.title,
            format_timestamp(promotion.end_ts, tz)
        ),
        notification_type: NotificationType::Alert,
        recipient_type: RecipientType::Collaborator,
        recipient_id: promotion.collaborator_id.clone(),
        status: NotificationStatus::Pending,
        segment_criteria: SegmentCriteria {
            kind: PROMOTION_EXPIRING.into(),
            id: promotion.id.clone(),
        },
        promotion_id: Some(promotion.id.clone()),
        created: now,
    }
}

fn booking_expiring_alert(booking: &Booking, deadline: i64, now: i64, tz: &Tz) -> Alert {
    Alert {
        id: Default::default(),
        title: BOOKING_EXPIRING_TITLE.into(),
        message: format!(
            "Your reserved coupon must be used before {}",
            format_timestamp(deadline, tz)
        ),
        notification_type: NotificationType::Alert,
        recipient_type: RecipientType::User,
        recipient_id: booking.user_id.clone(),
        status: NotificationStatus::Pending,
        segment_criteria: SegmentCriteria {
            kind: BOOKING_EXPIRING.into(),
            id: booking.id.clone(),
        },
        promotion_id: Some(booking.promotion_id.clone()),
        created: now,
    }
}
