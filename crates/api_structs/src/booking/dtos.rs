use coupon_ledger_domain::{Booking, BookingStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDTO {
    pub id: ID,
    pub user_id: ID,
    pub promotion_id: ID,
    pub status: BookingStatus,
    pub booking_timestamp: i64,
    pub auto_expire_at: i64,
    pub cooldown_until: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub limit_use_date: Option<i64>,
}

impl BookingDTO {
    pub fn new(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            promotion_id: booking.promotion_id,
            status: booking.status,
            booking_timestamp: booking.booking_timestamp,
            auto_expire_at: booking.auto_expire_at,
            cooldown_until: booking.cooldown_until,
            cancelled_at: booking.cancelled_at,
            limit_use_date: booking.limit_use_date,
        }
    }
}
