use super::IBookingRepo;
use crate::repos::{shared::inmemory_repo::*, Scan};
use coupon_ledger_domain::{Booking, BookingStatus, ID};

pub struct InMemoryBookingRepo {
    bookings: std::sync::Mutex<Vec<Booking>>,
}

impl InMemoryBookingRepo {
    pub fn new() -> Self {
        Self {
            bookings: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IBookingRepo for InMemoryBookingRepo {
    async fn insert_if_absent(&self, booking: &Booking) -> anyhow::Result<bool> {
        let mut bookings = lock(&self.bookings);
        let exists = bookings.iter().any(|b| {
            b.user_id == booking.user_id && b.promotion_id == booking.promotion_id
        });
        if exists {
            return Ok(false);
        }
        bookings.push(booking.clone());
        Ok(true)
    }

    async fn save_if_unchanged(
        &self,
        booking: &Booking,
        previous: &Booking,
    ) -> anyhow::Result<bool> {
        let mut bookings = lock(&self.bookings);
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(stored) if stored.is_same_revision(previous) => {
                *stored = booking.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find(&self, booking_id: &ID) -> anyhow::Result<Option<Booking>> {
        Ok(find(booking_id, &self.bookings))
    }

    async fn find_by_user_and_promotion(
        &self,
        user_id: &ID,
        promotion_id: &ID,
    ) -> anyhow::Result<Option<Booking>> {
        let bookings = find_by(&self.bookings, |b| {
            b.user_id == *user_id && b.promotion_id == *promotion_id
        });
        Ok(bookings.into_iter().next())
    }

    async fn find_expired_pending(&self, now: i64) -> anyhow::Result<Scan<Booking>> {
        Ok(Scan::new(find_by(&self.bookings, |b| {
            b.status == BookingStatus::Pending && b.auto_expire_at < now
        })))
    }

    async fn find_by_limit_use_date_until(&self, until: i64) -> anyhow::Result<Scan<Booking>> {
        let mut bookings = find_by(&self.bookings, |b| match b.limit_use_date {
            Some(deadline) => deadline <= until,
            None => false,
        });
        bookings.sort_by_key(|b| b.limit_use_date);
        Ok(Scan::new(bookings))
    }
}
