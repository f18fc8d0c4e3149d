mod inmemory;
mod postgres;

use crate::repos::Scan;
use coupon_ledger_domain::{Booking, ID};
pub use inmemory::InMemoryBookingRepo;
pub use postgres::PostgresBookingRepo;

#[async_trait::async_trait]
pub trait IBookingRepo: Send + Sync {
    /// Inserts the `Booking` unless one already exists for its (`User`, `Promotion`)
    /// pair. Returns false if nothing was inserted.
    async fn insert_if_absent(&self, booking: &Booking) -> anyhow::Result<bool>;
    /// Stores `booking` only if the stored `Booking` still has the revision of
    /// `previous`, the version the change was derived from. Returns false if
    /// it was changed by someone else in the meantime and nothing was written.
    async fn save_if_unchanged(&self, booking: &Booking, previous: &Booking)
        -> anyhow::Result<bool>;
    async fn find(&self, booking_id: &ID) -> anyhow::Result<Option<Booking>>;
    async fn find_by_user_and_promotion(
        &self,
        user_id: &ID,
        promotion_id: &ID,
    ) -> anyhow::Result<Option<Booking>>;
    /// Pending `Booking`s whose `auto_expire_at` is before `now`
    async fn find_expired_pending(&self, now: i64) -> anyhow::Result<Scan<Booking>>;
    /// `Booking`s with a `limit_use_date` at or before `until`
    async fn find_by_limit_use_date_until(&self, until: i64) -> anyhow::Result<Scan<Booking>>;
}

#[cfg(test)]
mod tests {
    use crate::repos::{Repos, Scan};
    use coupon_ledger_domain::{Booking, BookingStatus, BookingTimeouts, ID};

    const NOW: i64 = 1613862000000;

    #[tokio::test]
    async fn only_one_booking_per_user_and_promotion() {
        let repos = Repos::create_inmemory();
        let timeouts = BookingTimeouts::default();
        let user_id = ID::default();
        let promotion_id = ID::default();

        let booking = Booking::new(user_id.clone(), promotion_id.clone(), None, NOW, &timeouts);
        assert!(repos.booking_repo.insert_if_absent(&booking).await.unwrap());
        let other = Booking::new(user_id.clone(), promotion_id.clone(), None, NOW, &timeouts);
        assert!(!repos.booking_repo.insert_if_absent(&other).await.unwrap());

        let found = repos
            .booking_repo
            .find_by_user_and_promotion(&user_id, &promotion_id)
            .await
            .unwrap();
        assert_eq!(found, Some(booking));
    }

    #[tokio::test]
    async fn finds_expired_pending_bookings() {
        let repos = Repos::create_inmemory();
        let timeouts = BookingTimeouts::default();

        let expired = Booking::new(ID::default(), ID::default(), None, NOW, &timeouts);
        let fresh = Booking::new(ID::default(), ID::default(), None, NOW + 10_000, &timeouts);
        let mut cancelled = Booking::new(ID::default(), ID::default(), None, NOW, &timeouts);
        cancelled.cancel(NOW + 1000, &timeouts).unwrap();
        for booking in [&expired, &fresh, &cancelled] {
            repos.booking_repo.insert_if_absent(booking).await.unwrap();
        }

        let found = repos
            .booking_repo
            .find_expired_pending(NOW + timeouts.expire_after + 1)
            .await
            .unwrap();
        assert_eq!(found, Scan::new(vec![expired]));
    }

    #[tokio::test]
    async fn saves_and_finds_by_deadline() {
        let repos = Repos::create_inmemory();
        let timeouts = BookingTimeouts::default();

        let booking = Booking::new(ID::default(), ID::default(), Some(NOW + 500), NOW, &timeouts);
        repos.booking_repo.insert_if_absent(&booking).await.unwrap();
        let mut cancelled = booking.clone();
        cancelled.cancel(NOW + 10, &timeouts).unwrap();
        assert!(repos
            .booking_repo
            .save_if_unchanged(&cancelled, &booking)
            .await
            .unwrap());

        assert_eq!(
            repos.booking_repo.find(&booking.id).await.unwrap(),
            Some(cancelled.clone())
        );
        assert_eq!(
            repos
                .booking_repo
                .find_by_limit_use_date_until(NOW + 1000)
                .await
                .unwrap()
                .items,
            vec![cancelled]
        );
        assert!(repos
            .booking_repo
            .find_by_limit_use_date_until(NOW + 499)
            .await
            .unwrap()
            .items
            .is_empty());
    }

    #[tokio::test]
    async fn does_not_overwrite_bookings_changed_in_between() {
        let repos = Repos::create_inmemory();
        let timeouts = BookingTimeouts::default();
        let booking = Booking::new(ID::default(), ID::default(), None, NOW, &timeouts);
        repos.booking_repo.insert_if_absent(&booking).await.unwrap();

        // Read by the sweep while it was still pending
        let stale = booking.clone();

        // Expired, then reserved again by the user
        let hour_later = NOW + 1000 * 60 * 60;
        let expired = booking.effective(hour_later, &timeouts);
        assert!(repos
            .booking_repo
            .save_if_unchanged(&expired, &booking)
            .await
            .unwrap());
        let reopened = Booking::reserve(
            Some(expired.clone()),
            booking.user_id.clone(),
            booking.promotion_id.clone(),
            None,
            hour_later,
            &timeouts,
        )
        .unwrap()
        .into_booking();
        assert!(repos
            .booking_repo
            .save_if_unchanged(&reopened, &expired)
            .await
            .unwrap());

        let late_expiry = stale.effective(hour_later, &timeouts);
        assert!(!repos
            .booking_repo
            .save_if_unchanged(&late_expiry, &stale)
            .await
            .unwrap());

        let stored = repos.booking_repo.find(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored, reopened);
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn does_not_save_unknown_bookings() {
        let repos = Repos::create_inmemory();
        let booking = Booking::new(ID::default(), ID::default(), None, NOW, &BookingTimeouts::default());
        assert!(!repos
            .booking_repo
            .save_if_unchanged(&booking, &booking)
            .await
            .unwrap());
        assert!(repos.booking_repo.find(&booking.id).await.unwrap().is_none());
    }
}
