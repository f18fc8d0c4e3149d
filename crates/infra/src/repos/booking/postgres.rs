use super::IBookingRepo;
use crate::repos::Scan;
use coupon_ledger_domain::{Booking, BookingStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BookingRaw {
    booking_uid: Uuid,
    user_uid: Uuid,
    promotion_uid: Uuid,
    status: String,
    booking_timestamp: i64,
    auto_expire_at: i64,
    cooldown_until: Option<i64>,
    cancelled_at: Option<i64>,
    limit_use_date: Option<i64>,
}

impl TryFrom<BookingRaw> for Booking {
    type Error = anyhow::Error;

    fn try_from(raw: BookingRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.booking_uid.into(),
            user_id: raw.user_uid.into(),
            promotion_id: raw.promotion_uid.into(),
            status: raw.status.parse::<BookingStatus>()?,
            booking_timestamp: raw.booking_timestamp,
            auto_expire_at: raw.auto_expire_at,
            cooldown_until: raw.cooldown_until,
            cancelled_at: raw.cancelled_at,
            limit_use_date: raw.limit_use_date,
        })
    }
}

#[async_trait::async_trait]
impl IBookingRepo for PostgresBookingRepo {
    async fn insert_if_absent(&self, booking: &Booking) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO bookings(booking_uid, user_uid, promotion_uid, status, booking_timestamp,
                auto_expire_at, cooldown_until, cancelled_at, limit_use_date)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_uid, promotion_uid) DO NOTHING
            "#,
        )
        .bind(booking.id.inner_ref())
        .bind(booking.user_id.inner_ref())
        .bind(booking.promotion_id.inner_ref())
        .bind(booking.status.as_str())
        .bind(booking.booking_timestamp)
        .bind(booking.auto_expire_at)
        .bind(booking.cooldown_until)
        .bind(booking.cancelled_at)
        .bind(booking.limit_use_date)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn save_if_unchanged(
        &self,
        booking: &Booking,
        previous: &Booking,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2,
                booking_timestamp = $3,
                auto_expire_at = $4,
                cooldown_until = $5,
                cancelled_at = $6,
                limit_use_date = $7
            WHERE booking_uid = $1
                AND status = $8
                AND booking_timestamp = $9
                AND cancelled_at IS NOT DISTINCT FROM $10
            "#,
        )
        .bind(booking.id.inner_ref())
        .bind(booking.status.as_str())
        .bind(booking.booking_timestamp)
        .bind(booking.auto_expire_at)
        .bind(booking.cooldown_until)
        .bind(booking.cancelled_at)
        .bind(booking.limit_use_date)
        .bind(previous.status.as_str())
        .bind(previous.booking_timestamp)
        .bind(previous.cancelled_at)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn find(&self, booking_id: &ID) -> anyhow::Result<Option<Booking>> {
        let booking: Option<BookingRaw> = sqlx::query_as(
            r#"
            SELECT * FROM bookings AS b
            WHERE b.booking_uid = $1
            "#,
        )
        .bind(booking_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        booking.map(Booking::try_from).transpose()
    }

    async fn find_by_user_and_promotion(
        &self,
        user_id: &ID,
        promotion_id: &ID,
    ) -> anyhow::Result<Option<Booking>> {
        let booking: Option<BookingRaw> = sqlx::query_as(
            r#"
            SELECT * FROM bookings AS b
            WHERE b.user_uid = $1 AND b.promotion_uid = $2
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(promotion_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        booking.map(Booking::try_from).transpose()
    }

    async fn find_expired_pending(&self, now: i64) -> anyhow::Result<Scan<Booking>> {
        let bookings: Vec<BookingRaw> = sqlx::query_as(
            r#"
            SELECT * FROM bookings AS b
            WHERE b.status = 'PENDING' AND b.auto_expire_at < $1
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(Scan::from_rows(bookings))
    }

    async fn find_by_limit_use_date_until(&self, until: i64) -> anyhow::Result<Scan<Booking>> {
        let bookings: Vec<BookingRaw> = sqlx::query_as(
            r#"
            SELECT * FROM bookings AS b
            WHERE b.limit_use_date <= $1
            ORDER BY b.limit_use_date ASC
            "#,
        )
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(Scan::from_rows(bookings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: &str) -> BookingRaw {
        BookingRaw {
            booking_uid: ID::default().inner(),
            user_uid: ID::default().inner(),
            promotion_uid: ID::default().inner(),
            status: status.into(),
            booking_timestamp: 1000,
            auto_expire_at: 21_000,
            cooldown_until: None,
            cancelled_at: None,
            limit_use_date: None,
        }
    }

    #[test]
    fn skips_rows_with_unknown_status() {
        let rows = vec![raw("PENDING"), raw("EXPIRED"), raw("CANCELLED")];
        let ids: Vec<Uuid> = vec![rows[0].booking_uid, rows[2].booking_uid];

        let scan: Scan<Booking> = Scan::from_rows(rows);
        assert_eq!(scan.malformed, 1);
        assert_eq!(
            scan.items
                .iter()
                .map(|b| *b.id.inner_ref())
                .collect::<Vec<_>>(),
            ids
        );
        assert_eq!(scan.items[1].status, BookingStatus::Cancelled);
    }
}
