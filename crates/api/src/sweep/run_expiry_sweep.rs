use crate::error::CouponError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use coupon_ledger_api_structs::run_expiry_sweep::APIResponse;
use coupon_ledger_domain::{
    expiry::{plan_expiry_alerts, ExpiryWindow},
    Alert, Booking,
};
use coupon_ledger_infra::{CouponContext, Scan};
use tracing::{debug, error, info, warn};

pub async fn run_expiry_sweep_controller(
    ctx: web::Data<CouponContext>,
) -> Result<HttpResponse, CouponError> {
    let usecase = RunExpirySweepUseCase {
        trigger: SweepTrigger::Manual,
    };

    execute(usecase, &ctx)
        .await
        .map(|report| {
            HttpResponse::Ok().json(APIResponse {
                processed: report.processed,
                expired_bookings: report.expired_bookings,
                failed: report.failed,
            })
        })
        .map_err(CouponError::from)
}

#[derive(Debug)]
pub enum SweepTrigger {
    JobScheduler,
    Manual,
}

/// Persists expired bookings and creates the alerts for deadlines that are
/// about to pass. Running it again without anything changing creates nothing.
#[derive(Debug)]
pub struct RunExpirySweepUseCase {
    pub trigger: SweepTrigger,
}

#[derive(Debug, Default, PartialEq)]
pub struct SweepReport {
    /// Newly created alerts
    pub processed: usize,
    pub expired_bookings: usize,
    /// Reads, records or writes that failed, they are retried on the next run
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    /// None of the entities the sweep works on could be read
    StorageError,
}

impl From<UseCaseError> for CouponError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunExpirySweepUseCase {
    type Response = SweepReport;
    type Error = UseCaseError;

    const NAME: &'static str = "RunExpirySweep";

    async fn execute(&mut self, ctx: &CouponContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let mut report = SweepReport::default();
        let window = ExpiryWindow::new(now, ctx.config.expiry_lookahead);

        let expired = ctx.repos.booking_repo.find_expired_pending(now).await;
        let promotions = ctx.repos.promotion_repo.find_ending_until(window.until).await;
        let bookings = ctx
            .repos
            .booking_repo
            .find_by_limit_use_date_until(window.until)
            .await;
        if expired.is_err() && promotions.is_err() && bookings.is_err() {
            return Err(UseCaseError::StorageError);
        }

        let expired = scanned(expired, "expired bookings", &mut report);
        for booking in expired {
            expire_booking(booking, now, ctx, &mut report).await;
        }

        let promotions = scanned(promotions, "promotions ending", &mut report);
        let bookings = scanned(bookings, "bookings reaching their deadline", &mut report);
        let alerts = plan_expiry_alerts(&window, &promotions, &bookings, &ctx.config.timezone);
        for alert in alerts {
            match create_alert(&alert, ctx).await {
                Ok(false) => {}
                Ok(true) => {
                    report.processed += 1;
                    if let Err(e) = ctx.notifications.enqueue(&alert).await {
                        warn!("Unable to enqueue alert {}: {:?}", alert.id, e);
                    }
                }
                Err(e) => {
                    error!(
                        "Unable to create alert {} for {}: {:?}",
                        alert.segment_criteria.kind, alert.segment_criteria.id, e
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            trigger = ?self.trigger,
            processed = report.processed,
            expired_bookings = report.expired_bookings,
            failed = report.failed,
            "Expiry sweep finished"
        );

        Ok(report)
    }
}

/// The readable items of a scan, a failed read or malformed rows count as failures
fn scanned<T>(scan: anyhow::Result<Scan<T>>, what: &str, report: &mut SweepReport) -> Vec<T> {
    match scan {
        Ok(scan) => {
            report.failed += scan.malformed;
            scan.items
        }
        Err(e) => {
            error!("Unable to read {}: {:?}", what, e);
            report.failed += 1;
            Vec::new()
        }
    }
}

/// The booking is left alone if it was changed after it was read, e.g.
/// cancelled or reserved again by its user
async fn expire_booking(booking: Booking, now: i64, ctx: &CouponContext, report: &mut SweepReport) {
    let mut expired = booking.clone();
    if !expired.expire_if_due(now, &ctx.config.booking_timeouts) {
        return;
    }
    match ctx
        .repos
        .booking_repo
        .save_if_unchanged(&expired, &booking)
        .await
    {
        Ok(true) => report.expired_bookings += 1,
        Ok(false) => debug!("Booking {} changed since it was read, not expiring it", booking.id),
        Err(e) => {
            error!("Unable to cancel expired booking {}: {:?}", booking.id, e);
            report.failed += 1;
        }
    }
}

/// Returns false if an equal `Alert` already exists
async fn create_alert(alert: &Alert, ctx: &CouponContext) -> anyhow::Result<bool> {
    let existing = ctx
        .repos
        .notification_repo
        .find_by_criteria(
            &alert.title,
            alert.recipient_type,
            &alert.recipient_id,
            &alert.segment_criteria,
        )
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    ctx.repos.notification_repo.insert_if_absent(alert).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_ledger_domain::{
        BookingStatus, BookingTimeouts, Promotion, RecipientType, Reservation, ID,
        BOOKING_EXPIRING, PROMOTION_EXPIRING,
    };
    use coupon_ledger_infra::{IBookingRepo, INotificationSink, IPromotionRepo, StaticTimeSys};
    use std::sync::{Arc, Mutex};

    const NOW: i64 = 1613862000000;
    const HOUR: i64 = 1000 * 60 * 60;

    #[derive(Default)]
    struct RecordingSink {
        alerts: Mutex<Vec<Alert>>,
    }

    #[async_trait::async_trait]
    impl INotificationSink for RecordingSink {
        async fn enqueue(&self, alert: &Alert) -> anyhow::Result<()> {
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait::async_trait]
    impl INotificationSink for FailingSink {
        async fn enqueue(&self, _: &Alert) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Notification service is down"))
        }
    }

    fn setup() -> (CouponContext, Arc<StaticTimeSys>, Arc<RecordingSink>) {
        let mut ctx = CouponContext::create_inmemory();
        let sys = Arc::new(StaticTimeSys::new(NOW));
        let sink = Arc::new(RecordingSink::default());
        ctx.sys = sys.clone();
        ctx.notifications = sink.clone();
        ctx.config.expiry_lookahead = 24 * HOUR;
        (ctx, sys, sink)
    }

    /// Reopens every expired booking, the way `CreateBooking` does, right
    /// after the sweep has read them
    struct ReopenedAfterScan {
        inner: Arc<dyn IBookingRepo>,
        timeouts: BookingTimeouts,
    }

    #[async_trait::async_trait]
    impl IBookingRepo for ReopenedAfterScan {
        async fn insert_if_absent(&self, booking: &Booking) -> anyhow::Result<bool> {
            self.inner.insert_if_absent(booking).await
        }

        async fn save_if_unchanged(
            &self,
            booking: &Booking,
            previous: &Booking,
        ) -> anyhow::Result<bool> {
            self.inner.save_if_unchanged(booking, previous).await
        }

        async fn find(&self, booking_id: &ID) -> anyhow::Result<Option<Booking>> {
            self.inner.find(booking_id).await
        }

        async fn find_by_user_and_promotion(
            &self,
            user_id: &ID,
            promotion_id: &ID,
        ) -> anyhow::Result<Option<Booking>> {
            self.inner.find_by_user_and_promotion(user_id, promotion_id).await
        }

        async fn find_expired_pending(&self, now: i64) -> anyhow::Result<Scan<Booking>> {
            let scan = self.inner.find_expired_pending(now).await?;
            for stored in &scan.items {
                let expired = stored.effective(now, &self.timeouts);
                assert!(self.inner.save_if_unchanged(&expired, stored).await?);
                let reservation = Booking::reserve(
                    Some(expired.clone()),
                    stored.user_id.clone(),
                    stored.promotion_id.clone(),
                    None,
                    now,
                    &self.timeouts,
                );
                match reservation {
                    Ok(Reservation::Reopened(reopened)) => {
                        assert!(self.inner.save_if_unchanged(&reopened, &expired).await?)
                    }
                    _ => panic!("Expected the booking to be reopened"),
                }
            }
            Ok(scan)
        }

        async fn find_by_limit_use_date_until(&self, until: i64) -> anyhow::Result<Scan<Booking>> {
            self.inner.find_by_limit_use_date_until(until).await
        }
    }

    /// Can not list expired bookings and has a corrupt row among the
    /// bookings with a deadline
    struct FlakyBookingRepo {
        inner: Arc<dyn IBookingRepo>,
    }

    #[async_trait::async_trait]
    impl IBookingRepo for FlakyBookingRepo {
        async fn insert_if_absent(&self, booking: &Booking) -> anyhow::Result<bool> {
            self.inner.insert_if_absent(booking).await
        }

        async fn save_if_unchanged(
            &self,
            booking: &Booking,
            previous: &Booking,
        ) -> anyhow::Result<bool> {
            self.inner.save_if_unchanged(booking, previous).await
        }

        async fn find(&self, booking_id: &ID) -> anyhow::Result<Option<Booking>> {
            self.inner.find(booking_id).await
        }

        async fn find_by_user_and_promotion(
            &self,
            user_id: &ID,
            promotion_id: &ID,
        ) -> anyhow::Result<Option<Booking>> {
            self.inner.find_by_user_and_promotion(user_id, promotion_id).await
        }

        async fn find_expired_pending(&self, _: i64) -> anyhow::Result<Scan<Booking>> {
            Err(anyhow::anyhow!("Connection reset"))
        }

        async fn find_by_limit_use_date_until(&self, until: i64) -> anyhow::Result<Scan<Booking>> {
            let mut scan = self.inner.find_by_limit_use_date_until(until).await?;
            scan.malformed += 1;
            Ok(scan)
        }
    }

    struct UnreachablePromotionRepo;

    #[async_trait::async_trait]
    impl IPromotionRepo for UnreachablePromotionRepo {
        async fn insert(&self, _: &Promotion) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn find(&self, _: &ID) -> anyhow::Result<Option<Promotion>> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn find_ending_until(&self, _: i64) -> anyhow::Result<Scan<Promotion>> {
            Err(anyhow::anyhow!("Connection refused"))
        }
    }

    fn usecase() -> RunExpirySweepUseCase {
        RunExpirySweepUseCase {
            trigger: SweepTrigger::Manual,
        }
    }

    #[actix_web::test]
    async fn creates_each_alert_only_once() {
        let (ctx, _, sink) = setup();
        let collaborator_id = ID::default();
        let ending = Promotion::new(collaborator_id.clone(), "2x1", NOW - HOUR, NOW + 2 * HOUR);
        let running = Promotion::new(collaborator_id.clone(), "3x2", NOW - HOUR, NOW + 72 * HOUR);
        ctx.repos.promotion_repo.insert(&ending).await.unwrap();
        ctx.repos.promotion_repo.insert(&running).await.unwrap();

        let booking = Booking::new(
            ID::default(),
            running.id.clone(),
            Some(NOW + 5 * HOUR),
            NOW,
            &ctx.config.booking_timeouts,
        );
        ctx.repos.booking_repo.insert_if_absent(&booking).await.unwrap();

        let report = usecase().execute(&ctx).await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                processed: 2,
                expired_bookings: 0,
                failed: 0,
            }
        );

        let collaborator_alerts = ctx
            .repos
            .notification_repo
            .find_by_recipient(RecipientType::Collaborator, &collaborator_id)
            .await
            .unwrap();
        assert_eq!(collaborator_alerts.len(), 1);
        assert_eq!(collaborator_alerts[0].segment_criteria.kind, PROMOTION_EXPIRING);
        assert_eq!(collaborator_alerts[0].segment_criteria.id, ending.id);

        let user_alerts = ctx
            .repos
            .notification_repo
            .find_by_recipient(RecipientType::User, &booking.user_id)
            .await
            .unwrap();
        assert_eq!(user_alerts.len(), 1);
        assert_eq!(user_alerts[0].segment_criteria.kind, BOOKING_EXPIRING);
        assert_eq!(sink.alerts.lock().unwrap().len(), 2);

        let second = usecase().execute(&ctx).await.unwrap();
        assert_eq!(second, SweepReport::default());
        assert_eq!(sink.alerts.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn cancels_expired_pending_bookings() {
        let (ctx, sys, _) = setup();
        let timeouts = ctx.config.booking_timeouts;
        let booking = Booking::new(ID::default(), ID::default(), None, NOW, &timeouts);
        ctx.repos.booking_repo.insert_if_absent(&booking).await.unwrap();

        assert_eq!(usecase().execute(&ctx).await.unwrap().expired_bookings, 0);

        sys.set(booking.auto_expire_at + 5000);
        assert_eq!(usecase().execute(&ctx).await.unwrap().expired_bookings, 1);

        let stored = ctx
            .repos
            .booking_repo
            .find(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert_eq!(stored.cancelled_at, Some(booking.auto_expire_at));
        assert_eq!(
            stored.cooldown_until,
            Some(booking.auto_expire_at + timeouts.cooldown)
        );

        assert_eq!(usecase().execute(&ctx).await.unwrap().expired_bookings, 0);
    }

    #[actix_web::test]
    async fn failing_sink_does_not_fail_the_sweep() {
        let (mut ctx, _, _) = setup();
        ctx.notifications = Arc::new(FailingSink);
        let promotion = Promotion::new(ID::default(), "2x1", NOW - HOUR, NOW + HOUR);
        ctx.repos.promotion_repo.insert(&promotion).await.unwrap();

        let report = usecase().execute(&ctx).await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 0);
    }

    #[actix_web::test]
    async fn alerts_every_deadline_up_to_the_lookahead() {
        let (ctx, _, sink) = setup();
        let past = Promotion::new(ID::default(), "old", NOW - 2 * HOUR, NOW - HOUR);
        let later = Promotion::new(ID::default(), "later", NOW - HOUR, NOW + 25 * HOUR);
        ctx.repos.promotion_repo.insert(&past).await.unwrap();
        ctx.repos.promotion_repo.insert(&later).await.unwrap();
        // Deadline passed a minute ago, right after the previous sweep
        let booking = Booking::new(
            ID::default(),
            later.id.clone(),
            Some(NOW - 60 * 1000),
            NOW - 2 * HOUR,
            &ctx.config.booking_timeouts,
        );
        ctx.repos.booking_repo.insert_if_absent(&booking).await.unwrap();

        let report = usecase().execute(&ctx).await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 0);

        let alerted: Vec<ID> = sink
            .alerts
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.segment_criteria.id.clone())
            .collect();
        assert_eq!(alerted, vec![past.id.clone(), booking.id.clone()]);

        assert_eq!(usecase().execute(&ctx).await.unwrap().processed, 0);
    }

    #[actix_web::test]
    async fn does_not_expire_bookings_reopened_after_the_scan() {
        let (mut ctx, sys, _) = setup();
        let timeouts = ctx.config.booking_timeouts;
        let booking = Booking::new(ID::default(), ID::default(), None, NOW, &timeouts);
        ctx.repos.booking_repo.insert_if_absent(&booking).await.unwrap();
        ctx.repos.booking_repo = Arc::new(ReopenedAfterScan {
            inner: ctx.repos.booking_repo.clone(),
            timeouts,
        });

        sys.set(NOW + HOUR);
        let report = usecase().execute(&ctx).await.unwrap();
        assert_eq!(report.expired_bookings, 0);
        assert_eq!(report.failed, 0);

        let stored = ctx
            .repos
            .booking_repo
            .find(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(stored.booking_timestamp, NOW + HOUR);
        assert_eq!(stored.cancelled_at, None);
    }

    #[actix_web::test]
    async fn failed_reads_do_not_stop_the_other_phases() {
        let (mut ctx, _, sink) = setup();
        let promotion = Promotion::new(ID::default(), "2x1", NOW - HOUR, NOW + HOUR);
        ctx.repos.promotion_repo.insert(&promotion).await.unwrap();
        ctx.repos.booking_repo = Arc::new(FlakyBookingRepo {
            inner: ctx.repos.booking_repo.clone(),
        });

        let report = usecase().execute(&ctx).await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                processed: 1,
                expired_bookings: 0,
                failed: 2,
            }
        );
        assert_eq!(sink.alerts.lock().unwrap()[0].segment_criteria.id, promotion.id);
    }

    #[actix_web::test]
    async fn fails_when_nothing_can_be_read() {
        let (mut ctx, _, _) = setup();
        ctx.repos.promotion_repo = Arc::new(UnreachablePromotionRepo);
        ctx.repos.booking_repo = Arc::new(FlakyBookingRepo {
            inner: ctx.repos.booking_repo.clone(),
        });
        // The deadline scan still works, so the pass goes on
        assert_eq!(usecase().execute(&ctx).await.unwrap().failed, 3);

        struct Unreachable;

        #[async_trait::async_trait]
        impl IBookingRepo for Unreachable {
            async fn insert_if_absent(&self, _: &Booking) -> anyhow::Result<bool> {
                Err(anyhow::anyhow!("Connection refused"))
            }

            async fn save_if_unchanged(&self, _: &Booking, _: &Booking) -> anyhow::Result<bool> {
                Err(anyhow::anyhow!("Connection refused"))
            }

            async fn find(&self, _: &ID) -> anyhow::Result<Option<Booking>> {
                Err(anyhow::anyhow!("Connection refused"))
            }

            async fn find_by_user_and_promotion(
                &self,
                _: &ID,
                _: &ID,
            ) -> anyhow::Result<Option<Booking>> {
                Err(anyhow::anyhow!("Connection refused"))
            }

            async fn find_expired_pending(&self, _: i64) -> anyhow::Result<Scan<Booking>> {
                Err(anyhow::anyhow!("Connection refused"))
            }

            async fn find_by_limit_use_date_until(&self, _: i64) -> anyhow::Result<Scan<Booking>> {
                Err(anyhow::anyhow!("Connection refused"))
            }
        }

        ctx.repos.booking_repo = Arc::new(Unreachable);
        assert!(matches!(
            usecase().execute(&ctx).await,
            Err(UseCaseError::StorageError)
        ));
    }
}
