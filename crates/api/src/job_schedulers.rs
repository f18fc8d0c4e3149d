use crate::{
    shared::usecase::execute,
    sweep::{RunExpirySweepUseCase, SweepTrigger},
};
use actix_web::rt::time::{interval_at, Instant};
use coupon_ledger_infra::CouponContext;
use std::time::Duration;
use tracing::info;

/// Interval between two expiry sweeps, never shorter than a second
pub fn sweep_period(interval_millis: i64) -> Duration {
    Duration::from_millis(interval_millis.max(1000) as u64)
}

pub fn start_expiry_sweep_job(ctx: CouponContext) {
    actix_web::rt::spawn(async move {
        let period = sweep_period(ctx.config.expiry_sweep_interval);
        info!("Running the expiry sweep every {} secs", period.as_secs());

        // First run is one period after startup
        let mut sweep_interval = interval_at(Instant::now() + period, period);
        loop {
            sweep_interval.tick().await;

            let usecase = RunExpirySweepUseCase {
                trigger: SweepTrigger::JobScheduler,
            };
            let _ = execute(usecase, &ctx).await;
        }
    });
}
