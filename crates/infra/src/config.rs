use coupon_ledger_domain::{BookingTimeouts, Tz};
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

const SECOND: i64 = 1000;
const HOUR: i64 = 60 * 60 * SECOND;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How long a pending `Booking` lives and how long a cancelled
    /// `Booking` blocks new reservations for the same pair
    pub booking_timeouts: BookingTimeouts,
    /// Millis between two runs of the expiry sweep job
    pub expiry_sweep_interval: i64,
    /// Deadlines within this many millis from now are considered to be expiring
    pub expiry_lookahead: i64,
    /// Timezone that defines the "day" of the daily redemption limit and
    /// that is used when formatting dates in alerts
    pub timezone: Tz,
    /// If set, created alerts are posted to this url
    pub notification_webhook_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env("PORT", 5000);
        let expire_after = parse_duration_env("BOOKING_EXPIRE_SECS", 20, SECOND);
        let cooldown = parse_duration_env("BOOKING_COOLDOWN_SECS", 15, SECOND);
        let expiry_sweep_interval = parse_duration_env("EXPIRY_SWEEP_INTERVAL_SECS", 60 * 60, SECOND);
        let expiry_lookahead = parse_duration_env("EXPIRY_LOOKAHEAD_HOURS", 24, HOUR);
        let timezone = parse_env("REDEMPTION_TIMEZONE", Tz::UTC);
        let notification_webhook_url = match std::env::var("NOTIFICATION_WEBHOOK_URL") {
            Ok(url) if !url.trim().is_empty() => Some(url),
            _ => {
                info!("Did not find NOTIFICATION_WEBHOOK_URL environment variable. Alerts will only be logged.");
                None
            }
        };

        Self {
            port,
            booking_timeouts: BookingTimeouts {
                expire_after,
                cooldown,
            },
            expiry_sweep_interval,
            expiry_lookahead,
            timezone,
            notification_webhook_url,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    let val = match std::env::var(key) {
        Ok(val) => val,
        Err(_) => return default,
    };
    match val.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                key, val, default
            );
            default
        }
    }
}

/// Reads a positive number of `unit`s and returns it in millis. The default
/// is used for values that are not positive or that overflow.
fn parse_duration_env(key: &str, default: i64, unit_millis: i64) -> i64 {
    let value: i64 = parse_env(key, default);
    match value.checked_mul(unit_millis) {
        Some(millis) if value > 0 => millis,
        _ => {
            warn!(
                "The given {}: {} is out of range, falling back to the default: {}.",
                key, value, default
            );
            default * unit_millis
        }
    }
}
