mod base;
mod booking;
mod proximity;
mod redemption;
mod status;
mod sweep;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use booking::BookingClient;
pub use booking::CreateBookingInput;
pub use coupon_ledger_api_structs::dtos::*;
pub use coupon_ledger_domain::{BookingStatus, ID};
use proximity::ProximityClient;
pub use proximity::FindNearbyInput;
use redemption::RedemptionClient;
pub use redemption::RedeemInput;
use status::StatusClient;
use std::sync::Arc;
use sweep::SweepClient;

pub use coupon_ledger_api_structs::dtos::BookingDTO as Booking;
pub use coupon_ledger_api_structs::dtos::NearbyCollaboratorDTO as NearbyCollaborator;
pub use coupon_ledger_api_structs::dtos::RedeemedCouponDTO as RedeemedCoupon;

/// Coupon Ledger SDK
///
/// The SDK contains methods for interacting with the Coupon Ledger server API.
#[derive(Clone)]
pub struct CouponLedgerSDK {
    pub booking: BookingClient,
    pub proximity: ProximityClient,
    pub redemption: RedemptionClient,
    pub status: StatusClient,
    pub sweep: SweepClient,
}

impl CouponLedgerSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(format!("{}/api/v1", address)));

        Self {
            booking: BookingClient::new(base.clone()),
            proximity: ProximityClient::new(base.clone()),
            redemption: RedemptionClient::new(base.clone()),
            status: StatusClient::new(base.clone()),
            sweep: SweepClient::new(base),
        }
    }
}
