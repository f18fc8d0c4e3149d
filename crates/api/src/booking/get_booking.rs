use crate::error::CouponError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use coupon_ledger_api_structs::get_booking::*;
use coupon_ledger_domain::{Booking, ID};
use coupon_ledger_infra::CouponContext;

pub async fn get_booking_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<CouponContext>,
) -> Result<HttpResponse, CouponError> {
    let usecase = GetBookingUseCase {
        booking_id: path.booking_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|booking| HttpResponse::Ok().json(APIResponse::new(booking)))
        .map_err(CouponError::from)
}

#[derive(Debug)]
pub struct GetBookingUseCase {
    pub booking_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
    NotFound(ID),
}

impl From<UseCaseError> for CouponError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::NotFound(booking_id) => Self::NotFound(format!(
                "The booking with id: {}, was not found.",
                booking_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetBookingUseCase {
    type Response = Booking;
    type Error = UseCaseError;

    const NAME: &'static str = "GetBooking";

    /// Expiry is derived here, the stored `Booking` is left as is
    async fn execute(&mut self, ctx: &CouponContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        match ctx.repos.booking_repo.find(&self.booking_id).await {
            Ok(Some(booking)) => Ok(booking.effective(now, &ctx.config.booking_timeouts)),
            Ok(None) => Err(UseCaseError::NotFound(self.booking_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
