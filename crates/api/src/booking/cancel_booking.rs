use crate::error::CouponError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use coupon_ledger_api_structs::cancel_booking::*;
use coupon_ledger_domain::{Booking, BookingTransitionError, ID};
use coupon_ledger_infra::CouponContext;

pub async fn cancel_booking_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<CouponContext>,
) -> Result<HttpResponse, CouponError> {
    let usecase = CancelBookingUseCase {
        booking_id: path.booking_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|booking| HttpResponse::Ok().json(APIResponse::new(booking)))
        .map_err(CouponError::from)
}

#[derive(Debug)]
pub struct CancelBookingUseCase {
    pub booking_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    NotFound(ID),
    InvalidTransition(BookingTransitionError),
}

impl From<UseCaseError> for CouponError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::NotFound(booking_id) => Self::NotFound(format!(
                "The booking with id: {}, was not found.",
                booking_id
            )),
            UseCaseError::InvalidTransition(e) => Self::Conflict(e.to_string()),
        }
    }
}

const MAX_ATTEMPTS: usize = 3;

#[async_trait::async_trait(?Send)]
impl UseCase for CancelBookingUseCase {
    type Response = Booking;
    type Error = UseCaseError;

    const NAME: &'static str = "CancelBooking";

    async fn execute(&mut self, ctx: &CouponContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        // The booking might be changed by another request between the lookup
        // and the write, in that case the cancellation is applied once more
        for _ in 0..MAX_ATTEMPTS {
            let stored = match ctx.repos.booking_repo.find(&self.booking_id).await {
                Ok(Some(booking)) => booking,
                Ok(None) => return Err(UseCaseError::NotFound(self.booking_id.clone())),
                Err(_) => return Err(UseCaseError::StorageError),
            };

            let mut booking = stored.clone();
            booking
                .cancel(now, &ctx.config.booking_timeouts)
                .map_err(UseCaseError::InvalidTransition)?;
            if booking == stored {
                return Ok(booking);
            }

            let saved = ctx
                .repos
                .booking_repo
                .save_if_unchanged(&booking, &stored)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            if saved {
                return Ok(booking);
            }
        }

        Err(UseCaseError::StorageError)
    }
}
