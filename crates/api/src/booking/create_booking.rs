use crate::error::CouponError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use coupon_ledger_api_structs::create_booking::*;
use coupon_ledger_domain::{Booking, RedemptionRejection, Reservation, Unavailability, ID};
use coupon_ledger_infra::CouponContext;

pub async fn create_booking_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CouponContext>,
) -> Result<HttpResponse, CouponError> {
    let body = body.0;
    let usecase = CreateBookingUseCase {
        user_id: body.user_id,
        promotion_id: body.promotion_id,
        limit_use_date: body.limit_use_date,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            let mut http_res = if res.created {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            http_res.json(APIResponse::new(res.booking))
        })
        .map_err(CouponError::from)
}

#[derive(Debug)]
pub struct CreateBookingUseCase {
    pub user_id: ID,
    pub promotion_id: ID,
    pub limit_use_date: Option<i64>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub booking: Booking,
    /// False if an already pending `Booking` was returned as is
    pub created: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    UserNotFound(ID),
    PromotionNotFound(ID),
    PromotionUnavailable(Unavailability),
    OutOfStock,
    CooldownActive { remaining_secs: i64 },
}

impl From<UseCaseError> for CouponError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::UserNotFound(id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", id))
            }
            UseCaseError::PromotionNotFound(id) => {
                Self::NotFound(format!("The promotion with id: {}, was not found.", id))
            }
            UseCaseError::PromotionUnavailable(reason) => Self::Conflict(format!(
                "The promotion does not accept bookings, it {}.",
                reason
            )),
            UseCaseError::OutOfStock => {
                Self::Conflict("The promotion has no coupons left.".into())
            }
            UseCaseError::CooldownActive { remaining_secs } => {
                Self::CooldownActive(remaining_secs)
            }
        }
    }
}

impl From<anyhow::Error> for UseCaseError {
    fn from(_: anyhow::Error) -> Self {
        UseCaseError::StorageError
    }
}

const MAX_ATTEMPTS: usize = 3;

#[async_trait::async_trait(?Send)]
impl UseCase for CreateBookingUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateBooking";

    async fn execute(&mut self, ctx: &CouponContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let timeouts = &ctx.config.booking_timeouts;

        if ctx.repos.user_repo.find(&self.user_id).await?.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }
        let promotion = ctx
            .repos
            .promotion_repo
            .find(&self.promotion_id)
            .await?
            .ok_or_else(|| UseCaseError::PromotionNotFound(self.promotion_id.clone()))?;
        promotion.check_availability(now).map_err(|e| match e {
            RedemptionRejection::InvalidState(reason) => UseCaseError::PromotionUnavailable(reason),
            // Availability is only ever rejected on state or stock
            _ => UseCaseError::OutOfStock,
        })?;

        // Another request might change the booking for this pair between the
        // lookup and the write, in that case the lookup is done once more
        for _ in 0..MAX_ATTEMPTS {
            let stored = ctx
                .repos
                .booking_repo
                .find_by_user_and_promotion(&self.user_id, &self.promotion_id)
                .await?;
            let effective = match stored {
                Some(booking) => {
                    let effective = booking.effective(now, timeouts);
                    if effective != booking
                        && !ctx
                            .repos
                            .booking_repo
                            .save_if_unchanged(&effective, &booking)
                            .await?
                    {
                        continue;
                    }
                    Some(effective)
                }
                None => None,
            };

            let reservation = Booking::reserve(
                effective.clone(),
                self.user_id.clone(),
                self.promotion_id.clone(),
                self.limit_use_date,
                now,
                timeouts,
            )
            .map_err(|cooldown| UseCaseError::CooldownActive {
                remaining_secs: cooldown.remaining_seconds(),
            })?;

            match (reservation, effective) {
                (Reservation::Existing(booking), _) => {
                    return Ok(UseCaseRes {
                        booking,
                        created: false,
                    })
                }
                (Reservation::Reopened(booking), Some(previous)) => {
                    if ctx
                        .repos
                        .booking_repo
                        .save_if_unchanged(&booking, &previous)
                        .await?
                    {
                        return Ok(UseCaseRes {
                            booking,
                            created: true,
                        });
                    }
                }
                (Reservation::Reopened(_), None) => {}
                (Reservation::Created(booking), _) => {
                    if ctx.repos.booking_repo.insert_if_absent(&booking).await? {
                        return Ok(UseCaseRes {
                            booking,
                            created: true,
                        });
                    }
                }
            }
        }

        Err(UseCaseError::StorageError)
    }
}
