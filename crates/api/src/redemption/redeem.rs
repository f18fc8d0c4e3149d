use crate::error::CouponError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use coupon_ledger_api_structs::redeem::*;
use coupon_ledger_domain::{
    date::start_of_local_day, RedeemedCoupon, RedemptionAttempt, RedemptionOutcome,
    RedemptionRejection, Unavailability, ID,
};
use coupon_ledger_infra::CouponContext;

pub async fn redeem_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<CouponContext>,
) -> Result<HttpResponse, CouponError> {
    let body = body.0;
    let usecase = RedeemUseCase {
        user_id: body.user_id,
        promotion_id: path.promotion_id.clone(),
        branch_id: body.branch_id,
        nonce: body.nonce,
    };

    execute(usecase, &ctx)
        .await
        .map(|coupon| HttpResponse::Created().json(APIResponse::new(coupon)))
        .map_err(CouponError::from)
}

#[derive(Debug)]
pub struct RedeemUseCase {
    pub user_id: ID,
    pub promotion_id: ID,
    pub branch_id: ID,
    pub nonce: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    InvalidNonce,
    UserNotFound(ID),
    BranchNotFound(ID),
    PromotionNotFound(ID),
    PromotionUnavailable(Unavailability),
    OutOfStock,
    ReplayDetected,
    UserLimitExceeded(i64),
    DailyLimitExceeded(i64),
}

impl From<RedemptionRejection> for UseCaseError {
    fn from(rejection: RedemptionRejection) -> Self {
        match rejection {
            RedemptionRejection::NotFound(id) => Self::PromotionNotFound(id),
            RedemptionRejection::InvalidState(reason) => Self::PromotionUnavailable(reason),
            RedemptionRejection::OutOfStock => Self::OutOfStock,
            RedemptionRejection::ReplayDetected => Self::ReplayDetected,
            RedemptionRejection::UserLimitExceeded(limit) => Self::UserLimitExceeded(limit),
            RedemptionRejection::DailyLimitExceeded(limit) => Self::DailyLimitExceeded(limit),
        }
    }
}

impl From<UseCaseError> for CouponError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::InvalidNonce => {
                Self::BadClientData("The nonce can not be blank when provided.".into())
            }
            UseCaseError::UserNotFound(id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", id))
            }
            UseCaseError::BranchNotFound(id) => {
                Self::NotFound(format!("The branch with id: {}, was not found.", id))
            }
            UseCaseError::PromotionNotFound(id) => {
                Self::NotFound(format!("The promotion with id: {}, was not found.", id))
            }
            UseCaseError::PromotionUnavailable(reason) => {
                Self::Conflict(format!("The promotion {}.", reason))
            }
            UseCaseError::OutOfStock => {
                Self::Conflict("The promotion has no coupons left.".into())
            }
            UseCaseError::ReplayDetected => {
                Self::Conflict("This coupon has already been redeemed.".into())
            }
            UseCaseError::UserLimitExceeded(limit) => Self::Conflict(format!(
                "The user has reached the limit of {} redemptions for this promotion.",
                limit
            )),
            UseCaseError::DailyLimitExceeded(limit) => Self::Conflict(format!(
                "The user has reached the limit of {} redemptions for this promotion today.",
                limit
            )),
        }
    }
}

impl From<anyhow::Error> for UseCaseError {
    fn from(_: anyhow::Error) -> Self {
        UseCaseError::StorageError
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RedeemUseCase {
    type Response = RedeemedCoupon;
    type Error = UseCaseError;

    const NAME: &'static str = "Redeem";

    async fn execute(&mut self, ctx: &CouponContext) -> Result<Self::Response, Self::Error> {
        if let Some(nonce) = &self.nonce {
            if nonce.trim().is_empty() {
                return Err(UseCaseError::InvalidNonce);
            }
        }
        if ctx.repos.user_repo.find(&self.user_id).await?.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }
        if ctx
            .repos
            .collaborator_repo
            .find_branch(&self.branch_id)
            .await?
            .is_none()
        {
            return Err(UseCaseError::BranchNotFound(self.branch_id.clone()));
        }

        let now = ctx.sys.get_timestamp_millis();
        let attempt = RedemptionAttempt {
            coupon: RedeemedCoupon::new(
                self.user_id.clone(),
                self.promotion_id.clone(),
                self.branch_id.clone(),
                self.nonce.clone(),
                now,
            ),
            day_start: start_of_local_day(now, &ctx.config.timezone),
        };

        match ctx.repos.redemption_repo.redeem(&attempt).await? {
            RedemptionOutcome::Redeemed(coupon) => Ok(coupon),
            RedemptionOutcome::Rejected(rejection) => Err(rejection.into()),
        }
    }
}
