use crate::base::{APIResponse, BaseClient};
use coupon_ledger_api_structs::*;
use coupon_ledger_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct BookingClient {
    base: Arc<BaseClient>,
}

pub struct CreateBookingInput {
    pub user_id: ID,
    pub promotion_id: ID,
    pub limit_use_date: Option<i64>,
}

impl BookingClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Succeeds with `200` if a pending booking already existed and `201` otherwise
    pub async fn create(
        &self,
        input: CreateBookingInput,
    ) -> APIResponse<create_booking::APIResponse> {
        let body = create_booking::RequestBody {
            user_id: input.user_id,
            promotion_id: input.promotion_id,
            limit_use_date: input.limit_use_date,
        };
        self.base
            .post(
                body,
                "bookings".into(),
                &[StatusCode::CREATED, StatusCode::OK],
            )
            .await
    }

    pub async fn get(&self, booking_id: ID) -> APIResponse<get_booking::APIResponse> {
        self.base
            .get(format!("bookings/{}", booking_id), &[StatusCode::OK])
            .await
    }

    pub async fn cancel(&self, booking_id: ID) -> APIResponse<cancel_booking::APIResponse> {
        self.base
            .post(
                (),
                format!("bookings/{}/cancel", booking_id),
                &[StatusCode::OK],
            )
            .await
    }
}
