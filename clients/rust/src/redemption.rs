use crate::base::{APIResponse, BaseClient};
use coupon_ledger_api_structs::*;
use coupon_ledger_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct RedemptionClient {
    base: Arc<BaseClient>,
}

pub struct RedeemInput {
    pub user_id: ID,
    pub promotion_id: ID,
    pub branch_id: ID,
    pub nonce: Option<String>,
}

impl RedemptionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn redeem(&self, input: RedeemInput) -> APIResponse<redeem::APIResponse> {
        let body = redeem::RequestBody {
            user_id: input.user_id,
            branch_id: input.branch_id,
            nonce: input.nonce,
        };
        self.base
            .post(
                body,
                format!("promotions/{}/redemptions", input.promotion_id),
                &[StatusCode::CREATED],
            )
            .await
    }
}
