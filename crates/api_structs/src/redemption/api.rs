use crate::dtos::RedeemedCouponDTO;
use coupon_ledger_domain::{RedeemedCoupon, ID};
use serde::{Deserialize, Serialize};

pub mod redeem {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub promotion_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        pub branch_id: ID,
        #[serde(default)]
        pub nonce: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub coupon: RedeemedCouponDTO,
    }

    impl APIResponse {
        pub fn new(coupon: RedeemedCoupon) -> Self {
            Self {
                coupon: RedeemedCouponDTO::new(coupon),
            }
        }
    }
}
