use coupon_ledger_domain::{RedeemedCoupon, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedeemedCouponDTO {
    pub id: ID,
    pub user_id: ID,
    pub promotion_id: ID,
    pub branch_id: ID,
    pub nonce: Option<String>,
    pub used_at: i64,
}

impl RedeemedCouponDTO {
    pub fn new(coupon: RedeemedCoupon) -> Self {
        Self {
            id: coupon.id,
            user_id: coupon.user_id,
            promotion_id: coupon.promotion_id,
            branch_id: coupon.branch_id,
            nonce: coupon.nonce,
            used_at: coupon.used_at,
        }
    }
}
