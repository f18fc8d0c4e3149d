use super::IRedemptionRepo;
use crate::repos::{promotion::InMemoryPromotionRepo, shared::inmemory_repo::*};
use coupon_ledger_domain::{
    RedeemedCoupon, RedemptionAttempt, RedemptionHistory, RedemptionOutcome,
    RedemptionRejection, ID,
};
use std::sync::{Arc, Mutex};

pub struct InMemoryRedemptionRepo {
    promotions: Arc<InMemoryPromotionRepo>,
    coupons: Mutex<Vec<RedeemedCoupon>>,
}

impl InMemoryRedemptionRepo {
    pub fn new(promotions: Arc<InMemoryPromotionRepo>) -> Self {
        Self {
            promotions,
            coupons: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IRedemptionRepo for InMemoryRedemptionRepo {
    async fn redeem(&self, attempt: &RedemptionAttempt) -> anyhow::Result<RedemptionOutcome> {
        let coupon = &attempt.coupon;
        // Always promotions before coupons
        let mut promotions = lock(self.promotions.promotions());
        let mut coupons = lock(&self.coupons);

        let promotion = match promotions
            .iter_mut()
            .find(|p| p.id == coupon.promotion_id)
        {
            Some(promotion) => promotion,
            None => {
                return Ok(RedemptionOutcome::Rejected(RedemptionRejection::NotFound(
                    coupon.promotion_id.clone(),
                )))
            }
        };

        let mut history = RedemptionHistory::default();
        for redeemed in coupons.iter().filter(|c| c.promotion_id == coupon.promotion_id) {
            if coupon.nonce.is_some() && redeemed.nonce == coupon.nonce {
                history.nonce_already_used = true;
            }
            if redeemed.user_id == coupon.user_id {
                history.user_redemptions += 1;
                if redeemed.used_at >= attempt.day_start {
                    history.user_redemptions_today += 1;
                }
            }
        }

        if let Err(rejection) = promotion.admit_redemption(coupon.used_at, &history) {
            return Ok(RedemptionOutcome::Rejected(rejection));
        }
        if !promotion.take_one() {
            return Ok(RedemptionOutcome::Rejected(RedemptionRejection::OutOfStock));
        }
        coupons.push(coupon.clone());

        Ok(RedemptionOutcome::Redeemed(coupon.clone()))
    }

    async fn find_by_promotion(&self, promotion_id: &ID) -> anyhow::Result<Vec<RedeemedCoupon>> {
        Ok(find_by(&self.coupons, |c| c.promotion_id == *promotion_id))
    }
}
