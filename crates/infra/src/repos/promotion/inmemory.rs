use super::IPromotionRepo;
use crate::repos::{shared::inmemory_repo::*, Scan};
use coupon_ledger_domain::{Promotion, PromotionState, ID};
use std::sync::Mutex;

pub struct InMemoryPromotionRepo {
    promotions: Mutex<Vec<Promotion>>,
}

impl InMemoryPromotionRepo {
    pub fn new() -> Self {
        Self {
            promotions: Mutex::new(vec![]),
        }
    }

    /// The redemption repo needs to hold this lock while it checks and
    /// decrements the stock
    pub(crate) fn promotions(&self) -> &Mutex<Vec<Promotion>> {
        &self.promotions
    }
}

#[async_trait::async_trait]
impl IPromotionRepo for InMemoryPromotionRepo {
    async fn insert(&self, promotion: &Promotion) -> anyhow::Result<()> {
        insert(promotion, &self.promotions);
        Ok(())
    }

    async fn find(&self, promotion_id: &ID) -> anyhow::Result<Option<Promotion>> {
        Ok(find(promotion_id, &self.promotions))
    }

    async fn find_ending_until(&self, until: i64) -> anyhow::Result<Scan<Promotion>> {
        let mut promotions = find_by(&self.promotions, |p| {
            p.state == PromotionState::Active && p.end_ts <= until
        });
        promotions.sort_by_key(|p| p.end_ts);
        Ok(Scan::new(promotions))
    }
}
