mod inmemory;
mod postgres;

use coupon_ledger_domain::{RedeemedCoupon, RedemptionAttempt, RedemptionOutcome, ID};
pub use inmemory::InMemoryRedemptionRepo;
pub use postgres::PostgresRedemptionRepo;

#[async_trait::async_trait]
pub trait IRedemptionRepo: Send + Sync {
    /// Atomically runs every redemption check against the locked `Promotion`,
    /// decrements its stock and records the `RedeemedCoupon`. Concurrent calls
    /// for the same `Promotion` are serialized, a rejected attempt changes nothing.
    async fn redeem(&self, attempt: &RedemptionAttempt) -> anyhow::Result<RedemptionOutcome>;
    async fn find_by_promotion(&self, promotion_id: &ID) -> anyhow::Result<Vec<RedeemedCoupon>>;
}

#[cfg(test)]
mod tests {
    use crate::repos::Repos;
    use coupon_ledger_domain::{
        Promotion, RedeemedCoupon, RedemptionAttempt, RedemptionOutcome, RedemptionRejection, ID,
    };

    const NOW: i64 = 1613862000000;
    const HOUR: i64 = 1000 * 60 * 60;

    fn attempt(promotion: &Promotion, user_id: &ID, nonce: Option<&str>) -> RedemptionAttempt {
        RedemptionAttempt {
            coupon: RedeemedCoupon::new(
                user_id.clone(),
                promotion.id.clone(),
                ID::default(),
                nonce.map(|n| n.to_string()),
                NOW,
            ),
            day_start: NOW - HOUR,
        }
    }

    async fn insert_promotion(repos: &Repos, promotion: Promotion) -> Promotion {
        repos
            .promotion_repo
            .insert(&promotion)
            .await
            .expect("To insert promotion");
        promotion
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_redemptions_never_oversell() {
        let repos = Repos::create_inmemory();
        let promotion = insert_promotion(
            &repos,
            Promotion::new(ID::default(), "2x1", NOW - HOUR, NOW + HOUR).with_stock(10),
        )
        .await;

        let handles = (0..50)
            .map(|i| {
                let repos = repos.clone();
                let nonce = format!("nonce-{}", i);
                let redemption = attempt(&promotion, &ID::default(), Some(nonce.as_str()));
                tokio::spawn(async move { repos.redemption_repo.redeem(&redemption).await })
            })
            .collect::<Vec<_>>();

        let mut redeemed = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                RedemptionOutcome::Redeemed(_) => redeemed += 1,
                RedemptionOutcome::Rejected(RedemptionRejection::OutOfStock) => out_of_stock += 1,
                other => panic!("Unexpected outcome: {:?}", other),
            }
        }
        assert_eq!(redeemed, 10);
        assert_eq!(out_of_stock, 40);

        let promotion = repos
            .promotion_repo
            .find(&promotion.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promotion.available_stock, Some(0));
        let coupons = repos
            .redemption_repo
            .find_by_promotion(&promotion.id)
            .await
            .unwrap();
        assert_eq!(coupons.len(), 10);
    }

    #[tokio::test]
    async fn rejects_replayed_nonce_without_touching_stock() {
        let repos = Repos::create_inmemory();
        let promotion = insert_promotion(
            &repos,
            Promotion::new(ID::default(), "2x1", NOW - HOUR, NOW + HOUR).with_stock(5),
        )
        .await;
        let user_id = ID::default();

        let first = repos
            .redemption_repo
            .redeem(&attempt(&promotion, &user_id, Some("abc")))
            .await
            .unwrap();
        assert!(matches!(first, RedemptionOutcome::Redeemed(_)));

        let replay = repos
            .redemption_repo
            .redeem(&attempt(&promotion, &ID::default(), Some("abc")))
            .await
            .unwrap();
        assert_eq!(
            replay,
            RedemptionOutcome::Rejected(RedemptionRejection::ReplayDetected)
        );

        let promotion = repos
            .promotion_repo
            .find(&promotion.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promotion.available_stock, Some(4));
    }

    #[tokio::test]
    async fn enforces_user_limits() {
        let repos = Repos::create_inmemory();
        let promotion = insert_promotion(
            &repos,
            Promotion::new(ID::default(), "2x1", NOW - 3 * HOUR, NOW + HOUR)
                .with_limits(Some(3), Some(1)),
        )
        .await;
        let user_id = ID::default();

        let mut earlier = attempt(&promotion, &user_id, None);
        earlier.coupon.used_at = NOW - 2 * HOUR;
        assert!(matches!(
            repos.redemption_repo.redeem(&earlier).await.unwrap(),
            RedemptionOutcome::Redeemed(_)
        ));
        assert!(matches!(
            repos
                .redemption_repo
                .redeem(&attempt(&promotion, &user_id, None))
                .await
                .unwrap(),
            RedemptionOutcome::Redeemed(_)
        ));
        assert_eq!(
            repos
                .redemption_repo
                .redeem(&attempt(&promotion, &user_id, None))
                .await
                .unwrap(),
            RedemptionOutcome::Rejected(RedemptionRejection::DailyLimitExceeded(1))
        );
    }

    #[tokio::test]
    async fn rejects_unknown_promotion() {
        let repos = Repos::create_inmemory();
        let promotion = Promotion::new(ID::default(), "2x1", NOW - HOUR, NOW + HOUR);

        assert_eq!(
            repos
                .redemption_repo
                .redeem(&attempt(&promotion, &ID::default(), None))
                .await
                .unwrap(),
            RedemptionOutcome::Rejected(RedemptionRejection::NotFound(promotion.id.clone()))
        );
    }
}
