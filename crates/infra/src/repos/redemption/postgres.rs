use super::IRedemptionRepo;
use crate::repos::promotion::{PromotionRaw, PROMOTION_COLUMNS};
use coupon_ledger_domain::{
    Promotion, RedeemedCoupon, RedemptionAttempt, RedemptionHistory, RedemptionOutcome,
    RedemptionRejection, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresRedemptionRepo {
    pool: PgPool,
}

impl PostgresRedemptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RedeemedCouponRaw {
    coupon_uid: Uuid,
    user_uid: Uuid,
    promotion_uid: Uuid,
    branch_uid: Uuid,
    nonce: Option<String>,
    used_at: i64,
}

impl From<RedeemedCouponRaw> for RedeemedCoupon {
    fn from(raw: RedeemedCouponRaw) -> Self {
        Self {
            id: raw.coupon_uid.into(),
            user_id: raw.user_uid.into(),
            promotion_id: raw.promotion_uid.into(),
            branch_id: raw.branch_uid.into(),
            nonce: raw.nonce,
            used_at: raw.used_at,
        }
    }
}

#[async_trait::async_trait]
impl IRedemptionRepo for PostgresRedemptionRepo {
    async fn redeem(&self, attempt: &RedemptionAttempt) -> anyhow::Result<RedemptionOutcome> {
        let coupon = &attempt.coupon;
        let mut tx = self.pool.begin().await?;

        // Row lock serializes all redemptions of this promotion until commit
        let promotion: Option<PromotionRaw> = sqlx::query_as(&format!(
            "SELECT {} FROM promotions AS p WHERE p.promotion_uid = $1 FOR UPDATE",
            PROMOTION_COLUMNS
        ))
        .bind(coupon.promotion_id.inner_ref())
        .fetch_optional(&mut *tx)
        .await?;
        let promotion = match promotion {
            Some(raw) => Promotion::try_from(raw)?,
            None => {
                tx.rollback().await?;
                return Ok(RedemptionOutcome::Rejected(RedemptionRejection::NotFound(
                    coupon.promotion_id.clone(),
                )));
            }
        };

        let nonce_already_used = match &coupon.nonce {
            Some(nonce) => {
                sqlx::query_scalar::<_, bool>(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM redeemed_coupons AS c
                        WHERE c.promotion_uid = $1 AND c.nonce = $2
                    )
                    "#,
                )
                .bind(coupon.promotion_id.inner_ref())
                .bind(nonce)
                .fetch_one(&mut *tx)
                .await?
            }
            None => false,
        };

        let (user_redemptions, user_redemptions_today): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE c.used_at >= $3)
            FROM redeemed_coupons AS c
            WHERE c.promotion_uid = $1 AND c.user_uid = $2
            "#,
        )
        .bind(coupon.promotion_id.inner_ref())
        .bind(coupon.user_id.inner_ref())
        .bind(attempt.day_start)
        .fetch_one(&mut *tx)
        .await?;

        let history = RedemptionHistory {
            nonce_already_used,
            user_redemptions,
            user_redemptions_today,
        };
        if let Err(rejection) = promotion.admit_redemption(coupon.used_at, &history) {
            tx.rollback().await?;
            return Ok(RedemptionOutcome::Rejected(rejection));
        }

        if promotion.available_stock.is_some() {
            let updated = sqlx::query(
                r#"
                UPDATE promotions SET available_stock = available_stock - 1
                WHERE promotion_uid = $1 AND available_stock > 0
                "#,
            )
            .bind(coupon.promotion_id.inner_ref())
            .execute(&mut *tx)
            .await?;
            if updated.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(RedemptionOutcome::Rejected(RedemptionRejection::OutOfStock));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO redeemed_coupons(coupon_uid, user_uid, promotion_uid, branch_uid, nonce, used_at)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(coupon.id.inner_ref())
        .bind(coupon.user_id.inner_ref())
        .bind(coupon.promotion_id.inner_ref())
        .bind(coupon.branch_id.inner_ref())
        .bind(&coupon.nonce)
        .bind(coupon.used_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RedemptionOutcome::Redeemed(coupon.clone()))
    }

    async fn find_by_promotion(&self, promotion_id: &ID) -> anyhow::Result<Vec<RedeemedCoupon>> {
        let coupons: Vec<RedeemedCouponRaw> = sqlx::query_as(
            r#"
            SELECT * FROM redeemed_coupons AS c
            WHERE c.promotion_uid = $1
            ORDER BY c.used_at ASC
            "#,
        )
        .bind(promotion_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(coupons.into_iter().map(|c| c.into()).collect())
    }
}
