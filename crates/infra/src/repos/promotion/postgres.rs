use super::IPromotionRepo;
use crate::repos::Scan;
use coupon_ledger_domain::{Promotion, PromotionState, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresPromotionRepo {
    pool: PgPool,
}

impl PostgresPromotionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PromotionRaw {
    promotion_uid: Uuid,
    collaborator_uid: Uuid,
    title: String,
    total_stock: Option<i64>,
    available_stock: Option<i64>,
    limit_per_user: Option<i64>,
    daily_limit_per_user: Option<i64>,
    start_ts: i64,
    end_ts: i64,
    state: String,
}

impl TryFrom<PromotionRaw> for Promotion {
    type Error = anyhow::Error;

    fn try_from(raw: PromotionRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.promotion_uid.into(),
            collaborator_id: raw.collaborator_uid.into(),
            title: raw.title,
            total_stock: raw.total_stock,
            available_stock: raw.available_stock,
            limit_per_user: raw.limit_per_user,
            daily_limit_per_user: raw.daily_limit_per_user,
            start_ts: raw.start_ts,
            end_ts: raw.end_ts,
            state: raw.state.parse::<PromotionState>()?,
        })
    }
}

pub(crate) const PROMOTION_COLUMNS: &str = "promotion_uid, collaborator_uid, title, total_stock, \
    available_stock, limit_per_user, daily_limit_per_user, start_ts, end_ts, state";

#[async_trait::async_trait]
impl IPromotionRepo for PostgresPromotionRepo {
    async fn insert(&self, promotion: &Promotion) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO promotions(promotion_uid, collaborator_uid, title, total_stock,
                available_stock, limit_per_user, daily_limit_per_user, start_ts, end_ts, state)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(promotion.id.inner_ref())
        .bind(promotion.collaborator_id.inner_ref())
        .bind(&promotion.title)
        .bind(promotion.total_stock)
        .bind(promotion.available_stock)
        .bind(promotion.limit_per_user)
        .bind(promotion.daily_limit_per_user)
        .bind(promotion.start_ts)
        .bind(promotion.end_ts)
        .bind(promotion.state.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, promotion_id: &ID) -> anyhow::Result<Option<Promotion>> {
        let promotion: Option<PromotionRaw> = sqlx::query_as(&format!(
            "SELECT {} FROM promotions AS p WHERE p.promotion_uid = $1",
            PROMOTION_COLUMNS
        ))
        .bind(promotion_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        promotion.map(Promotion::try_from).transpose()
    }

    async fn find_ending_until(&self, until: i64) -> anyhow::Result<Scan<Promotion>> {
        let promotions: Vec<PromotionRaw> = sqlx::query_as(&format!(
            "SELECT {} FROM promotions AS p \
             WHERE p.state = 'active' AND p.end_ts <= $1 \
             ORDER BY p.end_ts ASC",
            PROMOTION_COLUMNS
        ))
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(Scan::from_rows(promotions))
    }
}
