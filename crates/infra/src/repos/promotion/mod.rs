mod inmemory;
mod postgres;

use crate::repos::Scan;
use coupon_ledger_domain::{Promotion, ID};
pub use inmemory::InMemoryPromotionRepo;
pub use postgres::PostgresPromotionRepo;
pub(crate) use postgres::{PromotionRaw, PROMOTION_COLUMNS};

/// `Promotion`s are owned by the collaborator dashboard. The stock is only
/// ever decremented through `IRedemptionRepo::redeem`.
#[async_trait::async_trait]
pub trait IPromotionRepo: Send + Sync {
    async fn insert(&self, promotion: &Promotion) -> anyhow::Result<()>;
    async fn find(&self, promotion_id: &ID) -> anyhow::Result<Option<Promotion>>;
    /// Active `Promotion`s ending at or before `until`
    async fn find_ending_until(&self, until: i64) -> anyhow::Result<Scan<Promotion>>;
}
