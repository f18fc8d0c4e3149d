mod inmemory;
mod postgres;

use coupon_ledger_domain::{Alert, RecipientType, SegmentCriteria, ID};
pub use inmemory::InMemoryNotificationRepo;
pub use postgres::PostgresNotificationRepo;

#[async_trait::async_trait]
pub trait INotificationRepo: Send + Sync {
    async fn find_by_criteria(
        &self,
        title: &str,
        recipient_type: RecipientType,
        recipient_id: &ID,
        criteria: &SegmentCriteria,
    ) -> anyhow::Result<Option<Alert>>;
    /// Stores the `Alert` unless a duplicate of it already exists.
    /// Returns false if nothing was stored.
    async fn insert_if_absent(&self, alert: &Alert) -> anyhow::Result<bool>;
    async fn find_by_recipient(
        &self,
        recipient_type: RecipientType,
        recipient_id: &ID,
    ) -> anyhow::Result<Vec<Alert>>;
}
