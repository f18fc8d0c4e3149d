mod webhook;

use coupon_ledger_domain::Alert;
use tracing::info;
pub use webhook::WebhookNotificationSink;

/// Delivery of `Alert`s to their recipients (push, email ..) happens outside
/// of this service. A sink hands a freshly created `Alert` over to it.
#[async_trait::async_trait]
pub trait INotificationSink: Send + Sync {
    async fn enqueue(&self, alert: &Alert) -> anyhow::Result<()>;
}

/// Sink used when no delivery service is configured
pub struct LogNotificationSink;

#[async_trait::async_trait]
impl INotificationSink for LogNotificationSink {
    async fn enqueue(&self, alert: &Alert) -> anyhow::Result<()> {
        info!(
            alert_id = %alert.id,
            recipient_id = %alert.recipient_id,
            kind = %alert.segment_criteria.kind,
            "Alert created: {}",
            alert.title
        );
        Ok(())
    }
}
