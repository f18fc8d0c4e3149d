use super::INotificationSink;
use coupon_ledger_domain::Alert;
use reqwest::Client;

/// Posts every `Alert` as json to the notification service
pub struct WebhookNotificationSink {
    client: Client,
    url: String,
}

impl WebhookNotificationSink {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl INotificationSink for WebhookNotificationSink {
    async fn enqueue(&self, alert: &Alert) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(alert)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
