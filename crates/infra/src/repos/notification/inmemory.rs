use super::INotificationRepo;
use crate::repos::shared::inmemory_repo::*;
use coupon_ledger_domain::{Alert, RecipientType, SegmentCriteria, ID};

pub struct InMemoryNotificationRepo {
    alerts: std::sync::Mutex<Vec<Alert>>,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self {
            alerts: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl INotificationRepo for InMemoryNotificationRepo {
    async fn find_by_criteria(
        &self,
        title: &str,
        recipient_type: RecipientType,
        recipient_id: &ID,
        criteria: &SegmentCriteria,
    ) -> anyhow::Result<Option<Alert>> {
        let alerts = find_by(&self.alerts, |a| {
            a.title == title
                && a.recipient_type == recipient_type
                && a.recipient_id == *recipient_id
                && a.segment_criteria == *criteria
        });
        Ok(alerts.into_iter().next())
    }

    async fn insert_if_absent(&self, alert: &Alert) -> anyhow::Result<bool> {
        let mut alerts = lock(&self.alerts);
        if alerts.iter().any(|a| a.is_duplicate_of(alert)) {
            return Ok(false);
        }
        alerts.push(alert.clone());
        Ok(true)
    }

    async fn find_by_recipient(
        &self,
        recipient_type: RecipientType,
        recipient_id: &ID,
    ) -> anyhow::Result<Vec<Alert>> {
        Ok(find_by(&self.alerts, |a| {
            a.recipient_type == recipient_type && a.recipient_id == *recipient_id
        }))
    }
}
