use super::INotificationRepo;
use coupon_ledger_domain::{
    Alert, NotificationStatus, NotificationType, RecipientType, SegmentCriteria, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AlertRaw {
    notification_uid: Uuid,
    title: String,
    message: String,
    notification_type: String,
    recipient_type: String,
    recipient_uid: Uuid,
    status: String,
    criteria_kind: String,
    criteria_uid: Uuid,
    promotion_uid: Option<Uuid>,
    created: i64,
}

impl TryFrom<AlertRaw> for Alert {
    type Error = anyhow::Error;

    fn try_from(raw: AlertRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.notification_uid.into(),
            title: raw.title,
            message: raw.message,
            notification_type: raw.notification_type.parse::<NotificationType>()?,
            recipient_type: raw.recipient_type.parse::<RecipientType>()?,
            recipient_id: raw.recipient_uid.into(),
            status: raw.status.parse::<NotificationStatus>()?,
            segment_criteria: SegmentCriteria {
                kind: raw.criteria_kind,
                id: raw.criteria_uid.into(),
            },
            promotion_id: raw.promotion_uid.map(|id| id.into()),
            created: raw.created,
        })
    }
}

#[async_trait::async_trait]
impl INotificationRepo for PostgresNotificationRepo {
    async fn find_by_criteria(
        &self,
        title: &str,
        recipient_type: RecipientType,
        recipient_id: &ID,
        criteria: &SegmentCriteria,
    ) -> anyhow::Result<Option<Alert>> {
        let alert: Option<AlertRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.title = $1 AND
            n.recipient_type = $2 AND
            n.recipient_uid = $3 AND
            n.criteria_kind = $4 AND
            n.criteria_uid = $5
            "#,
        )
        .bind(title)
        .bind(recipient_type.as_str())
        .bind(recipient_id.inner_ref())
        .bind(&criteria.kind)
        .bind(criteria.id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        alert.map(Alert::try_from).transpose()
    }

    async fn insert_if_absent(&self, alert: &Alert) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO notifications(notification_uid, title, message, notification_type,
                recipient_type, recipient_uid, status, criteria_kind, criteria_uid,
                promotion_uid, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (title, recipient_type, recipient_uid, criteria_kind, criteria_uid)
            DO NOTHING
            "#,
        )
        .bind(alert.id.inner_ref())
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(alert.notification_type.as_str())
        .bind(alert.recipient_type.as_str())
        .bind(alert.recipient_id.inner_ref())
        .bind(alert.status.as_str())
        .bind(&alert.segment_criteria.kind)
        .bind(alert.segment_criteria.id.inner_ref())
        .bind(alert.promotion_id.as_ref().map(|id| *id.inner_ref()))
        .bind(alert.created)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn find_by_recipient(
        &self,
        recipient_type: RecipientType,
        recipient_id: &ID,
    ) -> anyhow::Result<Vec<Alert>> {
        let alerts: Vec<AlertRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.recipient_type = $1 AND n.recipient_uid = $2
            ORDER BY n.created ASC
            "#,
        )
        .bind(recipient_type.as_str())
        .bind(recipient_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        alerts.into_iter().map(Alert::try_from).collect()
    }
}
