use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const PROMOTION_EXPIRING: &str = "promotion-expiring";
pub const BOOKING_EXPIRING: &str = "booking-expiring";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationStatus {
    /// Waiting to be delivered by the notification service
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    User,
    Collaborator,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "ALERT",
        }
    }
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
        }
    }
}

impl RecipientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Collaborator => "collaborator",
        }
    }
}

#[derive(Error, Debug)]
#[error("Notification value: {0} is not valid")]
pub struct InvalidNotificationValueError(String);

impl FromStr for NotificationType {
    type Err = InvalidNotificationValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALERT" => Ok(Self::Alert),
            _ => Err(InvalidNotificationValueError(s.to_string())),
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = InvalidNotificationValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            _ => Err(InvalidNotificationValueError(s.to_string())),
        }
    }
}

impl FromStr for RecipientType {
    type Err = InvalidNotificationValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "collaborator" => Ok(Self::Collaborator),
            _ => Err(InvalidNotificationValueError(s.to_string())),
        }
    }
}

/// Identifies the entity and the reason that triggered an `Alert`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentCriteria {
    pub kind: String,
    pub id: ID,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: ID,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub recipient_type: RecipientType,
    pub recipient_id: ID,
    pub status: NotificationStatus,
    pub segment_criteria: SegmentCriteria,
    pub promotion_id: Option<ID>,
    pub created: i64,
}

impl Alert {
    /// There must never be more than one `Alert` with the same title,
    /// recipient and criteria
    pub fn is_duplicate_of(&self, other: &Alert) -> bool {
        self.title == other.title
            && self.recipient_type == other.recipient_type
            && self.recipient_id == other.recipient_id
            && self.segment_criteria == other.segment_criteria
    }
}

impl Entity for Alert {
    fn id(&self) -> &ID {
        &self.id
    }
}
