//! Partnership notification: one broker's lead matches another broker's property

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnershipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl PartnershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnershipStatus::Pending => "PENDING",
            PartnershipStatus::Accepted => "ACCEPTED",
            PartnershipStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PartnershipStatus::Pending),
            "ACCEPTED" => Some(PartnershipStatus::Accepted),
            "REJECTED" => Some(PartnershipStatus::Rejected),
            _ => None,
        }
    }
}

impl Default for PartnershipStatus {
    fn default() -> Self {
        PartnershipStatus::Pending
    }
}

/// Unique per (lead, property, from_user, to_user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnershipNotification {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub property_id: Uuid,
    /// Broker who owns the lead.
    pub from_user_id: Uuid,
    /// Broker who owns the property.
    pub to_user_id: Uuid,
    pub status: PartnershipStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl PartnershipNotification {
    pub fn new(lead_id: Uuid, property_id: Uuid, from_user_id: Uuid, to_user_id: Uuid, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            lead_id,
            property_id,
            from_user_id,
            to_user_id,
            status: PartnershipStatus::Pending,
            message,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    pub fn respond(&mut self, accept: bool) {
        self.status = if accept {
            PartnershipStatus::Accepted
        } else {
            PartnershipStatus::Rejected
        };
        self.responded_at = Some(Utc::now());
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }
}
