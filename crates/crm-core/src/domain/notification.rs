//! In-app notification domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    LeadMatch,
    Partnership,
    /// Accept/reject answer sent back to the proposing broker.
    PartnershipResponse,
    PaymentDue,
    PaymentOverdue,
    ContractExpiring,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LeadMatch => "LEAD_MATCH",
            NotificationKind::Partnership => "PARTNERSHIP",
            NotificationKind::PartnershipResponse => "PARTNERSHIP_RESPONSE",
            NotificationKind::PaymentDue => "PAYMENT_DUE",
            NotificationKind::PaymentOverdue => "PAYMENT_OVERDUE",
            NotificationKind::ContractExpiring => "CONTRACT_EXPIRING",
            NotificationKind::System => "SYSTEM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LEAD_MATCH" => Some(NotificationKind::LeadMatch),
            "PARTNERSHIP" => Some(NotificationKind::Partnership),
            "PARTNERSHIP_RESPONSE" => Some(NotificationKind::PartnershipResponse),
            "PAYMENT_DUE" => Some(NotificationKind::PaymentDue),
            "PAYMENT_OVERDUE" => Some(NotificationKind::PaymentOverdue),
            "CONTRACT_EXPIRING" => Some(NotificationKind::ContractExpiring),
            "SYSTEM" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::System
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub lead_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be sent.
///
/// Two notifications are duplicates when recipient, kind and every related
/// record id are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub lead_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
}

impl NewNotification {
    pub fn new(
        company_id: Uuid,
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            company_id,
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            lead_id: None,
            property_id: None,
            contract_id: None,
            payment_id: None,
        }
    }

    pub fn lead(mut self, lead_id: Uuid) -> Self {
        self.lead_id = Some(lead_id);
        self
    }

    pub fn property(mut self, property_id: Uuid) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn contract(mut self, contract_id: Uuid) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn payment(mut self, payment_id: Uuid) -> Self {
        self.payment_id = Some(payment_id);
        self
    }

    pub fn into_notification(self) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            lead_id: self.lead_id,
            property_id: self.property_id,
            contract_id: self.contract_id,
            payment_id: self.payment_id,
            read_at: None,
            created_at: Utc::now(),
        }
    }
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
