// ============================================================================
// CRM Core - Contract Entity
// File: crates/crm-core/src/domain/contract.rs
// Description: Lease contract and its monthly payment schedule
// ============================================================================

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crm_shared::constants::{
    DEFAULT_ADMIN_FEE_PERCENT, DEFAULT_DAILY_INTEREST_PERCENT, DEFAULT_LATE_FEE_PERCENT,
};
use crm_shared::Cents;

use super::payment::Payment;
use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Active,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "ACTIVE",
            ContractStatus::Expired => "EXPIRED",
            ContractStatus::Terminated => "TERMINATED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(ContractStatus::Active),
            "EXPIRED" => Some(ContractStatus::Expired),
            "TERMINATED" => Some(ContractStatus::Terminated),
            _ => None,
        }
    }
}

impl Default for ContractStatus {
    fn default() -> Self {
        ContractStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub tenant_id: Uuid,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub rent_cents: Cents,
    pub deposit_cents: Option<Cents>,
    /// Day of month rent is due, 1..=28.
    pub due_day: i32,

    pub admin_fee_percent: f64,
    pub late_fee_percent: f64,
    pub daily_interest_percent: f64,

    pub status: ContractStatus,
    pub document_text: Option<String>,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Create payload for [`Contract`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContractInput {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 1, message = "Rent must be positive"))]
    pub rent_cents: Cents,
    #[validate(range(min = 0))]
    pub deposit_cents: Option<Cents>,
    #[validate(range(min = 1, max = 28, message = "Due day must be between 1 and 28"))]
    pub due_day: i32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub admin_fee_percent: Option<f64>,
    #[validate(range(min = 0.0, max = 20.0))]
    pub late_fee_percent: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub daily_interest_percent: Option<f64>,
}

/// Terms that can change on an existing contract.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContractTermsInput {
    pub end_date: NaiveDate,
    #[validate(range(min = 1, message = "Rent must be positive"))]
    pub rent_cents: Cents,
    #[validate(range(min = 1, max = 28, message = "Due day must be between 1 and 28"))]
    pub due_day: i32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub admin_fee_percent: f64,
    #[validate(range(min = 0.0, max = 20.0))]
    pub late_fee_percent: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub daily_interest_percent: f64,
}

impl Contract {
    pub fn new(company_id: Uuid, user_id: Uuid, input: ContractInput) -> Result<Self, DomainError> {
        input.validate()?;
        if input.end_date <= input.start_date {
            return Err(DomainError::ValidationError(
                "End date must be after start date".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            company_id,
            user_id,
            property_id: input.property_id,
            tenant_id: input.tenant_id,
            start_date: input.start_date,
            end_date: input.end_date,
            rent_cents: input.rent_cents,
            deposit_cents: input.deposit_cents,
            due_day: input.due_day,
            admin_fee_percent: input.admin_fee_percent.unwrap_or(DEFAULT_ADMIN_FEE_PERCENT),
            late_fee_percent: input.late_fee_percent.unwrap_or(DEFAULT_LATE_FEE_PERCENT),
            daily_interest_percent: input
                .daily_interest_percent
                .unwrap_or(DEFAULT_DAILY_INTEREST_PERCENT),
            status: ContractStatus::Active,
            document_text: None,
            created_at: Utc::now(),
            modified_at: None,
        })
    }

    pub fn apply_terms(&mut self, input: ContractTermsInput) -> Result<(), DomainError> {
        input.validate()?;
        if input.end_date <= self.start_date {
            return Err(DomainError::ValidationError(
                "End date must be after start date".to_string(),
            ));
        }
        self.end_date = input.end_date;
        self.rent_cents = input.rent_cents;
        self.due_day = input.due_day;
        self.admin_fee_percent = input.admin_fee_percent;
        self.late_fee_percent = input.late_fee_percent;
        self.daily_interest_percent = input.daily_interest_percent;
        self.modified_at = Some(Utc::now());
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }

    /// Monthly payments due on `due_day`, strictly after the start date and
    /// up to and including the end date.
    pub fn payment_schedule(&self) -> Vec<Payment> {
        let mut payments = Vec::new();
        let Some(first_of_month) = self.start_date.with_day(1) else {
            return payments;
        };

        let mut offset = 0;
        loop {
            let Some(month) = first_of_month.checked_add_months(Months::new(offset)) else {
                break;
            };
            let Some(due_date) = month.with_day(self.due_day as u32) else {
                break;
            };
            if due_date > self.end_date {
                break;
            }
            if due_date > self.start_date {
                payments.push(Payment::new(self.company_id, self.id, due_date, self.rent_cents));
            }
            offset += 1;
        }

        payments
    }

    pub fn terminate(&mut self) {
        self.status = ContractStatus::Terminated;
        self.modified_at = Some(Utc::now());
    }

    pub fn expire(&mut self) {
        self.status = ContractStatus::Expired;
        self.modified_at = Some(Utc::now());
    }

    pub fn days_until_end(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }
}
