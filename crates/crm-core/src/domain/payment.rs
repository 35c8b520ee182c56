//! Rent payment domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crm_shared::{percent_of, Cents};

use super::contract::Contract;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Overdue => "OVERDUE",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "PAID" => Some(PaymentStatus::Paid),
            "OVERDUE" => Some(PaymentStatus::Overdue),
            "CANCELLED" => Some(PaymentStatus::Cancelled),
            _ => None,
        }
    }

    /// Still expected to be paid.
    pub fn is_open(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub company_id: Uuid,
    pub contract_id: Uuid,
    pub due_date: NaiveDate,
    pub amount_cents: Cents,
    pub status: PaymentStatus,
    pub paid_at: Option<NaiveDate>,
    pub paid_amount_cents: Option<Cents>,
    pub late_fee_cents: Cents,
    pub interest_cents: Cents,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Amounts owed when a payment is settled on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub days_late: i64,
    pub late_fee_cents: Cents,
    pub interest_cents: Cents,
    pub total_cents: Cents,
}

impl Payment {
    pub fn new(company_id: Uuid, contract_id: Uuid, due_date: NaiveDate, amount_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            contract_id,
            due_date,
            amount_cents,
            status: PaymentStatus::Pending,
            paid_at: None,
            paid_amount_cents: None,
            late_fee_cents: 0,
            interest_cents: 0,
            notes: None,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    pub fn days_late(&self, on: NaiveDate) -> i64 {
        (on - self.due_date).num_days().max(0)
    }

    /// One-off late fee plus simple daily interest, both on the base amount.
    pub fn settlement(&self, paid_on: NaiveDate, contract: &Contract) -> Settlement {
        let days_late = self.days_late(paid_on);
        let (late_fee_cents, interest_cents) = if days_late > 0 {
            (
                percent_of(self.amount_cents, contract.late_fee_percent),
                percent_of(self.amount_cents, contract.daily_interest_percent * days_late as f64),
            )
        } else {
            (0, 0)
        };

        Settlement {
            days_late,
            late_fee_cents,
            interest_cents,
            total_cents: self.amount_cents + late_fee_cents + interest_cents,
        }
    }

    pub fn mark_paid(&mut self, paid_on: NaiveDate, settlement: Settlement, amount_override: Option<Cents>) {
        self.status = PaymentStatus::Paid;
        self.paid_at = Some(paid_on);
        self.late_fee_cents = settlement.late_fee_cents;
        self.interest_cents = settlement.interest_cents;
        self.paid_amount_cents = Some(amount_override.unwrap_or(settlement.total_cents));
        self.modified_at = Some(Utc::now());
    }

    pub fn mark_overdue(&mut self) {
        self.status = PaymentStatus::Overdue;
        self.modified_at = Some(Utc::now());
    }

    pub fn cancel(&mut self) {
        self.status = PaymentStatus::Cancelled;
        self.modified_at = Some(Utc::now());
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::tests::sample_contract;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_on_time_settlement() {
        let contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        let payment = Payment::new(contract.company_id, contract.id, date(2025, 3, 5), 200_000);

        let settlement = payment.settlement(date(2025, 3, 5), &contract);
        assert_eq!(settlement.days_late, 0);
        assert_eq!(settlement.total_cents, 200_000);
    }

    #[test]
    fn test_late_settlement() {
        let contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        let payment = Payment::new(contract.company_id, contract.id, date(2025, 3, 5), 200_000);

        // 10 days late: 2% fee = 4000, 0.033% * 10 = 0.33% = 660
        let settlement = payment.settlement(date(2025, 3, 15), &contract);
        assert_eq!(settlement.days_late, 10);
        assert_eq!(settlement.late_fee_cents, 4_000);
        assert_eq!(settlement.interest_cents, 660);
        assert_eq!(settlement.total_cents, 204_660);
    }

    #[test]
    fn test_mark_paid_records_totals() {
        let contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        let mut payment = Payment::new(contract.company_id, contract.id, date(2025, 3, 5), 200_000);
        let settlement = payment.settlement(date(2025, 3, 6), &contract);

        payment.mark_paid(date(2025, 3, 6), settlement, None);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_amount_cents, Some(settlement.total_cents));
        assert!(!payment.is_overdue_on(date(2025, 4, 1)));
    }
}
