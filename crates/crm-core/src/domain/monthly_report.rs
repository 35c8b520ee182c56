//! Monthly owner statement for a contract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crm_shared::{percent_of, Cents};

use super::contract::Contract;
use super::payment::{Payment, PaymentStatus};

/// Unique per (contract, month, year).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub id: Uuid,
    pub company_id: Uuid,
    pub contract_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub gross_cents: Cents,
    pub admin_fee_cents: Cents,
    pub net_cents: Cents,
    pub payments_paid: i32,
    pub payments_overdue: i32,
    pub generated_at: DateTime<Utc>,
}

impl MonthlyReport {
    /// Summarise the payments of `contract` that fall due in the given month.
    pub fn compute(contract: &Contract, month: i32, year: i32, payments: &[Payment]) -> Self {
        let mut gross_cents = 0;
        let mut payments_paid = 0;
        let mut payments_overdue = 0;

        for payment in payments {
            match payment.status {
                PaymentStatus::Paid => {
                    gross_cents += payment.paid_amount_cents.unwrap_or(payment.amount_cents);
                    payments_paid += 1;
                }
                PaymentStatus::Overdue => payments_overdue += 1,
                PaymentStatus::Pending | PaymentStatus::Cancelled => {}
            }
        }

        let admin_fee_cents = percent_of(gross_cents, contract.admin_fee_percent);

        Self {
            id: Uuid::new_v4(),
            company_id: contract.company_id,
            contract_id: contract.id,
            month,
            year,
            gross_cents,
            admin_fee_cents,
            net_cents: gross_cents - admin_fee_cents,
            payments_paid,
            payments_overdue,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::tests::sample_contract;
    use chrono::NaiveDate;

    #[test]
    fn test_compute_report() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let contract = sample_contract(start, end, 5);

        let mut paid = Payment::new(contract.company_id, contract.id, start, 200_000);
        paid.status = PaymentStatus::Paid;
        paid.paid_amount_cents = Some(204_000);
        let mut overdue = Payment::new(contract.company_id, contract.id, start, 200_000);
        overdue.status = PaymentStatus::Overdue;

        let report = MonthlyReport::compute(&contract, 1, 2025, &[paid, overdue]);
        assert_eq!(report.gross_cents, 204_000);
        assert_eq!(report.admin_fee_cents, 20_400);
        assert_eq!(report.net_cents, 183_600);
        assert_eq!(report.payments_paid, 1);
        assert_eq!(report.payments_overdue, 1);
    }
}
