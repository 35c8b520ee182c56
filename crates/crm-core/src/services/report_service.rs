//! Monthly owner statements

use std::sync::Arc;

use tracing::{info, warn};

use super::Actor;
use crate::domain::MonthlyReport;
use crate::error::DomainError;
use crate::repositories::{ContractRepository, MonthlyReportRepository, PaymentRepository};

#[derive(Clone)]
pub struct ReportService {
    repo: Arc<dyn MonthlyReportRepository>,
    contract_repo: Arc<dyn ContractRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
}

impl ReportService {
    pub fn new(
        repo: Arc<dyn MonthlyReportRepository>,
        contract_repo: Arc<dyn ContractRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            repo,
            contract_repo,
            payment_repo,
        }
    }

    /// Builds (or rebuilds) one report per contract with payments due in the
    /// month. Regeneration overwrites the stored row.
    pub async fn generate_monthly(&self, actor: &Actor, month: i32, year: i32) -> Result<Vec<MonthlyReport>, DomainError> {
        validate_period(month, year)?;

        let contracts = self.contract_repo.list_all_by_company(&actor.company_id).await?;
        let mut reports = Vec::new();
        for contract in &contracts {
            let payments = self.payment_repo.list_by_contract_in_month(&contract.id, month, year).await?;
            if payments.is_empty() {
                continue;
            }
            let report = MonthlyReport::compute(contract, month, year, &payments);
            match self.repo.upsert(&report).await {
                Ok(saved) => reports.push(saved),
                Err(e) => warn!("Failed to store report for contract {}: {}", contract.id, e),
            }
        }

        info!(
            "Monthly reports {:02}/{} for company {}: {} generated",
            month, year, actor.company_id, reports.len()
        );
        Ok(reports)
    }

    pub async fn list(&self, actor: &Actor, month: Option<i32>, year: Option<i32>) -> Result<Vec<MonthlyReport>, DomainError> {
        if let Some(month) = month {
            validate_period(month, year.unwrap_or(2000))?;
        }
        self.repo.list_by_company(&actor.company_id, month, year).await
    }
}

fn validate_period(month: i32, year: i32) -> Result<(), DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::ValidationError("Month must be between 1 and 12".to_string()));
    }
    if !(2000..=2100).contains(&year) {
        return Err(DomainError::ValidationError("Year out of range".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::tests::sample_contract;
    use crate::domain::Payment;
    use crate::repositories::{MockContractRepository, MockMonthlyReportRepository, MockPaymentRepository};
    use crate::services::test_support::actor;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_generate_skips_contracts_without_payments() {
        let actor = actor();
        let mut with_payment = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        with_payment.company_id = actor.company_id;
        let without = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        let with_id = with_payment.id;

        let mut payment = Payment::new(actor.company_id, with_id, date(2025, 3, 5), 200_000);
        let settlement = payment.settlement(date(2025, 3, 5), &with_payment);
        payment.mark_paid(date(2025, 3, 5), settlement, None);

        let mut contracts = MockContractRepository::new();
        contracts.expect_list_all_by_company()
            .returning(move |_| Ok(vec![with_payment.clone(), without.clone()]));
        let mut payments = MockPaymentRepository::new();
        payments.expect_list_by_contract_in_month()
            .returning(move |id, _, _| {
                if *id == with_id { Ok(vec![payment.clone()]) } else { Ok(vec![]) }
            });
        let mut repo = MockMonthlyReportRepository::new();
        repo.expect_upsert()
            .withf(|r| r.gross_cents == 200_000 && r.admin_fee_cents == 20_000 && r.net_cents == 180_000)
            .times(1)
            .returning(|r| Ok(r.clone()));

        let service = ReportService::new(Arc::new(repo), Arc::new(contracts), Arc::new(payments));
        let reports = service.generate_monthly(&actor, 3, 2025).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].contract_id, with_id);
    }

    #[tokio::test]
    async fn test_invalid_month_rejected() {
        let service = ReportService::new(
            Arc::new(MockMonthlyReportRepository::new()),
            Arc::new(MockContractRepository::new()),
            Arc::new(MockPaymentRepository::new()),
        );
        assert!(matches!(
            service.generate_monthly(&actor(), 13, 2025).await,
            Err(DomainError::ValidationError(_))
        ));
    }
}
