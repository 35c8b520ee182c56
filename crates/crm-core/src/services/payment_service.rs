//! Rent payments: listing, settlement and cancellation

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crm_shared::Cents;

use super::{scoped, Actor};
use crate::domain::{Payment, PaymentStatus};
use crate::error::DomainError;
use crate::repositories::{ContractRepository, PaymentFilter, PaymentRepository};

/// Settles an open payment.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PayInput {
    /// Defaults to today.
    pub paid_on: Option<NaiveDate>,
    /// Overrides the computed total (e.g. negotiated discount).
    #[validate(range(min = 0))]
    pub amount_cents: Option<Cents>,
    pub notes: Option<String>,
}

/// Edits a payment that has not been settled yet.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentUpdateInput {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: Cents,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct PaymentService {
    repo: Arc<dyn PaymentRepository>,
    contract_repo: Arc<dyn ContractRepository>,
}

impl PaymentService {
    pub fn new(repo: Arc<dyn PaymentRepository>, contract_repo: Arc<dyn ContractRepository>) -> Self {
        Self { repo, contract_repo }
    }

    pub async fn list(&self, actor: &Actor, filter: &PaymentFilter) -> Result<Vec<Payment>, DomainError> {
        self.repo.list_by_company(&actor.company_id, filter).await
    }

    pub async fn get(&self, actor: &Actor, id: &Uuid) -> Result<Payment, DomainError> {
        scoped(self.repo.find_by_id(id).await?, actor, "Payment")
    }

    pub async fn pay(&self, actor: &Actor, id: &Uuid, input: PayInput, today: NaiveDate) -> Result<Payment, DomainError> {
        input.validate()?;
        let mut payment = self.get(actor, id).await?;
        if !payment.status.is_open() {
            warn!("Payment {} is {}, cannot settle", payment.id, payment.status.as_str());
            return Err(DomainError::Conflict(format!(
                "Payment is {}",
                payment.status.as_str()
            )));
        }

        let contract = scoped(self.contract_repo.find_by_id(&payment.contract_id).await?, actor, "Contract")?;
        let paid_on = input.paid_on.unwrap_or(today);
        let settlement = payment.settlement(paid_on, &contract);
        payment.mark_paid(paid_on, settlement, input.amount_cents);
        if input.notes.is_some() {
            payment.notes = input.notes;
        }

        let updated = self.repo.update(&payment).await?;
        info!(
            "Payment {} settled: {} days late, total {}",
            updated.id, settlement.days_late, settlement.total_cents
        );
        Ok(updated)
    }

    pub async fn cancel(&self, actor: &Actor, id: &Uuid) -> Result<Payment, DomainError> {
        let mut payment = self.get(actor, id).await?;
        if !payment.status.is_open() {
            return Err(DomainError::Conflict(format!(
                "Payment is {}",
                payment.status.as_str()
            )));
        }
        payment.cancel();
        let updated = self.repo.update(&payment).await?;
        info!("Payment {} cancelled", updated.id);
        Ok(updated)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, input: PaymentUpdateInput) -> Result<Payment, DomainError> {
        input.validate()?;
        let mut payment = self.get(actor, id).await?;
        if payment.status != PaymentStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Only pending payments can be edited (payment is {})",
                payment.status.as_str()
            )));
        }
        payment.amount_cents = input.amount_cents;
        payment.due_date = input.due_date;
        payment.notes = input.notes;
        payment.modified_at = Some(Utc::now());

        let updated = self.repo.update(&payment).await?;
        info!("Payment {} updated", updated.id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::tests::sample_contract;
    use crate::domain::Contract;
    use crate::repositories::{MockContractRepository, MockPaymentRepository};
    use crate::services::test_support::actor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract_for(actor: &Actor) -> Contract {
        let mut contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        contract.company_id = actor.company_id;
        contract
    }

    #[tokio::test]
    async fn test_pay_late_applies_fee_and_interest() {
        let actor = actor();
        let contract = contract_for(&actor);
        let payment = Payment::new(actor.company_id, contract.id, date(2025, 3, 5), 200_000);
        let id = payment.id;

        let mut repo = MockPaymentRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(payment.clone())));
        repo.expect_update().returning(|p| Ok(p.clone()));
        let mut contracts = MockContractRepository::new();
        contracts.expect_find_by_id().returning(move |_| Ok(Some(contract.clone())));

        let service = PaymentService::new(Arc::new(repo), Arc::new(contracts));
        let paid = service
            .pay(&actor, &id, PayInput::default(), date(2025, 3, 15))
            .await
            .unwrap();

        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.paid_at, Some(date(2025, 3, 15)));
        assert_eq!(paid.late_fee_cents, 4_000);
        assert_eq!(paid.interest_cents, 660);
        assert_eq!(paid.paid_amount_cents, Some(204_660));
    }

    #[tokio::test]
    async fn test_pay_twice_conflicts() {
        let actor = actor();
        let contract = contract_for(&actor);
        let mut payment = Payment::new(actor.company_id, contract.id, date(2025, 3, 5), 200_000);
        let settlement = payment.settlement(date(2025, 3, 5), &contract);
        payment.mark_paid(date(2025, 3, 5), settlement, None);
        let id = payment.id;

        let mut repo = MockPaymentRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(payment.clone())));
        repo.expect_update().never();

        let service = PaymentService::new(Arc::new(repo), Arc::new(MockContractRepository::new()));
        assert!(matches!(
            service.pay(&actor, &id, PayInput::default(), date(2025, 3, 6)).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_overdue_payment_conflicts() {
        let actor = actor();
        let mut payment = Payment::new(actor.company_id, Uuid::new_v4(), date(2025, 3, 5), 200_000);
        payment.mark_overdue();
        let id = payment.id;

        let mut repo = MockPaymentRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(payment.clone())));

        let service = PaymentService::new(Arc::new(repo), Arc::new(MockContractRepository::new()));
        let input = PaymentUpdateInput {
            amount_cents: 150_000,
            due_date: date(2025, 3, 10),
            notes: None,
        };
        assert!(matches!(
            service.update(&actor, &id, input).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_overdue_payment() {
        let actor = actor();
        let mut payment = Payment::new(actor.company_id, Uuid::new_v4(), date(2025, 3, 5), 200_000);
        payment.mark_overdue();
        let id = payment.id;

        let mut repo = MockPaymentRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(payment.clone())));
        repo.expect_update()
            .withf(|p| p.status == PaymentStatus::Cancelled)
            .returning(|p| Ok(p.clone()));

        let service = PaymentService::new(Arc::new(repo), Arc::new(MockContractRepository::new()));
        assert_eq!(service.cancel(&actor, &id).await.unwrap().status, PaymentStatus::Cancelled);
    }
}
