// ============================================================================
// CRM Core - Reminder Service
// File: crates/crm-core/src/services/reminder_service.rs
// ============================================================================
//! Daily sweep over payments and contracts: overdue marking, due-date
//! reminders, expiring-contract warnings and contract expiry.
//!
//! Every record is handled independently; a failure is logged and the sweep
//! moves on.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::contract_document_service::format_brl;
use super::contract_service::release_property;
use super::notification_service::NotificationService;
use super::settings_service::effective_settings;
use crate::domain::{Contract, NewNotification, NotificationKind, Payment};
use crate::error::DomainError;
use crate::repositories::{ContractRepository, PaymentRepository, PropertyRepository, SettingsRepository};

/// Settings allow at most this many days of advance notice.
const MAX_REMINDER_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSummary {
    pub payments_marked_overdue: usize,
    pub overdue_notices: usize,
    pub due_reminders: usize,
    pub expiring_notices: usize,
    pub contracts_expired: usize,
    pub failures: usize,
}

#[derive(Clone)]
pub struct ReminderService {
    payment_repo: Arc<dyn PaymentRepository>,
    contract_repo: Arc<dyn ContractRepository>,
    property_repo: Arc<dyn PropertyRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    notifications: NotificationService,
    contract_expiry_days: i64,
}

impl ReminderService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        contract_repo: Arc<dyn ContractRepository>,
        property_repo: Arc<dyn PropertyRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        notifications: NotificationService,
        contract_expiry_days: i64,
    ) -> Self {
        Self {
            payment_repo,
            contract_repo,
            property_repo,
            settings_repo,
            notifications,
            contract_expiry_days,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> Result<ReminderSummary, DomainError> {
        let mut summary = ReminderSummary::default();
        let mut contracts: HashMap<Uuid, Option<Contract>> = HashMap::new();

        self.mark_overdue(today, &mut contracts, &mut summary).await?;
        self.remind_due(today, &mut contracts, &mut summary).await?;
        self.sweep_contracts(today, &mut summary).await?;

        info!(
            "Reminder run for {}: {} overdue, {} due reminders, {} expiring, {} expired, {} failures",
            today,
            summary.payments_marked_overdue,
            summary.due_reminders,
            summary.expiring_notices,
            summary.contracts_expired,
            summary.failures
        );
        Ok(summary)
    }

    async fn mark_overdue(
        &self,
        today: NaiveDate,
        contracts: &mut HashMap<Uuid, Option<Contract>>,
        summary: &mut ReminderSummary,
    ) -> Result<(), DomainError> {
        for mut payment in self.payment_repo.list_pending_due_before(today).await? {
            payment.mark_overdue();
            if let Err(e) = self.payment_repo.update(&payment).await {
                warn!("Failed to mark payment {} overdue: {}", payment.id, e);
                summary.failures += 1;
                continue;
            }
            summary.payments_marked_overdue += 1;

            let Some(contract) = self.contract(&payment.contract_id, contracts).await else {
                continue;
            };
            let days = payment.days_late(today);
            let notification = NewNotification::new(
                payment.company_id,
                contract.user_id,
                NotificationKind::PaymentOverdue,
                "Payment overdue",
                format!("Payment due on {} is {} day(s) late", payment.due_date, days),
            )
            .contract(contract.id)
            .payment(payment.id);
            if self.send(notification, summary).await {
                summary.overdue_notices += 1;
            }
        }
        Ok(())
    }

    async fn remind_due(
        &self,
        today: NaiveDate,
        contracts: &mut HashMap<Uuid, Option<Contract>>,
        summary: &mut ReminderSummary,
    ) -> Result<(), DomainError> {
        let horizon = today + Duration::days(MAX_REMINDER_WINDOW_DAYS);
        let mut notice_days: HashMap<Uuid, i64> = HashMap::new();

        for payment in self.payment_repo.list_pending_due_between(today, horizon).await? {
            let Some(contract) = self.contract(&payment.contract_id, contracts).await else {
                continue;
            };

            let days_before = match notice_days.get(&contract.user_id) {
                Some(days) => *days,
                None => {
                    let days = match effective_settings(
                        self.settings_repo.as_ref(),
                        &contract.user_id,
                        &contract.company_id,
                    )
                    .await
                    {
                        Ok(settings) => settings.reminder_days_before as i64,
                        Err(e) => {
                            warn!("Failed to load settings for user {}: {}", contract.user_id, e);
                            summary.failures += 1;
                            continue;
                        }
                    };
                    notice_days.insert(contract.user_id, days);
                    days
                }
            };

            if !is_within_notice(&payment, today, days_before) {
                continue;
            }
            let notification = NewNotification::new(
                payment.company_id,
                contract.user_id,
                NotificationKind::PaymentDue,
                "Payment due soon",
                format!("Rent of {} is due on {}", format_brl(payment.amount_cents), payment.due_date),
            )
            .contract(contract.id)
            .payment(payment.id);
            if self.send(notification, summary).await {
                summary.due_reminders += 1;
            }
        }
        Ok(())
    }

    async fn sweep_contracts(&self, today: NaiveDate, summary: &mut ReminderSummary) -> Result<(), DomainError> {
        let horizon = today + Duration::days(self.contract_expiry_days);

        for mut contract in self.contract_repo.list_active_ending_by(horizon).await? {
            if contract.end_date < today {
                contract.expire();
                if let Err(e) = self.contract_repo.update(&contract).await {
                    warn!("Failed to expire contract {}: {}", contract.id, e);
                    summary.failures += 1;
                    continue;
                }
                release_property(self.property_repo.as_ref(), &contract.property_id).await;
                summary.contracts_expired += 1;
                info!("Contract {} expired", contract.id);
                continue;
            }

            let notification = NewNotification::new(
                contract.company_id,
                contract.user_id,
                NotificationKind::ContractExpiring,
                "Contract ending soon",
                format!(
                    "Contract ends on {} ({} day(s) left)",
                    contract.end_date,
                    contract.days_until_end(today)
                ),
            )
            .contract(contract.id)
            .property(contract.property_id);
            if self.send(notification, summary).await {
                summary.expiring_notices += 1;
            }
        }
        Ok(())
    }

    async fn contract(&self, id: &Uuid, cache: &mut HashMap<Uuid, Option<Contract>>) -> Option<Contract> {
        if let Some(cached) = cache.get(id) {
            return cached.clone();
        }
        let found = match self.contract_repo.find_by_id(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Failed to load contract {}: {}", id, e);
                None
            }
        };
        cache.insert(*id, found.clone());
        found
    }

    /// Returns whether a new notification was stored.
    async fn send(&self, notification: NewNotification, summary: &mut ReminderSummary) -> bool {
        match self.notifications.notify_once(notification).await {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!("Failed to send reminder: {}", e);
                summary.failures += 1;
                false
            }
        }
    }
}

/// Due today or within `days_before` days from today.
fn is_within_notice(payment: &Payment, today: NaiveDate, days_before: i64) -> bool {
    let days_left = (payment.due_date - today).num_days();
    (0..=days_before).contains(&days_left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::tests::sample_contract;
    use crate::domain::{ContractStatus, PaymentStatus};
    use crate::repositories::*;

    struct Mocks {
        payments: MockPaymentRepository,
        contracts: MockContractRepository,
        properties: MockPropertyRepository,
        settings: MockSettingsRepository,
        notifications: MockNotificationRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                payments: MockPaymentRepository::new(),
                contracts: MockContractRepository::new(),
                properties: MockPropertyRepository::new(),
                settings: MockSettingsRepository::new(),
                notifications: MockNotificationRepository::new(),
            }
        }

        fn build(self) -> ReminderService {
            ReminderService::new(
                Arc::new(self.payments),
                Arc::new(self.contracts),
                Arc::new(self.properties),
                Arc::new(self.settings),
                NotificationService::new(Arc::new(self.notifications)),
                30,
            )
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_overdue_and_due_reminders() {
        let today = date(2025, 3, 10);
        let contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        let late = Payment::new(contract.company_id, contract.id, date(2025, 3, 5), 200_000);
        let due_soon = Payment::new(contract.company_id, contract.id, date(2025, 3, 12), 200_000);
        let due_later = Payment::new(contract.company_id, contract.id, date(2025, 3, 25), 200_000);

        let mut mocks = Mocks::new();
        mocks.payments.expect_list_pending_due_before()
            .returning(move |_| Ok(vec![late.clone()]));
        mocks.payments.expect_update()
            .withf(|p| p.status == PaymentStatus::Overdue)
            .times(1)
            .returning(|p| Ok(p.clone()));
        mocks.payments.expect_list_pending_due_between()
            .returning(move |_, _| Ok(vec![due_soon.clone(), due_later.clone()]));
        let found = contract.clone();
        mocks.contracts.expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));
        mocks.contracts.expect_list_active_ending_by().returning(|_| Ok(vec![]));
        mocks.settings.expect_find_by_user().times(1).returning(|_| Ok(None));
        mocks.notifications.expect_insert_if_absent()
            .times(2)
            .returning(|_, _| Ok(true));

        let summary = mocks.build().run(today).await.unwrap();
        assert_eq!(summary.payments_marked_overdue, 1);
        assert_eq!(summary.overdue_notices, 1);
        assert_eq!(summary.due_reminders, 1);
        assert_eq!(summary.failures, 0);
    }

    #[tokio::test]
    async fn test_contract_sweep_expires_and_warns() {
        let today = date(2025, 12, 15);
        let ended = sample_contract(date(2024, 12, 1), date(2025, 12, 1), 5);
        let ending = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);

        let mut mocks = Mocks::new();
        mocks.payments.expect_list_pending_due_before().returning(|_| Ok(vec![]));
        mocks.payments.expect_list_pending_due_between().returning(|_, _| Ok(vec![]));
        mocks.contracts.expect_list_active_ending_by()
            .withf(move |horizon| *horizon == date(2026, 1, 14))
            .returning(move |_| Ok(vec![ended.clone(), ending.clone()]));
        mocks.contracts.expect_update()
            .withf(|c| c.status == ContractStatus::Expired)
            .times(1)
            .returning(|c| Ok(c.clone()));
        mocks.properties.expect_find_by_id().returning(|_| Ok(None));
        mocks.notifications.expect_insert_if_absent()
            .withf(|n, _| n.kind == NotificationKind::ContractExpiring)
            .times(1)
            .returning(|_, _| Ok(true));

        let summary = mocks.build().run(today).await.unwrap();
        assert_eq!(summary.contracts_expired, 1);
        assert_eq!(summary.expiring_notices, 1);
    }

    #[tokio::test]
    async fn test_failed_update_is_counted_and_skipped() {
        let today = date(2025, 3, 10);
        let contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        let late = Payment::new(contract.company_id, contract.id, date(2025, 3, 5), 200_000);

        let mut mocks = Mocks::new();
        mocks.payments.expect_list_pending_due_before()
            .returning(move |_| Ok(vec![late.clone()]));
        mocks.payments.expect_update()
            .returning(|_| Err(DomainError::DatabaseError("deadlock".to_string())));
        mocks.payments.expect_list_pending_due_between().returning(|_, _| Ok(vec![]));
        mocks.contracts.expect_list_active_ending_by().returning(|_| Ok(vec![]));
        mocks.notifications.expect_insert_if_absent().never();

        let summary = mocks.build().run(today).await.unwrap();
        assert_eq!(summary.payments_marked_overdue, 0);
        assert_eq!(summary.failures, 1);
    }

    #[test]
    fn test_notice_window_is_inclusive() {
        let today = date(2025, 3, 10);
        let payment = Payment::new(Uuid::new_v4(), Uuid::new_v4(), date(2025, 3, 13), 1);
        assert!(is_within_notice(&payment, today, 3));
        assert!(!is_within_notice(&payment, today, 2));
        assert!(is_within_notice(&payment, date(2025, 3, 13), 0));
    }
}
