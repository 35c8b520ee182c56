// ============================================================================
// CRM Core - Delinquency Service
// File: crates/crm-core/src/services/delinquency_service.rs
// ============================================================================
//! Tenant delinquency scoring
//!
//! The score is deterministic and computed from payment history alone. An
//! AI narrative is attached when a provider is configured.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::ai::AiProvider;
use super::{scoped, Actor};
use crate::domain::{Payment, PaymentStatus};
use crate::error::DomainError;
use crate::repositories::{PaymentRepository, TenantRepository};

const RATIO_WEIGHT: f64 = 50.0;
const DELAY_WEIGHT: f64 = 25.0;
const DELAY_CAP_DAYS: f64 = 30.0;
const OVERDUE_POINTS_EACH: u32 = 5;
const OVERDUE_POINTS_MAX: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => RiskLevel::Low,
            30..=59 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DelinquencyAssessment {
    pub tenant_id: Uuid,
    /// 0..=100, higher is riskier.
    pub score: u8,
    pub level: RiskLevel,
    /// Payments already due (cancelled ones excluded).
    pub payments_considered: usize,
    pub late_payments: usize,
    pub currently_overdue: usize,
    pub average_days_late: f64,
    pub analysis: Option<String>,
}

/// Scores a payment history as of `today`.
pub fn score_history(tenant_id: Uuid, payments: &[Payment], today: NaiveDate) -> DelinquencyAssessment {
    let due: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.status != PaymentStatus::Cancelled && p.due_date < today)
        .collect();

    let mut late_days = Vec::new();
    let mut currently_overdue = 0;
    for payment in &due {
        match (payment.status, payment.paid_at) {
            (PaymentStatus::Paid, Some(paid_on)) => {
                let days = payment.days_late(paid_on);
                if days > 0 {
                    late_days.push(days);
                }
            }
            (PaymentStatus::Paid, None) => {}
            _ => {
                currently_overdue += 1;
                late_days.push(payment.days_late(today));
            }
        }
    }

    let considered = due.len();
    let late = late_days.len();
    let average_days_late = if late == 0 {
        0.0
    } else {
        late_days.iter().sum::<i64>() as f64 / late as f64
    };

    let ratio_points = if considered == 0 {
        0.0
    } else {
        RATIO_WEIGHT * late as f64 / considered as f64
    };
    let delay_points = DELAY_WEIGHT * average_days_late.min(DELAY_CAP_DAYS) / DELAY_CAP_DAYS;
    let overdue_points = (currently_overdue as u32 * OVERDUE_POINTS_EACH).min(OVERDUE_POINTS_MAX) as f64;
    let score = (ratio_points + delay_points + overdue_points).round().clamp(0.0, 100.0) as u8;

    DelinquencyAssessment {
        tenant_id,
        score,
        level: RiskLevel::from_score(score),
        payments_considered: considered,
        late_payments: late,
        currently_overdue,
        average_days_late: (average_days_late * 10.0).round() / 10.0,
        analysis: None,
    }
}

#[derive(Clone)]
pub struct DelinquencyService {
    tenant_repo: Arc<dyn TenantRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    ai: Option<Arc<dyn AiProvider>>,
}

impl DelinquencyService {
    pub fn new(
        tenant_repo: Arc<dyn TenantRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        ai: Option<Arc<dyn AiProvider>>,
    ) -> Self {
        Self {
            tenant_repo,
            payment_repo,
            ai,
        }
    }

    pub async fn assess(&self, actor: &Actor, tenant_id: &Uuid, today: NaiveDate) -> Result<DelinquencyAssessment, DomainError> {
        let tenant = scoped(self.tenant_repo.find_by_id(tenant_id).await?, actor, "Tenant")?;
        let payments = self.payment_repo.list_by_tenant(&tenant.id).await?;

        let mut assessment = score_history(tenant.id, &payments, today);
        info!(
            "Tenant {} delinquency score {} ({})",
            tenant.id,
            assessment.score,
            assessment.level.as_str()
        );

        if let Some(ai) = &self.ai {
            let system = "You are a credit analyst for a property management company. \
                          In at most four sentences, explain the tenant's payment risk and \
                          suggest one concrete action for the broker.";
            let prompt = format!(
                "Tenant: {}\nMonthly income (cents): {}\nPayments due so far: {}\nLate payments: {}\n\
                 Currently overdue: {}\nAverage days late: {:.1}\nRisk score: {}/100 ({})",
                tenant.name,
                tenant
                    .monthly_income_cents
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                assessment.payments_considered,
                assessment.late_payments,
                assessment.currently_overdue,
                assessment.average_days_late,
                assessment.score,
                assessment.level.as_str(),
            );
            match ai.complete(system, &prompt).await {
                Ok(text) => assessment.analysis = Some(text.trim().to_string()),
                Err(e) => warn!("Delinquency analysis unavailable for tenant {}: {}", tenant.id, e),
            }
        }

        Ok(assessment)
    }
}
