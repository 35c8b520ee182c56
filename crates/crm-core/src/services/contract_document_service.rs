//! Lease document generation
//!
//! The draft always comes from the handlebars template. When an AI provider
//! is configured the draft is sent for refinement; any provider failure keeps
//! the template text.

use std::sync::Arc;

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde_json::json;
use tracing::{info, warn};

use crm_shared::Cents;

use super::ai::AiProvider;
use crate::domain::{Contract, Owner, Property, Tenant};
use crate::error::DomainError;

const LEASE_TEMPLATE_NAME: &str = "lease";

const LEASE_TEMPLATE: &str = r#"RESIDENTIAL LEASE AGREEMENT

LANDLORD: {{owner.name}}, document {{owner.document}}.
TENANT: {{tenant.name}}, document {{tenant.document}}.

1. PROPERTY
The landlord leases to the tenant the property "{{property.title}}" located at
{{property.address}}{{#if property.neighborhood}}, {{property.neighborhood}}{{/if}}, {{property.city}}/{{property.state}}.

2. TERM
This lease starts on {{contract.start_date}} and ends on {{contract.end_date}}.

3. RENT
Monthly rent is {{money contract.rent_cents}}, due on day {{contract.due_day}} of each month.
{{#if contract.deposit_cents}}A security deposit of {{money contract.deposit_cents}} is paid on signature.
{{/if}}
4. LATE PAYMENT
Rent paid after the due date bears a one-time late fee of {{contract.late_fee_percent}}%
plus interest of {{contract.daily_interest_percent}}% per day of delay.

5. ADMINISTRATION
The administrator retains {{contract.admin_fee_percent}}% of each rent received.
"#;

handlebars_helper!(money: |cents: i64| format_brl(cents));

/// Formats cents as Brazilian reais, e.g. `R$ 1.800,00`.
pub fn format_brl(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

#[derive(Clone)]
pub struct ContractDocumentService {
    registry: Arc<Handlebars<'static>>,
    ai: Option<Arc<dyn AiProvider>>,
}

impl ContractDocumentService {
    pub fn new(ai: Option<Arc<dyn AiProvider>>) -> Result<Self, DomainError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("money", Box::new(money));
        registry
            .register_template_string(LEASE_TEMPLATE_NAME, LEASE_TEMPLATE)
            .map_err(|e| DomainError::TemplateError(e.to_string()))?;

        Ok(Self {
            registry: Arc::new(registry),
            ai,
        })
    }

    pub fn render_template(
        &self,
        contract: &Contract,
        property: &Property,
        owner: &Owner,
        tenant: &Tenant,
    ) -> Result<String, DomainError> {
        let data = json!({
            "contract": contract,
            "property": property,
            "owner": owner,
            "tenant": tenant,
        });
        self.registry
            .render(LEASE_TEMPLATE_NAME, &data)
            .map_err(|e| DomainError::TemplateError(e.to_string()))
    }

    pub async fn generate(
        &self,
        contract: &Contract,
        property: &Property,
        owner: &Owner,
        tenant: &Tenant,
    ) -> Result<String, DomainError> {
        let draft = self.render_template(contract, property, owner, tenant)?;
        let Some(ai) = &self.ai else {
            return Ok(draft);
        };

        let system = "You are a real-estate paralegal. Improve the wording and structure of the \
                      lease agreement you receive. Keep every party, date, amount and percentage \
                      exactly as given. Reply with the agreement text only.";
        match ai.complete(system, &draft).await {
            Ok(refined) if !refined.trim().is_empty() => {
                info!("Contract {} document refined by AI provider", contract.id);
                Ok(refined.trim().to_string())
            }
            Ok(_) => {
                warn!("AI provider returned an empty document for contract {}", contract.id);
                Ok(draft)
            }
            Err(e) => {
                warn!("AI refinement failed for contract {}, using template: {}", contract.id, e);
                Ok(draft)
            }
        }
    }
}
