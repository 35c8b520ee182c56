//! Tenant (renter) domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crm_shared::utils::normalize_document;
use crm_shared::Cents;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// CPF/CNPJ, digits only. Unique per company.
    pub document: String,
    pub monthly_income_cents: Option<Cents>,
    pub occupation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Create/update payload for [`Tenant`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TenantInput {
    #[validate(length(min = 2, max = 150, message = "Name must be between 2 and 150 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 11, max = 18, message = "Document must be a CPF or CNPJ"))]
    pub document: String,
    #[validate(range(min = 0, message = "Income cannot be negative"))]
    pub monthly_income_cents: Option<Cents>,
    pub occupation: Option<String>,
}

impl Tenant {
    pub fn new(company_id: Uuid, user_id: Uuid, input: TenantInput) -> Result<Self, validator::ValidationErrors> {
        input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            company_id,
            user_id,
            name: input.name.trim().to_string(),
            email: input.email.map(|e| e.trim().to_lowercase()),
            phone: input.phone,
            document: normalize_document(&input.document),
            monthly_income_cents: input.monthly_income_cents,
            occupation: input.occupation,
            created_at: Utc::now(),
            modified_at: None,
        })
    }

    pub fn apply(&mut self, input: TenantInput) -> Result<(), validator::ValidationErrors> {
        input.validate()?;
        self.name = input.name.trim().to_string();
        self.email = input.email.map(|e| e.trim().to_lowercase());
        self.phone = input.phone;
        self.document = normalize_document(&input.document);
        self.monthly_income_cents = input.monthly_income_cents;
        self.occupation = input.occupation;
        self.modified_at = Some(Utc::now());
        Ok(())
    }
}
