//! Company (tenant of the multi-tenant CRM)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Company {
    pub id: Uuid,

    #[validate(length(min = 2, max = 150, message = "Company name must be between 2 and 150 characters"))]
    pub name: String,

    /// CNPJ, digits only.
    pub document: Option<String>,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Profile update payload for [`Company`].
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub document: Option<String>,
}

fn clean_document(document: Option<String>) -> Option<String> {
    document
        .map(|d| crm_shared::utils::normalize_document(&d))
        .filter(|d| !d.is_empty())
}

impl Company {
    pub fn new(name: String, document: Option<String>) -> Result<Self, validator::ValidationErrors> {
        let company = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            document: clean_document(document),
            created_at: Utc::now(),
            modified_at: None,
        };

        company.validate()?;
        Ok(company)
    }

    pub fn apply(&mut self, input: CompanyInput) -> Result<(), validator::ValidationErrors> {
        let mut updated = self.clone();
        updated.name = input.name.trim().to_string();
        updated.document = clean_document(input.document);
        updated.validate()?;

        updated.modified_at = Some(Utc::now());
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_document() {
        let company = Company::new(" Imobiliária Sol ".into(), Some("12.345.678/0001-90".into())).unwrap();
        assert_eq!(company.name, "Imobiliária Sol");
        assert_eq!(company.document.as_deref(), Some("12345678000190"));
    }

    #[test]
    fn test_invalid_update_leaves_company_untouched() {
        let mut company = Company::new("Imobiliária Sol".into(), None).unwrap();
        let result = company.apply(CompanyInput { name: "X".into(), document: Some("  ".into()) });
        assert!(result.is_err());
        assert_eq!(company.name, "Imobiliária Sol");
        assert!(company.modified_at.is_none());
    }
}
