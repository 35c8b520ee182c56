//! Property owner (landlord) domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crm_shared::utils::normalize_document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// CPF/CNPJ, digits only. Unique per company.
    pub document: String,
    pub address: Option<String>,
    pub pix_key: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Create/update payload for [`Owner`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OwnerInput {
    #[validate(length(min = 2, max = 150, message = "Name must be between 2 and 150 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 11, max = 18, message = "Document must be a CPF or CNPJ"))]
    pub document: String,
    pub address: Option<String>,
    pub pix_key: Option<String>,
    pub notes: Option<String>,
}

impl Owner {
    pub fn new(company_id: Uuid, user_id: Uuid, input: OwnerInput) -> Result<Self, validator::ValidationErrors> {
        input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            company_id,
            user_id,
            name: input.name.trim().to_string(),
            email: input.email.map(|e| e.trim().to_lowercase()),
            phone: input.phone,
            document: normalize_document(&input.document),
            address: input.address,
            pix_key: input.pix_key,
            notes: input.notes,
            created_at: Utc::now(),
            modified_at: None,
        })
    }

    pub fn apply(&mut self, input: OwnerInput) -> Result<(), validator::ValidationErrors> {
        input.validate()?;
        self.name = input.name.trim().to_string();
        self.email = input.email.map(|e| e.trim().to_lowercase());
        self.phone = input.phone;
        self.document = normalize_document(&input.document);
        self.address = input.address;
        self.pix_key = input.pix_key;
        self.notes = input.notes;
        self.modified_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(document: &str) -> OwnerInput {
        OwnerInput {
            name: "João Lima".to_string(),
            email: Some("Joao@Mail.com".to_string()),
            phone: None,
            document: document.to_string(),
            address: None,
            pix_key: None,
            notes: None,
        }
    }

    #[test]
    fn test_document_normalized() {
        let owner = Owner::new(Uuid::new_v4(), Uuid::new_v4(), input("123.456.789-09")).unwrap();
        assert_eq!(owner.document, "12345678909");
        assert_eq!(owner.email.as_deref(), Some("joao@mail.com"));
    }

    #[test]
    fn test_short_document_rejected() {
        assert!(Owner::new(Uuid::new_v4(), Uuid::new_v4(), input("123")).is_err());
    }
}
