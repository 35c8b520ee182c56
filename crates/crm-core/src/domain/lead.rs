// ============================================================================
// CRM Core - Lead Entity
// File: crates/crm-core/src/domain/lead.rs
// Description: Prospective tenant/buyer with search preferences
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crm_shared::Cents;

use super::property::PropertyType;
use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadSource {
    Manual,
    Website,
    Olx,
    VivaReal,
    ZapImoveis,
    Referral,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Manual => "MANUAL",
            LeadSource::Website => "WEBSITE",
            LeadSource::Olx => "OLX",
            LeadSource::VivaReal => "VIVA_REAL",
            LeadSource::ZapImoveis => "ZAP_IMOVEIS",
            LeadSource::Referral => "REFERRAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(LeadSource::Manual),
            "WEBSITE" => Some(LeadSource::Website),
            "OLX" => Some(LeadSource::Olx),
            "VIVA_REAL" => Some(LeadSource::VivaReal),
            "ZAP_IMOVEIS" => Some(LeadSource::ZapImoveis),
            "REFERRAL" => Some(LeadSource::Referral),
            _ => None,
        }
    }
}

impl Default for LeadSource {
    fn default() -> Self {
        LeadSource::Manual
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Negotiating,
    Won,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Negotiating => "NEGOTIATING",
            LeadStatus::Won => "WON",
            LeadStatus::Lost => "LOST",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(LeadStatus::New),
            "CONTACTED" => Some(LeadStatus::Contacted),
            "QUALIFIED" => Some(LeadStatus::Qualified),
            "NEGOTIATING" => Some(LeadStatus::Negotiating),
            "WON" => Some(LeadStatus::Won),
            "LOST" => Some(LeadStatus::Lost),
            _ => None,
        }
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

/// What the lead wants to do with a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestType {
    Rent,
    Buy,
}

impl InterestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestType::Rent => "RENT",
            InterestType::Buy => "BUY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "RENT" => Some(InterestType::Rent),
            "BUY" => Some(InterestType::Buy),
            _ => None,
        }
    }
}

impl Default for InterestType {
    fn default() -> Self {
        InterestType::Rent
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Broker who owns the lead.
    pub user_id: Uuid,

    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,

    pub interest: InterestType,
    pub property_type: Option<PropertyType>,
    pub min_price_cents: Option<Cents>,
    pub max_price_cents: Option<Cents>,
    pub min_bedrooms: Option<i32>,
    pub max_bedrooms: Option<i32>,
    pub min_bathrooms: Option<i32>,
    pub min_area_m2: Option<f64>,
    pub max_area_m2: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub neighborhoods: Vec<String>,
    pub needs_financing: bool,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Create/update payload for [`Lead`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_ranges"))]
pub struct LeadInput {
    #[validate(length(min = 2, max = 150, message = "Name must be between 2 and 150 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub interest: InterestType,
    pub property_type: Option<PropertyType>,
    #[validate(range(min = 0))]
    pub min_price_cents: Option<Cents>,
    #[validate(range(min = 0))]
    pub max_price_cents: Option<Cents>,
    #[validate(range(min = 0, max = 50))]
    pub min_bedrooms: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub max_bedrooms: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub min_bathrooms: Option<i32>,
    #[validate(range(min = 0.0))]
    pub min_area_m2: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_area_m2: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub neighborhoods: Vec<String>,
    #[serde(default)]
    pub needs_financing: bool,
    pub notes: Option<String>,
}

fn validate_ranges(input: &LeadInput) -> Result<(), ValidationError> {
    fn inverted<T: PartialOrd>(min: Option<T>, max: Option<T>) -> bool {
        matches!((min, max), (Some(min), Some(max)) if min > max)
    }

    if inverted(input.min_price_cents, input.max_price_cents)
        || inverted(input.min_bedrooms, input.max_bedrooms)
        || inverted(input.min_area_m2, input.max_area_m2)
    {
        return Err(ValidationError::new("inverted_range")
            .with_message("Minimum cannot be greater than maximum".into()));
    }
    Ok(())
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Lead {
    pub fn new(company_id: Uuid, user_id: Uuid, input: LeadInput) -> Result<Self, DomainError> {
        input.validate()?;
        let mut lead = Self {
            id: Uuid::new_v4(),
            company_id,
            user_id,
            name: String::new(),
            email: None,
            phone: None,
            source: input.source,
            status: input.status,
            interest: input.interest,
            property_type: None,
            min_price_cents: None,
            max_price_cents: None,
            min_bedrooms: None,
            max_bedrooms: None,
            min_bathrooms: None,
            min_area_m2: None,
            max_area_m2: None,
            city: None,
            state: None,
            neighborhoods: Vec::new(),
            needs_financing: false,
            notes: None,
            created_at: Utc::now(),
            modified_at: None,
        };
        lead.assign(input);
        Ok(lead)
    }

    pub fn apply(&mut self, input: LeadInput) -> Result<(), DomainError> {
        input.validate()?;
        self.assign(input);
        self.modified_at = Some(Utc::now());
        Ok(())
    }

    fn assign(&mut self, input: LeadInput) {
        self.name = input.name.trim().to_string();
        self.email = clean(input.email).map(|e| e.to_lowercase());
        self.phone = clean(input.phone);
        self.source = input.source;
        self.status = input.status;
        self.interest = input.interest;
        self.property_type = input.property_type;
        self.min_price_cents = input.min_price_cents;
        self.max_price_cents = input.max_price_cents;
        self.min_bedrooms = input.min_bedrooms;
        self.max_bedrooms = input.max_bedrooms;
        self.min_bathrooms = input.min_bathrooms;
        self.min_area_m2 = input.min_area_m2;
        self.max_area_m2 = input.max_area_m2;
        self.city = clean(input.city);
        self.state = clean(input.state).map(|s| s.to_uppercase());
        self.neighborhoods = input
            .neighborhoods
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        self.needs_financing = input.needs_financing;
        self.notes = input.notes;
    }

    /// Won and lost leads no longer take part in matching.
    pub fn is_open(&self) -> bool {
        !matches!(self.status, LeadStatus::Won | LeadStatus::Lost)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input() -> LeadInput {
        LeadInput {
            name: "Ana Costa".to_string(),
            email: Some("ana@mail.com".to_string()),
            phone: None,
            source: LeadSource::Website,
            status: LeadStatus::New,
            interest: InterestType::Rent,
            property_type: None,
            min_price_cents: Some(100_000),
            max_price_cents: Some(200_000),
            min_bedrooms: Some(2),
            max_bedrooms: None,
            min_bathrooms: None,
            min_area_m2: None,
            max_area_m2: None,
            city: Some("Curitiba".to_string()),
            state: Some("pr".to_string()),
            neighborhoods: vec![" Centro ".to_string(), "".to_string()],
            needs_financing: false,
            notes: None,
        }
    }

    #[test]
    fn test_create_lead_cleans_fields() {
        let lead = Lead::new(Uuid::new_v4(), Uuid::new_v4(), sample_input()).unwrap();
        assert_eq!(lead.state.as_deref(), Some("PR"));
        assert_eq!(lead.neighborhoods, vec!["Centro".to_string()]);
        assert!(lead.is_open());
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let mut input = sample_input();
        input.min_price_cents = Some(300_000);
        assert!(matches!(
            Lead::new(Uuid::new_v4(), Uuid::new_v4(), input),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn test_closed_lead() {
        let mut input = sample_input();
        input.status = LeadStatus::Lost;
        let lead = Lead::new(Uuid::new_v4(), Uuid::new_v4(), input).unwrap();
        assert!(!lead.is_open());
    }
}
