// ============================================================================
// CRM Core - Property Entity
// File: crates/crm-core/src/domain/property.rs
// Description: Listed property with rent/sale terms
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crm_shared::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    House,
    Apartment,
    Commercial,
    Land,
    Studio,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "HOUSE",
            PropertyType::Apartment => "APARTMENT",
            PropertyType::Commercial => "COMMERCIAL",
            PropertyType::Land => "LAND",
            PropertyType::Studio => "STUDIO",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HOUSE" => Some(PropertyType::House),
            "APARTMENT" => Some(PropertyType::Apartment),
            "COMMERCIAL" => Some(PropertyType::Commercial),
            "LAND" => Some(PropertyType::Land),
            "STUDIO" => Some(PropertyType::Studio),
            _ => None,
        }
    }
}

impl Default for PropertyType {
    fn default() -> Self {
        PropertyType::Apartment
    }
}

/// Whether the property is offered for rent, sale, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyPurpose {
    Rent,
    Sale,
    Both,
}

impl PropertyPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyPurpose::Rent => "RENT",
            PropertyPurpose::Sale => "SALE",
            PropertyPurpose::Both => "BOTH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "RENT" => Some(PropertyPurpose::Rent),
            "SALE" => Some(PropertyPurpose::Sale),
            "BOTH" => Some(PropertyPurpose::Both),
            _ => None,
        }
    }

    pub fn allows_rent(&self) -> bool {
        matches!(self, PropertyPurpose::Rent | PropertyPurpose::Both)
    }

    pub fn allows_sale(&self) -> bool {
        matches!(self, PropertyPurpose::Sale | PropertyPurpose::Both)
    }
}

impl Default for PropertyPurpose {
    fn default() -> Self {
        PropertyPurpose::Rent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Available,
    Rented,
    Sold,
    Unavailable,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "AVAILABLE",
            PropertyStatus::Rented => "RENTED",
            PropertyStatus::Sold => "SOLD",
            PropertyStatus::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(PropertyStatus::Available),
            "RENTED" => Some(PropertyStatus::Rented),
            "SOLD" => Some(PropertyStatus::Sold),
            "UNAVAILABLE" => Some(PropertyStatus::Unavailable),
            _ => None,
        }
    }
}

impl Default for PropertyStatus {
    fn default() -> Self {
        PropertyStatus::Available
    }
}

/// Property entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Broker responsible for the listing.
    pub user_id: Uuid,
    pub owner_id: Uuid,

    pub title: String,
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub purpose: PropertyPurpose,
    pub status: PropertyStatus,

    pub address: String,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,

    pub bedrooms: i32,
    pub bathrooms: i32,
    pub parking_spaces: i32,
    pub area_m2: Option<f64>,

    pub rent_price_cents: Option<Cents>,
    pub sale_price_cents: Option<Cents>,
    pub condo_fee_cents: Option<Cents>,
    pub iptu_cents: Option<Cents>,

    pub accepts_financing: bool,
    pub publish_to_marketplace: bool,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Create/update payload for [`Property`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PropertyInput {
    pub owner_id: Uuid,
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description too long"))]
    pub description: Option<String>,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub purpose: PropertyPurpose,
    #[serde(default)]
    pub status: PropertyStatus,
    #[validate(length(min = 3, message = "Address is required"))]
    pub address: String,
    pub neighborhood: Option<String>,
    #[validate(length(min = 2, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 2, max = 2, message = "State must be a 2-letter code"))]
    pub state: String,
    pub zip_code: Option<String>,
    #[validate(range(min = 0, max = 50))]
    #[serde(default)]
    pub bedrooms: i32,
    #[validate(range(min = 0, max = 50))]
    #[serde(default)]
    pub bathrooms: i32,
    #[validate(range(min = 0, max = 100))]
    #[serde(default)]
    pub parking_spaces: i32,
    #[validate(range(min = 0.0, message = "Area cannot be negative"))]
    pub area_m2: Option<f64>,
    #[validate(range(min = 0))]
    pub rent_price_cents: Option<Cents>,
    #[validate(range(min = 0))]
    pub sale_price_cents: Option<Cents>,
    #[validate(range(min = 0))]
    pub condo_fee_cents: Option<Cents>,
    #[validate(range(min = 0))]
    pub iptu_cents: Option<Cents>,
    #[serde(default)]
    pub accepts_financing: bool,
    #[serde(default)]
    pub publish_to_marketplace: bool,
}

impl PropertyInput {
    fn check_prices(&self) -> Result<(), String> {
        if self.purpose.allows_rent() && self.rent_price_cents.is_none() {
            return Err("Rent price is required for properties offered for rent".to_string());
        }
        if self.purpose.allows_sale() && self.sale_price_cents.is_none() {
            return Err("Sale price is required for properties offered for sale".to_string());
        }
        Ok(())
    }
}

impl Property {
    pub fn new(company_id: Uuid, user_id: Uuid, input: PropertyInput) -> Result<Self, crate::DomainError> {
        input.validate()?;
        input.check_prices().map_err(crate::DomainError::ValidationError)?;

        let mut property = Self {
            id: Uuid::new_v4(),
            company_id,
            user_id,
            owner_id: input.owner_id,
            title: String::new(),
            description: None,
            property_type: input.property_type,
            purpose: input.purpose,
            status: input.status,
            address: String::new(),
            neighborhood: None,
            city: String::new(),
            state: String::new(),
            zip_code: None,
            bedrooms: 0,
            bathrooms: 0,
            parking_spaces: 0,
            area_m2: None,
            rent_price_cents: None,
            sale_price_cents: None,
            condo_fee_cents: None,
            iptu_cents: None,
            accepts_financing: false,
            publish_to_marketplace: false,
            created_at: Utc::now(),
            modified_at: None,
        };
        property.assign(input);
        Ok(property)
    }

    pub fn apply(&mut self, input: PropertyInput) -> Result<(), crate::DomainError> {
        input.validate()?;
        input.check_prices().map_err(crate::DomainError::ValidationError)?;
        self.assign(input);
        self.modified_at = Some(Utc::now());
        Ok(())
    }

    fn assign(&mut self, input: PropertyInput) {
        self.owner_id = input.owner_id;
        self.title = input.title.trim().to_string();
        self.description = input.description;
        self.property_type = input.property_type;
        self.purpose = input.purpose;
        self.status = input.status;
        self.address = input.address.trim().to_string();
        self.neighborhood = input.neighborhood.map(|n| n.trim().to_string());
        self.city = input.city.trim().to_string();
        self.state = input.state.trim().to_uppercase();
        self.zip_code = input.zip_code;
        self.bedrooms = input.bedrooms;
        self.bathrooms = input.bathrooms;
        self.parking_spaces = input.parking_spaces;
        self.area_m2 = input.area_m2;
        self.rent_price_cents = input.rent_price_cents;
        self.sale_price_cents = input.sale_price_cents;
        self.condo_fee_cents = input.condo_fee_cents;
        self.iptu_cents = input.iptu_cents;
        self.accepts_financing = input.accepts_financing;
        self.publish_to_marketplace = input.publish_to_marketplace;
    }

    pub fn is_available(&self) -> bool {
        self.status == PropertyStatus::Available
    }

    pub fn set_status(&mut self, status: PropertyStatus) {
        self.status = status;
        self.modified_at = Some(Utc::now());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input() -> PropertyInput {
        PropertyInput {
            owner_id: Uuid::new_v4(),
            title: "Apartamento 2 quartos".to_string(),
            description: None,
            property_type: PropertyType::Apartment,
            purpose: PropertyPurpose::Rent,
            status: PropertyStatus::Available,
            address: "Rua das Flores, 100".to_string(),
            neighborhood: Some("Centro".to_string()),
            city: "Curitiba".to_string(),
            state: "pr".to_string(),
            zip_code: None,
            bedrooms: 2,
            bathrooms: 1,
            parking_spaces: 1,
            area_m2: Some(65.0),
            rent_price_cents: Some(180_000),
            sale_price_cents: None,
            condo_fee_cents: None,
            iptu_cents: None,
            accepts_financing: false,
            publish_to_marketplace: true,
        }
    }

    #[test]
    fn test_create_property() {
        let property = Property::new(Uuid::new_v4(), Uuid::new_v4(), sample_input()).unwrap();
        assert_eq!(property.state, "PR");
        assert!(property.is_available());
    }

    #[test]
    fn test_rent_requires_price() {
        let mut input = sample_input();
        input.rent_price_cents = None;
        assert!(Property::new(Uuid::new_v4(), Uuid::new_v4(), input).is_err());
    }

    #[test]
    fn test_purpose_flags() {
        assert!(PropertyPurpose::Both.allows_rent());
        assert!(PropertyPurpose::Both.allows_sale());
        assert!(!PropertyPurpose::Sale.allows_rent());
    }
}
