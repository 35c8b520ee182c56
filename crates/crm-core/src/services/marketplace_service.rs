//! OLX marketplace integration: listing export and inbound lead webhook

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::lead_service::LeadService;
use super::Actor;
use crate::domain::lead::LeadInput;
use crate::domain::{InterestType, Lead, LeadSource, LeadStatus, Property, PropertyPurpose, PropertyType};
use crate::error::DomainError;
use crate::repositories::PropertyRepository;

/// One ad in the OLX feed. Prices are whole reais.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlxListing {
    pub listing_id: Uuid,
    pub operation: &'static str,
    pub category: &'static str,
    pub subject: String,
    pub body: String,
    pub price: i64,
    pub zipcode: Option<String>,
    pub address: String,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub rooms: i32,
    pub bathrooms: i32,
    pub garage_spaces: i32,
    pub size: Option<i64>,
    pub condominium: Option<i64>,
    pub iptu: Option<i64>,
}

/// Contact request posted by OLX when a user answers an ad.
#[derive(Debug, Clone, Deserialize)]
pub struct OlxLeadPayload {
    pub listing_id: Uuid,
    /// `rent` or `sale`; inferred from the property when absent.
    pub operation: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

fn category(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Apartment | PropertyType::Studio => "apartamentos",
        PropertyType::House => "casas",
        PropertyType::Commercial => "comercio-e-industria",
        PropertyType::Land => "terrenos",
    }
}

fn reais(cents: i64) -> i64 {
    cents / 100
}

fn listing(property: &Property, operation: &'static str, price_cents: i64) -> OlxListing {
    OlxListing {
        listing_id: property.id,
        operation,
        category: category(property.property_type),
        subject: property.title.clone(),
        body: property.description.clone().unwrap_or_else(|| property.title.clone()),
        price: reais(price_cents),
        zipcode: property.zip_code.clone(),
        address: property.address.clone(),
        neighborhood: property.neighborhood.clone(),
        city: property.city.clone(),
        state: property.state.clone(),
        rooms: property.bedrooms,
        bathrooms: property.bathrooms,
        garage_spaces: property.parking_spaces,
        size: property.area_m2.map(|a| a.round() as i64),
        condominium: property.condo_fee_cents.map(reais),
        iptu: property.iptu_cents.map(reais),
    }
}

/// One ad per operation the property is offered for and has a price for.
pub fn to_listings(property: &Property) -> Vec<OlxListing> {
    let mut listings = Vec::new();
    if property.purpose.allows_rent() {
        if let Some(price) = property.rent_price_cents {
            listings.push(listing(property, "rent", price));
        }
    }
    if property.purpose.allows_sale() {
        if let Some(price) = property.sale_price_cents {
            listings.push(listing(property, "sale", price));
        }
    }
    listings
}

#[derive(Clone)]
pub struct MarketplaceService {
    property_repo: Arc<dyn PropertyRepository>,
    leads: LeadService,
}

impl MarketplaceService {
    pub fn new(property_repo: Arc<dyn PropertyRepository>, leads: LeadService) -> Self {
        Self { property_repo, leads }
    }

    pub async fn export_listings(&self, actor: &Actor) -> Result<Vec<OlxListing>, DomainError> {
        let properties = self.property_repo.list_published(&actor.company_id).await?;
        let listings: Vec<OlxListing> = properties.iter().flat_map(to_listings).collect();
        info!(
            "OLX export for company {}: {} listings from {} properties",
            actor.company_id,
            listings.len(),
            properties.len()
        );
        Ok(listings)
    }

    /// Turns an OLX contact into a lead owned by the listing's broker.
    pub async fn ingest_lead(&self, payload: OlxLeadPayload) -> Result<Lead, DomainError> {
        let property = self.property_repo.find_by_id(&payload.listing_id).await?
            .ok_or(DomainError::NotFound("Listing"))?;

        let interest = match payload.operation.as_deref() {
            Some("sale") => InterestType::Buy,
            Some("rent") => InterestType::Rent,
            Some(other) => {
                return Err(DomainError::ValidationError(format!("Unknown operation: {}", other)));
            }
            None if property.purpose == PropertyPurpose::Sale => InterestType::Buy,
            None => InterestType::Rent,
        };

        let input = LeadInput {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            source: LeadSource::Olx,
            status: LeadStatus::New,
            interest,
            property_type: Some(property.property_type),
            min_price_cents: None,
            max_price_cents: None,
            min_bedrooms: None,
            max_bedrooms: None,
            min_bathrooms: None,
            min_area_m2: None,
            max_area_m2: None,
            city: Some(property.city.clone()),
            state: Some(property.state.clone()),
            neighborhoods: property.neighborhood.clone().into_iter().collect(),
            needs_financing: false,
            notes: payload.message,
        };

        let lead = self.leads.create_for(property.company_id, property.user_id, input).await?;
        info!("OLX lead {} received for listing {}", lead.id, property.id);
        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::tests::sample_input;
    use crate::repositories::*;
    use crate::services::match_service::MatchService;
    use crate::services::notification_service::NotificationService;
    use crate::services::partnership_service::PartnershipService;

    fn service(properties: MockPropertyRepository, leads: MockLeadRepository) -> MarketplaceService {
        let properties: Arc<dyn PropertyRepository> = Arc::new(properties);
        let leads: Arc<dyn LeadRepository> = Arc::new(leads);
        let mut settings = MockSettingsRepository::new();
        settings.expect_find_by_user().returning(|_| Ok(None));
        let settings: Arc<dyn SettingsRepository> = Arc::new(settings);
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_insert_if_absent().returning(|_, _| Ok(true));
        let notifications = NotificationService::new(Arc::new(notifications));
        let partnerships = PartnershipService::new(
            Arc::new(MockPartnershipRepository::new()),
            leads.clone(),
            properties.clone(),
            settings.clone(),
            notifications.clone(),
        );
        let matcher = MatchService::new(properties.clone(), leads.clone(), settings, notifications, partnerships);
        MarketplaceService::new(properties, LeadService::new(leads, matcher))
    }

    #[test]
    fn test_both_purpose_exports_two_ads() {
        let mut input = sample_input();
        input.purpose = PropertyPurpose::Both;
        input.sale_price_cents = Some(450_000_00);
        input.condo_fee_cents = Some(55_050);
        let property = Property::new(Uuid::new_v4(), Uuid::new_v4(), input).unwrap();

        let listings = to_listings(&property);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].operation, "rent");
        assert_eq!(listings[0].price, 1_800);
        assert_eq!(listings[0].condominium, Some(550));
        assert_eq!(listings[1].operation, "sale");
        assert_eq!(listings[1].price, 450_000);
        assert_eq!(listings[1].category, "apartamentos");
    }

    #[tokio::test]
    async fn test_ingest_creates_olx_lead_for_listing_broker() {
        let property = Property::new(Uuid::new_v4(), Uuid::new_v4(), sample_input()).unwrap();
        let listing_id = property.id;
        let broker = property.user_id;
        let mut properties = MockPropertyRepository::new();
        properties.expect_find_by_id().returning(move |_| Ok(Some(property.clone())));
        properties.expect_list_available().returning(|_| Ok(vec![]));
        properties.expect_list_shared_available().returning(|_| Ok(vec![]));
        let mut leads = MockLeadRepository::new();
        leads.expect_create()
            .withf(move |l| l.user_id == broker && l.source == LeadSource::Olx && l.city.as_deref() == Some("Curitiba"))
            .times(1)
            .returning(|l| Ok(l.clone()));

        let payload = OlxLeadPayload {
            listing_id,
            operation: None,
            name: "Pedro Alves".to_string(),
            email: Some("pedro@mail.com".to_string()),
            phone: None,
            message: Some("Is it still available?".to_string()),
        };
        let lead = service(properties, leads).ingest_lead(payload).await.unwrap();
        assert_eq!(lead.interest, InterestType::Rent);
        assert_eq!(lead.neighborhoods, vec!["Centro".to_string()]);
    }

    #[tokio::test]
    async fn test_ingest_unknown_listing_is_not_found() {
        let mut properties = MockPropertyRepository::new();
        properties.expect_find_by_id().returning(|_| Ok(None));
        let payload = OlxLeadPayload {
            listing_id: Uuid::new_v4(),
            operation: Some("rent".to_string()),
            name: "Pedro Alves".to_string(),
            email: None,
            phone: None,
            message: None,
        };
        let result = service(properties, MockLeadRepository::new()).ingest_lead(payload).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
