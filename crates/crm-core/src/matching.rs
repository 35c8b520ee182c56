//! Lead/property matching
//!
//! A property matches a lead when every criterion the lead sets holds. Every
//! caller (lead changes, property changes, partnership detection, the
//! `/matches` endpoint) goes through [`evaluate`].

use serde::Serialize;

use crm_shared::utils::normalize_text;
use crm_shared::Cents;

use crate::domain::{InterestType, Lead, Property, PropertyStatus, PropertyType};

/// A single failed matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Status,
    Purpose,
    PropertyType,
    MissingPrice,
    PriceMin,
    PriceMax,
    BedroomsMin,
    BedroomsMax,
    BathroomsMin,
    MissingArea,
    AreaMin,
    AreaMax,
    City,
    State,
    Neighborhood,
    Financing,
}

/// Search preferences extracted from a [`Lead`], with location fields
/// pre-normalised.
#[derive(Debug, Clone)]
pub struct LeadCriteria {
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
}

impl From<&Lead> for LeadCriteria {
    fn from(lead: &Lead) -> Self {
        Self {
            interest: lead.interest,
            property_type: lead.property_type,
            min_price_cents: lead.min_price_cents,
            max_price_cents: lead.max_price_cents,
            min_bedrooms: lead.min_bedrooms,
            max_bedrooms: lead.max_bedrooms,
            min_bathrooms: lead.min_bathrooms,
            min_area_m2: lead.min_area_m2,
            max_area_m2: lead.max_area_m2,
            city: lead.city.as_deref().map(normalize_text).filter(|c| !c.is_empty()),
            state: lead.state.as_deref().map(normalize_text).filter(|s| !s.is_empty()),
            neighborhoods: lead
                .neighborhoods
                .iter()
                .map(|n| normalize_text(n))
                .filter(|n| !n.is_empty())
                .collect(),
            needs_financing: lead.needs_financing,
        }
    }
}

impl LeadCriteria {
    fn has_price_bound(&self) -> bool {
        self.min_price_cents.is_some() || self.max_price_cents.is_some()
    }

    fn has_area_bound(&self) -> bool {
        self.min_area_m2.is_some() || self.max_area_m2.is_some()
    }
}

/// Outcome of evaluating one property against one lead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub failed: Vec<Criterion>,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        self.failed.is_empty()
    }

    fn fail(&mut self, criterion: Criterion) {
        self.failed.push(criterion);
    }
}

/// Price the lead would pay for this property, given its interest.
pub fn relevant_price(interest: InterestType, property: &Property) -> Option<Cents> {
    match interest {
        InterestType::Rent => property.rent_price_cents,
        InterestType::Buy => property.sale_price_cents,
    }
}

/// Evaluate every rule; all bounds are inclusive.
pub fn evaluate(criteria: &LeadCriteria, property: &Property) -> MatchReport {
    let mut report = MatchReport::default();

    if property.status != PropertyStatus::Available {
        report.fail(Criterion::Status);
    }

    let purpose_ok = match criteria.interest {
        InterestType::Rent => property.purpose.allows_rent(),
        InterestType::Buy => property.purpose.allows_sale(),
    };
    if !purpose_ok {
        report.fail(Criterion::Purpose);
    }

    if let Some(wanted) = criteria.property_type {
        if wanted != property.property_type {
            report.fail(Criterion::PropertyType);
        }
    }

    if criteria.has_price_bound() {
        match relevant_price(criteria.interest, property) {
            None => report.fail(Criterion::MissingPrice),
            Some(price) => {
                if criteria.min_price_cents.is_some_and(|min| price < min) {
                    report.fail(Criterion::PriceMin);
                }
                if criteria.max_price_cents.is_some_and(|max| price > max) {
                    report.fail(Criterion::PriceMax);
                }
            }
        }
    }

    if criteria.min_bedrooms.is_some_and(|min| property.bedrooms < min) {
        report.fail(Criterion::BedroomsMin);
    }
    if criteria.max_bedrooms.is_some_and(|max| property.bedrooms > max) {
        report.fail(Criterion::BedroomsMax);
    }
    if criteria.min_bathrooms.is_some_and(|min| property.bathrooms < min) {
        report.fail(Criterion::BathroomsMin);
    }

    if criteria.has_area_bound() {
        match property.area_m2 {
            None => report.fail(Criterion::MissingArea),
            Some(area) => {
                if criteria.min_area_m2.is_some_and(|min| area < min) {
                    report.fail(Criterion::AreaMin);
                }
                if criteria.max_area_m2.is_some_and(|max| area > max) {
                    report.fail(Criterion::AreaMax);
                }
            }
        }
    }

    if let Some(city) = &criteria.city {
        if normalize_text(&property.city) != *city {
            report.fail(Criterion::City);
        }
    }
    if let Some(state) = &criteria.state {
        if normalize_text(&property.state) != *state {
            report.fail(Criterion::State);
        }
    }
    if !criteria.neighborhoods.is_empty() {
        let neighborhood = property.neighborhood.as_deref().map(normalize_text);
        let listed = neighborhood
            .as_ref()
            .is_some_and(|n| criteria.neighborhoods.iter().any(|wanted| wanted == n));
        if !listed {
            report.fail(Criterion::Neighborhood);
        }
    }

    if criteria.needs_financing && !property.accepts_financing {
        report.fail(Criterion::Financing);
    }

    report
}

/// Convenience wrapper for a single lead/property pair.
pub fn is_match(lead: &Lead, property: &Property) -> bool {
    evaluate(&LeadCriteria::from(lead), property).is_match()
}

/// Properties from `candidates` that match `lead`, in input order.
pub fn matching_properties<'a>(lead: &Lead, candidates: &'a [Property]) -> Vec<&'a Property> {
    let criteria = LeadCriteria::from(lead);
    candidates
        .iter()
        .filter(|property| evaluate(&criteria, property).is_match())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::tests::sample_input as lead_input;
    use crate::domain::property::tests::sample_input as property_input;
    use crate::domain::PropertyPurpose;
    use uuid::Uuid;

    fn lead() -> Lead {
        Lead::new(Uuid::new_v4(), Uuid::new_v4(), lead_input()).unwrap()
    }

    fn property() -> Property {
        Property::new(Uuid::new_v4(), Uuid::new_v4(), property_input()).unwrap()
    }

    fn failed(lead: &Lead, property: &Property) -> Vec<Criterion> {
        evaluate(&LeadCriteria::from(lead), property).failed
    }

    #[test]
    fn test_baseline_matches() {
        assert!(is_match(&lead(), &property()));
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let lead = lead();
        let mut property = property();

        property.rent_price_cents = Some(100_000);
        assert!(is_match(&lead, &property));
        property.rent_price_cents = Some(200_000);
        assert!(is_match(&lead, &property));

        property.rent_price_cents = Some(99_999);
        assert_eq!(failed(&lead, &property), vec![Criterion::PriceMin]);
        property.rent_price_cents = Some(200_001);
        assert_eq!(failed(&lead, &property), vec![Criterion::PriceMax]);
    }

    #[test]
    fn test_missing_price_fails_when_bounded() {
        let lead = lead();
        let mut property = property();
        property.rent_price_cents = None;
        assert_eq!(failed(&lead, &property), vec![Criterion::MissingPrice]);
    }

    #[test]
    fn test_buy_interest_uses_sale_price() {
        let mut lead = lead();
        lead.interest = InterestType::Buy;
        lead.min_price_cents = Some(400_000_00);
        lead.max_price_cents = Some(500_000_00);

        let mut property = property();
        assert!(failed(&lead, &property).contains(&Criterion::Purpose));

        property.purpose = PropertyPurpose::Both;
        property.sale_price_cents = Some(450_000_00);
        assert!(is_match(&lead, &property));
    }

    #[test]
    fn test_bedroom_boundaries() {
        let mut lead = lead();
        lead.min_bedrooms = Some(2);
        lead.max_bedrooms = Some(3);
        let mut property = property();

        property.bedrooms = 2;
        assert!(is_match(&lead, &property));
        property.bedrooms = 3;
        assert!(is_match(&lead, &property));
        property.bedrooms = 1;
        assert_eq!(failed(&lead, &property), vec![Criterion::BedroomsMin]);
        property.bedrooms = 4;
        assert_eq!(failed(&lead, &property), vec![Criterion::BedroomsMax]);
    }

    #[test]
    fn test_area_boundaries() {
        let mut lead = lead();
        lead.min_area_m2 = Some(60.0);
        lead.max_area_m2 = Some(65.0);
        let mut property = property();

        property.area_m2 = Some(60.0);
        assert!(is_match(&lead, &property));
        property.area_m2 = Some(65.0);
        assert!(is_match(&lead, &property));
        property.area_m2 = Some(59.9);
        assert_eq!(failed(&lead, &property), vec![Criterion::AreaMin]);
        property.area_m2 = None;
        assert_eq!(failed(&lead, &property), vec![Criterion::MissingArea]);
    }

    #[test]
    fn test_location_is_case_insensitive() {
        let mut lead = lead();
        lead.city = Some("  CURITIBA ".to_string());
        lead.neighborhoods = vec!["centro".to_string(), "Batel".to_string()];
        let mut property = property();
        assert!(is_match(&lead, &property));

        property.neighborhood = Some("Água Verde".to_string());
        assert_eq!(failed(&lead, &property), vec![Criterion::Neighborhood]);

        property.neighborhood = None;
        assert_eq!(failed(&lead, &property), vec![Criterion::Neighborhood]);

        property.neighborhood = Some("Batel".to_string());
        property.city = "Londrina".to_string();
        assert_eq!(failed(&lead, &property), vec![Criterion::City]);
    }

    #[test]
    fn test_financing_and_status() {
        let mut lead = lead();
        lead.needs_financing = true;
        let mut property = property();
        property.status = PropertyStatus::Rented;

        assert_eq!(
            failed(&lead, &property),
            vec![Criterion::Status, Criterion::Financing]
        );

        property.status = PropertyStatus::Available;
        property.accepts_financing = true;
        assert!(is_match(&lead, &property));
    }

    #[test]
    fn test_property_type_filter() {
        let mut lead = lead();
        lead.property_type = Some(PropertyType::House);
        assert_eq!(failed(&lead, &property()), vec![Criterion::PropertyType]);
    }

    #[test]
    fn test_unbounded_lead_matches_any_available_rental() {
        let mut lead = lead();
        lead.min_price_cents = None;
        lead.max_price_cents = None;
        lead.min_bedrooms = None;
        lead.city = None;
        lead.state = None;
        lead.neighborhoods.clear();

        let mut property = property();
        property.rent_price_cents = None;
        property.bedrooms = 0;
        property.city = "Recife".to_string();
        assert!(is_match(&lead, &property));
    }

    #[test]
    fn test_matching_properties_filters() {
        let lead = lead();
        let good = property();
        let mut bad = property();
        bad.bedrooms = 1;

        let candidates = vec![bad, good.clone()];
        let matched = matching_properties(&lead, &candidates);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, good.id);
    }
}
