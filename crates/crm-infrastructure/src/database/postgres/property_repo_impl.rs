// ============================================================================
// CRM Infrastructure - PostgreSQL Property Repository
// File: crates/crm-infrastructure/src/database/postgres/property_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::{Property, PropertyPurpose, PropertyStatus, PropertyType};
use crm_core::error::DomainError;
use crm_core::repositories::PropertyRepository;
use crm_shared::{Cents, Pagination};

use super::{db_error, foreign_key_violation, parse_enum};

const PROPERTY_COLUMNS: &str = "p.id, p.company_id, p.user_id, p.owner_id, p.title, p.description, \
    p.property_type, p.purpose, p.status, p.address, p.neighborhood, p.city, p.state, p.zip_code, \
    p.bedrooms, p.bathrooms, p.parking_spaces, p.area_m2, p.rent_price_cents, p.sale_price_cents, \
    p.condo_fee_cents, p.iptu_cents, p.accepts_financing, p.publish_to_marketplace, p.created_at, p.modified_at";

pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PropertyRow {
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    property_type: String,
    purpose: String,
    status: String,
    address: String,
    neighborhood: Option<String>,
    city: String,
    state: String,
    zip_code: Option<String>,
    bedrooms: i32,
    bathrooms: i32,
    parking_spaces: i32,
    area_m2: Option<f64>,
    rent_price_cents: Option<Cents>,
    sale_price_cents: Option<Cents>,
    condo_fee_cents: Option<Cents>,
    iptu_cents: Option<Cents>,
    accepts_financing: bool,
    publish_to_marketplace: bool,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = DomainError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(Property {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            property_type: parse_enum("property_type", &row.property_type, PropertyType::from_str)?,
            purpose: parse_enum("purpose", &row.purpose, PropertyPurpose::from_str)?,
            status: parse_enum("property status", &row.status, PropertyStatus::from_str)?,
            address: row.address,
            neighborhood: row.neighborhood,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            parking_spaces: row.parking_spaces,
            area_m2: row.area_m2,
            rent_price_cents: row.rent_price_cents,
            sale_price_cents: row.sale_price_cents,
            condo_fee_cents: row.condo_fee_cents,
            iptu_cents: row.iptu_cents,
            accepts_financing: row.accepts_financing,
            publish_to_marketplace: row.publish_to_marketplace,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

fn into_properties(rows: Vec<PropertyRow>) -> Result<Vec<Property>, DomainError> {
    rows.into_iter().map(TryInto::try_into).collect()
}

impl PgPropertyRepository {
    async fn fetch_where(&self, context: &str, clause: &str, id: &Uuid) -> Result<Vec<Property>, DomainError> {
        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p {} ORDER BY p.created_at DESC",
            PROPERTY_COLUMNS, clause
        ))
        .bind(id)
        .bind(PropertyStatus::Available.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(context, e))?;

        into_properties(rows)
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Property>, DomainError> {
        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p WHERE p.company_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
            PROPERTY_COLUMNS
        ))
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing properties", e))?;

        into_properties(rows)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Property>, DomainError> {
        let row: Option<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p WHERE p.id = $1",
            PROPERTY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding property", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, property: &Property) -> Result<Property, DomainError> {
        let row: PropertyRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO properties AS p (
                id, company_id, user_id, owner_id, title, description, property_type, purpose, status,
                address, neighborhood, city, state, zip_code, bedrooms, bathrooms, parking_spaces, area_m2,
                rent_price_cents, sale_price_cents, condo_fee_cents, iptu_cents, accepts_financing,
                publish_to_marketplace, created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                    $19, $20, $21, $22, $23, $24, $25, $26)
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        ))
        .bind(property.id)
        .bind(property.company_id)
        .bind(property.user_id)
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.property_type.as_str())
        .bind(property.purpose.as_str())
        .bind(property.status.as_str())
        .bind(&property.address)
        .bind(&property.neighborhood)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.zip_code)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.parking_spaces)
        .bind(property.area_m2)
        .bind(property.rent_price_cents)
        .bind(property.sale_price_cents)
        .bind(property.condo_fee_cents)
        .bind(property.iptu_cents)
        .bind(property.accepts_financing)
        .bind(property.publish_to_marketplace)
        .bind(property.created_at)
        .bind(property.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating property", e))?;

        row.try_into()
    }

    async fn update(&self, property: &Property) -> Result<Property, DomainError> {
        let row: PropertyRow = sqlx::query_as(&format!(
            r#"
            UPDATE properties AS p
            SET owner_id = $2, title = $3, description = $4, property_type = $5, purpose = $6,
                status = $7, address = $8, neighborhood = $9, city = $10, state = $11, zip_code = $12,
                bedrooms = $13, bathrooms = $14, parking_spaces = $15, area_m2 = $16,
                rent_price_cents = $17, sale_price_cents = $18, condo_fee_cents = $19, iptu_cents = $20,
                accepts_financing = $21, publish_to_marketplace = $22, modified_at = $23
            WHERE p.id = $1
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        ))
        .bind(property.id)
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.property_type.as_str())
        .bind(property.purpose.as_str())
        .bind(property.status.as_str())
        .bind(&property.address)
        .bind(&property.neighborhood)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.zip_code)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.parking_spaces)
        .bind(property.area_m2)
        .bind(property.rent_price_cents)
        .bind(property.sale_price_cents)
        .bind(property.condo_fee_cents)
        .bind(property.iptu_cents)
        .bind(property.accepts_financing)
        .bind(property.publish_to_marketplace)
        .bind(property.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating property", e))?;

        row.try_into()
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if foreign_key_violation(&e) {
                    DomainError::Conflict("Property is referenced by other records".to_string())
                } else {
                    db_error("deleting property", e)
                }
            })?;
        Ok(())
    }

    async fn list_available(&self, company_id: &Uuid) -> Result<Vec<Property>, DomainError> {
        self.fetch_where(
            "listing available properties",
            "WHERE p.company_id = $1 AND p.status = $2",
            company_id,
        )
        .await
    }

    /// Available properties of other brokers who take partnerships, colleagues
    /// included. Brokers without a settings row use the defaults, which allow them.
    async fn list_shared_available(&self, exclude_user_id: &Uuid) -> Result<Vec<Property>, DomainError> {
        self.fetch_where(
            "listing shared properties",
            "LEFT JOIN settings s ON s.user_id = p.user_id \
             WHERE p.user_id <> $1 AND p.status = $2 AND COALESCE(s.partnerships_enabled, TRUE)",
            exclude_user_id,
        )
        .await
    }

    async fn list_published(&self, company_id: &Uuid) -> Result<Vec<Property>, DomainError> {
        self.fetch_where(
            "listing published properties",
            "WHERE p.company_id = $1 AND p.status = $2 AND p.publish_to_marketplace",
            company_id,
        )
        .await
    }
}
