// ============================================================================
// CRM Infrastructure - PostgreSQL Lead Repository
// File: crates/crm-infrastructure/src/database/postgres/lead_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::{InterestType, Lead, LeadSource, LeadStatus, PropertyType};
use crm_core::error::DomainError;
use crm_core::repositories::LeadRepository;
use crm_shared::{Cents, Pagination};

use super::{db_error, parse_enum};

const LEAD_COLUMNS: &str = "l.id, l.company_id, l.user_id, l.name, l.email, l.phone, l.source, l.status, \
    l.interest, l.property_type, l.min_price_cents, l.max_price_cents, l.min_bedrooms, l.max_bedrooms, \
    l.min_bathrooms, l.min_area_m2, l.max_area_m2, l.city, l.state, l.neighborhoods, l.needs_financing, \
    l.notes, l.created_at, l.modified_at";

/// Statuses that take no further part in matching.
const CLOSED_STATUSES: [LeadStatus; 2] = [LeadStatus::Won, LeadStatus::Lost];

pub struct PgLeadRepository {
    pool: PgPool,
}

impl PgLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LeadRow {
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    source: String,
    status: String,
    interest: String,
    property_type: Option<String>,
    min_price_cents: Option<Cents>,
    max_price_cents: Option<Cents>,
    min_bedrooms: Option<i32>,
    max_bedrooms: Option<i32>,
    min_bathrooms: Option<i32>,
    min_area_m2: Option<f64>,
    max_area_m2: Option<f64>,
    city: Option<String>,
    state: Option<String>,
    neighborhoods: Vec<String>,
    needs_financing: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = DomainError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let property_type = row
            .property_type
            .as_deref()
            .map(|t| parse_enum("property_type", t, PropertyType::from_str))
            .transpose()?;

        Ok(Lead {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            source: parse_enum("lead source", &row.source, LeadSource::from_str)?,
            status: parse_enum("lead status", &row.status, LeadStatus::from_str)?,
            interest: parse_enum("interest", &row.interest, InterestType::from_str)?,
            property_type,
            min_price_cents: row.min_price_cents,
            max_price_cents: row.max_price_cents,
            min_bedrooms: row.min_bedrooms,
            max_bedrooms: row.max_bedrooms,
            min_bathrooms: row.min_bathrooms,
            min_area_m2: row.min_area_m2,
            max_area_m2: row.max_area_m2,
            city: row.city,
            state: row.state,
            neighborhoods: row.neighborhoods,
            needs_financing: row.needs_financing,
            notes: row.notes,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

fn into_leads(rows: Vec<LeadRow>) -> Result<Vec<Lead>, DomainError> {
    rows.into_iter().map(TryInto::try_into).collect()
}

impl PgLeadRepository {
    async fn list_open(&self, context: &str, clause: &str, id: &Uuid) -> Result<Vec<Lead>, DomainError> {
        let rows: Vec<LeadRow> = sqlx::query_as(&format!(
            "SELECT {} FROM leads l {} AND l.status NOT IN ($2, $3) ORDER BY l.created_at DESC",
            LEAD_COLUMNS, clause
        ))
        .bind(id)
        .bind(CLOSED_STATUSES[0].as_str())
        .bind(CLOSED_STATUSES[1].as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(context, e))?;

        into_leads(rows)
    }
}

#[async_trait]
impl LeadRepository for PgLeadRepository {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Lead>, DomainError> {
        let rows: Vec<LeadRow> = sqlx::query_as(&format!(
            "SELECT {} FROM leads l WHERE l.company_id = $1 ORDER BY l.created_at DESC LIMIT $2 OFFSET $3",
            LEAD_COLUMNS
        ))
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing leads", e))?;

        into_leads(rows)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Lead>, DomainError> {
        let row: Option<LeadRow> = sqlx::query_as(&format!("SELECT {} FROM leads l WHERE l.id = $1", LEAD_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding lead", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, lead: &Lead) -> Result<Lead, DomainError> {
        let row: LeadRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO leads AS l (
                id, company_id, user_id, name, email, phone, source, status, interest, property_type,
                min_price_cents, max_price_cents, min_bedrooms, max_bedrooms, min_bathrooms,
                min_area_m2, max_area_m2, city, state, neighborhoods, needs_financing, notes,
                created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                    $19, $20, $21, $22, $23, $24)
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(lead.id)
        .bind(lead.company_id)
        .bind(lead.user_id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.source.as_str())
        .bind(lead.status.as_str())
        .bind(lead.interest.as_str())
        .bind(lead.property_type.map(|t| t.as_str()))
        .bind(lead.min_price_cents)
        .bind(lead.max_price_cents)
        .bind(lead.min_bedrooms)
        .bind(lead.max_bedrooms)
        .bind(lead.min_bathrooms)
        .bind(lead.min_area_m2)
        .bind(lead.max_area_m2)
        .bind(&lead.city)
        .bind(&lead.state)
        .bind(&lead.neighborhoods)
        .bind(lead.needs_financing)
        .bind(&lead.notes)
        .bind(lead.created_at)
        .bind(lead.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating lead", e))?;

        row.try_into()
    }

    async fn update(&self, lead: &Lead) -> Result<Lead, DomainError> {
        let row: LeadRow = sqlx::query_as(&format!(
            r#"
            UPDATE leads AS l
            SET name = $2, email = $3, phone = $4, source = $5, status = $6, interest = $7,
                property_type = $8, min_price_cents = $9, max_price_cents = $10, min_bedrooms = $11,
                max_bedrooms = $12, min_bathrooms = $13, min_area_m2 = $14, max_area_m2 = $15,
                city = $16, state = $17, neighborhoods = $18, needs_financing = $19, notes = $20,
                modified_at = $21
            WHERE l.id = $1
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(lead.id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.source.as_str())
        .bind(lead.status.as_str())
        .bind(lead.interest.as_str())
        .bind(lead.property_type.map(|t| t.as_str()))
        .bind(lead.min_price_cents)
        .bind(lead.max_price_cents)
        .bind(lead.min_bedrooms)
        .bind(lead.max_bedrooms)
        .bind(lead.min_bathrooms)
        .bind(lead.min_area_m2)
        .bind(lead.max_area_m2)
        .bind(&lead.city)
        .bind(&lead.state)
        .bind(&lead.neighborhoods)
        .bind(lead.needs_financing)
        .bind(&lead.notes)
        .bind(lead.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating lead", e))?;

        row.try_into()
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting lead", e))?;
        Ok(())
    }

    async fn list_open_by_company(&self, company_id: &Uuid) -> Result<Vec<Lead>, DomainError> {
        self.list_open("listing open leads", "WHERE l.company_id = $1", company_id).await
    }

    async fn list_open_by_user(&self, user_id: &Uuid) -> Result<Vec<Lead>, DomainError> {
        self.list_open("listing broker leads", "WHERE l.user_id = $1", user_id).await
    }

    /// Open leads of other brokers who take partnerships, colleagues included.
    async fn list_shared_open(&self, exclude_user_id: &Uuid) -> Result<Vec<Lead>, DomainError> {
        self.list_open(
            "listing shared leads",
            "LEFT JOIN settings s ON s.user_id = l.user_id \
             WHERE l.user_id <> $1 AND COALESCE(s.partnerships_enabled, TRUE)",
            exclude_user_id,
        )
        .await
    }
}
