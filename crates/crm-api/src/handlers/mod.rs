//! HTTP handlers, one module per resource

pub mod auth;
pub mod company;
pub mod contracts;
pub mod health;
pub mod leads;
pub mod marketplace;
pub mod notifications;
pub mod owners;
pub mod partnerships;
pub mod payments;
pub mod properties;
pub mod reports;
pub mod settings;
pub mod tenants;

use chrono::{NaiveDate, Utc};

use crm_core::services::Actor;
use crm_core::UserRole;

use crate::error::ApiError;

/// Calendar day used for due dates, lateness and expiry.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.role == UserRole::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Administrator role required".to_string()))
    }
}
