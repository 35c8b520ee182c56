//! # CRM Core
//! 
//! Domain entities, services, repository traits, and the lead/property
//! matching engine for the CRM application.

pub mod domain;
pub mod matching;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
