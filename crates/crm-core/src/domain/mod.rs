//! # CRM Core - Domain Module
//! 
//! Domain entities for the CRM application.

pub mod company;
pub mod user;
pub mod owner;
pub mod tenant;
pub mod property;
pub mod contract;
pub mod payment;
pub mod lead;
pub mod notification;
pub mod partnership;
pub mod monthly_report;
pub mod settings;

// Re-export all entities and enums
pub use company::{Company, CompanyInput};
pub use user::{User, UserRole};
pub use owner::Owner;
pub use tenant::Tenant;
pub use property::{Property, PropertyPurpose, PropertyStatus, PropertyType};
pub use contract::{Contract, ContractStatus};
pub use payment::{Payment, PaymentStatus, Settlement};
pub use lead::{InterestType, Lead, LeadSource, LeadStatus};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use partnership::{PartnershipNotification, PartnershipStatus};
pub use monthly_report::MonthlyReport;
pub use settings::Settings;
