//! # CRM Security
//! 
//! Security utilities: JWT, password hashing, session cookies, webhook signatures.

pub mod jwt;
pub mod password;
pub mod session;
pub mod signature;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
pub use signature::WebhookSigner;
