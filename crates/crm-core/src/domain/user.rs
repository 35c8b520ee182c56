//! User (broker) domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Broker,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Broker => "BROKER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(UserRole::Admin),
            "BROKER" => Some(UserRole::Broker),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Broker
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,
    /// Broker registration number.
    pub creci: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,

    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        company_id: Uuid,
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            company_id,
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            creci: None,
            phone: None,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            modified_at: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.modified_at = Some(now);
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_normalizes_email() {
        let user = User::new(
            Uuid::new_v4(),
            " Maria Souza ".to_string(),
            " Maria@Imob.COM ".to_string(),
            "hash".to_string(),
            UserRole::Admin,
        )
        .unwrap();

        assert_eq!(user.email, "maria@imob.com");
        assert_eq!(user.name, "Maria Souza");
        assert!(user.can_login());
        assert!(user.is_admin());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let user = User::new(
            Uuid::new_v4(),
            "Maria".to_string(),
            "not-an-email".to_string(),
            "hash".to_string(),
            UserRole::Broker,
        );
        assert!(user.is_err());
    }
}
