// ============================================================================
// CRM Core - Authentication Service
// File: crates/crm-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service with register, login, and current-user lookup

use std::sync::Arc;
use serde::Deserialize;
use uuid::Uuid;
use tracing::{info, warn, error};
use validator::Validate;

use crm_security::jwt::JwtService;
use crm_security::password::PasswordService;
use crm_shared::utils::mask_email;

use crate::domain::{Company, Settings, User, UserRole};
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Sign-up payload: creates a company and its first (admin) user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 2, max = 150, message = "Company name must be between 2 and 150 characters"))]
    pub company_name: String,
    pub company_document: Option<String>,
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    pub password: String,
    pub creci: Option<String>,
    pub phone: Option<String>,
}

/// Result of a successful login or registration
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self { user_repo, jwt }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<AuthResult, DomainError> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();
        info!("Registration attempt for email: {}", mask_email(&email));

        // 1. Email must be unique across all companies
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", mask_email(&email));
            return Err(DomainError::EmailAlreadyExists(email));
        }

        // 2. Password policy
        PasswordService::check_strength(&input.password, &[&email, &input.name])?;
        let password_hash = PasswordService::hash(&input.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        // 3. Company, admin user and default settings
        let company = Company::new(input.company_name, input.company_document)?;
        let mut user = User::new(company.id, input.name, email, password_hash, UserRole::Admin)?;
        user.creci = input.creci;
        user.phone = input.phone;
        let settings = Settings::defaults(user.id, company.id);

        let created = self.user_repo.register(&company, &user, &settings).await?;
        info!("Registration successful: user {} company {}", created.id, company.id);

        self.issue(created)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, DomainError> {
        let email = email.trim().to_lowercase();
        info!("Login attempt for email: {}", mask_email(&email));

        let user = self.user_repo.find_by_email(&email).await?
            .ok_or_else(|| {
                warn!("Login failed: email not found: {}", mask_email(&email));
                DomainError::InvalidCredentials
            })?;

        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for: {}", mask_email(&email));
            return Err(DomainError::InvalidCredentials);
        }

        if !user.can_login() {
            warn!("Login failed: user {} is inactive", user.id);
            return Err(DomainError::UserNotActive);
        }

        let mut updated = user.clone();
        updated.record_login();
        let updated = match self.user_repo.update(&updated).await {
            Ok(saved) => saved,
            Err(e) => {
                // Login still succeeds.
                error!("Failed to update last login: {}", e);
                user
            }
        };

        info!("Login successful for user {}", updated.id);
        self.issue(updated)
    }

    pub async fn current_user(&self, user_id: &Uuid) -> Result<User, DomainError> {
        let user = self.user_repo.find_by_id(user_id).await?
            .ok_or(DomainError::NotFound("User"))?;
        if !user.can_login() {
            return Err(DomainError::UserNotActive);
        }
        Ok(user)
    }

    fn issue(&self, user: User) -> Result<AuthResult, DomainError> {
        let access_token = self.jwt
            .generate_access_token(&user.id, &user.company_id, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        Ok(AuthResult {
            user,
            access_token,
            expires_in: self.jwt.access_token_expiry(),
        })
    }
}
