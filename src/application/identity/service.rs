//! User service, application-layer orchestration
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::support::errors::InfraError;
use crate::support::validations::normalize_email;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let invalid = || DomainError::Unauthorized("Invalid credentials".into());

        let email = normalize_email(email).ok_or_else(invalid)?;
        let user = self
            .repos
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(invalid());
        }

        let token = create_token(user.id, &user.email, user.role, &self.jwt_config)
            .map_err(|e| InfraError::Crypto(format!("token signing failed: {e}")))?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a festival-goer account (role: public).
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<User> {
        self.create_user(email, password, UserRole::Public).await
    }

    /// Create the configured organizer when the user table is empty.
    ///
    /// Returns `None` when users already exist.
    pub async fn ensure_default_organizer(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }
        let user = self.create_user(email, password, UserRole::Organizer).await?;
        info!(user_id = user.id, email = %user.email, "Default organizer created");
        Ok(Some(user))
    }

    async fn create_user(&self, email: &str, password: &str, role: UserRole) -> DomainResult<User> {
        let email = normalize_email(email)
            .ok_or_else(|| DomainError::Validation("Invalid email address".into()))?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| InfraError::Crypto(format!("password hashing failed: {e}")))?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                email,
                password_hash,
                role,
            })
            .await?;
        info!(user_id = user.id, role = role.as_str(), "New user registered");
        Ok(user)
    }
}
