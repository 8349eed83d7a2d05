//! Authentication service: password login and JWT issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{AccountType, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored argon2 PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate and return a bearer token with the user
    pub async fn login(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid login or password".to_string());

        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password)? {
            tracing::info!("Failed login for {}", login);
            return Err(invalid());
        }

        let claims = UserClaims::for_user(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("User {} logged in", user.login);
        Ok((token, user))
    }

    pub async fn get_user(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> u64 {
        self.config.jwt_expiration_hours * 3600
    }

    /// Create the configured bootstrap librarian if it does not exist yet
    pub async fn ensure_bootstrap_librarian(&self) -> AppResult<()> {
        let (Some(login), Some(password)) = (
            self.config.bootstrap_login.as_deref(),
            self.config.bootstrap_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.get_by_login(login).await?.is_some() {
            return Ok(());
        }

        let hash = hash_password(password)?;
        let user = self
            .repository
            .users
            .create(login, &hash, AccountType::Librarian)
            .await?;
        tracing::info!("Created bootstrap librarian account {} (id {})", user.login, user.id);
        Ok(())
    }
}
