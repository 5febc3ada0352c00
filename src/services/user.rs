//! User service
//!
//! Business logic for user accounts: registration, profile updates,
//! password changes, paginated listing, and the throttled login flow.
//!
//! Login is where the attempt guard is consulted. The service reads the
//! current attempt count for the submitted email before verifying anything;
//! past the configured limit the credentials are not even checked. A failed
//! verification registers an attempt, a successful one resets the key.

use crate::db::repositories::{SortOrder, UserField, UserListQuery, UserRepository};
use crate::models::User;
use crate::services::login_guard::LoginAttemptGuard;
use crate::services::password::{
    hash_password, validate_password_strength, verify_password, FILLER_DIGEST,
};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Wrong email or password")]
    InvalidCredentials,

    /// Too many failed logins inside the window
    #[error("Too many failed login attempts ({0})")]
    TooManyAttempts(u32),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Email is already taken
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// User not found
    #[error("Unknown user")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// One page of a user listing
#[derive(Debug, Serialize)]
pub struct UserPage {
    pub page_number: i64,
    pub page_size: i64,
    pub count: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<User>,
}

/// Outcome of a successful login
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// User service
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    login_guard: Arc<LoginAttemptGuard>,
    max_attempts: u32,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        login_guard: Arc<LoginAttemptGuard>,
        max_attempts: u32,
    ) -> Self {
        Self {
            user_repo,
            login_guard,
            max_attempts,
        }
    }

    /// Register a new user.
    ///
    /// The email must not already be registered and the password must pass
    /// the strength policy.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        validate_profile_fields(name, email)?;
        validate_password_strength(password)
            .map_err(|e| UserServiceError::ValidationError(e.to_string()))?;

        if self.user_repo.get_by_email(email).await?.is_some() {
            return Err(UserServiceError::EmailTaken(email.to_string()));
        }

        let password_hash =
            hash_password(password).map_err(|e| UserServiceError::InternalError(e.into()))?;
        let user = User::new(name.to_string(), email.to_string(), password_hash);

        Ok(self.user_repo.create(&user).await?)
    }

    /// Get a user by id
    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.user_repo
            .get_by_id(id)
            .await?
            .ok_or(UserServiceError::NotFound)
    }

    /// Update a user's name and email.
    ///
    /// Changing to an email owned by another account is rejected.
    pub async fn update_user(
        &self,
        id: i64,
        name: &str,
        email: &str,
    ) -> Result<(), UserServiceError> {
        validate_profile_fields(name, email)?;
        if self.user_repo.get_by_id(id).await?.is_none() {
            return Err(UserServiceError::NotFound);
        }
        if let Some(owner) = self.user_repo.get_by_email(email).await? {
            if owner.id != id {
                return Err(UserServiceError::EmailTaken(email.to_string()));
            }
        }

        Ok(self.user_repo.update_profile(id, name, email).await?)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        if self.user_repo.get_by_id(id).await?.is_none() {
            return Err(UserServiceError::NotFound);
        }
        Ok(self.user_repo.delete(id).await?)
    }

    /// Change a user's password after verifying the old one
    pub async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), UserServiceError> {
        validate_password_strength(new_password)
            .map_err(|e| UserServiceError::ValidationError(e.to_string()))?;

        let user = self.get_user(id).await?;
        let matches = verify_password(old_password, &user.password_hash)
            .map_err(|e| UserServiceError::InternalError(e.into()))?;
        if !matches {
            return Err(UserServiceError::InvalidCredentials);
        }

        let new_hash =
            hash_password(new_password).map_err(|e| UserServiceError::InternalError(e.into()))?;
        if !self.user_repo.change_password(id, &new_hash).await? {
            return Err(UserServiceError::NotFound);
        }
        Ok(())
    }

    /// List users with 1-based page numbering, optional `field:key` search
    /// and `field:order` sort.
    pub async fn list_users(
        &self,
        page_number: i64,
        page_size: i64,
        search: Option<&str>,
        sort: Option<&str>,
    ) -> Result<UserPage, UserServiceError> {
        if page_number < 1 || page_size < 1 {
            return Err(UserServiceError::ValidationError(
                "page_number and page_size must be positive".to_string(),
            ));
        }

        let search = search.and_then(parse_search);
        let (sort_field, sort_order) = sort
            .and_then(parse_sort)
            .unwrap_or((UserField::Email, SortOrder::Asc));

        let total = self.user_repo.count(search.as_ref()).await?;
        let query = UserListQuery {
            offset: (page_number * page_size) - page_size,
            limit: page_size,
            sort_field,
            sort_order,
            search,
        };
        let data = self.user_repo.list(&query).await?;

        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };

        Ok(UserPage {
            page_number,
            page_size,
            count: data.len() as i64,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
            data,
        })
    }

    /// Attempt a login.
    ///
    /// When the attempt count for the email already exceeds the limit, the
    /// request is rejected before any credential check. Otherwise the
    /// password is verified, against the stored hash when the account
    /// exists and against a filler digest when it does not, so an
    /// attacker cannot time-probe which emails are registered.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, UserServiceError> {
        let attempts = self.login_guard.attempt_count(email).await;
        if attempts > self.max_attempts {
            tracing::warn!(email, attempts, "Login throttled");
            return Err(UserServiceError::TooManyAttempts(attempts));
        }

        let user = self.user_repo.get_by_email(email).await?;
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(FILLER_DIGEST);

        let matches = verify_password(password, stored_hash)
            .map_err(|e| UserServiceError::InternalError(e.into()))?;

        match user {
            Some(user) if matches => {
                self.login_guard.reset(email).await;
                Ok(LoginOutcome {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                })
            }
            _ => {
                self.login_guard.register_attempt(email).await;
                let attempts = self.login_guard.attempt_count(email).await;
                tracing::info!(email, attempts, "Failed login attempt");
                Err(UserServiceError::InvalidCredentials)
            }
        }
    }
}

fn validate_profile_fields(name: &str, email: &str) -> Result<(), UserServiceError> {
    if name.trim().is_empty() {
        return Err(UserServiceError::ValidationError(
            "name must not be empty".to_string(),
        ));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(UserServiceError::ValidationError(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(())
}

/// Parse a `field:key` search parameter. Anything malformed or naming an
/// unsearchable field is ignored.
fn parse_search(raw: &str) -> Option<(UserField, String)> {
    let (field, key) = raw.split_once(':')?;
    if key.is_empty() {
        return None;
    }
    let field = match field {
        "name" => UserField::Name,
        "email" => UserField::Email,
        _ => return None,
    };
    Some((field, key.to_string()))
}

/// Parse a `field:order` sort parameter. Malformed values fall back to the
/// default of email ascending.
fn parse_sort(raw: &str) -> Option<(UserField, SortOrder)> {
    let (field, order) = raw.split_once(':')?;
    let field = match field {
        "name" => UserField::Name,
        "email" => UserField::Email,
        _ => return None,
    };
    let order = match order {
        "asc" => SortOrder::Asc,
        "desc" => SortOrder::Desc,
        _ => return None,
    };
    Some((field, order))
}
