// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: staff accounts, password hashing and login.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::{NewUser, NewUserInput, User, UserSummary, UserUpdateInput};
use crate::time_utils::now_utc;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use validator::Validate;

const SALT_BYTES: usize = 16;

/// Verified in place of a stored hash when the email is unknown, so both
/// login failures cost one Argon2 run. Uses the default Argon2id parameters.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Successful login: a bearer token and the public user profile.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub token: String,
    pub user: UserSummary,
}

/// User accounts backed by the `users` collection.
#[derive(Clone)]
pub struct UserService {
    db: FirestoreDb,
    signing_key: Vec<u8>,
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_BYTES];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("Failed to generate password salt"))?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| anyhow::anyhow!("Salt encoding failed: {}", e))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Stored password hash is unreadable");
            false
        }
    }
}

/// Run password hashing off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Blocking task failed: {}", e)))
}

/// Emails are document IDs, which cannot be empty or contain a path separator.
fn is_document_key(email: &str) -> bool {
    !email.is_empty() && !email.contains('/')
}

fn check_email_key(email: &str) -> Result<()> {
    if !is_document_key(email) {
        return Err(AppError::Validation(
            "email is not a valid address".to_string(),
        ));
    }
    Ok(())
}

fn email_taken(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::Conflict("Email is already registered".to_string()),
        other => other,
    }
}

fn user_not_found(email: &str) -> AppError {
    AppError::NotFound(format!("User {} not found", email))
}

impl UserService {
    pub fn new(db: FirestoreDb, signing_key: &[u8]) -> Self {
        Self {
            db,
            signing_key: signing_key.to_vec(),
        }
    }

    /// Check credentials and issue a bearer token.
    ///
    /// An unknown email and a wrong password fail with the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthResult> {
        if !is_document_key(email) {
            return Err(AppError::InvalidCredentials);
        }
        let user = self.db.get_user(email).await?;

        let password = password.to_string();
        let stored_hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH.to_string(), |u| u.password_hash.clone());
        let valid = run_blocking(move || verify_password(&password, &stored_hash)).await?;
        let Some(user) = user.filter(|_| valid) else {
            tracing::info!(email, "Login failed");
            return Err(AppError::InvalidCredentials);
        };

        let summary = UserSummary::from(&user);
        let token = create_jwt(&summary, &self.signing_key, chrono::Utc::now())?;

        tracing::info!(user_id = %summary.id, "Login succeeded");
        Ok(AuthResult {
            token,
            user: summary,
        })
    }

    /// Register a user. The password is stored only as an Argon2id hash.
    pub async fn create_user(&self, input: NewUserInput) -> Result<UserSummary> {
        let (Some(username), Some(email), Some(password)) =
            (input.username, input.email, input.password)
        else {
            return Err(AppError::Validation(
                "username, email and password are required".to_string(),
            ));
        };

        let new_user = NewUser {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password,
        };
        new_user.validate()?;
        check_email_key(&new_user.email)?;

        let NewUser {
            username,
            email,
            password,
        } = new_user;
        let password_hash = run_blocking(move || hash_password(&password)).await??;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at: now_utc(),
        };
        self.db.insert_user(&user).await.map_err(email_taken)?;

        tracing::info!(user_id = %user.id, email = %user.email, "User created");
        Ok(UserSummary::from(&user))
    }

    /// All users, without credentials.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        Ok(self
            .db
            .list_users()
            .await?
            .iter()
            .map(UserSummary::from)
            .collect())
    }

    pub async fn get_user(&self, email: &str) -> Result<UserSummary> {
        if !is_document_key(email) {
            return Err(user_not_found(email));
        }
        self.db
            .get_user(email)
            .await?
            .map(|user| UserSummary::from(&user))
            .ok_or_else(|| user_not_found(email))
    }

    /// Update username and/or email. Credentials never change here.
    pub async fn update_user(&self, email: &str, input: UserUpdateInput) -> Result<UserSummary> {
        if !is_document_key(email) {
            return Err(user_not_found(email));
        }
        let existing = self
            .db
            .get_user(email)
            .await?
            .ok_or_else(|| user_not_found(email))?;

        let mut updated = existing.clone();
        if let Some(username) = input.username {
            updated.username = username.trim().to_string();
        }
        if let Some(new_email) = input.email {
            updated.email = new_email.trim().to_string();
        }

        updated.validate()?;
        check_email_key(&updated.email)?;

        if updated.email == existing.email {
            self.db.put_user(&updated).await?;
        } else {
            // Email is the document key: create under the new key, then
            // drop the old document.
            self.db.insert_user(&updated).await.map_err(email_taken)?;
            self.db.delete_user(&existing.email).await?;
            tracing::info!(from = %existing.email, to = %updated.email, "User email changed");
        }

        Ok(UserSummary::from(&updated))
    }

    pub async fn delete_user(&self, email: &str) -> Result<()> {
        if !is_document_key(email) || !self.db.delete_user(email).await? {
            return Err(user_not_found(email));
        }
        tracing::info!(email, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(
            hash_password("same").unwrap(),
            hash_password("same").unwrap()
        );
    }

    #[test]
    fn test_dummy_hash_matches_real_hash_cost() {
        let real = hash_password("anything").unwrap();
        let params = |hash: &str| hash.rsplitn(3, '$').nth(2).unwrap().to_string();
        assert_eq!(params(&real), params(DUMMY_PASSWORD_HASH));
        assert!(PasswordHash::new(DUMMY_PASSWORD_HASH).is_ok());
        assert!(!verify_password("anything", DUMMY_PASSWORD_HASH));
    }

    #[test]
    fn test_unreadable_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
