// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use crate::time_utils::utc_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Staff account stored in the `users` collection (document ID = email).
///
/// Holds the password hash; never serialize this to a client. Use
/// [`UserSummary`] for anything leaving the server. Validation covers the
/// profile fields; the password rule lives on [`NewUser`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Random identifier carried in tokens
    pub id: String,
    #[validate(length(
        min = 2,
        max = 100,
        message = "username must be between 2 and 100 characters"
    ))]
    pub username: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    #[serde(with = "utc_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user. Contains no secret material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(with = "utc_seconds")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Registration payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Checked registration fields.
#[derive(Debug, Validate)]
pub struct NewUser {
    #[validate(length(
        min = 2,
        max = 100,
        message = "username must be between 2 and 100 characters"
    ))]
    pub username: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Profile update payload. There is no password field, so one sent
/// by a client is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_has_no_password() {
        let user = User {
            id: "u1".to_string(),
            username: "harbor".to_string(),
            email: "harbor@port.test".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserSummary::from(&user)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("passwordHash"));
        assert_eq!(obj["email"], "harbor@port.test");
    }

    #[test]
    fn test_update_payload_drops_password() {
        let update: UserUpdateInput =
            serde_json::from_str(r#"{"username":"new","password":"hunter22"}"#).unwrap();
        assert_eq!(update.username.as_deref(), Some("new"));
        assert!(update.email.is_none());
    }

    #[test]
    fn test_new_user_rules() {
        let ok = NewUser {
            username: "harbor".to_string(),
            email: "harbor@port.test".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = NewUser {
            username: "harbor".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_profile_rules() {
        let mut user = User {
            id: "u1".to_string(),
            username: "h".to_string(),
            email: "harbor@port.test".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        assert!(user.validate().is_err());
        user.username = "harbor".to_string();
        assert!(user.validate().is_ok());
    }
}
