//! User Model

use serde::{Deserialize, Serialize};
use shared::client::UserInfo;
use shared::UserRole;
use surrealdb::RecordId;

use super::serde_helpers;

/// User account backing the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create user payload (repository-level; password arrives in clear and is
/// hashed before it touches the store)
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

impl User {
    /// Record id in "user:key" string form.
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id_string(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{PasswordHash, PasswordVerifier},
            Argon2,
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}
