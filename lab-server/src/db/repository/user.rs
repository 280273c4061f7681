//! User Repository

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use shared::util::now_millis;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> Option<RecordId> {
        if id.contains(':') {
            id.parse::<RecordId>()
                .ok()
                .filter(|rid| rid.table() == "user")
        } else {
            Some(RecordId::from_table_key("user", id))
        }
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        // Check duplicate email
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    email = $email,
                    name = $name,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("email", data.email))
            .bind(("name", data.name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("now", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
