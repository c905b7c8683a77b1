/**
 * Identity Store
 *
 * Database operations for user records, behind the `IdentityStore` trait so
 * the session manager and login operations can be exercised against an
 * in-memory store in tests. `PgIdentityStore` is the production
 * implementation over an sqlx PostgreSQL pool.
 *
 * The store exclusively owns persisted identity state; callers never write
 * user rows through any other path.
 */

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::users::models::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str =
    "id, full_name, email, hashed_password, is_superuser, refresh_token, registered_at";

/// Lookup/create/update of user records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a new user. A duplicate email surfaces as
    /// `StoreError::UniqueViolation`.
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Apply an update; unset fields are left untouched. A duplicate email
    /// surfaces as `StoreError::UniqueViolation`.
    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError>;

    /// Overwrite the stored refresh credential. Last writer wins; the
    /// superseded token is simply no longer referenced.
    async fn set_refresh_token(&self, id: Uuid, refresh_token: &str) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// PostgreSQL-backed identity store.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        tracing::debug!("User lookup by email {}", email);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        tracing::debug!("User lookup by id {}", id);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(users)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        tracing::info!("Creating user with email {}", new_user.email);
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, full_name, email, hashed_password, registered_at) \
             VALUES ($1, $2, $3, $4, now()) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.full_name)
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
        tracing::info!("Updating user {}", id);
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET full_name = COALESCE($1, full_name), email = COALESCE($2, email) \
             WHERE id = $3 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(user)
    }

    async fn set_refresh_token(&self, id: Uuid, refresh_token: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET refresh_token = $1 WHERE id = $2")
            .bind(refresh_token)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        tracing::info!("Deleting user {}", id);
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(())
    }
}

/// In-memory identity store used by unit tests for the session manager and
/// login operations. Mirrors the unique-email behavior of the real table.
#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        users: Mutex<HashMap<Uuid, User>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a user directly, bypassing validation.
        pub fn seed(&self, user: User) {
            self.users.lock().unwrap().insert(user.id, user);
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IdentityStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
            users.sort_by_key(|u| u.id);
            Ok(users)
        }

        async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == new_user.email) {
                return Err(StoreError::UniqueViolation);
            }
            let user = User {
                id: Uuid::new_v4(),
                full_name: new_user.full_name,
                email: new_user.email,
                hashed_password: new_user.hashed_password,
                is_superuser: false,
                refresh_token: None,
                registered_at: Utc::now(),
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if let Some(new_email) = &update.email {
                if users.values().any(|u| u.id != id && &u.email == new_email) {
                    return Err(StoreError::UniqueViolation);
                }
            }
            let user = users.get_mut(&id).ok_or(StoreError::Database(
                sqlx::Error::RowNotFound,
            ))?;
            if let Some(full_name) = update.full_name {
                user.full_name = Some(full_name);
            }
            if let Some(email) = update.email {
                user.email = email;
            }
            Ok(user.clone())
        }

        async fn set_refresh_token(&self, id: Uuid, refresh_token: &str) -> Result<(), StoreError> {
            let mut users = self.users.lock().unwrap();
            let user = users.get_mut(&id).ok_or(StoreError::Database(
                sqlx::Error::RowNotFound,
            ))?;
            user.refresh_token = Some(refresh_token.to_string());
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
            self.users.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    /// Build a plain (non-super) user for tests.
    pub fn test_user(email: &str, hashed_password: Option<String>) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: Some("Test User".to_string()),
            email: email.to_string(),
            hashed_password,
            is_superuser: false,
            refresh_token: None,
            registered_at: Utc::now(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn memory_store_enforces_unique_email() {
            let store = MemoryStore::new();
            store
                .insert(NewUser {
                    full_name: None,
                    email: "dup@example.com".to_string(),
                    hashed_password: None,
                })
                .await
                .unwrap();

            let err = store
                .insert(NewUser {
                    full_name: None,
                    email: "dup@example.com".to_string(),
                    hashed_password: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::UniqueViolation));
        }
    }
}
