use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Role, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. `email` is expected to be normalized already.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn update_role(&self, id: &str, role: Role) -> Result<Option<User>, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(role)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = test_db().await.users();
        let user = repo
            .create("Ann", "ann@example.com", "hash", Role::Member)
            .await
            .unwrap();

        let by_email = repo.find_by_email("ann@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, Role::Member);
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = test_db().await.users();
        repo.create("Ann", "ann@example.com", "hash", Role::Member)
            .await
            .unwrap();
        assert!(
            repo.create("Ann 2", "ann@example.com", "hash", Role::Member)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_role() {
        let repo = test_db().await.users();
        let user = repo
            .create("Tom", "tom@example.com", "hash", Role::Member)
            .await
            .unwrap();

        let updated = repo.update_role(&user.id, Role::Trainer).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Trainer);
        assert!(repo.update_role("missing", Role::Admin).await.unwrap().is_none());
    }
}
