use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{ClassSession, NewClassSession};

/// Plain storage for class sessions. Business rules live in the booking service.
#[derive(Clone)]
pub struct ClassRepository {
    pool: SqlitePool,
}

impl ClassRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewClassSession) -> Result<ClassSession, sqlx::Error> {
        let now = Utc::now();
        let session = ClassSession {
            id: Uuid::new_v4().to_string(),
            title: new.title.clone(),
            trainer_name: new.trainer_name.clone(),
            start_time: new.start_time,
            duration_minutes: new.duration_minutes,
            capacity: new.capacity,
            attendees: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO classes (id, title, trainer_name, start_time, duration_minutes, capacity, attendees, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&session.id)
        .bind(&session.title)
        .bind(&session.trainer_name)
        .bind(session.start_time)
        .bind(session.duration_minutes)
        .bind(session.capacity)
        .bind(Json(&session.attendees))
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ClassSession>, sqlx::Error> {
        sqlx::query_as::<_, ClassSession>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<ClassSession>, sqlx::Error> {
        sqlx::query_as::<_, ClassSession>("SELECT * FROM classes ORDER BY start_time ASC, id ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_by_attendee(&self, user_id: &str) -> Result<Vec<ClassSession>, sqlx::Error> {
        sqlx::query_as::<_, ClassSession>(
            "SELECT * FROM classes
             WHERE EXISTS (SELECT 1 FROM json_each(classes.attendees) WHERE json_each.value = $1)",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Persist the full session state. Returns false when the row no longer exists.
    pub async fn update(&self, session: &mut ClassSession) -> Result<bool, sqlx::Error> {
        session.updated_at = Utc::now();
        let result = sqlx::query(
            "UPDATE classes
             SET title = $2, trainer_name = $3, start_time = $4, duration_minutes = $5,
                 capacity = $6, attendees = $7, updated_at = $8
             WHERE id = $1",
        )
        .bind(&session.id)
        .bind(&session.title)
        .bind(&session.trainer_name)
        .bind(session.start_time)
        .bind(session.duration_minutes)
        .bind(session.capacity)
        .bind(Json(&session.attendees))
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM classes").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::db::test_db;

    fn new_session(title: &str, hours_from_base: i64) -> NewClassSession {
        NewClassSession {
            title: title.to_string(),
            trainer_name: "Coach".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 11, 24, 6, 0, 0).unwrap()
                + Duration::hours(hours_from_base),
            duration_minutes: 60,
            capacity: 10,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = test_db().await.classes();
        let created = repo.create(&new_session("WOD", 0)).await.unwrap();

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "WOD");
        assert!(found.attendees.is_empty());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_orders_by_start_time() {
        let repo = test_db().await.classes();
        repo.create(&new_session("Late", 48)).await.unwrap();
        repo.create(&new_session("Early", 1)).await.unwrap();
        repo.create(&new_session("Middle", 24)).await.unwrap();

        let titles: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Early", "Middle", "Late"]);
    }

    #[tokio::test]
    async fn test_update_and_find_by_attendee() {
        let repo = test_db().await.classes();
        let mut booked = repo.create(&new_session("Yoga", 0)).await.unwrap();
        repo.create(&new_session("Spin", 2)).await.unwrap();

        booked.attendees.push("u1".to_string());
        assert!(repo.update(&mut booked).await.unwrap());

        let mine = repo.find_by_attendee("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, booked.id);
        assert!(repo.find_by_attendee("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let repo = test_db().await.classes();
        let created = repo.create(&new_session("HIIT", 0)).await.unwrap();

        assert!(repo.delete_by_id(&created.id).await.unwrap());
        assert!(!repo.delete_by_id(&created.id).await.unwrap());
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
    }
}
