use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{NewPlan, Plan};

#[derive(Clone)]
pub struct PlanRepository {
    pool: SqlitePool,
}

impl PlanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewPlan) -> Result<Plan, sqlx::Error> {
        let now = Utc::now();
        let plan = Plan {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            price: new.price,
            duration_in_months: new.duration_in_months,
            features: new.features.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO plans (id, name, price, duration_in_months, features, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.duration_in_months)
        .bind(Json(&plan.features))
        .bind(&plan.description)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(plan)
    }

    pub async fn find_all(&self) -> Result<Vec<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY price ASC, name ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plans").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
