use chrono::{Duration, Utc};
use tracing::info;

use crate::auth::{AuthError, hash_password};
use crate::db::Database;
use crate::models::{NewClassSession, NewPlan, Role};
use crate::settings::Settings;
use crate::validation::normalize_email;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create the configured admin account unless a user with that email exists.
/// Returns true when an account was created.
pub async fn ensure_admin(db: &Database, settings: &Settings) -> Result<bool, SeedError> {
    let (Some(email), Some(password)) = (&settings.admin_email, &settings.admin_password) else {
        return Ok(false);
    };
    let email = normalize_email(email);
    let users = db.users();

    if users.find_by_email(&email).await?.is_some() {
        info!(%email, "admin user already exists");
        return Ok(false);
    }

    let hash = hash_password(settings, password)?;
    users.create("Super Admin", &email, &hash, Role::Admin).await?;
    info!(%email, "admin user created");
    Ok(true)
}

/// Replace all classes and plans with the demo timetable.
pub async fn seed_demo_data(db: &Database) -> Result<(), SeedError> {
    let classes = db.classes();
    let plans = db.plans();

    let cleared_classes = classes.delete_all().await?;
    let cleared_plans = plans.delete_all().await?;
    info!(cleared_classes, cleared_plans, "cleared existing data");

    let now = Utc::now();
    let demo_classes = [
        ("Morning HIIT", "Aditya Roy", 24, 45, 20),
        ("Power Yoga", "Priya Sharma", 26, 60, 15),
        ("CrossFit Mayhem", "Vikram Singh", 48, 60, 12),
        ("Spin Class", "Rohan Mehta", 50, 45, 25),
        ("Late Night Lift", "Arjun Kapoor", 72, 90, 10),
    ];
    for (title, trainer, hours_ahead, duration, capacity) in demo_classes {
        classes
            .create(&NewClassSession {
                title: title.to_string(),
                trainer_name: trainer.to_string(),
                start_time: now + Duration::hours(hours_ahead),
                duration_minutes: duration,
                capacity,
            })
            .await?;
    }
    info!(count = demo_classes.len(), "classes seeded");

    let demo_plans: [(&str, f64, &[&str], &str); 3] = [
        ("Silver", 1500.0, &["Gym Access", "Locker Room"], "Basic access for starters."),
        (
            "Gold",
            3000.0,
            &["Gym Access", "Locker Room", "Sauna", "Group Classes"],
            "Most popular choice.",
        ),
        (
            "Platinum",
            5000.0,
            &["All Access", "Personal Trainer", "Nutrition Plan", "VIP Lounge"],
            "The ultimate fitness experience.",
        ),
    ];
    for (name, price, features, description) in demo_plans {
        plans
            .create(&NewPlan {
                name: name.to_string(),
                price,
                duration_in_months: 1,
                features: features.iter().map(|f| f.to_string()).collect(),
                description: Some(description.to_string()),
            })
            .await?;
    }
    info!(count = demo_plans.len(), "plans seeded");

    Ok(())
}
