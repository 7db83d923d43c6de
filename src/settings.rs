use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub debug: bool,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub enable_swagger: bool,
    pub port: u16,
    pub seed_demo_data: bool,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .add_source(File::with_name("gym").required(false))
            // APP_DATABASE_URL -> database_url; nested keys would use a double underscore
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("database_url", "sqlite://gym.db")?
            .set_default("debug", false)?
            .set_default("jwt_secret", "default-secret-change-me")?
            .set_default("jwt_ttl_days", 30)?
            .set_default("bcrypt_cost", 10)?
            .set_default("enable_swagger", true)?
            .set_default("port", 5000)?
            .set_default("seed_demo_data", false)?
            .build()?;

        config.try_deserialize()
    }

    /// Settings suitable for tests: in-memory storage and the cheapest bcrypt cost.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            debug: true,
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_days: 1,
            bcrypt_cost: 4,
            enable_swagger: true,
            port: 5000,
            seed_demo_data: false,
            admin_email: None,
            admin_password: None,
        }
    }
}
