use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Name of the house that can never be deleted and that orphaned topics fall back to.
    pub const DEFAULT_HOUSE: &str = "DEFAULT_HOUSE";
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 5000;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/organizer.db";
    pub const DEFAULT_HOUSE: &str = "general";
    pub const DB_POOL_SIZE: u32 = 8;
    /// Section label new tasks land in
    pub const TASK_SECTION: &str = "later";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub default_house: String,
    pub db_pool_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let default_house = env::var(env_vars::DEFAULT_HOUSE)
            .ok()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| defaults::DEFAULT_HOUSE.to_string());

        let db_pool_size = env::var(env_vars::DB_POOL_SIZE)
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults::DB_POOL_SIZE);

        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            bind_address: env::var(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|_| defaults::BIND_ADDRESS.to_string()),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            default_house,
            db_pool_size,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            database_url: defaults::DATABASE_URL.to_string(),
            default_house: defaults::DEFAULT_HOUSE.to_string(),
            db_pool_size: defaults::DB_POOL_SIZE,
        }
    }
}

/// Today's date as stored in tracking rows (`YYYY-MM-DD`, local time)
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
