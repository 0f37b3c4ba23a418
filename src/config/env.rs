//! Environment variable handling and .env file management
//!
//! Credentials are read once at session start. Missing values are not
//! validated upfront: they surface as connection or call failures on the
//! first probe, matching the per-probe error handling contract.

use std::env;
use std::path::Path;

/// MSSQL connection settings read from `DB_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbEnv {
    pub user: String,
    pub password: String,
    pub database: String,
    pub server: String,
}

impl DbEnv {
    pub fn from_env() -> Self {
        Self {
            user: var_or_empty("DB_USER"),
            password: var_or_empty("DB_PASS"),
            database: var_or_empty("DB_NAME"),
            server: var_or_empty("DB_SERVER"),
        }
    }
}

/// ConnectWise REST API settings read from `API_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiEnv {
    pub public_key: String,
    pub private_key: String,
    pub company: String,
    pub server: String,
}

impl ApiEnv {
    pub fn from_env() -> Self {
        Self {
            public_key: var_or_empty("API_PUBLIC"),
            private_key: var_or_empty("API_PRIVATE"),
            company: var_or_empty("API_COMPANY"),
            server: var_or_empty("API_SERVER"),
        }
    }
}

fn var_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

/// Load `.env` from the working directory if present. Absence is not an
/// error; a malformed file is.
pub fn load_env_file() -> crate::Result<bool> {
    if !Path::new(".env").exists() {
        return Ok(false);
    }
    dotenv::from_filename(".env")?;
    Ok(true)
}
