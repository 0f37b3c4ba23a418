//! MSSQL probe
//!
//! Issues a fixed count query against the service table through a shared
//! connection pool. The pool is built without touching the network; the
//! first real connection is attempted by `warm_connect` at session start,
//! and a failure there leaves the pool in place so later probes fail (and
//! get logged) individually.

use crate::config::env::DbEnv;
use crate::config::ProbeKind;
use crate::defaults;
use crate::error::{AppError, Result};
use crate::probe::Probe;
use async_trait::async_trait;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use tiberius::{AuthMethod, Config, EncryptionLevel};

const MSSQL_DEFAULT_PORT: u16 = 1433;

pub struct SqlProbe {
    pool: Pool<ConnectionManager>,
    query: String,
}

impl SqlProbe {
    /// Build the probe and its pool from `DB_*` settings. The pool holds at
    /// most `pool_size` connections so one full round never waits on itself.
    pub fn new(env: &DbEnv, pool_size: u32) -> Self {
        let mut config = Config::new();
        config.host(&env.server);
        config.port(MSSQL_DEFAULT_PORT);
        config.database(&env.database);
        config.authentication(AuthMethod::sql_server(&env.user, &env.password));
        // Matches the unencrypted transport the probed servers run with.
        config.encryption(EncryptionLevel::NotSupported);
        config.trust_cert();

        let manager = ConnectionManager::new(config);
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build_unchecked(manager);

        Self {
            pool,
            query: count_query(defaults::SQL_COUNT_TARGET),
        }
    }

    /// Check one connection out of the pool to establish connectivity before
    /// the first round.
    pub async fn warm_connect(&self) -> Result<()> {
        self.pool
            .get()
            .await
            .map(|_| ())
            .map_err(|e| AppError::connection(e.to_string()))
    }
}

#[async_trait]
impl Probe for SqlProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Mssql
    }

    async fn execute(&self) -> Result<i64> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::connection(e.to_string()))?;
        let row = conn
            .simple_query(self.query.as_str())
            .await?
            .into_row()
            .await?;
        let count = match row {
            Some(row) => row.get::<i32, _>(0).unwrap_or(0),
            None => 0,
        };
        Ok(i64::from(count))
    }
}

fn count_query(target: &str) -> String {
    format!("select count(*) as count from {}", target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_query_shape() {
        assert_eq!(
            count_query("sr_service"),
            "select count(*) as count from sr_service"
        );
    }

    #[tokio::test]
    async fn test_probe_kind() {
        let probe = SqlProbe::new(&DbEnv::default(), 2);
        assert_eq!(probe.kind(), ProbeKind::Mssql);
    }

    #[tokio::test]
    async fn test_pool_size_floor() {
        // Parallelism 0 is accepted by the prompts; the pool still needs one slot.
        let _probe = SqlProbe::new(&DbEnv::default(), 0);
    }
}
