use std::sync::Arc;

use libsql::{Builder, Connection};

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

const BUSY_TIMEOUT_MS: u64 = 5000;

/// Handle on the underlying libsql database. Remote (`libsql://`/`https://`)
/// urls get a remote or embedded-replica connection; anything else is opened
/// as a local file, with `:memory:` for tests.
#[derive(Clone)]
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = open(config).await?;
        let database = Self { db: Arc::new(db) };

        let conn = database.connect()?;
        apply_pragmas(&conn).await;
        schema::init_schema(&conn).await?;

        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }
}

async fn open(config: &DatabaseConfig) -> Result<libsql::Database> {
    let url = config.url.as_str();

    if url.starts_with("libsql://") || url.starts_with("https://") {
        let auth_token = config.auth_token.clone().unwrap_or_default();
        let db = match &config.local_path {
            Some(local_path) => {
                Builder::new_remote_replica(local_path, url.to_string(), auth_token)
                    .build()
                    .await?
            }
            None => Builder::new_remote(url.to_string(), auth_token).build().await?,
        };
        return Ok(db);
    }

    let path = url.strip_prefix("file:").unwrap_or(url);
    Ok(Builder::new_local(path).build().await?)
}

async fn apply_pragmas(conn: &Connection) {
    for pragma in [
        format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
        "PRAGMA journal_mode = WAL".to_string(),
    ] {
        // Remote backends reject some pragmas; that is fine.
        if let Err(error) = conn.execute_batch(&pragma).await {
            tracing::warn!(pragma = %pragma, error = %error, "Failed to apply SQLite pragma");
        }
    }
}
