use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{MurmurError, Result};
use crate::models::Transaction;

pub struct TransactionRepository;

const TRANSACTION_COLUMNS: &str = "id, device_uid, from_username, to_username, amount, currency, \
     network, transcript, status, failure_reason, txid, idempotency_key, created_at";

impl TransactionRepository {
    pub async fn insert(conn: &Connection, transaction: &Transaction) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO transactions (
                id, device_uid, from_username, to_username, amount, currency,
                network, transcript, status, failure_reason, txid,
                idempotency_key, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                transaction.id.clone(),
                transaction.device_uid.clone(),
                transaction.from_username.clone(),
                transaction.to_username.clone(),
                transaction.amount.to_string(),
                transaction.currency.to_string(),
                transaction.network.to_string(),
                transaction.transcript.clone(),
                transaction.status.to_string(),
                transaction.failure_reason.clone(),
                transaction.txid.clone(),
                transaction.idempotency_key.clone(),
                transaction.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list(conn: &Connection, limit: u32) -> Result<Vec<Transaction>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM transactions \
                     ORDER BY created_at DESC LIMIT ?1"
                ),
                params![limit as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_transaction(&row)?);
        }
        Ok(results)
    }

    pub async fn key_exists(conn: &Connection, idempotency_key: &str) -> Result<bool> {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM transactions WHERE idempotency_key = ?1",
                params![idempotency_key],
            )
            .await?;

        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        Ok(count > 0)
    }

    fn row_to_transaction(row: &libsql::Row) -> Result<Transaction> {
        Ok(Transaction {
            id: row.get(0)?,
            device_uid: row.get(1)?,
            from_username: row.get(2)?,
            to_username: row.get(3)?,
            amount: row
                .get::<String>(4)?
                .parse()
                .map_err(|e| MurmurError::Internal(format!("Invalid amount in ledger: {e}")))?,
            currency: row
                .get::<String>(5)?
                .parse()
                .map_err(MurmurError::Internal)?,
            network: row
                .get::<String>(6)?
                .parse()
                .map_err(MurmurError::Internal)?,
            transcript: row.get(7)?,
            status: row
                .get::<String>(8)?
                .parse()
                .map_err(MurmurError::Internal)?,
            failure_reason: row.get(9)?,
            txid: row.get(10)?,
            idempotency_key: row.get(11)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(12)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
