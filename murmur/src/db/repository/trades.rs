use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{MurmurError, Result};
use crate::models::Trade;

pub struct TradeRepository;

const TRADE_COLUMNS: &str = "id, device_uid, amount_deposit, amount_receive, from_currency, \
     to_currency, network, transcript, status, failure_reason, txid, idempotency_key, created_at";

impl TradeRepository {
    pub async fn insert(conn: &Connection, trade: &Trade) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO trades (
                id, device_uid, amount_deposit, amount_receive, from_currency,
                to_currency, network, transcript, status, failure_reason,
                txid, idempotency_key, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                trade.id.clone(),
                trade.device_uid.clone(),
                trade.amount_deposit.to_string(),
                trade.amount_receive.map(|a| a.to_string()),
                trade.from_currency.to_string(),
                trade.to_currency.to_string(),
                trade.network.to_string(),
                trade.transcript.clone(),
                trade.status.to_string(),
                trade.failure_reason.clone(),
                trade.txid.clone(),
                trade.idempotency_key.clone(),
                trade.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list(conn: &Connection, limit: u32) -> Result<Vec<Trade>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TRADE_COLUMNS} FROM trades ORDER BY created_at DESC LIMIT ?1"
                ),
                params![limit as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_trade(&row)?);
        }
        Ok(results)
    }

    pub async fn key_exists(conn: &Connection, idempotency_key: &str) -> Result<bool> {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM trades WHERE idempotency_key = ?1",
                params![idempotency_key],
            )
            .await?;

        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        Ok(count > 0)
    }

    fn row_to_trade(row: &libsql::Row) -> Result<Trade> {
        Ok(Trade {
            id: row.get(0)?,
            device_uid: row.get(1)?,
            amount_deposit: row
                .get::<String>(2)?
                .parse()
                .map_err(|e| MurmurError::Internal(format!("Invalid amount in ledger: {e}")))?,
            amount_receive: row
                .get::<Option<String>>(3)?
                .map(|s| {
                    s.parse().map_err(|e| {
                        MurmurError::Internal(format!("Invalid amount in ledger: {e}"))
                    })
                })
                .transpose()?,
            from_currency: row
                .get::<String>(4)?
                .parse()
                .map_err(MurmurError::Internal)?,
            to_currency: row
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
