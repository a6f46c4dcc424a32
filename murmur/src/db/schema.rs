use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Registered identities: dashboard account, bound device, and one
        -- opaque custody credential per supported network.
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            omi_id TEXT,
            base_wallet TEXT,
            eth_wallet TEXT,
            polygon_wallet TEXT,
            arbitrum_wallet TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_users_omi_id ON users(omi_id);

        -- Transfer ledger: one row per attempted settlement.
        CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            device_uid TEXT NOT NULL,
            from_username TEXT NOT NULL,
            to_username TEXT NOT NULL,
            amount TEXT NOT NULL,
            currency TEXT NOT NULL,
            network TEXT NOT NULL,
            transcript TEXT NOT NULL,
            status TEXT NOT NULL,
            failure_reason TEXT,
            txid TEXT,
            idempotency_key TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_idempotency_key
            ON transactions(idempotency_key);
        CREATE INDEX IF NOT EXISTS idx_transactions_created_at ON transactions(created_at);

        -- Swap ledger: one row per attempted trade.
        CREATE TABLE IF NOT EXISTS trades (
            id TEXT PRIMARY KEY,
            device_uid TEXT NOT NULL,
            amount_deposit TEXT NOT NULL,
            amount_receive TEXT,
            from_currency TEXT NOT NULL,
            to_currency TEXT NOT NULL,
            network TEXT NOT NULL,
            transcript TEXT NOT NULL,
            status TEXT NOT NULL,
            failure_reason TEXT,
            txid TEXT,
            idempotency_key TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_trades_idempotency_key
            ON trades(idempotency_key);
        CREATE INDEX IF NOT EXISTS idx_trades_created_at ON trades(created_at);
        "#,
    )
    .await?;

    Ok(())
}
