use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::{TradeRepository, TransactionRepository, UserRepository};
use crate::db::traits::{DatabaseBackend, LedgerStore, UserStore};
use crate::error::Result;
use crate::models::{Trade, Transaction, User};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for LibSqlBackend {
    async fn get_user_by_device_id(&self, device_id: &str) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_device_id(&conn, device_id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_username(&conn, username).await
    }

    async fn list_usernames(&self) -> Result<Vec<String>> {
        let conn = self.db.connect()?;
        UserRepository::list_usernames(&conn).await
    }
}

#[async_trait]
impl LedgerStore for LibSqlBackend {
    async fn insert_transaction(&self, transaction: &Transaction) -> Result<()> {
        let conn = self.db.connect()?;
        TransactionRepository::insert(&conn, transaction).await
    }

    async fn insert_trade(&self, trade: &Trade) -> Result<()> {
        let conn = self.db.connect()?;
        TradeRepository::insert(&conn, trade).await
    }

    async fn list_transactions(&self, limit: u32) -> Result<Vec<Transaction>> {
        let conn = self.db.connect()?;
        TransactionRepository::list(&conn, limit).await
    }

    async fn list_trades(&self, limit: u32) -> Result<Vec<Trade>> {
        let conn = self.db.connect()?;
        TradeRepository::list(&conn, limit).await
    }

    async fn ledger_key_exists(&self, idempotency_key: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        if TransactionRepository::key_exists(&conn, idempotency_key).await? {
            return Ok(true);
        }
        TradeRepository::key_exists(&conn, idempotency_key).await
    }
}

impl DatabaseBackend for LibSqlBackend {}
