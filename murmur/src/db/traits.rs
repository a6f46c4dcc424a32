use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Trade, Transaction, User};

/// Read-only access to registered identities. The user records themselves
/// are owned by the external account-management surface; the pipeline only
/// ever looks identities up.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_device_id(&self, device_id: &str) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn list_usernames(&self) -> Result<Vec<String>>;
}

/// Append and query operations for the transfer/trade audit ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_transaction(&self, transaction: &Transaction) -> Result<()>;
    async fn insert_trade(&self, trade: &Trade) -> Result<()>;
    async fn list_transactions(&self, limit: u32) -> Result<Vec<Transaction>>;
    async fn list_trades(&self, limit: u32) -> Result<Vec<Trade>>;
    /// Whether a ledger row (transfer or trade) already carries this
    /// idempotency key. Used to drop replayed webhook deliveries before any
    /// settlement attempt.
    async fn ledger_key_exists(&self, idempotency_key: &str) -> Result<bool>;
}

/// Combined backend contract implemented by concrete database backends.
pub trait DatabaseBackend: UserStore + LedgerStore {}
