use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Trade, Transaction};

fn default_limit() -> u32 {
    20
}

/// Query parameters for ledger list endpoints. `limit` is clamped to
/// `1..=100` and defaults to 20.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct LedgerListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl LedgerListQuery {
    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, 100)
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub device_uid: String,
    pub from: String,
    pub to: String,
    /// Decimal amount as a string.
    pub amount: String,
    pub currency: String,
    pub network: String,
    pub transcript: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            device_uid: tx.device_uid,
            from: tx.from_username,
            to: tx.to_username,
            amount: tx.amount.to_string(),
            currency: tx.currency.to_string(),
            network: tx.network.to_string(),
            transcript: tx.transcript,
            status: tx.status.to_string(),
            failure_reason: tx.failure_reason,
            txid: tx.txid,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeDto {
    pub id: String,
    pub device_uid: String,
    pub amount_deposit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_receive: Option<String>,
    pub from_currency: String,
    pub to_currency: String,
    pub network: String,
    pub transcript: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Trade> for TradeDto {
    fn from(trade: Trade) -> Self {
        Self {
            id: trade.id,
            device_uid: trade.device_uid,
            amount_deposit: trade.amount_deposit.to_string(),
            amount_receive: trade.amount_receive.map(|a| a.to_string()),
            from_currency: trade.from_currency.to_string(),
            to_currency: trade.to_currency.to_string(),
            network: trade.network.to_string(),
            transcript: trade.transcript,
            status: trade.status.to_string(),
            failure_reason: trade.failure_reason,
            txid: trade.txid,
            created_at: trade.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        let q: LedgerListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.clamped_limit(), 20);

        let q = LedgerListQuery { limit: 0 };
        assert_eq!(q.clamped_limit(), 1);

        let q = LedgerListQuery { limit: 999 };
        assert_eq!(q.clamped_limit(), 100);
    }
}
