use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Currency, ExecutionStatus, Network};

/// Audit record of one attempted transfer. Written once per settlement
/// attempt; `status` records the outcome, so absence of a row never has to
/// stand in for failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub device_uid: String,
    pub from_username: String,
    pub to_username: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub network: Network,
    pub transcript: String,
    pub status: ExecutionStatus,
    pub failure_reason: Option<String>,
    /// Settlement transaction hash; present only when `status` is settled.
    pub txid: Option<String>,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        device_uid: &str,
        from_username: &str,
        intent: &super::TransferIntent,
        idempotency_key: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            device_uid: device_uid.to_string(),
            from_username: from_username.to_string(),
            to_username: intent.to.clone(),
            amount: intent.amount,
            currency: intent.currency,
            network: intent.network,
            transcript: intent.transcript.clone(),
            status: ExecutionStatus::Failed,
            failure_reason: None,
            txid: None,
            idempotency_key,
            created_at: Utc::now(),
        }
    }

    pub fn settled(mut self, txid: String) -> Self {
        self.status = ExecutionStatus::Settled;
        self.txid = Some(txid);
        self.failure_reason = None;
        self
    }

    pub fn failed(mut self, reason: &str) -> Self {
        self.status = ExecutionStatus::Failed;
        self.failure_reason = Some(reason.to_string());
        self
    }
}

/// Audit record of one attempted swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub device_uid: String,
    pub amount_deposit: Decimal,
    /// Amount credited by the trade, from the settlement receipt.
    pub amount_receive: Option<Decimal>,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub network: Network,
    pub transcript: String,
    pub status: ExecutionStatus,
    pub failure_reason: Option<String>,
    pub txid: Option<String>,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

impl Trade {
    pub fn new(device_uid: &str, intent: &super::SwapIntent, idempotency_key: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            device_uid: device_uid.to_string(),
            amount_deposit: intent.amount,
            amount_receive: None,
            from_currency: intent.from_currency,
            to_currency: intent.to_currency,
            network: intent.network,
            transcript: intent.transcript.clone(),
            status: ExecutionStatus::Failed,
            failure_reason: None,
            txid: None,
            idempotency_key,
            created_at: Utc::now(),
        }
    }

    pub fn settled(mut self, amount_receive: Option<Decimal>, txid: String) -> Self {
        self.status = ExecutionStatus::Settled;
        self.amount_receive = amount_receive;
        self.txid = Some(txid);
        self.failure_reason = None;
        self
    }

    pub fn failed(mut self, reason: &str) -> Self {
        self.status = ExecutionStatus::Failed;
        self.failure_reason = Some(reason.to_string());
        self
    }
}
