//! Sequential intent execution against the custody service.
//!
//! Intents are executed one at a time: settlement calls are ordering
//! sensitive at the wallet layer, and ledger rows should land in transcript
//! order. Each intent is fault-isolated; an error executing one is recorded
//! in its outcome and the engine moves on to the next.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::db::{DatabaseBackend, LedgerStore};
use crate::directory::DirectoryResolver;
use crate::error::MurmurError;
use crate::models::{
    CommandKind, Currency, ExecutionStatus, Network, SwapIntent, Trade, Transaction,
    TransferIntent, User,
};
use crate::wallet::{SettlementStatus, TradeRequest, TransferRequest, WalletProvider};

const REASON_SETTLEMENT_FAILED: &str = "settlement_failed";
const REASON_TIMED_OUT: &str = "timed_out";

/// What happened to one intent, for the batch report.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub kind: CommandKind,
    pub transcript: String,
    pub status: ExecutionStatus,
    pub detail: Option<String>,
}

impl ItemOutcome {
    fn settled(kind: CommandKind, transcript: &str) -> Self {
        Self {
            kind,
            transcript: transcript.to_string(),
            status: ExecutionStatus::Settled,
            detail: None,
        }
    }

    fn failed(kind: CommandKind, transcript: &str, detail: String) -> Self {
        Self {
            kind,
            transcript: transcript.to_string(),
            status: ExecutionStatus::Failed,
            detail: Some(detail),
        }
    }

    fn skipped(kind: CommandKind, transcript: &str, detail: &str) -> Self {
        Self {
            kind,
            transcript: transcript.to_string(),
            status: ExecutionStatus::Skipped,
            detail: Some(detail.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct ExecutionEngine {
    db: Arc<dyn DatabaseBackend>,
    wallet: WalletProvider,
    directory: DirectoryResolver,
}

impl ExecutionEngine {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        wallet: WalletProvider,
        directory: DirectoryResolver,
    ) -> Self {
        Self {
            db,
            wallet,
            directory,
        }
    }

    pub async fn execute_transfers(
        &self,
        sender: &User,
        device_uid: &str,
        intents: &[TransferIntent],
    ) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::with_capacity(intents.len());
        for intent in intents {
            let outcome = self.execute_transfer(sender, device_uid, intent).await;
            tracing::info!(
                status = %outcome.status,
                transcript = %outcome.transcript,
                "transfer processed"
            );
            outcomes.push(outcome);
        }
        outcomes
    }

    pub async fn execute_swaps(
        &self,
        sender: &User,
        device_uid: &str,
        intents: &[SwapIntent],
    ) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::with_capacity(intents.len());
        for intent in intents {
            let outcome = self.execute_swap(sender, device_uid, intent).await;
            tracing::info!(
                status = %outcome.status,
                transcript = %outcome.transcript,
                "swap processed"
            );
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn execute_transfer(
        &self,
        sender: &User,
        device_uid: &str,
        intent: &TransferIntent,
    ) -> ItemOutcome {
        let kind = CommandKind::Transfer;
        let key = transfer_idempotency_key(device_uid, intent);

        match self.db.ledger_key_exists(&key).await {
            Ok(true) => {
                return ItemOutcome::skipped(kind, &intent.transcript, "replayed delivery")
            }
            Ok(false) => {}
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        }

        let Some(credential) = sender.wallet_for(intent.network) else {
            return ItemOutcome::failed(
                kind,
                &intent.transcript,
                format!("{} has no {} wallet", sender.username, intent.network),
            );
        };

        let destination = match self
            .directory
            .resolve_recipient_address(&intent.to, intent.network)
            .await
        {
            Ok(address) => address,
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        };

        let sender_wallet = match self.wallet.import_wallet(credential, intent.network).await {
            Ok(handle) => handle,
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        };

        let pending = match self
            .wallet
            .create_transfer(
                &sender_wallet,
                TransferRequest {
                    amount: intent.amount,
                    asset_id: intent.currency.asset_id(),
                    destination: &destination,
                    gasless: is_gasless(intent.currency, intent.network),
                },
            )
            .await
        {
            Ok(pending) => pending,
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        };

        // Settlement has been initiated; from here on the outcome is
        // recorded as a ledger row whatever happens.
        let row = Transaction::new(device_uid, &sender.username, intent, key);
        let (row, outcome) = match self.wallet.wait_for_transfer(&pending).await {
            Ok(receipt) if receipt.status == SettlementStatus::Complete => {
                let txid = receipt.transaction_hash.unwrap_or(receipt.id);
                (
                    row.settled(txid),
                    ItemOutcome::settled(kind, &intent.transcript),
                )
            }
            Ok(_) => (
                row.failed(REASON_SETTLEMENT_FAILED),
                ItemOutcome::failed(
                    kind,
                    &intent.transcript,
                    MurmurError::TransferFailed.to_string(),
                ),
            ),
            Err(MurmurError::SettlementTimeout { elapsed_secs }) => (
                row.failed(REASON_TIMED_OUT),
                ItemOutcome::failed(
                    kind,
                    &intent.transcript,
                    format!("settlement timed out after {elapsed_secs}s"),
                ),
            ),
            Err(e) => {
                let message = e.to_string();
                (
                    row.failed(&message),
                    ItemOutcome::failed(kind, &intent.transcript, message),
                )
            }
        };

        if let Err(e) = self.db.insert_transaction(&row).await {
            // The settlement already happened; losing the audit row must not
            // fail the item retroactively.
            tracing::error!(error = %e, txid = ?row.txid, "failed to insert transaction ledger row");
        }

        outcome
    }

    async fn execute_swap(
        &self,
        sender: &User,
        device_uid: &str,
        intent: &SwapIntent,
    ) -> ItemOutcome {
        let kind = CommandKind::Swap;

        // Swaps are only offered on base for now; anything else is silently
        // skipped by policy.
        if intent.network != Network::Base {
            return ItemOutcome::skipped(kind, &intent.transcript, "network not supported");
        }

        let key = swap_idempotency_key(device_uid, intent);
        match self.db.ledger_key_exists(&key).await {
            Ok(true) => {
                return ItemOutcome::skipped(kind, &intent.transcript, "replayed delivery")
            }
            Ok(false) => {}
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        }

        let Some(credential) = sender.wallet_for(intent.network) else {
            return ItemOutcome::failed(
                kind,
                &intent.transcript,
                format!("{} has no {} wallet", sender.username, intent.network),
            );
        };

        let sender_wallet = match self.wallet.import_wallet(credential, intent.network).await {
            Ok(handle) => handle,
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        };

        let pending = match self
            .wallet
            .create_trade(
                &sender_wallet,
                TradeRequest {
                    amount: intent.amount,
                    from_asset_id: intent.from_currency.asset_id(),
                    to_asset_id: intent.to_currency.asset_id(),
                },
            )
            .await
        {
            Ok(pending) => pending,
            Err(e) => return ItemOutcome::failed(kind, &intent.transcript, e.to_string()),
        };

        let row = Trade::new(device_uid, intent, key);
        let (row, outcome) = match self.wallet.wait_for_trade(&pending).await {
            Ok(receipt) if receipt.status == SettlementStatus::Complete => {
                let txid = receipt.transaction_hash.unwrap_or(receipt.id);
                (
                    row.settled(receipt.to_amount, txid),
                    ItemOutcome::settled(kind, &intent.transcript),
                )
            }
            Ok(_) => (
                row.failed(REASON_SETTLEMENT_FAILED),
                ItemOutcome::failed(
                    kind,
                    &intent.transcript,
                    MurmurError::TradeFailed.to_string(),
                ),
            ),
            Err(MurmurError::SettlementTimeout { elapsed_secs }) => (
                row.failed(REASON_TIMED_OUT),
                ItemOutcome::failed(
                    kind,
                    &intent.transcript,
                    format!("settlement timed out after {elapsed_secs}s"),
                ),
            ),
            Err(e) => {
                let message = e.to_string();
                (
                    row.failed(&message),
                    ItemOutcome::failed(kind, &intent.transcript, message),
                )
            }
        };

        if let Err(e) = self.db.insert_trade(&row).await {
            tracing::error!(error = %e, txid = ?row.txid, "failed to insert trade ledger row");
        }

        outcome
    }
}

/// USDC on base is sponsored by the custody service; everything else pays
/// its own gas.
pub fn is_gasless(currency: Currency, network: Network) -> bool {
    currency == Currency::Usdc && network == Network::Base
}

/// Replay-protection key for one transfer delivery: a redelivered webhook
/// re-derives the same key and is dropped before any settlement attempt.
pub fn transfer_idempotency_key(device_uid: &str, intent: &TransferIntent) -> String {
    let input = format!(
        "{device_uid}|transfer|{}|{}|{}|{}|{}",
        intent.to, intent.amount, intent.currency, intent.network, intent.transcript
    );
    hex_digest(&input)
}

pub fn swap_idempotency_key(device_uid: &str, intent: &SwapIntent) -> String {
    let input = format!(
        "{device_uid}|swap|{}|{}|{}|{}|{}",
        intent.amount,
        intent.from_currency,
        intent.to_currency,
        intent.network,
        intent.transcript
    );
    hex_digest(&input)
}

fn hex_digest(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
