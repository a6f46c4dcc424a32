use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::WalletConfig;
use crate::error::{MurmurError, Result};
use crate::models::Network;

use super::api::{CreateTradeBody, CreateTransferBody, CustodyApiClient};

/// Terminal and in-flight states reported by the custody service for
/// transfers and trades.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Broadcast,
    Complete,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl SettlementStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Cancelled)
    }
}

/// A wallet imported for one network, addressable by custody id.
#[derive(Debug, Clone)]
pub struct WalletHandle {
    pub id: String,
    pub network: Network,
}

#[derive(Debug, Clone)]
pub struct TransferRequest<'a> {
    pub amount: Decimal,
    pub asset_id: &'a str,
    pub destination: &'a str,
    pub gasless: bool,
}

#[derive(Debug, Clone)]
pub struct TradeRequest<'a> {
    pub amount: Decimal,
    pub from_asset_id: &'a str,
    pub to_asset_id: &'a str,
}

/// A transfer accepted by the custody service, not yet settled.
#[derive(Debug, Clone)]
pub struct PendingTransfer {
    pub wallet_id: String,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct PendingTrade {
    pub wallet_id: String,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub id: String,
    pub status: SettlementStatus,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TradeReceipt {
    pub id: String,
    pub status: SettlementStatus,
    pub to_amount: Option<Decimal>,
    pub transaction_hash: Option<String>,
}

/// The custody capability: import a wallet, derive its address, create
/// transfers and trades, and wait (bounded) for settlement. Constructed once
/// at startup and injected into the execution engine.
#[derive(Clone, Debug)]
pub struct WalletProvider {
    client: CustodyApiClient,
    settlement_timeout: Duration,
    poll_interval: Duration,
}

impl WalletProvider {
    pub fn new(config: &WalletConfig) -> Result<Self> {
        Ok(Self {
            client: CustodyApiClient::new(config)?,
            settlement_timeout: Duration::from_secs(config.settlement_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub async fn import_wallet(&self, credential: &str, network: Network) -> Result<WalletHandle> {
        let wallet = self.client.import_wallet(credential, network).await?;
        Ok(WalletHandle {
            id: wallet.id,
            network,
        })
    }

    pub async fn default_address(&self, wallet: &WalletHandle) -> Result<String> {
        let address = self.client.default_address(&wallet.id).await?;
        Ok(address.address_id)
    }

    pub async fn create_transfer(
        &self,
        wallet: &WalletHandle,
        request: TransferRequest<'_>,
    ) -> Result<PendingTransfer> {
        let body = CreateTransferBody {
            amount: request.amount,
            asset_id: request.asset_id,
            destination: request.destination,
            gasless: request.gasless,
        };
        let transfer = self.client.create_transfer(&wallet.id, &body).await?;
        Ok(PendingTransfer {
            wallet_id: wallet.id.clone(),
            id: transfer.id,
        })
    }

    pub async fn create_trade(
        &self,
        wallet: &WalletHandle,
        request: TradeRequest<'_>,
    ) -> Result<PendingTrade> {
        let body = CreateTradeBody {
            amount: request.amount,
            from_asset_id: request.from_asset_id,
            to_asset_id: request.to_asset_id,
        };
        let trade = self.client.create_trade(&wallet.id, &body).await?;
        Ok(PendingTrade {
            wallet_id: wallet.id.clone(),
            id: trade.id,
        })
    }

    /// Poll the transfer until the custody service reports a terminal
    /// status. The wait is bounded by the configured settlement timeout; on
    /// expiry the caller classifies the item as failed rather than hanging
    /// the request.
    pub async fn wait_for_transfer(&self, pending: &PendingTransfer) -> Result<TransferReceipt> {
        let poll = async {
            loop {
                let transfer = self
                    .client
                    .get_transfer(&pending.wallet_id, &pending.id)
                    .await?;
                if transfer.status.is_terminal() {
                    return Ok(TransferReceipt {
                        id: transfer.id,
                        status: transfer.status,
                        transaction_hash: transfer.transaction_hash,
                    });
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout(self.settlement_timeout, poll).await {
            Ok(receipt) => receipt,
            Err(_) => Err(MurmurError::SettlementTimeout {
                elapsed_secs: self.settlement_timeout.as_secs(),
            }),
        }
    }

    pub async fn wait_for_trade(&self, pending: &PendingTrade) -> Result<TradeReceipt> {
        let poll = async {
            loop {
                let trade = self.client.get_trade(&pending.wallet_id, &pending.id).await?;
                if trade.status.is_terminal() {
                    return Ok(TradeReceipt {
                        id: trade.id,
                        status: trade.status,
                        to_amount: trade.to_amount,
                        transaction_hash: trade.transaction_hash,
                    });
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout(self.settlement_timeout, poll).await {
            Ok(receipt) => receipt,
            Err(_) => Err(MurmurError::SettlementTimeout {
                elapsed_secs: self.settlement_timeout.as_secs(),
            }),
        }
    }
}
