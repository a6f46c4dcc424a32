use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::WalletConfig;
use crate::error::{MurmurError, Result};
use crate::models::Network;

use super::provider::SettlementStatus;

/// HTTP client for the custody service's REST API: wallet import, default
/// addresses, transfers, and trades. One instance is shared process-wide.
#[derive(Clone, Debug)]
pub struct CustodyApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImportWalletRequest<'a> {
    network_id: &'a str,
    /// Opaque credential blob as stored on the user row.
    credential: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct WalletResource {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressResource {
    pub address_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateTransferBody<'a> {
    pub amount: Decimal,
    pub asset_id: &'a str,
    pub destination: &'a str,
    pub gasless: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateTradeBody<'a> {
    pub amount: Decimal,
    pub from_asset_id: &'a str,
    pub to_asset_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TransferResource {
    pub id: String,
    pub status: SettlementStatus,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TradeResource {
    pub id: String,
    pub status: SettlementStatus,
    pub to_amount: Option<Decimal>,
    pub transaction_hash: Option<String>,
}

impl CustodyApiClient {
    pub fn new(config: &WalletConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MurmurError::Wallet(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn import_wallet(&self, credential: &str, network: Network) -> Result<WalletResource> {
        let body = ImportWalletRequest {
            network_id: network.custody_id(),
            credential,
        };
        self.post(&format!("{}/v1/wallets/import", self.base_url), &body)
            .await
    }

    pub async fn default_address(&self, wallet_id: &str) -> Result<AddressResource> {
        self.get(&format!(
            "{}/v1/wallets/{wallet_id}/addresses/default",
            self.base_url
        ))
        .await
    }

    pub async fn create_transfer(
        &self,
        wallet_id: &str,
        body: &CreateTransferBody<'_>,
    ) -> Result<TransferResource> {
        self.post(
            &format!("{}/v1/wallets/{wallet_id}/transfers", self.base_url),
            body,
        )
        .await
    }

    pub async fn get_transfer(&self, wallet_id: &str, transfer_id: &str) -> Result<TransferResource> {
        self.get(&format!(
            "{}/v1/wallets/{wallet_id}/transfers/{transfer_id}",
            self.base_url
        ))
        .await
    }

    pub async fn create_trade(
        &self,
        wallet_id: &str,
        body: &CreateTradeBody<'_>,
    ) -> Result<TradeResource> {
        self.post(
            &format!("{}/v1/wallets/{wallet_id}/trades", self.base_url),
            body,
        )
        .await
    }

    pub async fn get_trade(&self, wallet_id: &str, trade_id: &str) -> Result<TradeResource> {
        self.get(&format!(
            "{}/v1/wallets/{wallet_id}/trades/{trade_id}",
            self.base_url
        ))
        .await
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        Self::read_response(request.send().await?).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        Self::read_response(request.send().await?).await
    }

    async fn read_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MurmurError::Wallet(format!(
                "Custody API request failed ({status}): {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MurmurError::Wallet(format!("Failed to parse custody response: {e}")))
    }
}
