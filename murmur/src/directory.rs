//! Identity resolution: device → sending user, username → on-chain address.

use std::sync::Arc;

use crate::db::{DatabaseBackend, UserStore};
use crate::error::{MurmurError, Result};
use crate::models::{Network, User};
use crate::wallet::WalletProvider;

#[derive(Clone)]
pub struct DirectoryResolver {
    db: Arc<dyn DatabaseBackend>,
    wallet: WalletProvider,
}

impl DirectoryResolver {
    pub fn new(db: Arc<dyn DatabaseBackend>, wallet: WalletProvider) -> Self {
        Self { db, wallet }
    }

    /// Look up the identity bound to a webhook device id. A request always
    /// has exactly one sender; an unregistered device fails the whole
    /// request upstream.
    pub async fn resolve_sender(&self, device_id: &str) -> Result<User> {
        self.db
            .get_user_by_device_id(device_id)
            .await?
            .ok_or_else(|| {
                MurmurError::NotFound(format!("No registered user for device {device_id}"))
            })
    }

    /// Resolve a recipient username to their externally-facing address on
    /// the given network. Failures here are scoped to the one transfer
    /// being executed.
    pub async fn resolve_recipient_address(
        &self,
        username: &str,
        network: Network,
    ) -> Result<String> {
        let recipient = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| MurmurError::NotFound(format!("Unknown recipient: {username}")))?;

        let credential = recipient.wallet_for(network).ok_or_else(|| {
            MurmurError::NotFound(format!("{username} has no {network} wallet"))
        })?;

        let handle = self.wallet.import_wallet(credential, network).await?;
        self.wallet.default_address(&handle).await
    }
}
