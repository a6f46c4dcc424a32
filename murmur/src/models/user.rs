use serde::{Deserialize, Serialize};

use super::Network;

/// A registered identity: dashboard account, bound device, and one opaque
/// custody credential per supported network. Owned by the external user
/// store; the pipeline only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Device-bound identifier delivered as the webhook `uid` parameter.
    pub omi_id: Option<String>,
    pub base_wallet: Option<String>,
    pub eth_wallet: Option<String>,
    pub polygon_wallet: Option<String>,
    pub arbitrum_wallet: Option<String>,
}

impl User {
    /// Custody credential for the given network, if the user has one.
    pub fn wallet_for(&self, network: Network) -> Option<&str> {
        let wallet = match network {
            Network::Base => &self.base_wallet,
            Network::Ethereum => &self.eth_wallet,
            Network::Polygon => &self.polygon_wallet,
            Network::Arbitrum => &self.arbitrum_wallet,
        };
        wallet.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "bob".to_string(),
            omi_id: Some("device-1".to_string()),
            base_wallet: Some("{\"walletId\":\"w-base\"}".to_string()),
            eth_wallet: None,
            polygon_wallet: Some("{\"walletId\":\"w-poly\"}".to_string()),
            arbitrum_wallet: None,
        }
    }

    #[test]
    fn wallet_selection_is_per_network() {
        let u = user();
        assert!(u.wallet_for(Network::Base).unwrap().contains("w-base"));
        assert!(u.wallet_for(Network::Polygon).unwrap().contains("w-poly"));
        assert!(u.wallet_for(Network::Ethereum).is_none());
        assert!(u.wallet_for(Network::Arbitrum).is_none());
    }
}
