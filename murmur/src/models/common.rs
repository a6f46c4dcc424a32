use serde::{Deserialize, Serialize};

/// Blockchain networks a command can settle on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Base,
    Polygon,
    Arbitrum,
    Ethereum,
}

impl Network {
    /// Custody-service network identifier. Base is pinned to the Sepolia
    /// testnet; the other networks are mainnet.
    pub fn custody_id(&self) -> &'static str {
        match self {
            Self::Base => "base-sepolia",
            Self::Polygon => "polygon-mainnet",
            Self::Arbitrum => "arbitrum-mainnet",
            Self::Ethereum => "ethereum-mainnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Polygon => write!(f, "polygon"),
            Self::Arbitrum => write!(f, "arbitrum"),
            Self::Ethereum => write!(f, "ethereum"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "polygon" => Ok(Self::Polygon),
            "arbitrum" => Ok(Self::Arbitrum),
            "ethereum" | "eth-mainnet" => Ok(Self::Ethereum),
            _ => Err(format!("Unknown network: {s}")),
        }
    }
}

/// Currencies the extraction stage is allowed to produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "ETH")]
    Eth,
}

impl Currency {
    /// Custody-service asset identifier.
    pub fn asset_id(&self) -> &'static str {
        match self {
            Self::Usdc => "usdc",
            Self::Eth => "eth",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usdc => write!(f, "USDC"),
            Self::Eth => write!(f, "ETH"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USDC" => Ok(Self::Usdc),
            "ETH" => Ok(Self::Eth),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// The two command families the segmenter recognizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Transfer,
    Swap,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transfer => write!(f, "transfer"),
            Self::Swap => write!(f, "swap"),
        }
    }
}

/// Terminal state of one intent after the execution stage.
///
/// `Settled` and `Failed` correspond to a ledger row (a settlement was
/// attempted); `Skipped` means the intent was dropped before any side
/// effect (validation, policy, unknown recipient, or replayed delivery).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Settled,
    Failed,
    Skipped,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settled => write!(f, "settled"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "settled" => Ok(Self::Settled),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(format!("Unknown execution status: {s}")),
        }
    }
}
