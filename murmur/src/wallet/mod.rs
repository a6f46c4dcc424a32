mod api;
mod provider;

pub use api::CustodyApiClient;
pub use provider::{
    PendingTrade, PendingTransfer, SettlementStatus, TradeReceipt, TradeRequest, TransferReceipt,
    TransferRequest, WalletHandle, WalletProvider,
};
