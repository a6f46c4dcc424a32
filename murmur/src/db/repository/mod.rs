mod trades;
mod transactions;
mod users;

pub use trades::TradeRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;
