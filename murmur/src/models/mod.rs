mod common;
mod intent;
mod ledger;
mod user;

pub use common::*;
pub use intent::*;
pub use ledger::*;
pub use user::*;
