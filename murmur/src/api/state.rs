use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::directory::DirectoryResolver;
use crate::engine::ExecutionEngine;
use crate::extraction::IntentExtractor;
use crate::llm::LlmProvider;
use crate::wallet::WalletProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub llm: LlmProvider,
    pub wallet: WalletProvider,
    pub extractor: IntentExtractor,
    pub directory: DirectoryResolver,
    pub engine: ExecutionEngine,
    /// Monotonic ledger view version, bumped after a webhook writes rows.
    /// The read API echoes it so dependent views can detect staleness
    /// without polling row contents.
    ledger_version: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Arc<dyn DatabaseBackend>,
        llm: LlmProvider,
        wallet: WalletProvider,
    ) -> Self {
        let config = Arc::new(config);
        let extractor = IntentExtractor::new(llm.clone());
        let directory = DirectoryResolver::new(db.clone(), wallet.clone());
        let engine = ExecutionEngine::new(db.clone(), wallet.clone(), directory.clone());

        Self {
            config,
            db,
            llm,
            wallet,
            extractor,
            directory,
            engine,
            ledger_version: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ledger_version(&self) -> u64 {
        self.ledger_version.load(Ordering::Relaxed)
    }

    pub fn bump_ledger_version(&self) {
        self.ledger_version.fetch_add(1, Ordering::Relaxed);
    }
}
