#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use libsql::params;

use murmur::api::{create_router, AppState};
use murmur::config::{Config, DatabaseConfig, LlmConfig, ServerConfig, WalletConfig};
use murmur::db::{Database, DatabaseBackend, LibSqlBackend};
use murmur::llm::LlmProvider;
use murmur::wallet::WalletProvider;

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub db: Database,
    // Keeps the backing database file alive for the test's duration.
    _data_dir: tempfile::TempDir,
}

/// Config pointed at the two mock servers, with fast settlement polling.
/// The database url is filled in by [`build_app`].
pub fn test_config(llm_uri: &str, wallet_uri: &str, api_keys: Vec<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_keys,
        },
        database: DatabaseConfig {
            url: String::new(),
            auth_token: None,
            local_path: None,
        },
        llm: Some(LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(format!("{llm_uri}/v1")),
            timeout_secs: 5,
            max_retries: 0,
        }),
        wallet: WalletConfig {
            base_url: wallet_uri.to_string(),
            api_key: Some("wallet-key".to_string()),
            timeout_secs: 5,
            settlement_timeout_secs: 5,
            poll_interval_ms: 10,
        },
    }
}

pub async fn build_app(mut config: Config) -> TestApp {
    let data_dir = tempfile::tempdir().expect("tempdir");
    config.database.url = format!("file:{}", data_dir.path().join("murmur.db").display());

    let raw_db = Database::new(&config.database).await.expect("database");
    let db_handle = raw_db.clone();
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    let llm = LlmProvider::new(config.llm.as_ref());
    let wallet = WalletProvider::new(&config.wallet).expect("wallet provider");

    let state = AppState::new(config, db, llm, wallet);
    let router = create_router(state.clone());

    TestApp {
        state,
        router,
        db: db_handle,
        _data_dir: data_dir,
    }
}

/// Register an identity with a device binding and a base wallet credential.
pub async fn seed_user(db: &Database, username: &str, omi_id: Option<&str>, base_wallet: Option<&str>) {
    let conn = db.connect().expect("connect");
    conn.execute(
        "INSERT INTO users (username, omi_id, base_wallet) VALUES (?1, ?2, ?3)",
        params![
            username,
            omi_id.map(|s| s.to_string()),
            base_wallet.map(|s| s.to_string()),
        ],
    )
    .await
    .expect("seed user");
}

/// A webhook body with the whole transcript in one segment.
pub fn transcript_body(text: &str) -> String {
    serde_json::json!({
        "transcript_segments": [{ "text": text }]
    })
    .to_string()
}

/// An OpenAI-style chat completion whose content is the given JSON string.
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}
