//! End-to-end webhook tests: real router, in-memory database, mock
//! extraction model and mock custody service.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{build_app, completion_body, seed_user, test_config, transcript_body, TestApp};
use murmur::db::LedgerStore;
use murmur::models::ExecutionStatus;

async fn post_webhook(app: &TestApp, uri: &str, body: String) -> (StatusCode, String) {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Mounts the custody endpoints for a sender/recipient pair on base.
async fn mount_custody_wallets(custody: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/wallets/import"))
        .and(body_string_contains("recipient-cred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "w-recipient"
        })))
        .mount(custody)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/wallets/import"))
        .and(body_string_contains("sender-cred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "w-sender"
        })))
        .mount(custody)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/wallets/w-recipient/addresses/default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address_id": "0xrecipient"
        })))
        .mount(custody)
        .await;
}

#[tokio::test]
async fn missing_uid_returns_400() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;
    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;

    let (status, body) = post_webhook(&app, "/memory", transcript_body("hello")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("User ID (uid) is required."));
    assert!(body.starts_with("Webhook error:"));
}

#[tokio::test]
async fn malformed_body_returns_400() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;
    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;

    let (status, body) = post_webhook(&app, "/memory?uid=device-1", "not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Webhook error:"));
}

#[tokio::test]
async fn transcript_without_commands_returns_204() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;
    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;

    let (status, _) = post_webhook(
        &app,
        "/memory?uid=device-1",
        transcript_body("just chatting about lunch plans"),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    // No extraction calls were issued and nothing was written.
    assert!(llm.received_requests().await.unwrap().is_empty());
    assert!(app.state.db.list_transactions(10).await.unwrap().is_empty());
    assert_eq!(app.state.ledger_version(), 0);
}

#[tokio::test]
async fn unknown_device_returns_400() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;
    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;

    let (status, body) = post_webhook(
        &app,
        "/memory?uid=ghost",
        transcript_body("start transaction send five dollars to bob end transaction"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No registered user for device ghost"));
}

#[tokio::test]
async fn transfer_settles_and_writes_ledger_row() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"to": "bob", "amount": 5, "currency": "USDC", "network": "base"}"#,
        )))
        .expect(1)
        .mount(&llm)
        .await;

    mount_custody_wallets(&custody).await;
    Mock::given(method("POST"))
        .and(path("/v1/wallets/w-sender/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "pending", "transaction_hash": null
        })))
        .expect(1)
        .mount(&custody)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/wallets/w-sender/transfers/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "complete", "transaction_hash": "0xhash"
        })))
        .mount(&custody)
        .await;

    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;
    seed_user(&app.db, "bob", None, Some("recipient-cred")).await;

    let (status, body) = post_webhook(
        &app,
        "/memory?uid=device-1",
        transcript_body("start transaction send five dollars to bob end transaction"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success!");

    let rows = app.state.db.list_transactions(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.status, ExecutionStatus::Settled);
    assert_eq!(row.txid.as_deref(), Some("0xhash"));
    assert_eq!(row.from_username, "alice");
    assert_eq!(row.to_username, "bob");
    assert_eq!(row.amount.to_string(), "5");
    assert_eq!(row.device_uid, "device-1");
    assert_eq!(row.transcript, "Send Five Dollars To Bob");
    assert!(row.failure_reason.is_none());

    assert_eq!(app.state.ledger_version(), 1);
}

#[tokio::test]
async fn failed_settlement_writes_failed_row_and_keeps_200() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"to": "bob", "amount": 5, "currency": "USDC", "network": "base"}"#,
        )))
        .mount(&llm)
        .await;

    mount_custody_wallets(&custody).await;
    Mock::given(method("POST"))
        .and(path("/v1/wallets/w-sender/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "pending", "transaction_hash": null
        })))
        .mount(&custody)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/wallets/w-sender/transfers/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "failed", "transaction_hash": null
        })))
        .mount(&custody)
        .await;

    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;
    seed_user(&app.db, "bob", None, Some("recipient-cred")).await;

    let (status, _) = post_webhook(
        &app,
        "/memory?uid=device-1",
        transcript_body("start transaction send five dollars to bob end transaction"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let rows = app.state.db.list_transactions(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ExecutionStatus::Failed);
    assert_eq!(rows[0].failure_reason.as_deref(), Some("settlement_failed"));
    assert!(rows[0].txid.is_none());
}

#[tokio::test]
async fn unknown_recipient_fails_item_but_siblings_still_process() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Mallory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"to": "mallory", "amount": 5, "currency": "USDC", "network": "base"}"#,
        )))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"to": "bob", "amount": 2, "currency": "USDC", "network": "base"}"#,
        )))
        .mount(&llm)
        .await;

    mount_custody_wallets(&custody).await;
    Mock::given(method("POST"))
        .and(path("/v1/wallets/w-sender/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "pending", "transaction_hash": null
        })))
        .expect(1)
        .mount(&custody)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/wallets/w-sender/transfers/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "complete", "transaction_hash": "0xsecond"
        })))
        .mount(&custody)
        .await;

    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;
    seed_user(&app.db, "bob", None, Some("recipient-cred")).await;

    let (status, body) = post_webhook(
        &app,
        "/memory?uid=device-1",
        transcript_body(
            "start transaction send five dollars to mallory end transaction \
             start transaction send two dollars to bob end transaction",
        ),
    )
    .await;

    // The unknown recipient fails only its own intent.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success!");

    let rows = app.state.db.list_transactions(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].to_username, "bob");
    assert_eq!(rows[0].txid.as_deref(), Some("0xsecond"));
}

#[tokio::test]
async fn non_base_swap_is_skipped_without_side_effects() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;

    for network in ["polygon", "arbitrum", "ethereum"] {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains(format!("On {}", capitalize(network))))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&format!(
                r#"{{"amount": 5, "from_currency": "USDC", "to_currency": "ETH", "network": "{network}"}}"#
            ))))
            .mount(&llm)
            .await;
    }

    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;

    let (status, _) = post_webhook(
        &app,
        "/memory?uid=device-1",
        transcript_body(
            "start swap swap five dollars for eth on polygon end swap \
             start swap swap five dollars for eth on arbitrum end swap \
             start swap swap five dollars for eth on ethereum end swap",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // No settlement attempt, no ledger row, for any non-base network.
    assert!(custody.received_requests().await.unwrap().is_empty());
    assert!(app.state.db.list_trades(10).await.unwrap().is_empty());
    assert_eq!(app.state.ledger_version(), 0);
}

#[tokio::test]
async fn base_swap_settles_with_receipt_amount() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"amount": 5, "from_currency": "USDC", "to_currency": "ETH", "network": "base"}"#,
        )))
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/wallets/import"))
        .and(body_string_contains("sender-cred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "w-sender"
        })))
        .mount(&custody)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/wallets/w-sender/trades"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "tr-1", "status": "broadcast", "to_amount": null, "transaction_hash": null
        })))
        .expect(1)
        .mount(&custody)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/wallets/w-sender/trades/tr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "tr-1", "status": "complete", "to_amount": "0.002", "transaction_hash": "0xswap"
        })))
        .mount(&custody)
        .await;

    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;

    let (status, _) = post_webhook(
        &app,
        "/memory?uid=device-1",
        transcript_body("start swap swap five dollars for eth end swap"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let trades = app.state.db.list_trades(10).await.unwrap();
    assert_eq!(trades.len(), 1);
    let trade = &trades[0];
    assert_eq!(trade.status, ExecutionStatus::Settled);
    assert_eq!(trade.amount_deposit.to_string(), "5");
    assert_eq!(trade.amount_receive.map(|a| a.to_string()), Some("0.002".to_string()));
    assert_eq!(trade.txid.as_deref(), Some("0xswap"));
}

#[tokio::test]
async fn redelivered_webhook_does_not_double_execute() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"to": "bob", "amount": 5, "currency": "USDC", "network": "base"}"#,
        )))
        .mount(&llm)
        .await;

    mount_custody_wallets(&custody).await;
    Mock::given(method("POST"))
        .and(path("/v1/wallets/w-sender/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "pending", "transaction_hash": null
        })))
        .expect(1)
        .mount(&custody)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/wallets/w-sender/transfers/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t-1", "status": "complete", "transaction_hash": "0xhash"
        })))
        .mount(&custody)
        .await;

    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;
    seed_user(&app.db, "alice", Some("device-1"), Some("sender-cred")).await;
    seed_user(&app.db, "bob", None, Some("recipient-cred")).await;

    let body = transcript_body("start transaction send five dollars to bob end transaction");

    let (first, _) = post_webhook(&app, "/memory?uid=device-1", body.clone()).await;
    let (second, _) = post_webhook(&app, "/memory?uid=device-1", body).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    // One settlement, one row, one version bump.
    assert_eq!(app.state.db.list_transactions(10).await.unwrap().len(), 1);
    assert_eq!(app.state.ledger_version(), 1);
}

#[tokio::test]
async fn liveness_probe_works() {
    let llm = MockServer::start().await;
    let custody = MockServer::start().await;
    let app = build_app(test_config(&llm.uri(), &custody.uri(), vec![])).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/memory")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Worked");
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
