//! The device webhook: raw transcript in, settled commands out.
//!
//! The wearable POSTs transcript batches here with its device id in the
//! `uid` query parameter. Responses are plain text: the device firmware
//! only distinguishes status codes, and the 400 body is a fixed
//! `"Webhook error: <message>"` template.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nanoid::nanoid;
use serde::Deserialize;

use crate::api::AppState;
use crate::db::UserStore;
use crate::engine::ItemOutcome;
use crate::error::{MurmurError, Result};
use crate::models::ExecutionStatus;
use crate::segmenter::{
    self, SWAP_END_PHRASES, SWAP_START_PHRASES, TRANSFER_END_PHRASES, TRANSFER_START_PHRASES,
};

#[derive(Debug, Deserialize)]
struct TranscriptPayload {
    transcript_segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptSegment {
    text: String,
}

/// `POST /memory?uid=<deviceId>`
pub async fn receive(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    match process(&state, &params, &body).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(error = %error, "webhook processing failed");
            (
                StatusCode::BAD_REQUEST,
                format!("Webhook error: {}", error_message(&error)),
            )
                .into_response()
        }
    }
}

/// The device firmware displays the 400 body verbatim, so validation and
/// lookup failures surface their bare message without the variant prefix.
fn error_message(error: &MurmurError) -> String {
    match error {
        MurmurError::Validation(msg)
        | MurmurError::NotFound(msg)
        | MurmurError::Internal(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// `GET /memory` — liveness probe for the device's webhook configuration.
pub async fn liveness() -> Response {
    (StatusCode::OK, "Worked").into_response()
}

async fn process(
    state: &AppState,
    params: &HashMap<String, String>,
    body: &Bytes,
) -> Result<Response> {
    let uid = params
        .get("uid")
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| MurmurError::Validation("User ID (uid) is required.".to_string()))?;

    let payload: TranscriptPayload = serde_json::from_slice(body)?;
    let transcript = payload
        .transcript_segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let transfer_utterances =
        segmenter::segment(&transcript, TRANSFER_START_PHRASES, TRANSFER_END_PHRASES)?;
    let swap_utterances = segmenter::segment(&transcript, SWAP_START_PHRASES, SWAP_END_PHRASES)?;

    if transfer_utterances.is_empty() && swap_utterances.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let batch_id = nanoid!(10);
    tracing::info!(
        batch_id = %batch_id,
        transfers = transfer_utterances.len(),
        swaps = swap_utterances.len(),
        "command utterances segmented"
    );

    // Exactly one sender per request; an unregistered device is the one
    // identity failure that aborts everything.
    let sender = state.directory.resolve_sender(uid).await?;
    let known_usernames = state.db.list_usernames().await?;

    let (transfers, swaps) = tokio::join!(
        state
            .extractor
            .extract_transfers(&transfer_utterances, &known_usernames),
        state.extractor.extract_swaps(&swap_utterances),
    );

    for failure in transfers.failures.iter().chain(swaps.failures.iter()) {
        tracing::warn!(
            batch_id = %batch_id,
            transcript = %failure.transcript,
            error = %failure.error,
            "utterance dropped after extraction failure"
        );
    }

    let mut outcomes = state
        .engine
        .execute_transfers(&sender, uid, &transfers.intents)
        .await;
    outcomes.extend(
        state
            .engine
            .execute_swaps(&sender, uid, &swaps.intents)
            .await,
    );

    if outcomes
        .iter()
        .any(|o| o.status != ExecutionStatus::Skipped)
    {
        state.bump_ledger_version();
    }

    log_summary(&batch_id, &outcomes, transfers.dropped + swaps.dropped);

    Ok((StatusCode::OK, "Success!").into_response())
}

fn log_summary(batch_id: &str, outcomes: &[ItemOutcome], dropped: usize) {
    let settled = outcomes
        .iter()
        .filter(|o| o.status == ExecutionStatus::Settled)
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| o.status == ExecutionStatus::Failed)
        .count();
    let skipped = outcomes
        .iter()
        .filter(|o| o.status == ExecutionStatus::Skipped)
        .count();

    tracing::info!(
        batch_id = %batch_id,
        settled,
        failed,
        skipped,
        dropped,
        "webhook batch complete"
    );
}
