//! Ledger read handlers backing the dashboard's transaction history.

use axum::extract::{Query, State};

use crate::api::v1::dto::ledger::{LedgerListQuery, TradeDto, TransactionDto};
use crate::api::v1::response::{ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::db::LedgerStore;

/// `GET /api/v1/transactions`
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "ledger",
    params(LedgerListQuery),
    responses(
        (status = 200, description = "Most recent transfers, newest first", body = [TransactionDto]),
        (status = 401, description = "Missing or invalid API key"),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<LedgerListQuery>,
) -> ApiResponse<Vec<TransactionDto>> {
    let rows = match state.db.list_transactions(query.clamped_limit()).await {
        Ok(rows) => rows,
        Err(e) => return e.into(),
    };

    let data: Vec<TransactionDto> = rows.into_iter().map(Into::into).collect();
    let meta = ResponseMeta {
        total: Some(data.len() as u64),
        version: Some(state.ledger_version()),
    };
    ApiResponse::success_with_meta(data, meta)
}

/// `GET /api/v1/trades`
#[utoipa::path(
    get,
    path = "/api/v1/trades",
    tag = "ledger",
    params(LedgerListQuery),
    responses(
        (status = 200, description = "Most recent trades, newest first", body = [TradeDto]),
        (status = 401, description = "Missing or invalid API key"),
    )
)]
pub async fn list_trades(
    State(state): State<AppState>,
    Query(query): Query<LedgerListQuery>,
) -> ApiResponse<Vec<TradeDto>> {
    let rows = match state.db.list_trades(query.clamped_limit()).await {
        Ok(rows) => rows,
        Err(e) => return e.into(),
    };

    let data: Vec<TradeDto> = rows.into_iter().map(Into::into).collect();
    let meta = ResponseMeta {
        total: Some(data.len() as u64),
        version: Some(state.ledger_version()),
    };
    ApiResponse::success_with_meta(data, meta)
}
