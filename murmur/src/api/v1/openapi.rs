use axum::Json;
use utoipa::OpenApi;

use super::dto::ledger::{TradeDto, TransactionDto};
use super::handlers;
use super::handlers::health::{DatabaseStatus, ExtractionStatus, HealthData, WalletStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Murmur API",
        description = "Read API backing the Murmur dashboard."
    ),
    paths(
        handlers::health::health_check,
        handlers::ledger::list_transactions,
        handlers::ledger::list_trades,
    ),
    components(schemas(
        TransactionDto,
        TradeDto,
        HealthData,
        DatabaseStatus,
        ExtractionStatus,
        WalletStatus
    ))
)]
pub struct ApiDoc;

/// `GET /api/v1/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
