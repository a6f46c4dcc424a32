use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::db::UserStore;
use crate::llm::LlmBackend;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub extraction: ExtractionStatus,
    pub wallet: WalletStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ExtractionStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct WalletStatus {
    pub status: String,
    pub base_url: String,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = HealthData))
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match state.db.list_usernames().await {
        Ok(_) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(e) => {
            tracing::error!(error = %e, "health check database probe failed");
            DatabaseStatus {
                status: "error".to_string(),
            }
        }
    };

    let extraction = if state.llm.is_available() {
        ExtractionStatus {
            status: "ok".to_string(),
            model: state.llm.model().map(str::to_string),
        }
    } else {
        let reason = match state.llm.backend() {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "unavailable".to_string(),
        };
        ExtractionStatus {
            status: reason,
            model: None,
        }
    };

    let wallet = WalletStatus {
        status: "configured".to_string(),
        base_url: state.wallet.base_url().to_string(),
    };

    let status = if database.status == "ok" { "ok" } else { "degraded" };

    ApiResponse::success(HealthData {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        extraction,
        wallet,
    })
}
