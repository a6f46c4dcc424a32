use axum::{middleware, routing::get, Router};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json));

    let protected_routes = Router::new()
        .route("/transactions", get(handlers::ledger::list_transactions))
        .route("/trades", get(handlers::ledger::list_trades))
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
