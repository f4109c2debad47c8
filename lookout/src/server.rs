//! HTTP surface: the chain list, the whitelisted proxy and the balance query.
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{
    error::{ProxyError, ServeError},
    query::{BalanceChecker, BalanceQuery},
};

/// Builds the router. All routes answer JSON and allow cross-origin GETs.
pub fn router(checker: BalanceChecker) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/chain-registry/chains", get(list_chains))
        .route("/api/{chain}/{*sub_path}", get(proxy))
        .route("/balances/{chain}/{address}", get(balances))
        .layer(cors)
        .with_state(checker)
}

/// Serves until the listener fails.
pub async fn serve(addr: SocketAddr, checker: BalanceChecker) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServeError::PortBindingFailed(addr, e))?;
    info!("server running at http://{}/", addr);
    info!("API proxy available at http://{}/api/{{chain}}/{{endpoint}}", addr);

    axum::serve(listener, router(checker))
        .await
        .map_err(ServeError::ServerCrashed)
}

async fn list_chains(State(checker): State<BalanceChecker>) -> Json<serde_json::Value> {
    Json(json!({ "chains": checker.router().registry().list() }))
}

async fn proxy(
    State(checker): State<BalanceChecker>,
    Path((chain, sub_path)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Response {
    match checker
        .router()
        .forward(&chain, &sub_path, query.as_deref())
        .await
    {
        Ok(forwarded) => {
            let status =
                StatusCode::from_u16(forwarded.status()).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                forwarded.body(),
            )
                .into_response()
        }
        Err(ProxyError::ChainNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Chain not found")
        }
        Err(ProxyError::InvalidPath(_)) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid endpoint path")
        }
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HistoryParams {
    height: Option<String>,
    date_time: Option<String>,
}

async fn balances(
    State(checker): State<BalanceChecker>,
    Path((chain, address)): Path<(String, String)>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let query = BalanceQuery {
        chain_name: chain,
        address,
        height: params.height,
        date_time: params.date_time,
    };

    match checker.get_balances(&query).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            let status = if err.is_chain_not_found() {
                StatusCode::NOT_FOUND
            } else if err.is_input_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            error_response(status, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
