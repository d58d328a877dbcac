//! API handlers: decode the query, run the pipeline, encode the answer.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::Result;
use crate::types::{Operation, OperationRequest};
use crate::version;

/// Query parameters shared by all operations. Presence checks happen in
/// the pipeline so every transport reports the same errors.
#[derive(Debug, Deserialize)]
pub struct OperationParams {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    context: String,
}

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct ResultBody {
    pub result: String,
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> Result<Json<ResultBody>> {
    run(state, Operation::Translate, params).await
}

pub async fn format(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> Result<Json<ResultBody>> {
    run(state, Operation::Format, params).await
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> Result<Json<ResultBody>> {
    run(state, Operation::Summarize, params).await
}

async fn run(
    state: Arc<AppState>,
    operation: Operation,
    params: OperationParams,
) -> Result<Json<ResultBody>> {
    let request = OperationRequest::new(operation, params.keyword, params.context);
    let result = state.orchestrator.handle(&request).await?;
    Ok(Json(ResultBody { result }))
}

/// Liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": version::version_string(),
    }))
}
