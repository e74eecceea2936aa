//! Admin API handlers.
//!
//! The reconciliation core is blocking (network fetches, file I/O), so every
//! handler that touches it runs the work on the blocking thread pool.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::Error;
use crate::reconcile::TranslationUpdate;
use crate::web::types::{ApiResponse, AppState, ModuleQuery, ScrapeRequest};

type ApiResult = (StatusCode, Json<ApiResponse<Value>>);

fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::Config(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn internal(error: impl std::fmt::Display) -> ApiResult {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(error.to_string())),
    )
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ApiResult> {
    serde_json::to_value(value).map_err(internal)
}

/// GET /api/v1/scrape — readiness probe.
pub async fn scrape_status() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({
        "status": "ready",
        "message": "scraper service is running",
    })))
}

/// POST /api/v1/scrape — reconcile one module, or all when none is named.
pub async fn run_scrape(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ScrapeRequest>>,
) -> ApiResult {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let reconciler = Arc::clone(&state.reconciler);

    match request.module_name {
        Some(module_name) => {
            let name = module_name.clone();
            let result =
                tokio::task::spawn_blocking(move || reconciler.reconcile_module(&name)).await;
            let outcome = match result {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => return (error_status(&e), Json(ApiResponse::error(e.to_string()))),
                Err(e) => return internal(e),
            };

            let data = match to_value(&outcome) {
                Ok(data) => data,
                Err(response) => return response,
            };
            if outcome.success {
                (
                    StatusCode::OK,
                    Json(ApiResponse::ok_with_message(
                        data,
                        format!("module {module_name} reconciled"),
                    )),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error_with_data(
                        data,
                        outcome.error.unwrap_or_else(|| "scrape failed".to_string()),
                    )),
                )
            }
        }
        None => {
            let result = tokio::task::spawn_blocking(move || reconciler.reconcile_all()).await;
            let batch = match result {
                Ok(batch) => batch,
                Err(e) => return internal(e),
            };

            let data = match to_value(&batch) {
                Ok(data) => data,
                Err(response) => return response,
            };
            if batch.failed_modules == 0 {
                (
                    StatusCode::OK,
                    Json(ApiResponse::ok_with_message(
                        data,
                        format!("all {} modules reconciled", batch.total_modules),
                    )),
                )
            } else {
                // Partial success is a first-class result, not a failure of
                // the whole batch.
                (
                    StatusCode::MULTI_STATUS,
                    Json(ApiResponse::error_with_data(
                        data,
                        format!(
                            "{} of {} modules failed",
                            batch.failed_modules, batch.total_modules
                        ),
                    )),
                )
            }
        }
    }
}

/// GET /api/v1/modules — completion stats for every registered module.
pub async fn list_modules(State(state): State<Arc<AppState>>) -> ApiResult {
    let reconciler = Arc::clone(&state.reconciler);
    let result = tokio::task::spawn_blocking(move || {
        reconciler
            .registry()
            .names()
            .into_iter()
            .map(|name| reconciler.module_stats(name))
            .collect::<crate::Result<Vec<_>>>()
    })
    .await;

    match result {
        Ok(Ok(stats)) => match to_value(&stats) {
            Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
            Err(response) => response,
        },
        Ok(Err(e)) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
        Err(e) => internal(e),
    }
}

/// GET /api/v1/modules/{name}?type=data|stats — module rows or stats.
pub async fn get_module(
    State(state): State<Arc<AppState>>,
    Path(module_name): Path<String>,
    Query(query): Query<ModuleQuery>,
) -> ApiResult {
    let reconciler = Arc::clone(&state.reconciler);
    let want_stats = query.kind.as_deref() == Some("stats");

    let result = tokio::task::spawn_blocking(move || {
        if want_stats {
            reconciler
                .module_stats(&module_name)
                .and_then(|stats| serde_json::to_value(stats).map_err(Error::from))
        } else {
            reconciler
                .module_data(&module_name)
                .and_then(|rows| serde_json::to_value(rows).map_err(Error::from))
        }
    })
    .await;

    match result {
        Ok(Ok(data)) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Ok(Err(e)) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
        Err(e) => internal(e),
    }
}

/// PATCH /api/v1/modules/{name} — apply a single translation edit.
pub async fn patch_module(
    State(state): State<Arc<AppState>>,
    Path(module_name): Path<String>,
    Json(update): Json<TranslationUpdate>,
) -> ApiResult {
    let reconciler = Arc::clone(&state.reconciler);
    let summary = format!("{} ({})", update.key, update.lang);

    let result =
        tokio::task::spawn_blocking(move || reconciler.update_translation(&module_name, update))
            .await;

    match result {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(ApiResponse::ok_with_message(
                Value::Null,
                format!("translation updated: {summary}"),
            )),
        ),
        Ok(Err(e)) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
        Err(e) => internal(e),
    }
}
