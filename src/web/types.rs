//! Admin API data types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Reconciler;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<Reconciler>,
}

/// Uniform response envelope for every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Failure that still carries a result payload, e.g. a batch outcome
    /// with failed modules.
    pub fn error_with_data(data: T, error: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            ..Self::error(error)
        }
    }
}

/// Body of `POST /api/v1/scrape`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// Scrape only this module; all registered modules when absent.
    #[serde(default)]
    pub module_name: Option<String>,
}

/// Query of `GET /api/v1/modules/{name}`.
#[derive(Debug, Deserialize, Default)]
pub struct ModuleQuery {
    /// `data` (default) or `stats`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
