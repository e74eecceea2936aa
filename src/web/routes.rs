//! Admin API route definitions.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::web::handlers;
use crate::web::types::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/scrape",
            get(handlers::scrape_status).post(handlers::run_scrape),
        )
        .route("/api/v1/modules", get(handlers::list_modules))
        .route(
            "/api/v1/modules/:module_name",
            get(handlers::get_module).patch(handlers::patch_module),
        )
}
