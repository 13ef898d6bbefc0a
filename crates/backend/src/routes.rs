use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, state::AppState};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // U501 INVENTORY LOOKUP
        // ========================================
        .route(
            "/api/inventory",
            post(handlers::u501_inventory_lookup::lookup),
        )
        .route(
            "/api/inventory/sessions",
            post(handlers::u501_inventory_lookup::start_session),
        )
        .route(
            "/api/inventory/sessions/:session_id",
            get(handlers::u501_inventory_lookup::get_progress),
        )
        .route(
            "/api/inventory/sessions/:session_id/cancel",
            post(handlers::u501_inventory_lookup::cancel_session),
        )
        // ========================================
        // OPTION IDS IMPORT / CSV EXPORT
        // ========================================
        .route(
            "/api/upload-csv",
            post(handlers::u501_inventory_lookup::upload_csv),
        )
        .route(
            "/api/option-ids/parse",
            post(handlers::u501_inventory_lookup::parse_text),
        )
        .route(
            "/api/download-csv",
            post(handlers::u501_inventory_lookup::download_csv),
        )
        .with_state(state)
}
