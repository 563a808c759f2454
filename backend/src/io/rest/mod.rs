//! REST transport: application state, router, and the API handler modules.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::domain::{
    AuthorizationService, DatabaseExportService, InventoryService, ReceivingService,
    ReportService, SettingsService,
};

pub mod authorization_apis;
pub mod export_apis;
pub mod mappers;
pub mod report_apis;
pub mod settings_apis;
pub mod vaccine_apis;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub inventory_service: InventoryService,
    pub receiving_service: ReceivingService,
    pub report_service: ReportService,
    pub database_export_service: DatabaseExportService,
    pub settings_service: SettingsService,
    pub authorization_service: AuthorizationService,
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the frontend dev server to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/vaccines", get(vaccine_apis::list_vaccines))
        .route("/vaccines/receive", post(vaccine_apis::receive_vaccine))
        .route("/vaccines/:id", put(vaccine_apis::update_vaccine))
        .route("/vaccines/:id/administer", post(vaccine_apis::administer_doses))
        .route("/dashboard", get(vaccine_apis::dashboard_summary))
        .route("/reports/:report_type", get(report_apis::get_report))
        .route("/reports/:report_type/csv", get(report_apis::get_report_csv))
        .route("/reports/:report_type/print", get(report_apis::get_report_print))
        .route("/database/export", get(export_apis::export_database))
        .route("/database/import", post(export_apis::import_database))
        .route(
            "/settings",
            get(settings_apis::get_settings).put(settings_apis::update_settings),
        )
        .route("/settings/reset", post(settings_apis::reset_settings))
        .route("/authorize-edit", post(authorization_apis::authorize_edit))
        .route("/edit-attempts", get(authorization_apis::list_edit_attempts));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
