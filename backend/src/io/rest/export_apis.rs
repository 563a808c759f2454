//! REST handlers for whole-database export and import.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::domain::database_export_service::ImportError;

/// Axum handler for GET /api/database/export
pub async fn export_database(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/database/export");

    match state.database_export_service.export_all().await {
        Ok(export) => (StatusCode::OK, Json(export)).into_response(),
        Err(e) => {
            tracing::error!("Error exporting database: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error exporting database").into_response()
        }
    }
}

/// Axum handler for POST /api/database/import
pub async fn import_database(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> impl IntoResponse {
    info!("POST /api/database/import");

    match state.database_export_service.import(&document).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(ImportError::InvalidFormat(message)) => {
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        Err(ImportError::Storage(e)) => {
            tracing::error!("Error importing database: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error importing database").into_response()
        }
    }
}
