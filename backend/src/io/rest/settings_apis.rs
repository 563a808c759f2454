//! REST handlers for facility settings.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use super::mappers::vaccine_mapper;
use super::AppState;

/// Axum handler for GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");
    let settings = state.settings_service.get().await;
    (StatusCode::OK, Json(vaccine_mapper::settings_to_dto(settings))).into_response()
}

/// Axum handler for PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<shared::UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings");

    let command = vaccine_mapper::settings_request_to_command(request);
    match state.settings_service.update(command).await {
        Ok(settings) => {
            (StatusCode::OK, Json(vaccine_mapper::settings_to_dto(settings))).into_response()
        }
        Err(e) => {
            tracing::error!("Error updating settings: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating settings").into_response()
        }
    }
}

/// Axum handler for POST /api/settings/reset
pub async fn reset_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/settings/reset");

    match state.settings_service.reset().await {
        Ok(settings) => {
            (StatusCode::OK, Json(vaccine_mapper::settings_to_dto(settings))).into_response()
        }
        Err(e) => {
            tracing::error!("Error resetting settings: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error resetting settings").into_response()
        }
    }
}
