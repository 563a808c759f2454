//! REST handlers for edit authorization.

use axum::{extract::Query, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::info;

use super::mappers::vaccine_mapper;
use super::AppState;
use crate::domain::commands::authorization::AuthorizeEditCommand;

/// Axum handler for POST /api/authorize-edit
pub async fn authorize_edit(
    State(state): State<AppState>,
    Json(request): Json<shared::EditAuthorizationRequest>,
) -> impl IntoResponse {
    info!("POST /api/authorize-edit");

    let command = AuthorizeEditCommand {
        credential: request.credential,
    };
    match state.authorization_service.authorize_edit(command).await {
        Ok(result) => {
            let response = shared::EditAuthorizationResponse {
                success: result.success,
                message: result.message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Error authorizing edit: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error authorizing edit").into_response()
        }
    }
}

/// Query parameters for the attempts listing
#[derive(Deserialize, Debug)]
pub struct AttemptListParams {
    pub limit: Option<usize>,
}

/// Axum handler for GET /api/edit-attempts
pub async fn list_edit_attempts(
    State(state): State<AppState>,
    Query(params): Query<AttemptListParams>,
) -> impl IntoResponse {
    info!("GET /api/edit-attempts - params: {:?}", params);

    match state.authorization_service.recent_attempts(params.limit).await {
        Ok(attempts) => {
            let attempts: Vec<shared::EditAttempt> =
                attempts.iter().map(vaccine_mapper::attempt_to_dto).collect();
            (StatusCode::OK, Json(attempts)).into_response()
        }
        Err(e) => {
            tracing::error!("Error listing edit attempts: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing edit attempts").into_response()
        }
    }
}
