//! REST handlers for the vaccine inventory.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::mappers::vaccine_mapper;
use super::AppState;
use crate::domain::commands::vaccines::{AdministerDosesCommand, VaccineListQuery};
use crate::domain::inventory_service::{AdministerError, UpdateError};
use crate::domain::models::vaccine::{SortKey, SortOrder};
use crate::domain::receiving_service::ReceivingError;

/// Query parameters for the inventory list endpoint
#[derive(Deserialize, Debug)]
pub struct VaccineListParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub available_only: Option<bool>,
}

/// Axum handler for GET /api/vaccines
pub async fn list_vaccines(
    State(state): State<AppState>,
    Query(params): Query<VaccineListParams>,
) -> impl IntoResponse {
    info!("GET /api/vaccines - params: {:?}", params);

    let query = VaccineListQuery {
        search: params.search,
        sort_by: params.sort_by.as_deref().and_then(SortKey::parse),
        sort_order: params.sort_order.as_deref().and_then(SortOrder::parse),
        available_only: params.available_only.unwrap_or(false),
    };

    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.inventory_service.list_vaccines(query).await {
        Ok(lots) => {
            let vaccines = lots
                .iter()
                .map(|lot| vaccine_mapper::vaccine_to_dto(lot, threshold))
                .collect();
            (StatusCode::OK, Json(shared::VaccineListResponse { vaccines })).into_response()
        }
        Err(e) => {
            tracing::error!("Error listing vaccines: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing vaccines").into_response()
        }
    }
}

/// Axum handler for POST /api/vaccines/receive
pub async fn receive_vaccine(
    State(state): State<AppState>,
    Json(request): Json<shared::ReceiveVaccineRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/vaccines/receive - lot {} of {}",
        request.lot_number, request.commercial_name
    );

    let command = vaccine_mapper::receive_request_to_command(request);
    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.receiving_service.receive(command).await {
        Ok(lot) => {
            let response = shared::ReceiveVaccineResponse {
                vaccine: vaccine_mapper::vaccine_to_dto(&lot, threshold),
                success_message: "Vaccine received successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(ReceivingError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(vaccine_mapper::validation_errors_to_response(&errors)),
        )
            .into_response(),
        Err(ReceivingError::Storage(e)) => {
            tracing::error!("Error receiving vaccine: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error receiving vaccine").into_response()
        }
    }
}

/// Axum handler for PUT /api/vaccines/:id
pub async fn update_vaccine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<shared::UpdateVaccineRequest>,
) -> impl IntoResponse {
    info!("PUT /api/vaccines/{}", id);

    let command = vaccine_mapper::update_request_to_command(request);
    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.inventory_service.update_vaccine(id, command).await {
        Ok(lot) => (
            StatusCode::OK,
            Json(vaccine_mapper::vaccine_to_dto(&lot, threshold)),
        )
            .into_response(),
        Err(UpdateError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(vaccine_mapper::validation_errors_to_response(&errors)),
        )
            .into_response(),
        Err(UpdateError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Vaccine lot not found").into_response()
        }
        Err(UpdateError::Storage(e)) => {
            tracing::error!("Error updating vaccine {}: {:?}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating vaccine").into_response()
        }
    }
}

/// Axum handler for POST /api/vaccines/:id/administer
pub async fn administer_doses(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<shared::AdministerDosesRequest>,
) -> impl IntoResponse {
    info!("POST /api/vaccines/{}/administer - doses: {}", id, request.doses);

    let command = AdministerDosesCommand {
        vaccine_id: id,
        doses: request.doses,
    };
    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.inventory_service.administer_doses(command).await {
        Ok(lot) => {
            let response = shared::AdministerDosesResponse {
                vaccine: vaccine_mapper::vaccine_to_dto(&lot, threshold),
                success_message: format!("{} dose(s) administered", request.doses),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error @ (AdministerError::InvalidDoseCount | AdministerError::InsufficientStock)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error.to_string()).into_response()
        }
        Err(AdministerError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Vaccine lot not found").into_response()
        }
        Err(AdministerError::Storage(e)) => {
            tracing::error!("Error administering doses on {}: {:?}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error administering doses").into_response()
        }
    }
}

/// Axum handler for GET /api/dashboard
pub async fn dashboard_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.inventory_service.dashboard_summary(threshold).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(vaccine_mapper::dashboard_to_dto(summary)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error building dashboard summary: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building dashboard summary").into_response()
        }
    }
}
