//! REST handlers for report generation and export renderings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::mappers::vaccine_mapper;
use super::AppState;
use crate::domain::export_service;
use crate::domain::report_service::{Report, ReportRows, ReportType};

fn report_to_response(report: &Report, low_stock_threshold: u32) -> shared::ReportResponse {
    let records = match &report.rows {
        ReportRows::Lots(lots) => lots
            .iter()
            .map(|lot| vaccine_mapper::lot_to_report_record(lot, low_stock_threshold))
            .collect(),
        ReportRows::Aggregates(aggregates) => aggregates
            .iter()
            .map(|aggregate| {
                vaccine_mapper::aggregate_to_report_record(aggregate, low_stock_threshold)
            })
            .collect(),
    };
    shared::ReportResponse {
        report_type: report.report_type.slug().to_string(),
        title: report.title.clone(),
        generated_at: Utc::now().to_rfc3339(),
        records,
    }
}

/// Axum handler for GET /api/reports/:report_type
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}", report_type);

    let Some(report_type) = ReportType::parse(&report_type) else {
        return (StatusCode::BAD_REQUEST, "Unknown report type").into_response();
    };

    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.report_service.generate(report_type, threshold).await {
        Ok(report) => {
            (StatusCode::OK, Json(report_to_response(&report, threshold))).into_response()
        }
        Err(e) => {
            tracing::error!("Error generating report {}: {:?}", report_type.slug(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating report").into_response()
        }
    }
}

/// Axum handler for GET /api/reports/:report_type/csv
pub async fn get_report_csv(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}/csv", report_type);

    let Some(report_type) = ReportType::parse(&report_type) else {
        return (StatusCode::BAD_REQUEST, "Unknown report type").into_response();
    };

    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.report_service.generate(report_type, threshold).await {
        Ok(report) => {
            let response = shared::ReportCsvResponse {
                filename: export_service::csv_filename(&report),
                content: export_service::render_csv(&report, threshold),
                record_count: report.rows.len(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Error rendering CSV for {}: {:?}", report_type.slug(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering report CSV").into_response()
        }
    }
}

/// Axum handler for GET /api/reports/:report_type/print
pub async fn get_report_print(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}/print", report_type);

    let Some(report_type) = ReportType::parse(&report_type) else {
        return (StatusCode::BAD_REQUEST, "Unknown report type").into_response();
    };

    let threshold = state.settings_service.get().await.low_stock_threshold;
    match state.report_service.generate(report_type, threshold).await {
        Ok(report) => {
            let response = shared::ReportPrintResponse {
                filename: export_service::print_filename(&report),
                pages: export_service::render_print(&report, threshold),
                record_count: report.rows.len(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Error rendering print layout for {}: {:?}", report_type.slug(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering report").into_response()
        }
    }
}
