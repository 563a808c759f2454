//! Rendering of generated reports into CSV text and print-ready pages.

use chrono::{Local, NaiveDate};

use crate::domain::classification::{format_date, overall_status_as_of, stock_status};
use crate::domain::models::vaccine::{AggregatedVaccine, VaccineLot};
use crate::domain::report_service::{Report, ReportRows, ReportType};

/// Data rows per print page, sized for US Letter at the fixed font
pub const PRINT_ROWS_PER_PAGE: usize = 26;

const LOT_HEADERS: [&str; 8] = [
    "Vaccine Name",
    "Generic Name",
    "Lot Number",
    "Qty On Hand",
    "Administered Doses",
    "Expiration Date",
    "Received Date",
    "Stock Status",
];

const AGGREGATE_HEADERS: [&str; 5] = [
    "Vaccine Name",
    "Generic Name",
    "Total Qty On Hand",
    "Total Administered Doses",
    "Stock Status",
];

/// `Title_With_Underscores_YYYY-MM-DD.<ext>`
pub fn export_filename(report: &Report, date: NaiveDate, extension: &str) -> String {
    let title = report
        .title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_{}.{}", title, date.format("%Y-%m-%d"), extension)
}

pub fn csv_filename(report: &Report) -> String {
    export_filename(report, Local::now().date_naive(), "csv")
}

pub fn print_filename(report: &Report) -> String {
    export_filename(report, Local::now().date_naive(), "txt")
}

/// Render a report as CSV with every value double-quoted. One data row per
/// record, rows joined by `\n`.
pub fn render_csv(report: &Report, low_stock_threshold: u32) -> String {
    render_csv_as_of(report, low_stock_threshold, Local::now().date_naive())
}

pub fn render_csv_as_of(report: &Report, low_stock_threshold: u32, today: NaiveDate) -> String {
    let mut lines = Vec::new();
    match &report.rows {
        ReportRows::Lots(lots) => {
            lines.push(csv_line(&LOT_HEADERS));
            for lot in lots {
                lines.push(csv_line(&lot_values(lot, low_stock_threshold, today)));
            }
        }
        ReportRows::Aggregates(aggregates) => {
            lines.push(csv_line(&AGGREGATE_HEADERS));
            for aggregate in aggregates {
                lines.push(csv_line(&aggregate_values(aggregate, low_stock_threshold)));
            }
        }
    }
    lines.join("\n")
}

/// Render a report as fixed-width text pages. Lot reports leave out rows
/// with nothing on hand, except the blank count sheet which exists to list
/// every vaccine regardless of stock.
pub fn render_print(report: &Report, low_stock_threshold: u32) -> Vec<String> {
    render_print_as_of(report, low_stock_threshold, Local::now().date_naive())
}

pub fn render_print_as_of(
    report: &Report,
    low_stock_threshold: u32,
    today: NaiveDate,
) -> Vec<String> {
    let rows: Vec<String> = match &report.rows {
        ReportRows::Lots(lots) => lots
            .iter()
            .filter(|lot| {
                report.report_type == ReportType::InventoryTemplate || lot.quantity_on_hand > 0
            })
            .map(|lot| print_lot_row(lot, low_stock_threshold, today))
            .collect(),
        ReportRows::Aggregates(aggregates) => aggregates
            .iter()
            .map(|aggregate| print_aggregate_row(aggregate, low_stock_threshold))
            .collect(),
    };

    let header_row = match &report.rows {
        ReportRows::Lots(_) => print_lot_header(),
        ReportRows::Aggregates(_) => print_aggregate_header(),
    };

    let total_pages = rows.len().div_ceil(PRINT_ROWS_PER_PAGE).max(1);
    let mut pages = Vec::with_capacity(total_pages);
    for page_index in 0..total_pages {
        let start = page_index * PRINT_ROWS_PER_PAGE;
        let end = (start + PRINT_ROWS_PER_PAGE).min(rows.len());
        let mut page = String::new();
        page.push_str(&report.title);
        page.push('\n');
        page.push_str(&format!("Generated on: {}\n", format_date(Some(today))));
        page.push_str(&format!("Total Records: {}\n\n", rows.len()));
        page.push_str(&header_row);
        page.push('\n');
        page.push_str(&"-".repeat(header_row.len()));
        page.push('\n');
        for row in &rows[start..end] {
            page.push_str(row);
            page.push('\n');
        }
        page.push_str(&format!("\nPage {} of {}", page_index + 1, total_pages));
        pages.push(page);
    }
    pages
}

fn csv_line<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|value| format!("\"{}\"", value.as_ref().replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

fn lot_values(lot: &VaccineLot, low_stock_threshold: u32, today: NaiveDate) -> Vec<String> {
    vec![
        lot.commercial_name.clone(),
        lot.generic_name.clone(),
        lot.lot_number.clone(),
        lot.quantity_on_hand.to_string(),
        lot.administered_doses.to_string(),
        format_date(lot.expiration_date),
        format_date(lot.received_date),
        overall_status_as_of(
            lot.quantity_on_hand,
            lot.expiration_date,
            low_stock_threshold,
            today,
        )
        .as_str()
        .to_string(),
    ]
}

fn aggregate_values(aggregate: &AggregatedVaccine, low_stock_threshold: u32) -> Vec<String> {
    vec![
        aggregate.commercial_name.clone(),
        aggregate.generic_name.clone(),
        aggregate.quantity_on_hand.to_string(),
        aggregate.administered_doses.to_string(),
        stock_status(aggregate.quantity_on_hand, low_stock_threshold)
            .as_str()
            .to_string(),
    ]
}

fn print_lot_header() -> String {
    format!(
        "{:<24} {:<18} {:<12} {:>11} {:>18} {:<15} {:<13} {:<12}",
        LOT_HEADERS[0],
        LOT_HEADERS[1],
        LOT_HEADERS[2],
        LOT_HEADERS[3],
        LOT_HEADERS[4],
        LOT_HEADERS[5],
        LOT_HEADERS[6],
        LOT_HEADERS[7],
    )
}

fn print_lot_row(lot: &VaccineLot, low_stock_threshold: u32, today: NaiveDate) -> String {
    format!(
        "{:<24} {:<18} {:<12} {:>11} {:>18} {:<15} {:<13} {:<12}",
        lot.commercial_name,
        lot.generic_name,
        lot.lot_number,
        lot.quantity_on_hand,
        lot.administered_doses,
        format_date(lot.expiration_date),
        format_date(lot.received_date),
        overall_status_as_of(
            lot.quantity_on_hand,
            lot.expiration_date,
            low_stock_threshold,
            today,
        )
        .as_str(),
    )
}

fn print_aggregate_header() -> String {
    format!(
        "{:<24} {:<18} {:>17} {:>24} {:<12}",
        AGGREGATE_HEADERS[0],
        AGGREGATE_HEADERS[1],
        AGGREGATE_HEADERS[2],
        AGGREGATE_HEADERS[3],
        AGGREGATE_HEADERS[4],
    )
}

fn print_aggregate_row(aggregate: &AggregatedVaccine, low_stock_threshold: u32) -> String {
    format!(
        "{:<24} {:<18} {:>17} {:>24} {:<12}",
        aggregate.commercial_name,
        aggregate.generic_name,
        aggregate.quantity_on_hand,
        aggregate.administered_doses,
        stock_status(aggregate.quantity_on_hand, low_stock_threshold).as_str(),
    )
}
