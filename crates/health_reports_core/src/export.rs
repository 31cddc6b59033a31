//! crates/health_reports_core/src/export.rs
//!
//! CSV rendering of a list of reports.

use crate::domain::Report;
use crate::error::{ServiceError, ServiceResult};

pub const CSV_HEADER: [&str; 14] = [
    "ID",
    "Created At",
    "Height (cm)",
    "Weight (kg)",
    "BMI",
    "BMI Category",
    "Fasting Sugar",
    "Sugar Category",
    "BP Systolic",
    "BP Diastolic",
    "BP Category",
    "Hemoglobin",
    "Cholesterol",
    "Overall",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record(report: &Report) -> [String; 14] {
    let m = &report.metrics;
    let c = &report.classification;
    [
        report.id.to_string(),
        report.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        m.height_cm.to_string(),
        m.weight_kg.to_string(),
        format!("{:.1}", c.bmi),
        c.bmi_category.to_string(),
        m.sugar_mg_dl.to_string(),
        c.sugar_category.to_string(),
        m.bp_systolic.to_string(),
        m.bp_diastolic.to_string(),
        c.bp_category.to_string(),
        optional(m.hemoglobin_g_dl),
        optional(m.cholesterol_mg_dl),
        c.overall.to_string(),
    ]
}

/// Writes the header row followed by one row per report, preserving the
/// order of `reports`. The header is written even when there are no reports.
pub fn reports_to_csv(reports: &[Report]) -> ServiceResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ServiceError::Export(e.to_string()))?;
    for report in reports {
        writer
            .write_record(record(report))
            .map_err(|e| ServiceError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::Export(e.to_string()))
}
