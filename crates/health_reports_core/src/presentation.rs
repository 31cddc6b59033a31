//! crates/health_reports_core/src/presentation.rs
//!
//! Shapes stored reports for display: a summary of the latest submission and
//! per-metric series for charting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::{findings, overall_advice, Finding};
use crate::domain::{Classification, HealthMetrics, Report};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LatestReport {
    pub report_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub metrics: HealthMetrics,
    pub classification: Classification,
    pub findings: Vec<Finding>,
    pub overall_advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Summary {
    pub report_count: usize,
    pub latest: Option<LatestReport>,
}

/// Chart-ready series. Every vector is index-aligned with `labels`, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Trends {
    pub labels: Vec<DateTime<Utc>>,
    pub bmi: Vec<f64>,
    pub weight_kg: Vec<f64>,
    pub sugar_mg_dl: Vec<f64>,
    pub bp_systolic: Vec<i32>,
    pub bp_diastolic: Vec<i32>,
    pub hemoglobin_g_dl: Vec<Option<f64>>,
    pub cholesterol_mg_dl: Vec<Option<f64>>,
}

/// Summarises the most recent report. Expects `reports` in listing order
/// (newest first); on equal timestamps the earlier entry wins.
pub fn render_summary(reports: &[Report]) -> Summary {
    let latest = reports
        .iter()
        .reduce(|newest, r| if r.created_at > newest.created_at { r } else { newest })
        .map(|r| LatestReport {
            report_id: r.id,
            created_at: r.created_at,
            metrics: r.metrics.clone(),
            classification: r.classification.clone(),
            findings: findings(&r.classification),
            overall_advice: overall_advice(r.classification.overall).to_string(),
        });

    Summary {
        report_count: reports.len(),
        latest,
    }
}

/// Lays reports out oldest first, one point per report per metric.
pub fn render_trends(reports: &[Report]) -> Trends {
    // Listing order is newest first; reversing before the stable sort keeps
    // equal timestamps in insertion order.
    let mut ordered: Vec<&Report> = reports.iter().rev().collect();
    ordered.sort_by_key(|r| r.created_at);

    let mut trends = Trends::default();
    for r in ordered {
        trends.labels.push(r.created_at);
        trends.bmi.push(r.classification.bmi);
        trends.weight_kg.push(r.metrics.weight_kg);
        trends.sugar_mg_dl.push(r.metrics.sugar_mg_dl);
        trends.bp_systolic.push(r.metrics.bp_systolic);
        trends.bp_diastolic.push(r.metrics.bp_diastolic);
        trends.hemoglobin_g_dl.push(r.metrics.hemoglobin_g_dl);
        trends.cholesterol_mg_dl.push(r.metrics.cholesterol_mg_dl);
    }
    trends
}
