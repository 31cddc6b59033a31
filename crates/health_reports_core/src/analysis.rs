//! crates/health_reports_core/src/analysis.rs
//!
//! Range validation and threshold classification of a single metrics
//! submission. Everything here is pure and synchronous.

use serde::Serialize;

use crate::domain::{
    BmiCategory, CholesterolCategory, Classification, HealthMetrics, Level, OverallRisk,
};
use crate::error::{ServiceError, ServiceResult};

//=========================================================================================
// Validation
//=========================================================================================

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> ServiceResult<()> {
    if !value.is_finite() {
        return Err(ServiceError::InvalidMetric {
            field,
            reason: "must be a number".to_string(),
        });
    }
    if value < min || value > max {
        return Err(ServiceError::InvalidMetric {
            field,
            reason: format!("must be between {min} and {max}"),
        });
    }
    Ok(())
}

/// Rejects values that cannot be a real measurement.
pub fn validate(metrics: &HealthMetrics) -> ServiceResult<()> {
    check_range("height_cm", metrics.height_cm, 30.0, 300.0)?;
    check_range("weight_kg", metrics.weight_kg, 1.0, 700.0)?;
    check_range("sugar_mg_dl", metrics.sugar_mg_dl, 10.0, 1000.0)?;
    check_range("bp_systolic", f64::from(metrics.bp_systolic), 20.0, 300.0)?;
    check_range("bp_diastolic", f64::from(metrics.bp_diastolic), 20.0, 250.0)?;
    if metrics.bp_systolic <= metrics.bp_diastolic {
        return Err(ServiceError::InvalidMetric {
            field: "bp_systolic",
            reason: "must be greater than diastolic pressure".to_string(),
        });
    }
    if let Some(hb) = metrics.hemoglobin_g_dl {
        check_range("hemoglobin_g_dl", hb, 1.0, 30.0)?;
    }
    if let Some(chol) = metrics.cholesterol_mg_dl {
        check_range("cholesterol_mg_dl", chol, 10.0, 1000.0)?;
    }
    // Classification.bmi is always a finite number.
    if !bmi(metrics.height_cm, metrics.weight_kg).is_finite() {
        return Err(ServiceError::InvalidMetric {
            field: "height_cm",
            reason: "gives no finite BMI".to_string(),
        });
    }
    Ok(())
}

//=========================================================================================
// Classification Rules
//=========================================================================================

pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn sugar_category(sugar_mg_dl: f64) -> Level {
    if sugar_mg_dl < 70.0 {
        Level::Low
    } else if sugar_mg_dl > 125.0 {
        Level::High
    } else {
        Level::Normal
    }
}

pub fn bp_category(systolic: i32, diastolic: i32) -> Level {
    if systolic < 90 || diastolic < 60 {
        Level::Low
    } else if systolic > 140 || diastolic > 90 {
        Level::High
    } else {
        Level::Normal
    }
}

pub fn hemoglobin_category(hemoglobin_g_dl: f64) -> Level {
    if hemoglobin_g_dl < 12.0 {
        Level::Low
    } else if hemoglobin_g_dl > 16.0 {
        Level::High
    } else {
        Level::Normal
    }
}

pub fn cholesterol_category(cholesterol_mg_dl: f64) -> CholesterolCategory {
    if cholesterol_mg_dl > 240.0 {
        CholesterolCategory::High
    } else if cholesterol_mg_dl > 200.0 {
        CholesterolCategory::Borderline
    } else {
        CholesterolCategory::Normal
    }
}

pub fn overall_risk(abnormal_findings: usize) -> OverallRisk {
    match abnormal_findings {
        0 => OverallRisk::Stable,
        1 => OverallRisk::MildConcern,
        2 | 3 => OverallRisk::NeedsAttention,
        _ => OverallRisk::HighRisk,
    }
}

/// Classifies already-validated metrics.
pub fn classify(metrics: &HealthMetrics) -> Classification {
    let bmi = bmi(metrics.height_cm, metrics.weight_kg);
    let bmi_category = bmi_category(bmi);
    let sugar_category = sugar_category(metrics.sugar_mg_dl);
    let bp_category = bp_category(metrics.bp_systolic, metrics.bp_diastolic);
    let hemoglobin_category = metrics.hemoglobin_g_dl.map(hemoglobin_category);
    let cholesterol_category = metrics.cholesterol_mg_dl.map(cholesterol_category);

    let abnormal = [
        bmi_category != BmiCategory::Normal,
        sugar_category != Level::Normal,
        bp_category != Level::Normal,
        hemoglobin_category.is_some_and(|c| c != Level::Normal),
        cholesterol_category.is_some_and(|c| c != CholesterolCategory::Normal),
    ]
    .into_iter()
    .filter(|is_abnormal| *is_abnormal)
    .count();

    Classification {
        bmi,
        bmi_category,
        sugar_category,
        bp_category,
        hemoglobin_category,
        cholesterol_category,
        overall: overall_risk(abnormal),
    }
}

//=========================================================================================
// Findings (human-readable output)
//=========================================================================================

/// One line of the analysis shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Finding {
    pub metric: String,
    pub status: String,
    pub advice: String,
}

/// Classification plus the advice text for every metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Analysis {
    pub classification: Classification,
    pub findings: Vec<Finding>,
    pub overall_advice: String,
}

fn bmi_advice(category: BmiCategory) -> &'static str {
    match category {
        BmiCategory::Underweight => {
            "BMI indicates underweight. A balanced nutritious diet is recommended."
        }
        BmiCategory::Normal => "BMI is within normal limits.",
        BmiCategory::Overweight => {
            "BMI indicates overweight. Regular exercise and diet control are advised."
        }
        BmiCategory::Obese => {
            "BMI indicates obesity. Please discuss a weight management plan with a doctor."
        }
    }
}

fn sugar_advice(level: Level) -> &'static str {
    match level {
        Level::Low => "Low fasting sugar may cause dizziness or weakness.",
        Level::Normal => "Fasting sugar is within the normal range.",
        Level::High => "Fasting sugar appears high and may indicate diabetes. Consult a doctor.",
    }
}

fn bp_advice(level: Level) -> &'static str {
    match level {
        Level::Low => "Blood pressure is low. Hydration and rest may help.",
        Level::Normal => "Blood pressure is within the normal range.",
        Level::High => {
            "Blood pressure is high and may pose risks. A medical consultation is recommended."
        }
    }
}

fn hemoglobin_advice(level: Level) -> &'static str {
    match level {
        Level::Low => {
            "Hemoglobin appears lower than the normal range. Consult a doctor if symptoms persist."
        }
        Level::Normal => "Hemoglobin is within the normal range.",
        Level::High => {
            "Hemoglobin appears higher than the normal range. A medical check-up is recommended."
        }
    }
}

fn cholesterol_advice(category: CholesterolCategory) -> &'static str {
    match category {
        CholesterolCategory::Normal => "Cholesterol is within a healthy range.",
        CholesterolCategory::Borderline => {
            "Cholesterol is borderline high. Healthy diet and lifestyle changes may help."
        }
        CholesterolCategory::High => "Cholesterol is high and may increase heart disease risk.",
    }
}

pub fn overall_advice(risk: OverallRisk) -> &'static str {
    match risk {
        OverallRisk::Stable => {
            "All tracked parameters appear within normal ranges. Maintain your current lifestyle and regular check-ups."
        }
        OverallRisk::MildConcern => {
            "One parameter needs attention. Monitor your health and consider lifestyle adjustments."
        }
        OverallRisk::NeedsAttention => {
            "Multiple parameters are outside the normal range. A detailed check-up and lifestyle review are recommended."
        }
        OverallRisk::HighRisk => {
            "Several parameters are abnormal. Please consult a doctor for a complete evaluation."
        }
    }
}

/// Builds the per-metric findings for a classification.
pub fn findings(classification: &Classification) -> Vec<Finding> {
    let mut findings = vec![
        Finding {
            metric: "BMI".to_string(),
            status: format!("{:.1} ({})", classification.bmi, classification.bmi_category),
            advice: bmi_advice(classification.bmi_category).to_string(),
        },
        Finding {
            metric: "Fasting Sugar".to_string(),
            status: classification.sugar_category.to_string(),
            advice: sugar_advice(classification.sugar_category).to_string(),
        },
        Finding {
            metric: "Blood Pressure".to_string(),
            status: classification.bp_category.to_string(),
            advice: bp_advice(classification.bp_category).to_string(),
        },
    ];
    if let Some(level) = classification.hemoglobin_category {
        findings.push(Finding {
            metric: "Hemoglobin".to_string(),
            status: level.to_string(),
            advice: hemoglobin_advice(level).to_string(),
        });
    }
    if let Some(category) = classification.cholesterol_category {
        findings.push(Finding {
            metric: "Cholesterol".to_string(),
            status: category.to_string(),
            advice: cholesterol_advice(category).to_string(),
        });
    }
    findings
}

/// Validates, classifies and explains one submission without storing it.
pub fn analyze(metrics: &HealthMetrics) -> ServiceResult<Analysis> {
    validate(metrics)?;
    let classification = classify(metrics);
    Ok(Analysis {
        findings: findings(&classification),
        overall_advice: overall_advice(classification.overall).to_string(),
        classification,
    })
}
