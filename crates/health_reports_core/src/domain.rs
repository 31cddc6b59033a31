//! crates/health_reports_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database, but they derive `serde`
//! traits so the web layer can hand them straight to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Accounts and Sessions
//=========================================================================================

/// A registered user identity. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub username: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

impl AccountCredentials {
    /// Drops the password hash.
    pub fn into_account(self) -> Account {
        Account {
            id: self.id,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

/// A server-side login session, referenced by the `session` cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub account_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

//=========================================================================================
// Health Metrics
//=========================================================================================

/// One submission of raw measurements.
///
/// Height is in centimetres, weight in kilograms, fasting sugar and
/// cholesterol in mg/dL, hemoglobin in g/dL, blood pressure in mmHg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthMetrics {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub sugar_mg_dl: f64,
    pub bp_systolic: i32,
    pub bp_diastolic: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hemoglobin_g_dl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_mg_dl: Option<f64>,
}

//=========================================================================================
// Categories
//=========================================================================================

/// Error returned when a stored category label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category label '{0}'")]
pub struct UnknownCategory(pub String);

/// Implements `as_str`, `Display` and `FromStr` over the same label table, so
/// the labels written to the database and CSV are the ones read back.
macro_rules! category_labels {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(UnknownCategory(other.to_string())),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

category_labels!(BmiCategory {
    Underweight => "Underweight",
    Normal => "Normal",
    Overweight => "Overweight",
    Obese => "Obese",
});

/// Low / normal / high banding shared by sugar, blood pressure and hemoglobin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Level {
    Low,
    Normal,
    High,
}

category_labels!(Level {
    Low => "Low",
    Normal => "Normal",
    High => "High",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CholesterolCategory {
    Normal,
    Borderline,
    High,
}

category_labels!(CholesterolCategory {
    Normal => "Normal",
    Borderline => "Borderline",
    High => "High",
});

/// Overall verdict, driven by how many findings are abnormal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum OverallRisk {
    Stable,
    #[serde(rename = "Mild Concern")]
    MildConcern,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    #[serde(rename = "High Risk")]
    HighRisk,
}

category_labels!(OverallRisk {
    Stable => "Stable",
    MildConcern => "Mild Concern",
    NeedsAttention => "Needs Attention",
    HighRisk => "High Risk",
});

//=========================================================================================
// Reports
//=========================================================================================

/// The categories derived from a `HealthMetrics` submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Classification {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub sugar_category: Level,
    pub bp_category: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hemoglobin_category: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_category: Option<CholesterolCategory>,
    pub overall: OverallRisk,
}

/// One stored health report, owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Report {
    pub id: Uuid,
    pub account_id: Uuid,
    pub metrics: HealthMetrics,
    pub classification: Classification,
    pub created_at: DateTime<Utc>,
}
