//! crates/health_reports_core/src/reports.rs
//!
//! Creating, listing, deleting and exporting the reports of the account bound
//! to a session.

use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::analysis;
use crate::domain::{AuthSession, HealthMetrics, Report};
use crate::error::{ServiceError, ServiceResult};
use crate::export::reports_to_csv;
use crate::ports::DatabaseService;
use crate::presentation::{render_summary, render_trends, Summary, Trends};

pub struct ReportService {
    db: Arc<dyn DatabaseService>,
}

impl ReportService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Yields the owning account, or `Unauthenticated` once the session has expired.
    fn owner(session: &AuthSession) -> ServiceResult<Uuid> {
        if session.is_active(Utc::now()) {
            Ok(session.account_id)
        } else {
            Err(ServiceError::Unauthenticated)
        }
    }

    pub async fn create_report(
        &self,
        session: &AuthSession,
        metrics: HealthMetrics,
    ) -> ServiceResult<Report> {
        let account_id = Self::owner(session)?;
        analysis::validate(&metrics)?;

        let report = Report {
            id: Uuid::new_v4(),
            account_id,
            classification: analysis::classify(&metrics),
            metrics,
            // Stored with millisecond precision.
            created_at: Utc::now().trunc_subsecs(3),
        };
        self.db.insert_report(&report).await?;
        info!("Stored report {} for account {}", report.id, account_id);
        Ok(report)
    }

    /// Most recent first.
    pub async fn list_reports(&self, session: &AuthSession) -> ServiceResult<Vec<Report>> {
        let account_id = Self::owner(session)?;
        Ok(self.db.list_reports_for_account(account_id).await?)
    }

    pub async fn delete_report(&self, session: &AuthSession, report_id: Uuid) -> ServiceResult<()> {
        let account_id = Self::owner(session)?;
        if !self.db.delete_report(account_id, report_id).await? {
            return Err(ServiceError::NotFound(format!("Report {report_id}")));
        }
        info!("Deleted report {} for account {}", report_id, account_id);
        Ok(())
    }

    /// Returns the number of reports removed.
    pub async fn delete_all_reports(&self, session: &AuthSession) -> ServiceResult<u64> {
        let account_id = Self::owner(session)?;
        let removed = self.db.delete_reports_for_account(account_id).await?;
        info!("Cleared {} reports for account {}", removed, account_id);
        Ok(removed)
    }

    pub async fn export_csv(&self, session: &AuthSession) -> ServiceResult<String> {
        let reports = self.list_reports(session).await?;
        reports_to_csv(&reports)
    }

    pub async fn summary(&self, session: &AuthSession) -> ServiceResult<Summary> {
        let reports = self.list_reports(session).await?;
        Ok(render_summary(&reports))
    }

    pub async fn trends(&self, session: &AuthSession) -> ServiceResult<Trends> {
        let reports = self.list_reports(session).await?;
        Ok(render_trends(&reports))
    }
}
