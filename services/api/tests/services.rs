//! Account and report service behaviour against the SQLite adapter.

mod common;

use chrono::Duration;
use common::{metrics, test_db, test_hasher, test_state};
use health_reports_core::{
    AccountService, BmiCategory, OverallRisk, ReportService, ServiceError,
};

#[tokio::test]
async fn registering_same_username_twice_is_rejected() {
    let state = test_state().await;
    state.accounts.register("alice", "pw-1").await.unwrap();

    let err = state.accounts.register("alice", "pw-2").await.unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateUsername));

    // Usernames are normalised before the uniqueness check.
    let err = state.accounts.register("  Alice ", "pw-3").await.unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateUsername));
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let state = test_state().await;
    let err = state.accounts.register("   ", "pw").await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingField("username")));
    let err = state.accounts.register("bob", "").await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingField("password")));
}

#[tokio::test]
async fn login_checks_the_password() {
    let state = test_state().await;
    let registered = state.accounts.register("carol", "s3cret").await.unwrap();

    let err = state.accounts.login("carol", "wrong").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));

    let err = state.accounts.login("nobody", "s3cret").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));

    let signed_in = state.accounts.login("CAROL", "s3cret").await.unwrap();
    assert_eq!(signed_in.account, registered.account);
    assert_ne!(signed_in.session.token, registered.session.token);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let state = test_state().await;
    let signed_in = state.accounts.register("dave", "pw").await.unwrap();
    let token = signed_in.session.token.clone();

    assert_eq!(state.accounts.resolve_session(&token).await.unwrap(), signed_in.session);
    state.accounts.logout(&token).await.unwrap();

    let err = state.accounts.resolve_session(&token).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));
    // A second logout is harmless.
    state.accounts.logout(&token).await.unwrap();
}

#[tokio::test]
async fn expired_sessions_cannot_be_used() {
    let db = test_db().await;
    let accounts = AccountService::new(db.clone(), test_hasher(), Duration::seconds(-1));
    let reports = ReportService::new(db);

    let signed_in = accounts.register("erin", "pw").await.unwrap();
    let err = accounts.resolve_session(&signed_in.session.token).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));

    let err = reports
        .create_report(&signed_in.session, metrics(70.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));

    assert_eq!(accounts.purge_expired_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn out_of_range_session_lifetime_fails_without_panicking() {
    let db = test_db().await;
    let accounts = AccountService::new(db, test_hasher(), Duration::hours(3_000_000_000));

    let err = accounts.register("hugo", "pw").await.unwrap_err();
    assert!(matches!(err, ServiceError::Port(_)));
    // No half-registered account is left behind.
    let err = accounts.login("hugo", "pw").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));
}

#[tokio::test]
async fn report_for_170cm_70kg_is_normal_bmi() {
    let state = test_state().await;
    let session = state.accounts.register("frank", "pw").await.unwrap().session;

    let report = state.reports.create_report(&session, metrics(70.0)).await.unwrap();
    assert!((report.classification.bmi - 24.2).abs() < 0.05);
    assert_eq!(report.classification.bmi_category, BmiCategory::Normal);
    assert_eq!(report.classification.overall, OverallRisk::Stable);

    let listed = state.reports.list_reports(&session).await.unwrap();
    assert_eq!(listed, vec![report]);
}

#[tokio::test]
async fn invalid_metrics_are_not_stored() {
    let state = test_state().await;
    let session = state.accounts.register("gina", "pw").await.unwrap().session;

    let err = state
        .reports
        .create_report(&session, metrics(0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidMetric { field: "weight_kg", .. }));
    assert!(state.reports.list_reports(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn reports_are_private_to_their_account() {
    let state = test_state().await;
    let a = state.accounts.register("anna", "pw").await.unwrap().session;
    let b = state.accounts.register("ben", "pw").await.unwrap().session;

    let report = state.reports.create_report(&a, metrics(65.0)).await.unwrap();
    assert!(state.reports.list_reports(&b).await.unwrap().is_empty());

    let err = state.reports.delete_report(&b, report.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(state.reports.delete_all_reports(&b).await.unwrap(), 0);
    assert_eq!(state.reports.list_reports(&a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn listing_is_most_recent_first() {
    let state = test_state().await;
    let session = state.accounts.register("hank", "pw").await.unwrap().session;

    let mut created = Vec::new();
    for weight in [60.0, 61.0, 62.0] {
        created.push(state.reports.create_report(&session, metrics(weight)).await.unwrap().id);
    }
    let listed: Vec<_> = state
        .reports
        .list_reports(&session)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    created.reverse();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn deleting_single_and_all_reports() {
    let state = test_state().await;
    let session = state.accounts.register("iris", "pw").await.unwrap().session;
    let first = state.reports.create_report(&session, metrics(70.0)).await.unwrap();
    state.reports.create_report(&session, metrics(71.0)).await.unwrap();
    state.reports.create_report(&session, metrics(72.0)).await.unwrap();

    state.reports.delete_report(&session, first.id).await.unwrap();
    let err = state.reports.delete_report(&session, first.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    assert_eq!(state.reports.delete_all_reports(&session).await.unwrap(), 2);
    assert!(state.reports.list_reports(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn csv_export_matches_listing() {
    let state = test_state().await;
    let session = state.accounts.register("jack", "pw").await.unwrap().session;
    for weight in [80.0, 78.5, 77.0] {
        state.reports.create_report(&session, metrics(weight)).await.unwrap();
    }

    let listed = state.reports.list_reports(&session).await.unwrap();
    let csv = state.reports.export_csv(&session).await.unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();

    assert_eq!(rows.len(), listed.len());
    for (row, report) in rows.iter().zip(&listed) {
        assert!(row.starts_with(&report.id.to_string()));
    }
}

#[tokio::test]
async fn summary_and_trends_follow_stored_reports() {
    let state = test_state().await;
    let session = state.accounts.register("kate", "pw").await.unwrap().session;

    let empty = state.reports.summary(&session).await.unwrap();
    assert_eq!(empty.report_count, 0);
    assert!(empty.latest.is_none());

    state.reports.create_report(&session, metrics(70.0)).await.unwrap();
    let last = state.reports.create_report(&session, metrics(95.0)).await.unwrap();

    let summary = state.reports.summary(&session).await.unwrap();
    assert_eq!(summary.report_count, 2);
    let latest = summary.latest.unwrap();
    assert_eq!(latest.report_id, last.id);
    assert_eq!(latest.classification.bmi_category, BmiCategory::Obese);

    let trends = state.reports.trends(&session).await.unwrap();
    assert_eq!(trends.weight_kg, vec![70.0, 95.0]);
    assert_eq!(trends.hemoglobin_g_dl, vec![Some(14.0), Some(14.0)]);
}

#[tokio::test]
async fn services_share_one_store() {
    let db = test_db().await;
    let accounts = AccountService::new(db.clone(), test_hasher(), Duration::hours(1));
    let reports = ReportService::new(db);

    let session = accounts.register("liam", "pw").await.unwrap().session;
    reports.create_report(&session, metrics(70.0)).await.unwrap();

    let again = accounts.login("liam", "pw").await.unwrap().session;
    assert_eq!(reports.list_reports(&again).await.unwrap().len(), 1);
}
