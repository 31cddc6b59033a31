//! End-to-end requests through the axum router.

mod common;

use api_lib::web;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use common::test_state;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    web::router(test_state().await).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// The `name=value` part of the `Set-Cookie` header.
fn session_cookie(response: &Response<Body>) -> String {
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn register(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            json!({ "username": username, "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response)
}

fn report_body(weight_kg: f64) -> Value {
    json!({
        "height_cm": 170.0,
        "weight_kg": weight_kg,
        "sugar_mg_dl": 90.0,
        "bp_systolic": 120,
        "bp_diastolic": 80
    })
}

#[tokio::test]
async fn health_is_public() {
    let response = app().await.oneshot(empty_request("GET", "/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reports_require_a_session() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/reports", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["error"].is_string());

    let response = app
        .oneshot(empty_request("GET", "/reports", Some("session=not-a-real-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_duplicate() {
    let app = app().await;
    let cookie = register(&app, "maya").await;
    assert!(cookie.starts_with("session="));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            json!({ "username": "maya", "password": "other" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "username": "maya", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "username": "maya", "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "maya");
}

#[tokio::test]
async fn report_lifecycle() {
    let app = app().await;
    let cookie = register(&app, "noah").await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/reports", Some(&cookie), report_body(70.0)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["classification"]["bmi_category"], "Normal");
    let id = created["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(json_request("POST", "/reports", Some(&cookie), report_body(72.0)))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/reports", Some(&cookie)))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[1]["id"], id.as_str());

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/reports/export.csv", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(body_text(response).await.lines().count(), 3);

    let uri = format!("/reports/{id}");
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/reports", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["deleted"], 1);

    let response = app
        .oneshot(empty_request("GET", "/reports/summary", Some(&cookie)))
        .await
        .unwrap();
    let summary = body_json(response).await;
    assert_eq!(summary["report_count"], 0);
    assert!(summary["latest"].is_null());
}

#[tokio::test]
async fn out_of_range_metric_is_unprocessable() {
    let app = app().await;
    let cookie = register(&app, "olga").await;

    let response = app
        .oneshot(json_request("POST", "/reports", Some(&cookie), report_body(-3.0)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("weight_kg"));
}

#[tokio::test]
async fn trends_are_chart_ready() {
    let app = app().await;
    let cookie = register(&app, "pia").await;
    for weight in [68.0, 69.0] {
        app.clone()
            .oneshot(json_request("POST", "/reports", Some(&cookie), report_body(weight)))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(empty_request("GET", "/reports/trends", Some(&cookie)))
        .await
        .unwrap();
    let trends = body_json(response).await;
    assert_eq!(trends["weight_kg"], json!([68.0, 69.0]));
    assert_eq!(trends["labels"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = app().await;
    let cookie = register(&app, "quinn").await;

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/auth/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let response = app
        .oneshot(empty_request("GET", "/reports", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn analyze_works_without_login() {
    let response = app()
        .await
        .oneshot(json_request(
            "POST",
            "/analyze",
            None,
            json!({
                "height_cm": 170.0,
                "weight_kg": 70.0,
                "sugar_mg_dl": 140.0,
                "bp_systolic": 120,
                "bp_diastolic": 80,
                "cholesterol_mg_dl": 210.0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let analysis = body_json(response).await;
    assert_eq!(analysis["findings"].as_array().unwrap().len(), 4);
    assert_eq!(analysis["classification"]["overall"], "Needs Attention");
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            json!({ "username": "rafa" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "password is required");

    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let cookie = register(&app, "sven").await;
    let response = app
        .oneshot(empty_request("DELETE", "/reports/not-a-uuid", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}
