//! Router-level tests for the dashboard API. Endpoints that do not hit
//! the index are exercised through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use npt_common::solr::SolrClient;
use npt_common::totals::PeriodTotals;
use npt_viz::api::build_router;
use npt_viz::state::AppState;

fn test_router() -> axum::Router {
    let state = AppState {
        client: SolrClient::new("http://localhost:8983"),
        monthly_totals: PeriodTotals::default(),
        yearly_totals: PeriodTotals::default(),
        excluded_periods: vec!["2007-03".to_string()],
        suggestions: vec!["machine learning".to_string(), "svm".to_string()],
    };
    build_router(Arc::new(state))
}

async fn get(app: &axum::Router, path: &str) -> (StatusCode, Option<Value>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).ok();
    (status, json)
}

#[tokio::test]
async fn health_answers_ok() {
    let app = test_router();
    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_reports_service_identity() {
    let app = test_router();
    let (status, body) = get(&app, "/status").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["service"], "npt-viz");
    assert_eq!(body["suggestions"], 2);
}

#[tokio::test]
async fn suggestions_come_back_in_order() {
    let app = test_router();
    let (status, body) = get(&app, "/api/suggestions").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["suggestions"][0], "machine learning");
    assert_eq!(body["suggestions"][1], "svm");
}

#[tokio::test]
async fn empty_term_list_is_a_bad_request() {
    let app = test_router();
    let (status, body) = get(&app, "/api/frequencies?terms=%2C%2C").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = body.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_termtype_is_a_bad_request() {
    let app = test_router();
    let (status, _) = get(&app, "/api/frequencies?terms=svm&termtype=verbs").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_page_is_served() {
    let app = test_router();
    let (status, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
}
