use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessment::router::{assess_handler, assessment_router};
use crate::assessment::scoring::{default_care_plan, Tier};
use crate::assessment::QUESTIONNAIRE;

fn post_assess(body: impl Into<Body>) -> Request<Body> {
    Request::post("/assess")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request builds")
}

async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.expect("route executes")
}

#[tokio::test]
async fn assess_route_returns_scores_and_care_plan() {
    let (service, repository, _) = build_service();
    let router = assessment_router(service);
    let body = serde_json::to_vec(&payload(&worst_responses(), None)).expect("payload encodes");

    let response = send(router, post_assess(body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["email_sent"], json!(true));
    assert_eq!(payload["scores"]["physical_score"], json!(77));
    assert_eq!(payload["scores"]["mental_score"], json!(87));
    assert_eq!(payload["scores"]["insight_score"], json!(81.0));
    assert_eq!(payload["scores"]["tier"], json!("Monitor"));
    assert_eq!(
        payload["assessment_id"],
        json!(repository.records()[0].assessment_id.0)
    );
    assert_eq!(
        payload["care_plan"],
        json!(default_care_plan(Tier::Monitor))
    );
}

#[tokio::test]
async fn assess_route_rejects_invalid_answers_with_details() {
    let (service, repository, _) = build_service();
    let mut body = payload(&best_responses(), None);
    body["responses"]["fall_risk"] = json!("Extreme");

    let response = send(
        assessment_router(service),
        post_assess(serde_json::to_vec(&body).expect("payload encodes")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = response_json(response).await;
    assert_eq!(payload["error"], json!("Invalid assessment data"));
    assert_eq!(
        payload["details"],
        json!(["Invalid response 'Extreme' for fall_risk"])
    );
    assert!(repository.records().is_empty());
}

#[tokio::test]
async fn assess_route_rejects_bodies_that_are_not_json() {
    let (service, _, _) = build_service();

    let response = send(assessment_router(service), post_assess("fall_risk=Low")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = response_json(response).await;
    assert_eq!(payload["error"], json!("No JSON data provided"));
}

#[tokio::test]
async fn assess_route_rejects_empty_objects() {
    let (service, _, _) = build_service();

    let response = send(assessment_router(service), post_assess("{}")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = response_json(response).await;
    assert_eq!(payload, json!({ "error": "No JSON data provided" }));
}

#[tokio::test]
async fn assess_handler_returns_internal_error_on_repository_failure() {
    let service = service_with(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryDispatcher::default()),
    );

    let response = assess_handler::<UnavailableRepository, MemoryDispatcher>(
        State(service),
        Ok(axum::Json(payload(&best_responses(), None))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = response_json(response).await;
    assert_eq!(payload["error"], json!("Processing failed"));
    assert!(payload["details"]
        .as_str()
        .expect("details string")
        .contains("disk full"));
}

#[tokio::test]
async fn assess_handler_reports_undelivered_notifications() {
    let service = service_with(
        Arc::new(MemoryRepository::default()),
        Arc::new(FailingDispatcher),
    );

    let response = assess_handler::<MemoryRepository, FailingDispatcher>(
        State(service),
        Ok(axum::Json(payload(&best_responses(), Some("Assist")))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    assert_eq!(payload["email_sent"], json!(false));
    assert_eq!(payload["scores"]["tier"], json!("Independent"));
}

#[tokio::test]
async fn questions_route_lists_questionnaire_in_order() {
    let (service, _, _) = build_service();

    let response = send(
        assessment_router(service),
        Request::get("/questions")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    let questions = payload.as_array().expect("question list");
    assert_eq!(questions.len(), QUESTIONNAIRE.len());
    let names: Vec<&str> = questions
        .iter()
        .filter_map(|question| question["name"].as_str())
        .collect();
    assert_eq!(names.first(), Some(&"fall_risk"));
    assert_eq!(
        questions[0]["options"],
        json!(["Low", "Moderate", "High"])
    );
    assert!(questions.iter().all(|question| question["label"].is_string()));
}
