use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::intake::ValidationFailure;
use super::notify::NotificationDispatcher;
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing the questionnaire and assessment intake endpoints.
pub fn assessment_router<R, N>(service: Arc<AssessmentService<R, N>>) -> Router
where
    R: AssessmentRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/assess", post(assess_handler::<R, N>))
        .route("/questions", get(questions_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn questions_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    (StatusCode::OK, Json(service.questions())).into_response()
}

pub(crate) async fn assess_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let body = json!({
                "error": "No JSON data provided",
                "details": rejection.body_text(),
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let result = tokio::task::spawn_blocking(move || service.process(&payload)).await;

    match result {
        Ok(Ok(outcome)) => {
            let body = json!({
                "success": true,
                "assessment_id": outcome.assessment_id,
                "scores": outcome.scores,
                "care_plan": outcome.care_plan,
                "email_sent": outcome.email_sent,
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(err)) => err.into_response(),
        Err(join_error) => {
            error!(error = %join_error, "assessment processing task failed");
            let body = json!({
                "error": "Internal server error",
                "details": join_error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

impl IntoResponse for AssessmentServiceError {
    fn into_response(self) -> Response {
        match self {
            AssessmentServiceError::Validation(ValidationFailure::Empty) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No JSON data provided" })),
            )
                .into_response(),
            AssessmentServiceError::Validation(ValidationFailure::Invalid { violations }) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid assessment data",
                    "details": violations,
                })),
            )
                .into_response(),
            AssessmentServiceError::Repository(err) => {
                error!(error = %err, "assessment persistence failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Processing failed",
                        "details": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}
