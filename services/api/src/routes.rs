use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use homecheck::assessment::{
    assessment_router, AssessmentRepository, AssessmentService, NotificationDispatcher,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// SMTP readiness summary; the password itself never leaves the process.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct SmtpStatus {
    pub(crate) smtp_configured: bool,
    pub(crate) smtp_server: Option<String>,
    pub(crate) smtp_port: u16,
    pub(crate) smtp_username: Option<String>,
    pub(crate) smtp_password_set: bool,
}

pub(crate) fn with_assessment_routes<R, N>(service: Arc<AssessmentService<R, N>>) -> axum::Router
where
    R: AssessmentRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    assessment_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/check-smtp", get(smtp_status_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "message": "Remote Home Check Scorer is running",
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn smtp_status_endpoint(Extension(state): Extension<AppState>) -> Json<SmtpStatus> {
    let smtp = &state.smtp;
    Json(SmtpStatus {
        smtp_configured: smtp.is_configured(),
        smtp_server: smtp.server.clone(),
        smtp_port: smtp.port,
        smtp_username: smtp.username.clone(),
        smtp_password_set: smtp.password.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{build_assessment_service, test_support::config_in};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use homecheck::config::SmtpSettings;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn state(ready: bool, smtp: SmtpSettings) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            smtp,
        }
    }

    fn configured_smtp() -> SmtpSettings {
        SmtpSettings {
            server: Some("smtp.example.org".to_string()),
            port: 587,
            username: Some("homecheck@example.org".to_string()),
            password: Some("app-password".to_string()),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn healthcheck_reports_running_service() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "Remote Home Check Scorer is running");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = readiness_endpoint(Extension(state(false, SmtpSettings::default())))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(state(true, SmtpSettings::default())))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn smtp_status_never_exposes_password() {
        let Json(status) = smtp_status_endpoint(Extension(state(true, configured_smtp()))).await;
        assert!(status.smtp_configured);
        assert!(status.smtp_password_set);
        let encoded = serde_json::to_string(&status).expect("status encodes");
        assert!(!encoded.contains("app-password"));

        let Json(status) = smtp_status_endpoint(Extension(state(
            true,
            SmtpSettings {
                port: 587,
                ..SmtpSettings::default()
            },
        )))
        .await;
        assert_eq!(
            status,
            SmtpStatus {
                smtp_configured: false,
                smtp_server: None,
                smtp_port: 587,
                smtp_username: None,
                smtp_password_set: false,
            }
        );
    }

    #[tokio::test]
    async fn assessment_routes_persist_to_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path(), SmtpSettings::default());
        let service = build_assessment_service(&config).expect("service builds");
        let app = with_assessment_routes(service)
            .layer(Extension(state(true, config.smtp.clone())));

        let payload = json!({
            "timestamp": "2025-10-01T09:30:00",
            "patient": { "email": "margaret@example.org", "name": "Margaret Hale" },
            "responses": {
                "fall_risk": "Moderate",
                "medication_adherence": "Excellent (95-100%)",
                "cognitive_function": "Normal (26-30)",
                "uti_risk": "Low Risk",
                "balance_test": "Excellent (45-56 seconds)",
                "driving_safety": "Safe Driver",
                "nighttime_movement": "Normal Patterns",
                "social_engagement": "Highly Engaged",
                "toilet_flush_count": "Normal (6-8 times)",
            },
        });

        let response = app
            .oneshot(
                Request::post("/assess")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email_sent"], false);
        assert_eq!(body["scores"]["physical_score"], 97);
        let id = body["assessment_id"].as_str().expect("assessment id");
        assert!(dir
            .path()
            .join("assessments")
            .join(format!("{id}.json"))
            .is_file());
        assert!(dir.path().join("reports").join(format!("{id}.txt")).is_file());
        assert!(dir.path().join("all_assessments.csv").is_file());
    }
}
