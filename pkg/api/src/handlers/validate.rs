use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use pkg_constants::status::CODE_INTERNAL_ERROR;
use pkg_metrics::{
    LOOKUP_FAILURES, MetricsRegistry, VALIDATIONS_ACCEPTED, VALIDATIONS_REJECTED,
    VALIDATIONS_TOTAL,
};
use pkg_types::admission::{AdmissionReview, ValidationResponse};
use tracing::{error, info};

use crate::AppState;

fn record(metrics: &MetricsRegistry, decision: &ValidationResponse) {
    metrics.counter_inc(VALIDATIONS_TOTAL);
    if decision.accepted {
        metrics.counter_inc(VALIDATIONS_ACCEPTED);
    } else {
        metrics.counter_inc(VALIDATIONS_REJECTED);
    }
    if decision.code == Some(CODE_INTERNAL_ERROR) {
        metrics.counter_inc(LOOKUP_FAILURES);
    }
}

/// POST /validate: evaluate a `ValidationRequest`. The decision is in the body.
pub async fn validate(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let lookup = state.lookup.clone();
    let decision =
        tokio::task::spawn_blocking(move || pkg_policy::validate(&body, lookup.as_ref())).await;

    match decision {
        Ok(decision) => {
            record(&state.metrics, &decision);
            (StatusCode::OK, Json(decision)).into_response()
        }
        Err(e) => {
            error!("Validation task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Validation task failed").into_response()
        }
    }
}

/// POST /validate_settings
pub async fn validate_settings(body: Bytes) -> impl IntoResponse {
    (StatusCode::OK, Json(pkg_policy::validate_settings(&body))).into_response()
}

/// POST /admission: answer a Kubernetes `AdmissionReview`.
pub async fn admission(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let review: AdmissionReview = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            info!("Rejecting undecodable AdmissionReview: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                format!("Cannot decode AdmissionReview: {}", e),
            )
                .into_response();
        }
    };
    let Some(request) = review.request else {
        return (StatusCode::BAD_REQUEST, "AdmissionReview has no request").into_response();
    };

    let lookup = state.lookup.clone();
    let uid = request.uid.clone();
    let decision = tokio::task::spawn_blocking(move || {
        pkg_policy::validate_request(&request, lookup.as_ref())
    })
    .await;

    match decision {
        Ok(decision) => {
            record(&state.metrics, &decision);
            let answer = AdmissionReview::from_decision(&review.api_version, &uid, &decision);
            (StatusCode::OK, Json(answer)).into_response()
        }
        Err(e) => {
            error!("Admission task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Admission task failed").into_response()
        }
    }
}
