use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{PersonId, RequestId};
use super::repository::{ProfileStore, RecommendationStore, ScoreStore, StoreError};
use super::scoring::Evaluation;
use super::service::{MatchingServiceError, MatchmakingService};

/// Body accepted by the evaluation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationSubmission {
    #[serde(default)]
    pub evaluator: Option<String>,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

/// Router exposing evaluation intake and recommendation runs.
pub fn matchmaking_router<P, R, S>(service: Arc<MatchmakingService<P, R, S>>) -> Router
where
    P: ProfileStore + 'static,
    R: RecommendationStore + 'static,
    S: ScoreStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/people/:person_id/evaluations",
            post(evaluation_handler::<P, R, S>),
        )
        .route(
            "/api/v1/requests/:request_id/recommendations",
            post(recommend_handler::<P, R, S>).get(log_handler::<P, R, S>),
        )
        .with_state(service)
}

pub(crate) async fn evaluation_handler<P, R, S>(
    State(service): State<Arc<MatchmakingService<P, R, S>>>,
    Path(person_id): Path<String>,
    axum::Json(submission): axum::Json<EvaluationSubmission>,
) -> Response
where
    P: ProfileStore + 'static,
    R: RecommendationStore + 'static,
    S: ScoreStore + 'static,
{
    let person_id = PersonId(person_id);
    let outcome = tokio::task::spawn_blocking(move || {
        service.submit_evaluation(person_id, &submission.evaluation, submission.evaluator)
    })
    .await;

    match outcome {
        Ok(Ok(record)) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Ok(Err(MatchingServiceError::InvalidEvaluation(error))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Ok(Err(other)) => service_error_response(other),
        Err(join_error) => aborted_task_response("evaluation", join_error),
    }
}

pub(crate) async fn recommend_handler<P, R, S>(
    State(service): State<Arc<MatchmakingService<P, R, S>>>,
    Path(request_id): Path<String>,
) -> Response
where
    P: ProfileStore + 'static,
    R: RecommendationStore + 'static,
    S: ScoreStore + 'static,
{
    let request_id = RequestId(request_id);
    // Runs take the per-request lock and hit the stores synchronously.
    let outcome = tokio::task::spawn_blocking(move || service.recommend(&request_id)).await;

    match outcome {
        Ok(Ok(run)) => (StatusCode::OK, axum::Json(run)).into_response(),
        Ok(Err(other)) => service_error_response(other),
        Err(join_error) => aborted_task_response("recommendation", join_error),
    }
}

pub(crate) async fn log_handler<P, R, S>(
    State(service): State<Arc<MatchmakingService<P, R, S>>>,
    Path(request_id): Path<String>,
) -> Response
where
    P: ProfileStore + 'static,
    R: RecommendationStore + 'static,
    S: ScoreStore + 'static,
{
    let request_id = RequestId(request_id);
    match service.recommendations(&request_id) {
        Ok(entries) => {
            let payload = json!({
                "request_id": request_id,
                "entries": entries,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => service_error_response(other),
    }
}

fn aborted_task_response(task: &'static str, join_error: tokio::task::JoinError) -> Response {
    error!(task, error = %join_error, "blocking task failed");
    let payload = json!({
        "error": format!("{task} aborted"),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

fn service_error_response(error: MatchingServiceError) -> Response {
    let status = match &error {
        MatchingServiceError::InvalidEvaluation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MatchingServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        MatchingServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        MatchingServiceError::Store(StoreError::Duplicate { .. }) => StatusCode::CONFLICT,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
