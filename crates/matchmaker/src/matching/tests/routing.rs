use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::matching::matchmaking_router;

fn evaluation_body(face_score: f64) -> Body {
    let mut payload = serde_json::to_value(evaluation()).expect("serialize evaluation");
    payload["face_score"] = json!(face_score);
    payload["evaluator"] = json!("manager-3");
    Body::from(serde_json::to_vec(&payload).expect("encode body"))
}

#[tokio::test]
async fn evaluation_route_returns_created_record() {
    let store = MemoryStore::default();
    let router = matchmaking_router(Arc::new(build_service(&store)));

    let response = router
        .oneshot(
            Request::post("/api/v1/people/p-1/evaluations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(evaluation_body(80.0))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["person_id"], "p-1");
    assert_eq!(body["overall_grade"], "A");
    assert_eq!(body["evaluator"], "manager-3");
}

#[tokio::test]
async fn evaluation_route_rejects_invalid_scores() {
    let store = MemoryStore::default();
    let router = matchmaking_router(Arc::new(build_service(&store)));

    let response = router
        .oneshot(
            Request::post("/api/v1/people/p-1/evaluations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(evaluation_body(140.0))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("face score"));
}

#[tokio::test]
async fn recommend_route_runs_and_log_route_lists_by_rank() {
    let store = MemoryStore::seeded(vec![
        candidate("c-1", 80.0),
        candidate("c-2", 90.0),
        candidate("c-3", 70.0),
    ]);
    let router = matchmaking_router(Arc::new(build_service(&store)));

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/requests/req-1/recommendations")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let run = read_json_body(response).await;
    assert_eq!(run["status"]["kind"], "completed");
    assert_eq!(run["batch"], 1);
    assert_eq!(run["entries"].as_array().map(Vec::len), Some(3));

    let response = router
        .oneshot(
            Request::get("/api/v1/requests/req-1/recommendations")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let log = read_json_body(response).await;
    let ranks: Vec<u64> = log["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .filter_map(|entry| entry["rank"].as_u64())
        .collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn recommend_handler_reports_missing_applicant() {
    let store = MemoryStore::default();
    let service = Arc::new(build_service(&store));

    let response = crate::matching::router::recommend_handler::<MemoryStore, MemoryStore, MemoryStore>(
        State(service),
        Path("missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"]["kind"], "missing_applicant_data");
    assert_eq!(body["status"]["missing"], "request");
}

#[tokio::test]
async fn store_outage_maps_to_service_unavailable() {
    let service = Arc::new(unavailable_service());

    let response = crate::matching::router::log_handler(State(service), Path("req-1".to_string())).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn evaluation_handler_scores_off_the_async_worker() {
    let store = MemoryStore::default();
    let service = Arc::new(build_service(&store));
    let submission = crate::matching::EvaluationSubmission {
        evaluator: Some("manager-7".to_string()),
        evaluation: evaluation(),
    };

    let response = crate::matching::router::evaluation_handler(
        State(service.clone()),
        Path("p-9".to_string()),
        axum::Json(submission),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let history = service.score_history(&person("p-9")).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].evaluator.as_deref(), Some("manager-7"));
}
