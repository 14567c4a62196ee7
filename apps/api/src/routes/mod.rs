pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::matching::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::store::handlers as tracking;

/// Multipart framing on top of the raw upload cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let json_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs/filter", post(jobs::handle_filter))
        .route("/api/v1/jobs/explain", post(jobs::handle_explain))
        .route("/api/v1/jobs/results/:id", get(jobs::handle_get_results))
        .route("/api/v1/jobs/results/:id/sort", post(jobs::handle_sort))
        .route("/api/v1/jobs/results/:id/export", get(jobs::handle_export))
        // Résumé API
        .route("/api/v1/resume/extract", post(resume::handle_extract))
        .route(
            "/api/v1/resume/upload",
            post(resume::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/resume/match", post(resume::handle_match))
        .route("/api/v1/resume/rank", post(resume::handle_rank))
        // Tracking API
        .route("/api/v1/history", get(tracking::handle_history))
        .route("/api/v1/applications", get(tracking::handle_list_applications))
        .route(
            "/api/v1/applications/:job_id",
            put(tracking::handle_mark_applied).delete(tracking::handle_unmark_applied),
        )
        .layer(DefaultBodyLimit::max(json_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    fn app() -> Router {
        app_with(Config::default())
    }

    fn app_with(config: Config) -> Router {
        build_router(AppState::new(config, Arc::new(MemoryStore::new())))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn corpus() -> Value {
        json!([
            {"id": "1", "title": "Electrical Engineer", "companyName": "Voltix"},
            {"id": "2", "title": "Nurse", "companyName": "St. Mary"},
            {"id": "3", "title": "Senior Electrical Engineer", "companyName": "Gridco"}
        ])
    }

    fn ids(results: &Value) -> Vec<&str> {
        results
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_filter_sort_and_export() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/filter",
            Some(json!({"records": corpus(), "query": "Electrical Engineer", "threshold": 1.0})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_records"], 3);
        assert_eq!(body["matched"], 2);
        assert!(body["sort"].is_null());
        // Equal title containment scores keep corpus order.
        assert_eq!(ids(&body["results"]), vec!["1", "3"]);
        assert!(body["results"][0]["similarityScore"].as_f64().unwrap() >= 1.0);

        let id = body["result_id"].as_str().unwrap().to_string();
        let sort_uri = format!("/api/v1/jobs/results/{id}/sort");

        let (_, sorted) = send(&app, Method::POST, &sort_uri, Some(json!({"key": "company"}))).await;
        assert_eq!(sorted["sort"]["direction"], "ascending");
        assert_eq!(ids(&sorted["results"]), vec!["3", "1"]);

        let (_, toggled) = send(&app, Method::POST, &sort_uri, Some(json!({"key": "company"}))).await;
        assert_eq!(toggled["sort"]["direction"], "descending");
        assert_eq!(ids(&toggled["results"]), vec!["1", "3"]);

        let (status, exported) =
            send(&app, Method::GET, &format!("/api/v1/jobs/results/{id}/export"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&exported), vec!["1", "3"]);
        assert!(exported[0].get("similarityScore").is_none());

        let (_, history) = send(&app, Method::GET, "/api/v1/history", None).await;
        assert_eq!(history[0]["query"], "Electrical Engineer");
    }

    #[tokio::test]
    async fn test_filter_rejects_blank_query_and_bad_threshold() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/filter",
            Some(json!({"records": corpus(), "query": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/filter",
            Some(json!({"records": corpus(), "query": "nurse", "threshold": 3.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_corpus_gets_json_413() {
        let app = app_with(Config {
            max_body_bytes: 1024,
            ..Config::default()
        });
        let records: Vec<Value> = (0..100)
            .map(|i| json!({"id": i, "title": "Electrical Engineer", "descriptionText": "x".repeat(64)}))
            .collect();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/filter",
            Some(json!({"records": records, "query": "engineer"})),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_malformed_json_gets_error_envelope() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/jobs/filter")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"records\": ["))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_preserves_record_shape() {
        let app = app();
        let record = json!({
            "id": 98765,
            "title": "Electrical Engineer",
            "location": null,
            "industries": ["Utilities", "Energy"],
            "companyName": {"name": "Grid"}
        });
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/filter",
            Some(json!({"records": [record.clone()], "query": "Electrical Engineer"})),
        )
        .await;
        let id = body["result_id"].as_str().unwrap().to_string();

        let (_, exported) =
            send(&app, Method::GET, &format!("/api/v1/jobs/results/{id}/export"), None).await;
        assert_eq!(exported, json!([record]));
    }

    #[tokio::test]
    async fn test_unknown_result_set_is_404() {
        let uri = format!("/api/v1/jobs/results/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_exclude_applied_drops_tracked_jobs() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/applications/1",
            Some(json!({"title": "Electrical Engineer", "company_name": "Voltix"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/filter",
            Some(json!({
                "records": corpus(),
                "query": "Electrical Engineer",
                "threshold": 1.0,
                "exclude_applied": true
            })),
        )
        .await;
        assert_eq!(ids(&body["results"]), vec!["3"]);
    }

    #[tokio::test]
    async fn test_unmark_applied() {
        let app = app();
        send(&app, Method::PUT, "/api/v1/applications/42", Some(json!({}))).await;

        let (_, listed) = send(&app, Method::GET, "/api/v1/applications", None).await;
        assert_eq!(listed[0]["job_id"], "42");

        let (status, _) = send(&app, Method::DELETE, "/api/v1/applications/42", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::DELETE, "/api/v1/applications/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_explain_reports_deciding_channel() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/jobs/explain",
            Some(json!({"record": {"title": "Electrical Engineer"}, "query": "electrical engineer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deciding_channel"], "title");
        assert_eq!(body["channels"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_resume_extract() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/resume/extract",
            Some(json!({"text": "Software Engineer with 6 years of experience in Python and Docker."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["experience_years"], 6);
        let skills: Vec<&str> = body["skills"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap())
            .collect();
        assert!(skills.contains(&"python"));
        assert!(skills.contains(&"docker"));
    }
}
