pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::engine::handlers as model_handlers;
use crate::recommendation::handlers as recommendation_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/predict", post(recommendation_handlers::handle_predict))
        // Model API
        .route("/api/v1/model", get(model_handlers::handle_model_info))
        .route("/api/v1/model/reload", post(model_handlers::handle_reload))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::io::Write;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::engine::encoder::TfidfEncoder;
    use crate::engine::fitted::FittedModel;
    use crate::engine::fixtures::{data_roles_model, model_with, FixedClassifier};
    use crate::models::skill::skill_set;

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn app_with(model: FittedModel) -> Router {
        build_router(AppState::for_tests(model))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app_with(data_roles_model()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_predict_returns_both_titles_with_breakdown() {
        let (status, body) = send(
            app_with(data_roles_model()),
            "POST",
            "/predict",
            Some(json!({ "skills": ["SQL", " python "], "n": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "jobTitle": "Data Analyst", "matchedSkills": ["python", "sql"], "missingSkills": ["excel"] },
                { "jobTitle": "Data Scientist", "matchedSkills": ["python", "sql"], "missingSkills": ["statistics"] }
            ])
        );
    }

    #[tokio::test]
    async fn test_predict_additional_skills_filter() {
        let (status, body) = send(
            app_with(data_roles_model()),
            "POST",
            "/predict",
            Some(json!({ "skills": ["sql", "python"], "additionalSkills": ["Statistics"], "n": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["jobTitle"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Data Scientist"]);
    }

    #[tokio::test]
    async fn test_predict_blank_additional_skill_rejected() {
        let (status, body) = send(
            app_with(data_roles_model()),
            "POST",
            "/predict",
            Some(json!({ "skills": ["sql"], "additionalSkills": ["  "], "n": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_predict_defaults_n_to_five() {
        let model = model_with(&[
            ("T1", &["sql"], 0.9),
            ("T2", &["go"], 0.8),
            ("T3", &["rust"], 0.7),
            ("T4", &["java"], 0.6),
            ("T5", &["excel"], 0.5),
            ("T6", &["scala"], 0.4),
        ]);
        let (status, body) =
            send(app_with(model), "POST", "/predict", Some(json!({ "skills": [] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_predict_zero_n_is_empty_array() {
        let (status, body) = send(
            app_with(data_roles_model()),
            "POST",
            "/predict",
            Some(json!({ "skills": ["sql"], "n": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_predict_negative_n_rejected() {
        let (status, body) = send(
            app_with(data_roles_model()),
            "POST",
            "/predict",
            Some(json!({ "skills": ["sql"], "n": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_predict_missing_skills_rejected() {
        let (status, _) = send(
            app_with(data_roles_model()),
            "POST",
            "/predict",
            Some(json!({ "n": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_malformed_json_rejected() {
        let app = app_with(data_roles_model());
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_inconsistent_model_is_internal_error() {
        // classifier scores "Other" but the requirement map has no entry for it
        let requirements = [("Data Analyst".to_string(), skill_set(["sql"]))]
            .into_iter()
            .collect();
        let encoder = TfidfEncoder::fit(&["sql go"]).unwrap();
        let classifier = Arc::new(FixedClassifier {
            titles: vec!["Data Analyst".to_string(), "Other".to_string()],
            probabilities: vec![0.5, 0.4],
        });
        let broken = FittedModel::from_parts(requirements, encoder, classifier);

        let (status, body) = send(
            app_with(broken),
            "POST",
            "/predict",
            Some(json!({ "skills": ["sql"] })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DATA_CONSISTENCY_ERROR");
    }

    #[tokio::test]
    async fn test_model_info_describes_current_generation() {
        let model = data_roles_model();
        let generation = model.generation().to_string();
        let (status, body) = send(app_with(model), "GET", "/api/v1/model", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], generation);
        assert_eq!(body["classifier"], "fixed");
        assert_eq!(body["retained_titles"], 2);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_serving_old_generation() {
        let state = AppState::for_tests(data_roles_model());
        let before = state.model.current().generation();
        let app = build_router(state.clone());

        let (status, _) = send(app, "POST", "/api/v1/model/reload", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.model.current().generation(), before);
    }

    #[tokio::test]
    async fn test_reload_swaps_in_new_generation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Job Title,Skills Required").unwrap();
        writeln!(file, "Data Analyst,\"SQL, Excel\"").unwrap();
        writeln!(file, "Rust Engineer,\"Rust, Tokio\"").unwrap();

        let mut state = AppState::for_tests(data_roles_model());
        state.config.corpus_path = file.path().to_path_buf();
        let before = state.model.current().generation();

        let (status, body) =
            send(build_router(state.clone()), "POST", "/api/v1/model/reload", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["classifier"], "one_vs_rest_naive_bayes");

        let current = state.model.current();
        assert_ne!(current.generation(), before);
        assert_eq!(body["generation"], current.generation().to_string());
        assert!(current.requirements().contains("Rust Engineer"));
    }

    #[tokio::test]
    async fn test_concurrent_reload_conflicts() {
        let state = AppState::for_tests(data_roles_model());
        let _held = state.model.try_begin_reload().unwrap();
        let (status, body) =
            send(build_router(state.clone()), "POST", "/api/v1/model/reload", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }
}
