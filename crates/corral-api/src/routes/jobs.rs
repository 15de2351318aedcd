//! Job management endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use corral_core::{JobConfiguration, JobKey, ManagerId};
use corral_scheduler::ManagedJob;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::Actor;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_jobs).post(create_job).delete(delete_all_jobs),
        )
        .route("/populate", post(populate_job))
        .route(
            "/{role}/{environment}/{name}",
            get(get_job).put(replace_job).delete(delete_job),
        )
}

#[derive(Debug, Deserialize)]
struct ListJobsQuery {
    manager: ManagerId,
}

type KeyPath = Result<Path<(String, String, String)>, PathRejection>;

fn path_key(path: KeyPath) -> Result<JobKey, ApiError> {
    let Path((role, environment, name)) = path?;
    Ok(JobKey::new(role, environment, name)?)
}

async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<Json<Vec<JobConfiguration>>, ApiError> {
    let Query(query) = query?;
    let jobs = state.admin.get_jobs(&query.manager).await?;
    Ok(Json(jobs))
}

async fn create_job(
    State(state): State<AppState>,
    Actor(session): Actor,
    payload: Result<Json<JobConfiguration>, JsonRejection>,
) -> Result<(StatusCode, Json<ManagedJob>), ApiError> {
    let Json(config) = payload?;
    let job = state.admin.create_job(config, &session).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn populate_job(
    State(state): State<AppState>,
    payload: Result<Json<JobConfiguration>, JsonRejection>,
) -> Result<Json<JobConfiguration>, ApiError> {
    let Json(config) = payload?;
    let populated = state.admin.populate_job_config(config).await?;
    Ok(Json(populated))
}

async fn get_job(
    State(state): State<AppState>,
    path: KeyPath,
) -> Result<Json<ManagedJob>, ApiError> {
    let key = path_key(path)?;
    match state.admin.get_job(&key).await? {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::NotFound(format!("job {key}"))),
    }
}

async fn replace_job(
    State(state): State<AppState>,
    Actor(session): Actor,
    path: KeyPath,
    payload: Result<Json<JobConfiguration>, JsonRejection>,
) -> Result<Json<ManagedJob>, ApiError> {
    let key = path_key(path)?;
    let Json(config) = payload?;
    if config.key != key {
        return Err(ApiError::BadRequest(format!(
            "body key {} does not match path key {key}",
            config.key
        )));
    }

    let job = state.admin.replace_job(config, &session).await?;
    Ok(Json(job))
}

async fn delete_job(
    State(state): State<AppState>,
    Actor(session): Actor,
    path: KeyPath,
) -> Result<StatusCode, ApiError> {
    let key = path_key(path)?;
    state.admin.delete_job(&key, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all_jobs(
    State(state): State<AppState>,
    Actor(session): Actor,
) -> Result<StatusCode, ApiError> {
    state.admin.delete_all_jobs(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, json_body, request};
    use axum::http::StatusCode;
    use corral_core::ManagerId;
    use corral_store::JobStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn job(role: &str, name: &str) -> Value {
        json!({
            "key": {"role": role, "environment": "prod", "name": name},
            "task": {"image": "alpine:3.20", "command": ["echo", "hi"]}
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (app, store) = app();

        let response = app
            .clone()
            .oneshot(request("POST", "/api/v1/jobs", Some(job("www", "web"))))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["manager"], "immediate");
        assert_eq!(body["config"]["instance_count"], 1);

        let response = app
            .oneshot(request("GET", "/api/v1/jobs/www/prod/web", None))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["task"]["image"], "alpine:3.20");
        assert_eq!(store.job_count(), 1);
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let (app, _) = app();

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let response = app
                .clone()
                .oneshot(request("POST", "/api/v1/jobs", Some(job("www", "web"))))
                .await
                .unwrap();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_body_is_bad_request() {
        let (app, _) = app();
        let body = json!({
            "key": {"role": "", "environment": "prod", "name": "web"},
            "task": {"image": "alpine"}
        });

        let response = app
            .oneshot(request("POST", "/api/v1/jobs", Some(body)))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_by_manager() {
        let (app, _) = app();
        let mut cron = job("batch", "report");
        cron["cron_schedule"] = json!("0 3 * * *");

        for body in [job("www", "web"), cron] {
            app.clone()
                .oneshot(request("POST", "/api/v1/jobs", Some(body)))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("GET", "/api/v1/jobs?manager=cron", None))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body.as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["key"]["name"], "report");
    }

    #[tokio::test]
    async fn test_list_requires_manager() {
        let (app, _) = app();

        for uri in ["/api/v1/jobs", "/api/v1/jobs?manager="] {
            let response = app.clone().oneshot(request("GET", uri, None)).await.unwrap();
            let (status, body) = json_body(response).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{uri}: {body}");
        }
    }

    #[tokio::test]
    async fn test_bad_path_is_json_error() {
        let (app, _) = app();
        let response = app
            .oneshot(request("GET", "/api/v1/jobs/www/prod/%FF", None))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "{body}");
    }

    #[tokio::test]
    async fn test_replace_moves_to_cron() {
        let (app, store) = app();
        app.clone()
            .oneshot(request("POST", "/api/v1/jobs", Some(job("www", "web"))))
            .await
            .unwrap();

        let mut updated = job("www", "web");
        updated["cron_schedule"] = json!("*/10 * * * *");
        let response = app
            .oneshot(request("PUT", "/api/v1/jobs/www/prod/web", Some(updated)))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["manager"], "cron");
        assert!(store.fetch_jobs(&ManagerId::immediate()).is_empty());
    }

    #[tokio::test]
    async fn test_replace_key_mismatch() {
        let (app, _) = app();
        let response = app
            .oneshot(request("PUT", "/api/v1/jobs/www/prod/api", Some(job("www", "web"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let (app, store) = app();
        app.clone()
            .oneshot(request("POST", "/api/v1/jobs", Some(job("www", "web"))))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request("DELETE", "/api/v1/jobs/www/prod/web", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.job_count(), 0);

        let response = app
            .oneshot(request("GET", "/api/v1/jobs/www/prod/web", None))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "job www/prod/web");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let (app, store) = app();
        for name in ["a", "b", "c"] {
            app.clone()
                .oneshot(request("POST", "/api/v1/jobs", Some(job("www", name))))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("DELETE", "/api/v1/jobs", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.fetch_manager_ids().is_empty());
    }

    #[tokio::test]
    async fn test_populate_does_not_store() {
        let (app, store) = app();
        let mut body = job("www", "web");
        body["instance_count"] = json!(0);

        let response = app
            .oneshot(request("POST", "/api/v1/jobs/populate", Some(body)))
            .await
            .unwrap();
        let (status, body) = json_body(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["instance_count"], 1);
        assert_eq!(store.job_count(), 0);
    }
}
