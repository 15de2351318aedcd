//! Manager listing endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use corral_core::ManagerId;

use crate::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_managers))
}

async fn list_managers(State(state): State<AppState>) -> Result<Json<Vec<ManagerId>>, ApiError> {
    let managers = state.admin.get_managers().await?;
    Ok(Json(managers.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, json_body, request};
    use axum::http::StatusCode;
    use corral_core::{JobConfiguration, ManagerId, TaskConfig};
    use corral_store::MutableJobStore;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_lists_managers_with_jobs() {
        let (app, store) = app();
        let web = JobConfiguration::new("www/prod/web".parse().unwrap(), TaskConfig::new("nginx"));
        let api = JobConfiguration::new("www/prod/api".parse().unwrap(), TaskConfig::new("api"));
        store.save_accepted_job(&ManagerId::cron(), web);
        store.save_accepted_job(&ManagerId::new("m1").unwrap(), api);

        let response = app.oneshot(request("GET", "/api/v1/managers", None)).await.unwrap();
        let (status, body) = json_body(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["cron", "m1"]));
    }
}
