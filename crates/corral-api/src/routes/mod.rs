//! API routes.

pub mod health;
pub mod jobs;
pub mod managers;

use crate::AppState;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use corral_scheduler::Session;
use std::convert::Infallible;

/// Header naming the user on whose behalf a request is made.
pub const USER_HEADER: &str = "x-corral-user";

/// Build the main API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_router())
        .merge(health::router())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/managers", managers::router())
}

/// Session built from the user header; anonymous when it is absent or blank.
pub struct Actor(pub Session);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty());

        Ok(Actor(match user {
            Some(user) => Session::for_user(user),
            None => Session::anonymous(),
        }))
    }
}
