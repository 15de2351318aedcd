//! HTTP client for the Corral API.

use corral_core::{JobConfiguration, JobKey, ManagerId};
use corral_scheduler::ManagedJob;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

const USER_HEADER: &str = "x-corral-user";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API URL cannot carry a path: {0}")]
    NotABase(Url),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    user: Option<String>,
}

impl ApiClient {
    pub fn new(api_url: &str, user: Option<String>) -> ClientResult<Self> {
        let base = Url::parse(api_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::NotABase(base));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            user,
        })
    }

    /// URL for the API path made of `segments`, each percent-encoded.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::NotABase(self.base.clone()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn job_endpoint(&self, key: &JobKey) -> ClientResult<Url> {
        self.endpoint(["jobs", key.role(), key.environment(), key.name()])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "API request");
        let builder = self.http.request(method, url);
        match &self.user {
            Some(user) => builder.header(USER_HEADER, user),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status,
            message: error_message(&body),
        })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
        Ok(Self::send(builder).await?.json().await?)
    }

    pub async fn managers(&self) -> ClientResult<Vec<ManagerId>> {
        let url = self.endpoint(["managers"])?;
        Self::json(self.request(Method::GET, url)).await
    }

    pub async fn list_jobs(&self, manager: &ManagerId) -> ClientResult<Vec<JobConfiguration>> {
        let mut url = self.endpoint(["jobs"])?;
        url.query_pairs_mut().append_pair("manager", manager.as_str());
        Self::json(self.request(Method::GET, url)).await
    }

    pub async fn get_job(&self, key: &JobKey) -> ClientResult<Option<ManagedJob>> {
        let url = self.job_endpoint(key)?;
        match Self::json(self.request(Method::GET, url)).await {
            Ok(job) => Ok(Some(job)),
            Err(ClientError::Api { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_job(&self, config: &JobConfiguration) -> ClientResult<ManagedJob> {
        let url = self.endpoint(["jobs"])?;
        Self::json(self.request(Method::POST, url).json(config)).await
    }

    pub async fn delete_job(&self, key: &JobKey) -> ClientResult<()> {
        let url = self.job_endpoint(key)?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub async fn delete_all_jobs(&self) -> ClientResult<()> {
        let url = self.endpoint(["jobs"])?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

/// The `error` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
