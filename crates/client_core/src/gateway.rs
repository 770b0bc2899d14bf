use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{redirect, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::ApiError,
    protocol::{AskRequest, AskResponse, CreateJiraTicketsRequest, CreateJiraTicketsResponse, ErrorBody},
};
use tracing::{debug, warn};

use crate::config::Settings;

pub const ASK_PATH: &str = "/api/ask";
pub const JIRA_TICKETS_PATH: &str = "/api/jira-tickets";

pub const CONNECT_FAILED_MESSAGE: &str =
    "Unable to connect to the server. Please check your connection.";
pub const TIMED_OUT_MESSAGE: &str = "Request timed out. Please try again.";

/// Outbound boundary to the insight backend. Every failure comes back as an [`ApiError`].
#[async_trait]
pub trait InsightGateway: Send + Sync {
    async fn ask(&self, question: &str) -> Result<AskResponse, ApiError>;
    async fn create_tickets(
        &self,
        payload: &CreateJiraTicketsRequest,
    ) -> Result<CreateJiraTicketsResponse, ApiError>;
}

pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(settings: &Settings) -> Result<Self> {
        let base_url = settings.base_url()?;
        Self::with_timeout(base_url.as_str(), settings.request_timeout())
    }

    /// Redirects are never followed so that 3xx bodies reach the caller as data.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!("gateway: POST {url}");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(normalize_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            let api_error = normalize_transport_error(err);
            match (api_error.status, is_accepted_status(status)) {
                (None, false) => api_error.with_status(status.as_u16()),
                _ => api_error,
            }
        })?;

        if !is_accepted_status(status) {
            let err = remote_error(status, &bytes);
            warn!(
                "gateway: POST {url} failed status={} message={}",
                status.as_u16(),
                err.message
            );
            return Err(err);
        }

        if status.is_redirection() {
            debug!("gateway: reading body of redirect status={}", status.as_u16());
        }

        serde_json::from_slice::<R>(&bytes).map_err(|err| {
            warn!("gateway: undecodable body from {url}: {err}");
            ApiError::transport(format!("Failed to parse response from server: {err}"))
                .with_status(status.as_u16())
        })
    }
}

#[async_trait]
impl InsightGateway for HttpGateway {
    async fn ask(&self, question: &str) -> Result<AskResponse, ApiError> {
        let request = AskRequest {
            question: question.to_string(),
        };
        self.post_json(ASK_PATH, &request).await
    }

    async fn create_tickets(
        &self,
        payload: &CreateJiraTicketsRequest,
    ) -> Result<CreateJiraTicketsResponse, ApiError> {
        self.post_json(JIRA_TICKETS_PATH, payload).await
    }
}

/// 2xx and 3xx are both treated as success at the transport level.
pub fn is_accepted_status(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

fn remote_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
    ApiError::remote(status.as_u16(), message)
}

/// A timeout wins over a connect failure; reqwest flags a connect-phase timeout as both.
fn transport_message(is_connect: bool, is_timeout: bool) -> Option<&'static str> {
    if is_timeout {
        Some(TIMED_OUT_MESSAGE)
    } else if is_connect {
        Some(CONNECT_FAILED_MESSAGE)
    } else {
        None
    }
}

fn normalize_transport_error(err: reqwest::Error) -> ApiError {
    let message = transport_message(err.is_connect(), err.is_timeout())
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    warn!("gateway: transport failure: {err}");

    let api_error = ApiError::transport(message);
    match err.status() {
        Some(status) => api_error.with_status(status.as_u16()),
        None => api_error,
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
