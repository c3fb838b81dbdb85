//! Transport for the `/leave-types` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LeaveType, LeaveTypeId},
    error::{ApiError, ErrorCode},
    protocol::{FetchSnapshot, LeaveTypeRequest},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::error::RequestError;

const LEAVE_TYPES_PATH: &str = "leave-types";

/// Operations the core needs from the leave-type backend.
#[async_trait]
pub trait LeaveTypeApi: Send + Sync {
    async fn create(&self, name: &str) -> Result<LeaveType, RequestError>;
    async fn update(&self, id: &LeaveTypeId, name: &str) -> Result<LeaveType, RequestError>;
    async fn delete(&self, id: &LeaveTypeId) -> Result<(), RequestError>;
    async fn list(&self) -> Result<Vec<LeaveType>, RequestError>;
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid api url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api url '{0}' cannot be used as a base url")]
    UnsupportedUrl(String),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct HttpLeaveTypeApi {
    http: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpLeaveTypeApi {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ClientBuildError> {
        let http = Client::builder().timeout(request_timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientBuildError> {
        let parsed = Url::parse(base_url.trim()).map_err(|source| ClientBuildError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientBuildError::UnsupportedUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url: parsed,
            bearer_token: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = (!token.trim().is_empty()).then_some(token);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, id: Option<&LeaveTypeId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(LEAVE_TYPES_PATH);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, RequestError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            warn!(operation, error = %err, "leave type request could not be sent");
            RequestError::without_message()
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "leave type request succeeded");
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let api_error = serde_json::from_slice::<ApiError>(&body).unwrap_or_default();
        warn!(
            operation,
            status = status.as_u16(),
            code = ?api_error.code.or_else(|| ErrorCode::from_status(status.as_u16())),
            server_message = api_error.user_message().unwrap_or_default(),
            "leave type request rejected"
        );
        Err(RequestError::status(
            status.as_u16(),
            api_error.user_message().map(str::to_string),
        ))
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, RequestError> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|err| {
            warn!(operation, status, error = %err, "leave type response could not be decoded");
            RequestError {
                status: Some(status),
                message: Some("Received an unexpected response from the server".to_string()),
            }
        })
    }

    fn checked(operation: &'static str, leave_type: LeaveType) -> Result<LeaveType, RequestError> {
        leave_type.check_well_formed().map_err(|err| {
            warn!(operation, error = %err, "server returned a malformed leave type");
            RequestError::with_message(err.to_string())
        })?;
        Ok(leave_type)
    }
}

#[async_trait]
impl LeaveTypeApi for HttpLeaveTypeApi {
    async fn create(&self, name: &str) -> Result<LeaveType, RequestError> {
        let response = self
            .send(
                "create",
                self.http.post(self.endpoint(None)).json(&LeaveTypeRequest {
                    name: name.to_string(),
                }),
            )
            .await?;
        let created = Self::decode::<LeaveType>("create", response).await?;
        Self::checked("create", created)
    }

    async fn update(&self, id: &LeaveTypeId, name: &str) -> Result<LeaveType, RequestError> {
        let response = self
            .send(
                "update",
                self.http.put(self.endpoint(Some(id))).json(&LeaveTypeRequest {
                    name: name.to_string(),
                }),
            )
            .await?;
        let updated = Self::decode::<LeaveType>("update", response).await?;
        Self::checked("update", updated)
    }

    async fn delete(&self, id: &LeaveTypeId) -> Result<(), RequestError> {
        self.send("delete", self.http.delete(self.endpoint(Some(id))))
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LeaveType>, RequestError> {
        let response = self.send("list", self.http.get(self.endpoint(None))).await?;
        let snapshot = Self::decode::<FetchSnapshot>("list", response).await?;
        snapshot.check_well_formed().map_err(|err| {
            warn!(operation = "list", error = %err, "server returned a malformed leave type");
            RequestError::with_message(err.to_string())
        })?;
        Ok(snapshot.data)
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
