//! Backend gateway speaking JSON over HTTP.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::listing::{ListQuery, ListResponse};
use crate::domain::types::ResourceId;
use crate::repository::errors::{ApiError, ApiResult, message_from_body};
use crate::repository::{ResourceReader, ResourceWriter};
use crate::resource::ResourceKind;
use crate::session::BearerToken;

/// Gateway to the REST backend, cheap to clone across workers.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Builds a client with the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, kind: ResourceKind, id: Option<&ResourceId>) -> String {
        match id {
            Some(id) => format!("{}{}/{}", self.base_url, kind.path(), id.as_str()),
            None => format!("{}{}", self.base_url, kind.path()),
        }
    }
}

fn status_of(err: &reqwest::Error) -> Option<u16> {
    err.status().map(|status| status.as_u16())
}

async fn rejection(response: Response) -> ApiError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthenticated;
    }
    let message = response
        .json::<Value>()
        .await
        .ok()
        .as_ref()
        .and_then(message_from_body);
    ApiError::UpdateRejected {
        status: Some(status.as_u16()),
        message,
    }
}

impl ResourceReader for HttpGateway {
    async fn fetch_page<T>(
        &self,
        kind: ResourceKind,
        token: &BearerToken,
        query: &ListQuery,
    ) -> ApiResult<ListResponse<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(kind, None);
        log::debug!("GET {url} {:?}", query.pairs());

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, token.header_value())
            .header(header::ACCEPT, "application/json")
            .query(&query.pairs())
            .send()
            .await
            .map_err(|err| {
                log::warn!("Request to {url} failed: {err}");
                ApiError::FetchFailed {
                    status: status_of(&err),
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthenticated);
        }
        if !status.is_success() {
            log::warn!("GET {url} returned {status}");
            return Err(ApiError::FetchFailed {
                status: Some(status.as_u16()),
            });
        }

        response.json::<ListResponse<T>>().await.map_err(|err| {
            log::warn!("Failed to decode {} list: {err}", kind.label());
            ApiError::Decode(err.to_string())
        })
    }
}

impl ResourceWriter for HttpGateway {
    async fn patch_item<P>(
        &self,
        kind: ResourceKind,
        token: &BearerToken,
        id: &ResourceId,
        payload: &P,
    ) -> ApiResult<()>
    where
        P: Serialize,
    {
        let url = self.url(kind, Some(id));
        log::debug!("PATCH {url}");

        let response = self
            .client
            .patch(&url)
            .header(header::AUTHORIZATION, token.header_value())
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                log::warn!("Request to {url} failed: {err}");
                ApiError::UpdateRejected {
                    status: status_of(&err),
                    message: None,
                }
            })?;

        if response.status().is_success() {
            return Ok(());
        }

        let err = rejection(response).await;
        log::warn!("PATCH {url} rejected: {err}");
        Err(err)
    }
}
