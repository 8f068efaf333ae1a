//! `reqwest`-backed implementation of the Cloud Controller client traits.
//!
//! Requests go to the v2 JSON API. List endpoints are followed page by page
//! until `next_url` runs out, and the warnings of every page are kept. Every
//! response, successful or not, contributes its `X-Cf-Warnings`.

mod endpoints;
mod error_classification;
mod warnings_header;
mod wire;

#[cfg(test)]
mod tests_loopback;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiReply, Filter};
use crate::config::AppConfig;
use crate::error::{ApiError, ConfigError};
use crate::warnings::{Warned, Warnings};
use error_classification::classify_error_response;
use warnings_header::{parse_request_ids, parse_warnings};
use wire::{Envelope, IntoResource, Page, decode};

/// Cloud Controller client speaking HTTP.
#[derive(Debug, Clone)]
pub struct HttpCloudController {
    http: reqwest::Client,
    api_endpoint: String,
    access_token: Option<String>,
}

impl HttpCloudController {
    /// Builds a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] when no API endpoint is
    /// configured, or [`ConfigError::InvalidValue`] when the HTTP client
    /// cannot be built from the connection settings.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let api_endpoint = config.require_api_endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.connection.request_timeout())
            .danger_accept_invalid_certs(config.connection.skip_ssl_validation)
            .build()
            .map_err(|error| ConfigError::InvalidValue {
                field: String::from("connection"),
                reason: format!("failed to build HTTP client: {error}"),
            })?;

        Ok(Self {
            http,
            api_endpoint: api_endpoint.to_owned(),
            access_token: config.access_token.clone(),
        })
    }

    /// Sends `request` and classifies the response.
    async fn send(&self, request: Request) -> ApiReply<Response> {
        let Request {
            method,
            path,
            query,
            body,
        } = request;
        debug!(%method, %path, "calling Cloud Controller");

        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.api_endpoint))
            .query(&query);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(json) = body {
            builder = builder.json(&json);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                return Warned::bare(Err(ApiError::Transport {
                    message: error.to_string(),
                }));
            }
        };

        let warnings = parse_warnings(response.headers());
        let request_ids = parse_request_ids(response.headers());
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(error) => {
                return Warned::new(
                    Err(ApiError::Transport {
                        message: error.to_string(),
                    }),
                    warnings,
                );
            }
        };

        if status.is_success() {
            Warned::new(Ok(Response { status, body: text }), warnings)
        } else {
            debug!(status = status.as_u16(), "Cloud Controller returned an error");
            Warned::new(
                Err(classify_error_response(status.as_u16(), &text, request_ids)),
                warnings,
            )
        }
    }

    /// Sends `request`, discarding the response body.
    async fn send_empty(&self, request: Request) -> ApiReply<()> {
        self.send(request).await.map(|result| result.map(drop))
    }

    /// Sends `request` and decodes a body of type `T`.
    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> ApiReply<T> {
        self.send(request)
            .await
            .map(|result| result.and_then(|response| decode(&response.body)))
    }

    /// Sends `request` and decodes a single resource envelope.
    async fn fetch_resource<E>(&self, request: Request) -> ApiReply<E::Resource>
    where
        E: IntoResource + DeserializeOwned,
    {
        self.fetch::<Envelope<E>>(request)
            .await
            .map(|result| result.map(Envelope::into_resource))
    }

    /// Sends `request` and follows every page of the listing.
    async fn fetch_all<E>(&self, request: Request) -> ApiReply<Vec<E::Resource>>
    where
        E: IntoResource + DeserializeOwned,
    {
        let mut warnings = Warnings::new();
        let result: Result<Vec<E::Resource>, ApiError> = async {
            let mut resources = Vec::new();
            let mut next = Some(request);
            while let Some(page_request) = next.take() {
                let page = warnings.absorb(self.fetch::<Page<E>>(page_request).await)?;
                resources.extend(page.resources.into_iter().map(Envelope::into_resource));
                next = page.next_url.map(|url| Request::new(Method::GET, url));
            }
            Ok(resources)
        }
        .await;
        Warned::new(result, warnings)
    }
}

/// A successful response.
#[derive(Debug)]
struct Response {
    status: StatusCode,
    body: String,
}

/// An outgoing request, relative to the API endpoint.
#[derive(Debug)]
struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_owned(), value.into()));
        self
    }

    fn filters(mut self, filters: &[Filter]) -> Self {
        self.query.extend(
            filters
                .iter()
                .map(|filter| (String::from("q"), filter.to_string())),
        );
        self
    }

    /// Marks a delete as asynchronous so the server answers with a job.
    fn in_background(self) -> Self {
        self.param("async", "true")
    }

    fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}
