use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::ResultExt;

use crate::error::{
    ApiError, ApiResult, BuildClientSnafu, DecodeSnafu, StatusSnafu, TransportSnafu,
};
use crate::types::AuthToken;

pub const DEFAULT_BASE_URL: &str = "https://message-app-backend-t3-2025-v2-eosin.vercel.app/api";

/// Keys the backend uses for a single human-readable error, in lookup order.
const ERROR_MESSAGE_KEYS: [&str; 3] = ["detail", "error", "message"];

/// Names one backend call for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub stage: &'static str,
    /// Shown when the error body carries no usable message.
    pub failure_message: &'static str,
}

impl Operation {
    pub const fn new(stage: &'static str, failure_message: &'static str) -> Self {
        Self {
            stage,
            failure_message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Thin JSON-over-HTTP wrapper with `Token` authentication.
///
/// Every call is attempted exactly once.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> ApiResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if let Err(error) = reqwest::Url::parse(&base_url) {
            return Err(ApiError::InvalidBaseUrl {
                stage: "parse-base-url",
                base_url,
                details: error.to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context(BuildClientSnafu {
            stage: "build-http-client",
        })?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T>(
        &self,
        operation: Operation,
        path: &str,
        token: &AuthToken,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, Some(token));
        let response = self.send(operation, request).await?;
        response.json().await.context(DecodeSnafu {
            stage: operation.stage,
        })
    }

    pub async fn post_json<B, T>(
        &self,
        operation: Operation,
        path: &str,
        token: Option<&AuthToken>,
        body: &B,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, token).json(body);
        let response = self.send(operation, request).await?;
        response.json().await.context(DecodeSnafu {
            stage: operation.stage,
        })
    }

    /// POST without a body; any response body is ignored.
    pub async fn post_empty(
        &self,
        operation: Operation,
        path: &str,
        token: &AuthToken,
    ) -> ApiResult<()> {
        let request = self.request(Method::POST, path, Some(token));
        self.send(operation, request).await?;
        Ok(())
    }

    pub async fn delete(
        &self,
        operation: Operation,
        path: &str,
        token: &AuthToken,
    ) -> ApiResult<()> {
        let request = self.request(Method::DELETE, path, Some(token));
        self.send(operation, request).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.header_value());
        }
        request
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.context(TransportSnafu {
            stage: operation.stage,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // A body that cannot be read still gets the generic message.
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| operation.failure_message.to_string());

        tracing::debug!(
            stage = operation.stage,
            status = status.as_u16(),
            "backend rejected request"
        );

        StatusSnafu {
            stage: operation.stage,
            status: status.as_u16(),
            message,
        }
        .fail()
    }
}

/// Pulls a human-readable message out of an error response body.
///
/// Understands `{"detail": ".."}`-style objects, `non_field_errors` lists,
/// field-keyed lists (`{"name": ["This field is required."]}`), bare JSON
/// strings and lists of strings.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    message_from_value(&value)
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_blank(text),
        Value::Array(items) => items.iter().find_map(message_from_value),
        Value::Object(map) => {
            for key in ERROR_MESSAGE_KEYS {
                if let Some(message) = map.get(key).and_then(message_from_value) {
                    return Some(message);
                }
            }

            if let Some(message) = map.get("non_field_errors").and_then(message_from_value) {
                return Some(message);
            }

            map.values().find_map(message_from_value)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
