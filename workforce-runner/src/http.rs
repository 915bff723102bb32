//! HTTP client for the dashboard's whitelisted method API.
//!
//! Every call is `POST {base}/api/method/{module}.{method}` with the
//! arguments as a JSON body. Successful answers wrap the payload in a
//! `{"message": ...}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use workforce_core::payload::ExportReceipt;
use workforce_core::settings::ServiceSettings;
use workforce_core::{ExportArgs, FetchError, QueryArgs, QueryName, ThemeTokens};

use crate::service::{decode, ExportService, NavigationService, QueryService, ThemeService};

/// Longest slice of an error body kept in a `FetchError`.
const ERROR_BODY_LIMIT: usize = 300;

pub struct MethodClient {
    http: reqwest::Client,
    base_url: String,
    app_module: String,
}

impl MethodClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = settings.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", token.trim())) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            app_module: settings.app_module.clone(),
        })
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/api/method/{}.{}", self.base_url, self.app_module, method)
    }

    /// Resolve a site-relative file URL against the service base.
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }

    async fn call<A: Serialize + ?Sized>(&self, method: &str, args: &A) -> Result<Value, FetchError> {
        let url = self.method_url(method);
        tracing::debug!(%url, "calling method");

        let response = self
            .http
            .post(&url)
            .json(args)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                method: method.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchError::Transport {
            method: method.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(classify_status(method, status, &body));
        }
        unwrap_envelope(method, &body)
    }
}

/// Pull the message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        ["exception", "exc_type", "message"]
            .iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str))
            .map(str::to_string)
    });
    let mut message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.len() > ERROR_BODY_LIMIT {
        let cut = (0..=ERROR_BODY_LIMIT)
            .rev()
            .find(|i| message.is_char_boundary(*i))
            .unwrap_or(0);
        message.truncate(cut);
    }
    message
}

fn classify_status(method: &str, status: StatusCode, body: &str) -> FetchError {
    let message = error_message(body);
    // The server raises validation failures as 417.
    if status == StatusCode::EXPECTATION_FAILED {
        FetchError::Rejected {
            method: method.to_string(),
            message,
        }
    } else {
        FetchError::Server {
            method: method.to_string(),
            status: status.as_u16(),
            message,
        }
    }
}

fn unwrap_envelope(method: &str, body: &str) -> Result<Value, FetchError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut envelope: Value =
        serde_json::from_str(body).map_err(|e| FetchError::decode(method, e))?;
    match envelope.get_mut("message") {
        Some(message) => Ok(message.take()),
        None => Ok(Value::Null),
    }
}

#[async_trait(?Send)]
impl QueryService for MethodClient {
    async fn query(&self, name: QueryName, args: QueryArgs) -> Result<Value, FetchError> {
        self.call(name.method(), &args).await
    }
}

#[async_trait(?Send)]
impl ExportService for MethodClient {
    async fn export(&self, args: ExportArgs) -> Result<ExportReceipt, FetchError> {
        let value = self.call(ExportArgs::METHOD, &args).await?;
        let mut receipt: ExportReceipt = serde_json::from_value(value)
            .map_err(|e| FetchError::decode(ExportArgs::METHOD, e))?;
        receipt.file_url = receipt.file_url.map(|u| self.absolute_url(&u));
        Ok(receipt)
    }
}

#[async_trait(?Send)]
impl NavigationService for MethodClient {
    async fn navigation(&self) -> Result<Value, FetchError> {
        self.call(QueryName::Navigation.method(), &QueryArgs::new()).await
    }
}

#[async_trait(?Send)]
impl ThemeService for MethodClient {
    async fn theme(&self) -> Result<ThemeTokens, FetchError> {
        let value = self.call(QueryName::Theme.method(), &QueryArgs::new()).await?;
        decode(QueryName::Theme, value)
    }
}
