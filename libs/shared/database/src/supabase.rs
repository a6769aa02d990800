use anyhow::{Context, Result};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_RANGE, CONTENT_TYPE, AUTHORIZATION},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Postgres SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Non-success response from PostgREST, kept typed so callers can downcast it
/// out of an `anyhow::Error`.
#[derive(Debug, Error)]
#[error("API error ({status}): {message}")]
pub struct SupabaseApiError {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
}

impl SupabaseApiError {
    /// PostgREST also answers 409 for foreign key (23503) and exclusion (23P01)
    /// violations, so the status alone only counts when the body has no code.
    pub fn is_unique_violation(&self) -> bool {
        match self.code.as_deref() {
            Some(code) => code == UNIQUE_VIOLATION_CODE,
            None => self.status == 409,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key).context("invalid Supabase anon key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))
                .context("invalid Supabase anon key")?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, extra_headers).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Exact number of rows matching `path`, read from the `Content-Range`
    /// header so the server's `max-rows` cap does not truncate it.
    pub async fn count(&self, path: &str) -> Result<u64> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let response = self.send(Method::GET, path, None, Some(headers)).await?;
        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .context("count response has no Content-Range header")?
            .to_str()
            .context("Content-Range header is not valid ASCII")?;

        parse_total(content_range)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            let parsed = serde_json::from_str::<PostgrestErrorBody>(&error_text).ok();
            let (code, message) = match parsed {
                Some(body) => (body.code, body.message.unwrap_or_else(|| error_text.clone())),
                None => (None, error_text),
            };

            return Err(SupabaseApiError {
                status: status.as_u16(),
                code,
                message,
            }
            .into());
        }

        Ok(response)
    }

    /// Headers asking PostgREST to echo the written rows back.
    pub fn return_representation() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

/// Total from a `Content-Range` value such as `0-9/1500` or `*/1500`.
fn parse_total(content_range: &str) -> Result<u64> {
    let (_, total) = content_range
        .split_once('/')
        .with_context(|| format!("malformed Content-Range: {}", content_range))?;

    total
        .parse()
        .with_context(|| format!("Content-Range carries no exact total: {}", content_range))
}

/// Finds a `SupabaseApiError` anywhere in the error chain.
pub fn api_error(err: &anyhow::Error) -> Option<&SupabaseApiError> {
    err.chain().find_map(|cause| cause.downcast_ref::<SupabaseApiError>())
}
