//! HTTP client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
};

/// One JSON request against the API root
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Path below the base URL, e.g. `/tasks/abc`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transport seam; repositories are tested against mocks of this
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Send a request and return the decoded JSON body (`Null` when empty)
    async fn send(&self, request: HttpRequest) -> Result<Value>;
}

/// Serde-typed helpers on top of any `HttpClientTrait`
#[async_trait]
pub trait HttpClientExt: HttpClientTrait {
    async fn get_json<T>(&self, path: &str, query: Vec<(String, String)>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self
            .send(HttpRequest::new(Method::GET, path).with_query(query))
            .await?;
        decode(value)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    async fn delete_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self.send(HttpRequest::new(Method::DELETE, path)).await?;
        decode(value)
    }

    /// DELETE with a JSON body, used by bulk endpoints
    async fn delete_with_body<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::DELETE, path, body).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| HttpError::Encode(e.to_string()))?;
        let value = self
            .send(HttpRequest::new(method, path).with_body(body))
            .await?;
        decode(value)
    }
}

impl<C: HttpClientTrait + ?Sized> HttpClientExt for C {}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| HttpError::Decode(e.to_string()))
}

/// `reqwest`-backed client bound to one API root
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: url::Url,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(default_headers(&config.headers)?);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder.build().map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            inner,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Absolute URL for `path` below the base URL
    pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<url::Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = joined
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(format!("{joined}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<Value> {
        let url = self.endpoint(&request.path, &request.query)?;
        debug!(method = %request.method, url = %url, "HTTP request");

        let mut builder = self.inner.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

/// Build an error from a failed response, preferring the API's structured body
fn error_from_body(status: reqwest::StatusCode, text: &str) -> HttpError {
    let structured = serde_json::from_str::<Value>(text).ok().and_then(|body| {
        let error = body.get("error")?;
        Some((
            error.get("type")?.as_str()?.to_string(),
            error.get("message")?.as_str()?.to_string(),
        ))
    });

    match structured {
        Some((kind, message)) => HttpError::Api {
            status,
            kind,
            message,
        },
        None => HttpError::Status {
            status,
            body: if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                text.to_string()
            },
        },
    }
}

fn default_headers(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = |reason: String| HttpError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.insert(header, value);
    }
    Ok(map)
}

/// Client behind the trait object the repositories hold
pub fn shared_client(config: HttpConfig) -> Result<Arc<dyn HttpClientTrait>> {
    Ok(Arc::new(HttpClient::new(config)?))
}
