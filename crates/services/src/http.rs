//! Thin JSON-over-HTTP client: URL building, timeouts, cancellation and
//! error normalization. One network call per request, no retries.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use tokio::sync::watch;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::ApiError;

//
// ─── CANCELLATION ──────────────────────────────────────────────────────────────
//

/// Owner side of a cancellation pair. Aborting fires every signal handed out
/// by `signal()`, including ones taken before the abort.
#[derive(Debug)]
pub struct AbortController {
    tx: watch::Sender<bool>,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observer side of a cancellation pair. The default signal never fires.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl AbortSignal {
    #[must_use]
    pub fn never() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the controller aborts. A dropped controller never aborts.
    pub async fn aborted(&self) {
        let Some(rx) = self.rx.as_ref() else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        let closed = rx.wait_for(|aborted| *aborted).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

/// Per-call request description.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub signal: AbortSignal,
    /// Overrides the client's configured timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
            signal: AbortSignal::never(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn post(body: Value) -> Self {
        Self::new(Method::POST).with_body(body)
    }

    #[must_use]
    pub fn put(body: Value) -> Self {
        Self::new(Method::PUT).with_body(body)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = signal;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    config: ApiConfig,
}

impl HttpClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Perform one request and return the parsed JSON body (`Value::Null` for
    /// an empty body).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` for non-2xx responses, `ApiError::Timeout` when
    /// the timeout elapses, `ApiError::Aborted` when the signal fires first,
    /// and `ApiError::Network` for transport failures.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = self.config.endpoint(path)?;
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let span = tracing::debug_span!(
            "api_request",
            method = %options.method,
            path = %path,
            id = %Uuid::new_v4(),
        );

        async move {
            if options.signal.is_aborted() {
                return Err(ApiError::Aborted);
            }
            tracing::debug!(%url, "sending request");

            let result = tokio::select! {
                result = self.execute(url, &options) => result,
                () = tokio::time::sleep(timeout) => Err(ApiError::Timeout(timeout)),
                () = options.signal.aborted() => Err(ApiError::Aborted),
            };

            match &result {
                Ok(_) => tracing::debug!("request completed"),
                Err(err) => tracing::warn!(error = %err, "request failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, url: Url, options: &RequestOptions) -> Result<Value, ApiError> {
        let mut builder = self
            .client
            .request(options.method.clone(), url)
            .header(ACCEPT, "application/json")
            .headers(options.headers.clone());
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::from_transport(&err))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::from_transport(&err))?;
        let payload = parse_body(&text);

        if !status.is_success() {
            let message = error_message(status, &payload);
            return Err(ApiError::Http {
                status,
                message,
                payload,
            });
        }
        Ok(payload)
    }
}

/// Empty bodies become `null`; non-JSON bodies are wrapped as `{"detail": text}`.
#[must_use]
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "detail": text }))
}

/// Human-readable message for an error payload.
///
/// `detail` may be a string or a list of `{msg}` objects; list messages are
/// joined with `", "`.
#[must_use]
pub fn error_message(status: StatusCode, payload: &Value) -> String {
    let detail = match payload.get("detail") {
        Some(Value::String(text)) => text.trim().to_owned(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                item.get("msg")
                    .and_then(Value::as_str)
                    .or_else(|| item.as_str())
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };
    if detail.is_empty() {
        format!("Request failed with status {}", status.as_u16())
    } else {
        detail
    }
}
