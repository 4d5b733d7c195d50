//! Minimal HTTP client with safe logging and flexible auth.
//!
//! - Request options: headers, `Auth`, timeout, absolute-URL opt-in
//! - Redacts sensitive header values and never logs secrets
//! - Exactly one attempt per request: a failure surfaces immediately and the
//!   caller decides what it means (the harvest pipeline never retries a
//!   network step)
//! - Optional *raw* request/response logging via `HEMERO_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), hemero_http::HttpError> {
//! let client = hemero_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .post_json("v1/echo", &serde_json::json!({"q": "hola"}), hemero_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: `Auth::Bearer` values are sanitized before use, and logs only
//! ever include the auth kind (bearer/header/none), not the secret.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "HEMERO_HTTP_RAW";
const RAW_MAX_BODY: usize = 16 * 1024; // cap raw body logs (16 KiB)

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Header names whose values must never reach a log line.
fn is_sensitive_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "authorization"
        || name.contains("key")
        || name.contains("token")
        || name.contains("secret")
}

/// Redact sensitive headers for logging.
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_sensitive_header(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Custom header (e.g., RapidAPI: x-rapidapi-key)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    None,
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use hemero_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(10)),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 10);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use hemero_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(10),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload =
            serde_json::to_vec(body).map_err(|e| HttpError::Build(e.to_string()))?;
        let (req_id, bytes) = self
            .request_raw(Method::POST, path, Some(payload), opts)
            .await?;

        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            let snippet = snip_body(&bytes);
            tracing::warn!(
                req_id=%req_id,
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// GET a response body verbatim (image downloads and other binary pulls).
    pub async fn get_bytes(&self, path: &str, opts: RequestOpts<'_>) -> Result<Vec<u8>, HttpError> {
        let (_, bytes) = self.request_raw(Method::GET, path, None, opts).await?;
        Ok(bytes)
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_raw(
        &self,
        method: Method,
        path: &str,
        json_body: Option<Vec<u8>>,
        opts: RequestOpts<'_>,
    ) -> Result<(String, Vec<u8>), HttpError> {
        // Resolve URL (allow absolute URL when requested).
        let url = if opts.allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                abs
            } else {
                self.base
                    .join(path)
                    .map_err(|e| HttpError::Url(e.to_string()))?
            }
        } else {
            self.base
                .join(path)
                .map_err(|e| HttpError::Url(e.to_string()))?
        };

        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        rb = rb.timeout(timeout);

        let has_body = json_body.is_some();
        if let Some(bytes) = &json_body {
            rb = rb
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes.clone());
        }

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        let auth_kind = match &opts.auth {
            Some(Auth::Bearer(_)) => "bearer",
            Some(Auth::Header { .. }) => "header",
            Some(Auth::None) | None => "none",
        };
        if let Some(auth) = &opts.auth {
            match auth {
                Auth::Bearer(tok) => {
                    let tok = sanitize_api_key(tok)?;
                    rb = rb.bearer_auth(tok);
                }
                Auth::Header { name, value } => {
                    rb = rb.header(name, value);
                }
                Auth::None => {}
            }
        }

        // Lightweight request id without extra deps.
        // FIXME(ids): swap the timestamp id for a uuid if collisions ever show up in concurrent session logs.
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            has_body,
            "http.request.start"
        );

        if raw_enabled() {
            let caller_headers = opts
                .headers
                .as_ref()
                .map(redact_headers)
                .unwrap_or_default();
            let body_text = json_body
                .as_deref()
                .map(|b| String::from_utf8_lossy(&b[..b.len().min(RAW_MAX_BODY)]).into_owned())
                .unwrap_or_default();
            tracing::debug!(
                target: "http.raw",
                %req_id,
                url=%url,
                headers=?caller_headers,
                body=%body_text,
                "request"
            );
        }

        // Single attempt: the pipeline's error-containment layers decide what
        // a failure means, so there is no retry loop here.
        let t0 = std::time::Instant::now();
        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(req_id=%req_id, message=%message, "http.network_error.send");
                return Err(HttpError::Network(message));
            }
        };
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
                return Err(HttpError::Network(message));
            }
        };
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            "http.response"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated,
                "response"
            );
        }

        if status.is_success() {
            return Ok((req_id, bytes));
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            body_snippet=%snip_body(&bytes),
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(serde::Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.detail.is_empty() {
            return m.detail;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
