//! Client for a RapidAPI-hosted translation endpoint.
//!
//! The service takes `{"from","to","q"}` and answers with a JSON array of
//! candidate translations; only the first candidate is used.

use std::time::Duration;

use async_trait::async_trait;
use hemero_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::{TranslateError, Translator};

/// Hosted endpoint behind the RapidAPI gateway.
pub const RAPID_TRANSLATE_URL: &str = "https://rapid-translate-multi-traduction.p.rapidapi.com/";

/// Bound on each translation request, connect to last body byte.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    from: &'a str,
    to: &'a str,
    q: &'a str,
}

/// One translation request per call, no retries; callers fold failures into
/// the batch sentinel.
pub struct RapidTranslateClient {
    http: HttpClient,
    api_key: HeaderValue,
    api_host: HeaderValue,
}

impl RapidTranslateClient {
    /// Client against the hosted endpoint.
    pub fn new(api_key: &str, api_host: &str) -> Result<Self, TranslateError> {
        Self::with_endpoint(RAPID_TRANSLATE_URL, api_key, api_host)
    }

    /// Client against an explicit endpoint (tests aim this at a local mock).
    pub fn with_endpoint(
        base_url: &str,
        api_key: &str,
        api_host: &str,
    ) -> Result<Self, TranslateError> {
        let http = HttpClient::new(base_url)?.with_timeout(REQUEST_TIMEOUT);
        let mut api_key = HeaderValue::from_str(api_key.trim())
            .map_err(|e| HttpError::Build(format!("invalid API key: {e}")))?;
        // Keeps the key out of Debug output should the header map ever be logged.
        api_key.set_sensitive(true);
        let api_host = HeaderValue::from_str(api_host.trim())
            .map_err(|e| HttpError::Build(format!("invalid API host: {e}")))?;
        Ok(Self {
            http,
            api_key,
            api_host,
        })
    }
}

#[async_trait]
impl Translator for RapidTranslateClient {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslateError> {
        tracing::debug!(
            target: "translate.rapid",
            from,
            to,
            chars = text.chars().count(),
            "translate.request"
        );

        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-host", self.api_host.clone());

        let opts = RequestOpts {
            timeout: Some(REQUEST_TIMEOUT),
            auth: Some(Auth::Header {
                name: HeaderName::from_static("x-rapidapi-key"),
                value: self.api_key.clone(),
            }),
            headers: Some(headers),
            allow_absolute: false,
        };

        let candidates: Vec<String> = self
            .http
            .post_json("t", &TranslateRequest { from, to, q: text }, opts)
            .await?;

        candidates
            .into_iter()
            .next()
            .ok_or(TranslateError::EmptyResponse)
    }
}
