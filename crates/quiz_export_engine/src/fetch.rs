use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE, COOKIE, PRAGMA};
use url::{Origin, Url};

use crate::{FailureKind, FetchError, FetchKind, FetchMetadata, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_page_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 10 * 1024 * 1024,
            allowed_page_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Session cookie for the review site. Only sent to its own origin.
#[derive(Clone)]
pub struct SessionCredentials {
    origin: Origin,
    cookie: String,
}

impl SessionCredentials {
    pub fn new(site: &Url, cookie: impl Into<String>) -> Self {
        Self {
            origin: site.origin(),
            cookie: cookie.into(),
        }
    }

    fn applies_to(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("origin", &self.origin.ascii_serialization())
            .field("cookie", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, kind: FetchKind) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    credentials: Option<SessionCredentials>,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self {
            settings,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: SessionCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, kind: FetchKind, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        match kind {
            FetchKind::Page => self
                .settings
                .allowed_page_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ct)),
            FetchKind::Image => ct
                .get(..6)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/")),
        }
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        url: Url,
        kind: FetchKind,
    ) -> Result<reqwest::RequestBuilder, FetchError> {
        let mut request = client.get(url.clone());
        if kind == FetchKind::Page {
            request = request
                .header(CACHE_CONTROL, "no-cache, no-store")
                .header(PRAGMA, "no-cache");
        }
        if let Some(credentials) = self.credentials.as_ref().filter(|c| c.applies_to(&url)) {
            let value = HeaderValue::from_str(&credentials.cookie)
                .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
            request = request.header(COOKIE, value);
        }
        Ok(request)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, kind: FetchKind) -> Result<FetchOutput, FetchError> {
        let parsed =
            Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = self
            .build_request(&client, parsed, kind)?
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(declared) = response.content_length().filter(|len| *len > max_bytes) {
            return Err(too_large(max_bytes, declared));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(kind, ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let bytes = read_capped(response, max_bytes).await?;
        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: redirect_counter.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

/// Collects the body, failing as soon as it grows past `max_bytes`.
async fn read_capped(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let received = (body.len() + chunk.len()) as u64;
        if received > max_bytes {
            return Err(too_large(max_bytes, received));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
