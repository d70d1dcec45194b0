use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::future::join_all;
use quiz_logging::{quiz_debug, quiz_warn};
use scraper::{Html, Selector};
use url::Url;

use crate::sanitize::ImageReplacements;
use crate::{FetchKind, Fetcher};

pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// An `<img src>` found in a fragment, with the URL it would be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub raw: String,
    pub fetch_url: Option<Url>,
}

/// Collects the distinct image sources of a fragment, resolving relative
/// references against `base`.
pub fn image_sources(fragment: &str, base: Option<&Url>) -> Vec<ImageSource> {
    let Ok(img) = Selector::parse("img[src]") else {
        return Vec::new();
    };
    let document = Html::parse_fragment(fragment);
    let mut sources: Vec<ImageSource> = Vec::new();
    for element in document.select(&img) {
        let Some(raw) = element.value().attr("src") else {
            continue;
        };
        if sources.iter().any(|s| s.raw == raw) {
            continue;
        }
        sources.push(ImageSource {
            raw: raw.to_string(),
            fetch_url: embeddable_url(raw, base),
        });
    }
    sources
}

/// The URL to download for an embeddable source, upgraded to `https`.
///
/// Inline `data:` sources are already embedded; `blob:` sources only exist in
/// the browser context that created them.
fn embeddable_url(raw: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("data:") {
        return None;
    }
    if lower.starts_with("blob:") {
        quiz_debug!("Skipping blob image source {trimmed}; it cannot be fetched");
        return None;
    }
    let mut url = Url::parse(trimmed)
        .ok()
        .or_else(|| base.and_then(|base| base.join(trimmed).ok()))?;
    if url.scheme() == "http" {
        url.set_scheme("https").ok()?;
    }
    (url.scheme() == "https").then_some(url)
}

/// Best-effort inlining of remote images as base64 `data:` URIs.
#[derive(Clone)]
pub struct ImageEmbedder {
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
}

impl ImageEmbedder {
    pub fn new(fetcher: Arc<dyn Fetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Fetches every embeddable source concurrently. Sources that fail, time
    /// out or come back empty are absent from the result and keep their
    /// original reference.
    pub async fn embed(&self, sources: &[ImageSource]) -> ImageReplacements {
        let attempts = sources.iter().filter_map(|source| {
            let url = source.fetch_url.as_ref()?;
            Some(async move { (source.raw.clone(), self.fetch_data_uri(url).await) })
        });
        join_all(attempts)
            .await
            .into_iter()
            .filter_map(|(raw, data_uri)| Some((raw, data_uri?)))
            .collect::<HashMap<_, _>>()
    }

    async fn fetch_data_uri(&self, url: &Url) -> Option<String> {
        let fetch = self.fetcher.fetch(url.as_str(), FetchKind::Image);
        let output = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                quiz_warn!("Couldn't embed image ({url}), using original URL: {err}");
                return None;
            }
            Err(_) => {
                quiz_warn!(
                    "Couldn't embed image ({url}), using original URL: no response within {:?}",
                    self.timeout
                );
                return None;
            }
        };
        if output.bytes.is_empty() {
            quiz_warn!("Couldn't embed image ({url}), using original URL: empty body");
            return None;
        }
        let mime = output
            .metadata
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or("application/octet-stream");
        Some(format!("data:{mime};base64,{}", STANDARD.encode(&output.bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://lms.example.org/mod/quiz/review.php?attempt=1").unwrap()
    }

    #[test]
    fn http_sources_are_upgraded() {
        let url = embeddable_url("http://cdn.example.org/a.png", None).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.org/a.png");
    }

    #[test]
    fn relative_sources_resolve_against_page() {
        let url = embeddable_url("/pluginfile.php/9/q.png", Some(&base())).unwrap();
        assert_eq!(url.as_str(), "https://lms.example.org/pluginfile.php/9/q.png");
    }

    #[test]
    fn data_and_blob_sources_are_not_fetched() {
        assert_eq!(embeddable_url("data:image/png;base64,AAAA", Some(&base())), None);
        assert_eq!(embeddable_url("blob:https://lms.example.org/123", Some(&base())), None);
        assert_eq!(embeddable_url("ftp://files.example.org/a.png", None), None);
    }

    #[test]
    fn sources_are_collected_once_in_document_order() {
        let fragment = r#"<p><img src="b.png"><img src="a.png"><img src="b.png"><img alt="none"></p>"#;
        let sources = image_sources(fragment, Some(&base()));
        let raws: Vec<_> = sources.iter().map(|s| s.raw.as_str()).collect();
        assert_eq!(raws, vec!["b.png", "a.png"]);
        assert_eq!(
            sources[0].fetch_url.as_ref().map(Url::as_str),
            Some("https://lms.example.org/mod/quiz/b.png")
        );
    }
}
