use url::Url;

use crate::images::{image_sources, ImageEmbedder};
use crate::sanitize::{ImageReplacements, Sanitizer};

/// Sanitizer plus optional image embedding, applied to one field at a time.
#[derive(Clone, Default)]
pub struct HtmlCleaner {
    sanitizer: Sanitizer,
    embedder: Option<ImageEmbedder>,
}

impl HtmlCleaner {
    pub fn new(sanitizer: Sanitizer) -> Self {
        Self {
            sanitizer,
            embedder: None,
        }
    }

    pub fn with_image_embedding(mut self, embedder: ImageEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Embeds the fragment's images (when enabled) and sanitizes it.
    /// `base` resolves relative image references.
    pub async fn clean(&self, fragment: &str, base: Option<&Url>) -> String {
        if fragment.trim().is_empty() {
            return String::new();
        }
        let replacements = match &self.embedder {
            Some(embedder) if self.sanitizer.keeps_images() => {
                let sources = image_sources(fragment, base);
                if sources.is_empty() {
                    ImageReplacements::new()
                } else {
                    embedder.embed(&sources).await
                }
            }
            _ => ImageReplacements::new(),
        };
        self.sanitizer.sanitize_with(fragment, &replacements)
    }
}
