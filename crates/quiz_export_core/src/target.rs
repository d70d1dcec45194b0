use url::Url;

use crate::PageIndex;

const ATTEMPT_PARAM: &str = "attempt";
const MODULE_PARAM: &str = "cmid";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid review page address: {0}")]
    InvalidUrl(String),
    #[error("review page address has no `{0}` parameter")]
    MissingParameter(&'static str),
}

/// The quiz review whose pages are exported.
///
/// Holds everything the browser would otherwise provide implicitly: the
/// attempt and module identifiers from the address, the address origin and
/// path used to build page URLs, and the document title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub attempt_id: String,
    pub module_id: String,
    pub page_title: Option<String>,
    origin: String,
    path: String,
}

impl ReviewTarget {
    /// Discover the target from a review page address such as
    /// `https://lms.example/mod/quiz/review.php?attempt=12&cmid=34`.
    pub fn from_review_url(address: &str, page_title: Option<String>) -> Result<Self, TargetError> {
        let url = Url::parse(address.trim()).map_err(|err| TargetError::InvalidUrl(err.to_string()))?;
        if !url.has_host() {
            return Err(TargetError::InvalidUrl(format!("{address} has no host")));
        }

        let param = |name: &'static str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(TargetError::MissingParameter(name))
        };
        let attempt_id = param(ATTEMPT_PARAM)?;
        let module_id = param(MODULE_PARAM)?;

        Ok(Self {
            attempt_id,
            module_id,
            page_title: page_title.filter(|t| !t.trim().is_empty()),
            origin: url.origin().ascii_serialization(),
            path: url.path().to_string(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `{origin}{path}?attempt={attempt}&cmid={cmid}&page={n}`
    pub fn page_url(&self, page: PageIndex) -> String {
        format!(
            "{}{}?{ATTEMPT_PARAM}={}&{MODULE_PARAM}={}&page={page}",
            self.origin, self.path, self.attempt_id, self.module_id
        )
    }
}
