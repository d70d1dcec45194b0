//! Optional RON settings file. Every field may be omitted.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use quiz_export_core::SessionRules;
use quiz_export_engine::{ExportSettings, FetchSettings, ThrottleSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid `{field}` in {path:?}: {reason}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub redirect_limit: usize,
    pub max_page_bytes: u64,
    pub image_timeout_ms: u64,
    pub throttle_base_ms: u64,
    pub throttle_jitter_ms: u64,
    pub duplicate_threshold: u32,
    pub no_questions_marker: String,
    pub keep_images: bool,
    pub embed_images: bool,
    pub output_dir: PathBuf,
}

impl Default for SettingsFile {
    fn default() -> Self {
        let defaults = ExportSettings::default();
        Self {
            connect_timeout_ms: millis(defaults.fetch.connect_timeout),
            request_timeout_ms: millis(defaults.fetch.request_timeout),
            redirect_limit: defaults.fetch.redirect_limit,
            max_page_bytes: defaults.fetch.max_bytes,
            image_timeout_ms: millis(defaults.image_timeout),
            throttle_base_ms: millis(defaults.throttle.base),
            throttle_jitter_ms: millis(defaults.throttle.jitter),
            duplicate_threshold: defaults.session.duplicate_threshold,
            no_questions_marker: defaults.session.no_questions_marker,
            keep_images: defaults.keep_images,
            embed_images: defaults.embed_images,
            output_dir: defaults.output_dir,
        }
    }
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate().map_err(|(field, reason)| SettingsError::Invalid {
            path: path.to_path_buf(),
            field,
            reason,
        })?;
        Ok(settings)
    }

    /// Rejects pagination rules that would end every run on the first page.
    fn validate(&self) -> Result<(), (&'static str, &'static str)> {
        if self.duplicate_threshold == 0 {
            return Err(("duplicate_threshold", "must be at least 1"));
        }
        if self.no_questions_marker.trim().is_empty() {
            return Err(("no_questions_marker", "must not be empty"));
        }
        Ok(())
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn into_export_settings(self) -> ExportSettings {
        ExportSettings {
            fetch: FetchSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                redirect_limit: self.redirect_limit,
                max_bytes: self.max_page_bytes,
                ..FetchSettings::default()
            },
            session: SessionRules {
                duplicate_threshold: self.duplicate_threshold,
                no_questions_marker: self.no_questions_marker,
            },
            throttle: ThrottleSettings {
                base: Duration::from_millis(self.throttle_base_ms),
                jitter: Duration::from_millis(self.throttle_jitter_ms),
            },
            keep_images: self.keep_images,
            embed_images: self.embed_images,
            image_timeout: Duration::from_millis(self.image_timeout_ms),
            output_dir: self.output_dir,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
