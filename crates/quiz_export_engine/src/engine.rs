use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quiz_export_core::{Phase, ReviewTarget, SessionRules};
use quiz_logging::{quiz_info, quiz_warn};

use crate::clean::HtmlCleaner;
use crate::driver::{NullProgressSink, PaginationDriver, ProgressSink, ThrottleSettings};
use crate::export::finalize;
use crate::filename::export_filename;
use crate::images::{ImageEmbedder, DEFAULT_IMAGE_TIMEOUT};
use crate::parse::QuestionParser;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::sanitize::Sanitizer;
use crate::{FetchSettings, Fetcher, ReqwestFetcher, SessionCredentials};

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub fetch: FetchSettings,
    pub session: SessionRules,
    pub throttle: ThrottleSettings,
    /// Keep `img` elements in sanitized fields.
    pub keep_images: bool,
    /// Inline remote images as `data:` URIs.
    pub embed_images: bool,
    pub image_timeout: Duration,
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            session: SessionRules::default(),
            throttle: ThrottleSettings::default(),
            keep_images: true,
            embed_images: true,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages_fetched: u32,
    pub total_records: usize,
    pub unique_records: usize,
    pub phase: Phase,
    pub output_path: PathBuf,
}

/// Runs one export: paginate, deduplicate, encode, write.
pub struct ExportEngine {
    settings: ExportSettings,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ProgressSink>,
}

impl ExportEngine {
    pub fn new(settings: ExportSettings, credentials: Option<SessionCredentials>) -> Self {
        let mut fetcher = ReqwestFetcher::new(settings.fetch.clone());
        if let Some(credentials) = credentials {
            fetcher = fetcher.with_credentials(credentials);
        }
        Self::with_fetcher(settings, Arc::new(fetcher))
    }

    pub fn with_fetcher(settings: ExportSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            settings,
            fetcher,
            sink: Arc::new(NullProgressSink),
        }
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    fn driver(&self) -> PaginationDriver {
        let mut cleaner = HtmlCleaner::new(Sanitizer::new(self.settings.keep_images));
        if self.settings.embed_images {
            cleaner = cleaner.with_image_embedding(ImageEmbedder::new(
                self.fetcher.clone(),
                self.settings.image_timeout,
            ));
        }
        PaginationDriver::new(self.fetcher.clone(), QuestionParser::new(cleaner))
            .with_rules(self.settings.session.clone())
            .with_throttle(self.settings.throttle.clone())
            .with_progress_sink(self.sink.clone())
    }

    /// Always writes a file once pagination has started, even when it aborted
    /// part way; the summary's `phase` tells how it ended.
    pub async fn run(&self, target: &ReviewTarget) -> Result<ExportSummary, ExportError> {
        let report = self.driver().extract_all(target).await;
        if let Phase::Aborted { reason } = &report.phase {
            quiz_warn!(
                "Exporting the {} questions collected before the failure: {reason}",
                report.records.len()
            );
        }

        let total_records = report.records.len();
        let title = target.page_title.as_deref().or(report.title.as_deref());
        let filename = export_filename(title);
        let export = finalize(report.records);
        quiz_info!("Total unique questions saved: {}", export.rows);

        let writer = AtomicFileWriter::new(self.settings.output_dir.clone());
        let output_path = writer.write(&filename, export.text.as_bytes())?;
        quiz_info!("Export complete! File written: {}", output_path.display());

        Ok(ExportSummary {
            pages_fetched: report.pages_fetched,
            total_records,
            unique_records: export.rows,
            phase: report.phase,
            output_path,
        })
    }
}
