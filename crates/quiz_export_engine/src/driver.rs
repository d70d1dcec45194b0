use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use quiz_export_core::{
    update, Effect, ExtractionSession, Msg, PageIndex, Phase, QuestionRecord, ReviewTarget,
    SessionRules, Termination,
};
use quiz_logging::{quiz_error, quiz_info, quiz_warn};
use rand::Rng;
use url::Url;

use crate::decode::decode_page;
use crate::parse::QuestionParser;
use crate::{ExportEvent, FetchKind, Fetcher};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ExportEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: ExportEvent) {}
}

/// Delay between page fetches: `base` plus a uniform random share of `jitter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleSettings {
    pub base: Duration,
    pub jitter: Duration,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            jitter: Duration::from_millis(300),
        }
    }
}

impl ThrottleSettings {
    pub fn none() -> Self {
        Self {
            base: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// What a finished pagination run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Every record in fetch order, duplicates included.
    pub records: Vec<QuestionRecord>,
    pub phase: Phase,
    pub pages_fetched: u32,
    pub title: Option<String>,
}

/// Executes the effects of the pagination state machine: fetches pages one
/// at a time, parses them, and waits between pages. Never retries a page.
pub struct PaginationDriver {
    fetcher: Arc<dyn Fetcher>,
    parser: QuestionParser,
    rules: SessionRules,
    throttle: ThrottleSettings,
    sink: Arc<dyn ProgressSink>,
}

impl PaginationDriver {
    pub fn new(fetcher: Arc<dyn Fetcher>, parser: QuestionParser) -> Self {
        Self {
            fetcher,
            parser,
            rules: SessionRules::default(),
            throttle: ThrottleSettings::default(),
            sink: Arc::new(NullProgressSink),
        }
    }

    pub fn with_rules(mut self, rules: SessionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottleSettings) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub async fn extract_all(&self, target: &ReviewTarget) -> ExtractionReport {
        quiz_info!("Starting quiz extraction from {}", target.page_url(0));
        let (mut session, effects) = update(ExtractionSession::new(self.rules.clone()), Msg::Start);
        let mut pending: VecDeque<Effect> = effects.into();
        let mut pages_fetched = 0;

        while let Some(effect) = pending.pop_front() {
            let msg = match effect {
                Effect::FetchPage { page } => {
                    pages_fetched += 1;
                    self.load_page(target, page).await
                }
                Effect::ParsePage { page, body } => {
                    let page_url = Url::parse(&target.page_url(page)).ok();
                    let result = self.parser.parse_page(&body, page_url.as_ref()).await;
                    self.sink.emit(ExportEvent::PageProcessed {
                        page,
                        records: result.records.len(),
                        signature: result.content_signature,
                    });
                    Msg::PageParsed { page, result }
                }
                Effect::Throttle => {
                    tokio::time::sleep(self.throttle.next_delay()).await;
                    continue;
                }
            };

            let page = session.page();
            let (next, effects) = update(session, msg);
            session = next;
            self.report_transition(&session, page);
            pending.extend(effects);
        }

        let phase = session.phase().clone();
        let title = session.title().map(str::to_string);
        let records = session.into_records();
        self.sink.emit(ExportEvent::Finished {
            pages: pages_fetched,
            records: records.len(),
            phase: phase.clone(),
        });

        ExtractionReport {
            records,
            phase,
            pages_fetched,
            title,
        }
    }

    async fn load_page(&self, target: &ReviewTarget, page: PageIndex) -> Msg {
        let url = target.page_url(page);
        quiz_info!("Processing page {page}...");
        self.sink.emit(ExportEvent::PageStarted {
            page,
            url: url.clone(),
        });

        let output = match self.fetcher.fetch(&url, FetchKind::Page).await {
            Ok(output) => output,
            Err(err) if err.is_not_found() => return Msg::PageMissing { page },
            Err(err) => {
                quiz_error!("Error on page {page}: {err}");
                return Msg::FetchFailed {
                    page,
                    reason: err.to_string(),
                };
            }
        };

        match decode_page(&output.bytes, output.metadata.content_type.as_deref()) {
            Ok(decoded) => Msg::PageLoaded {
                page,
                body: decoded.text,
            },
            Err(err) => {
                quiz_error!("Error on page {page}: {err}");
                Msg::FetchFailed {
                    page,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Logs the outcome of a message about `page`.
    fn report_transition(&self, session: &ExtractionSession, page: PageIndex) {
        match session.phase() {
            Phase::Done(Termination::NotFound) => quiz_info!("No more pages (404). Stopping."),
            Phase::Done(Termination::NoQuestionsMarker) | Phase::Done(Termination::EmptyBody) => {
                quiz_info!("No questions found on page {page}.")
            }
            Phase::Done(Termination::DuplicateThreshold) => {
                quiz_warn!(
                    "Detected duplicate content on page {page} ({}). Reached duplicate threshold, ending scrape.",
                    session.duplicate_count()
                );
                self.sink.emit(ExportEvent::DuplicatePage {
                    page,
                    repeats: session.duplicate_count(),
                });
            }
            Phase::Done(Termination::EmptyPage) => {
                quiz_warn!("Page {page} had no valid questions.")
            }
            Phase::Aborted { reason } => {
                quiz_warn!("Extraction aborted on page {page}: {reason}")
            }
            Phase::Fetching if session.page() > page => {
                if session.duplicate_count() > 0 {
                    quiz_warn!(
                        "Detected duplicate content on page {page} ({})",
                        session.duplicate_count()
                    );
                    self.sink.emit(ExportEvent::DuplicatePage {
                        page,
                        repeats: session.duplicate_count(),
                    });
                }
                quiz_info!(
                    "Saved questions from page {page} ({} collected so far)",
                    session.records().len()
                );
            }
            Phase::Idle | Phase::Fetching | Phase::Evaluating => {}
        }
    }
}
