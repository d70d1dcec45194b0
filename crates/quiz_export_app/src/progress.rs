use quiz_export_core::Phase;
use quiz_export_engine::{ExportEvent, ProgressSink};
use quiz_logging::{quiz_debug, quiz_info};

/// Reports export progress through the log.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: ExportEvent) {
        match event {
            ExportEvent::PageStarted { page, url } => quiz_debug!("Fetching page {page}: {url}"),
            ExportEvent::PageProcessed {
                page,
                records,
                signature,
            } => quiz_info!(
                "Page {page}: {records} questions ({} chars)",
                signature.len()
            ),
            ExportEvent::DuplicatePage { page, repeats } => {
                quiz_debug!("Page {page} repeats the previous page ({repeats} in a row)")
            }
            ExportEvent::Finished {
                pages,
                records,
                phase,
            } => match phase {
                Phase::Aborted { reason } => {
                    quiz_info!("Stopped after {pages} pages with {records} questions: {reason}")
                }
                phase => quiz_info!("Finished {pages} pages with {records} questions ({phase:?})"),
            },
        }
    }
}
