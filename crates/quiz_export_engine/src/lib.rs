//! Quiz export engine: fetching, sanitizing, parsing and CSV output.
mod clean;
mod decode;
mod driver;
mod engine;
mod export;
mod fetch;
mod filename;
mod images;
mod parse;
mod persist;
mod sanitize;
mod types;

pub use clean::HtmlCleaner;
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use driver::{
    ExtractionReport, NullProgressSink, PaginationDriver, ProgressSink, ThrottleSettings,
};
pub use engine::{ExportEngine, ExportError, ExportSettings, ExportSummary};
pub use export::{
    back_field, encode_rows, finalize, front_field, CsvExport, BYTE_ORDER_MARK, FIELD_DELIMITER,
    NO_EXPLANATION_PLACEHOLDER, ROW_TERMINATOR,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, SessionCredentials};
pub use filename::{export_filename, DEFAULT_EXPORT_NAME};
pub use images::{image_sources, ImageEmbedder, ImageSource, DEFAULT_IMAGE_TIMEOUT};
pub use parse::QuestionParser;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sanitize::{
    collapse_whitespace, escape_text, ImageReplacements, Sanitizer, ALLOWED_TAGS,
    DENIED_ATTRIBUTES,
};
pub use types::{ExportEvent, FailureKind, FetchError, FetchKind, FetchMetadata, FetchOutput};
