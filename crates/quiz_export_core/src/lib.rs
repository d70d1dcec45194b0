//! Quiz export core: domain records and the pure pagination state machine.
mod dedupe;
mod effect;
mod msg;
mod record;
mod session;
mod target;
mod update;

pub use dedupe::dedupe_by_fingerprint;
pub use effect::Effect;
pub use msg::Msg;
pub use record::{ContentSignature, Fingerprint, PageFetchResult, QuestionRecord, FINGERPRINT_PART_CHARS};
pub use session::{ExtractionSession, PageIndex, Phase, SessionRules, Termination};
pub use target::{ReviewTarget, TargetError};
pub use update::update;
