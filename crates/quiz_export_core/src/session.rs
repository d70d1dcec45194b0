use crate::{ContentSignature, QuestionRecord};

pub type PageIndex = u32;

/// Tunables of the pagination state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRules {
    /// Consecutive pages with an unchanged signature that end the run.
    pub duplicate_threshold: u32,
    /// Literal body text the site renders when a page holds no questions.
    pub no_questions_marker: String,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            duplicate_threshold: 2,
            no_questions_marker: "No questions found".to_string(),
        }
    }
}

impl SessionRules {
    /// An empty marker never matches.
    pub fn signals_no_questions(&self, body: &str) -> bool {
        !self.no_questions_marker.is_empty() && body.contains(self.no_questions_marker.as_str())
    }

    /// Repeats that end the run; at least one, so the first page is always kept.
    pub fn effective_duplicate_threshold(&self) -> u32 {
        self.duplicate_threshold.max(1)
    }
}

/// Why pagination stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The server answered 404 for the next page.
    NotFound,
    /// The body contained the "no questions" marker.
    NoQuestionsMarker,
    /// The body was empty or whitespace only.
    EmptyBody,
    /// The site kept repeating the same page.
    DuplicateThreshold,
    /// The page parsed to zero questions.
    EmptyPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Evaluating,
    Done(Termination),
    Aborted { reason: String },
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done(_) | Phase::Aborted { .. })
    }
}

/// In-memory state of one extraction run. Nothing here outlives the run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionSession {
    rules: SessionRules,
    phase: Phase,
    page: PageIndex,
    duplicate_count: u32,
    previous_signature: Option<ContentSignature>,
    records: Vec<QuestionRecord>,
    title: Option<String>,
}

impl ExtractionSession {
    pub fn new(rules: SessionRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Index of the page currently being fetched or evaluated.
    pub fn page(&self) -> PageIndex {
        self.page
    }

    pub fn duplicate_count(&self) -> u32 {
        self.duplicate_count
    }

    /// All records accumulated so far, in fetch order.
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// First non-blank page title seen during the run.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Records the page signature and returns the updated duplicate count.
    pub(crate) fn observe_signature(&mut self, signature: ContentSignature) -> u32 {
        if self.previous_signature == Some(signature) {
            self.duplicate_count += 1;
        } else {
            self.duplicate_count = 0;
        }
        self.previous_signature = Some(signature);
        self.duplicate_count
    }

    pub(crate) fn remember_title(&mut self, title: Option<String>) {
        if self.title.is_none() {
            self.title = title;
        }
    }

    pub(crate) fn accept_page(&mut self, records: Vec<QuestionRecord>) {
        self.records.extend(records);
        self.page += 1;
    }
}
