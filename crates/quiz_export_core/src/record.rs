use std::fmt;

/// Number of characters taken from the prompt and from the joined options
/// when building a [`Fingerprint`].
pub const FINGERPRINT_PART_CHARS: usize = 50;

/// Deduplication key: truncated prompt followed by truncated `|`-joined options.
///
/// Two distinct questions that agree on both truncated parts collide. That is
/// an accepted limitation of the key, not a bug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(question_text: &str, options: &[String]) -> Self {
        let mut key: String = question_text.chars().take(FINGERPRINT_PART_CHARS).collect();
        let joined = options.join("|");
        key.extend(joined.chars().take(FINGERPRINT_PART_CHARS));
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse per-page change detector: the character length of the raw page body.
///
/// Two different pages of equal length compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentSignature(usize);

impl ContentSignature {
    pub fn of(page_markup: &str) -> Self {
        Self(page_markup.chars().count())
    }

    pub fn from_len(len: usize) -> Self {
        Self(len)
    }

    pub fn len(self) -> usize {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One extracted multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    question_text: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
    fingerprint: Fingerprint,
}

impl QuestionRecord {
    pub fn new(
        question_text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        let question_text = question_text.into();
        let fingerprint = Fingerprint::compute(&question_text, &options);
        Self {
            question_text,
            options,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            fingerprint,
        }
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

/// Parse result for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetchResult {
    pub records: Vec<QuestionRecord>,
    pub content_signature: ContentSignature,
    /// Text of the page's `<title>` element, when present and non-blank.
    pub title: Option<String>,
}
