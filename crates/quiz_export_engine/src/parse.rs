use std::borrow::Cow;
use std::sync::LazyLock;

use futures_util::future::join_all;
use quiz_export_core::{ContentSignature, PageFetchResult, QuestionRecord};
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::clean::HtmlCleaner;
use crate::sanitize::{collapse_whitespace, escape_text};

struct PageSelectors {
    question: Selector,
    prompt: Selector,
    options: Selector,
    right_answer: Selector,
    feedback: Selector,
    title: Selector,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static SELECTORS: LazyLock<PageSelectors> = LazyLock::new(|| PageSelectors {
    question: selector("div.que.multichoice"),
    prompt: selector(".qtext"),
    options: selector(".answer > div"),
    right_answer: selector(".rightanswer"),
    feedback: selector(".generalfeedback"),
    title: selector("title"),
});

/// Label of an option whose numbering is not marked up as `.answernumber`.
static OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-d]\.\s*").expect("static regex is valid"));

const ANSWER_NUMBER_CLASS: &str = "answernumber";
static GRADING_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:Correct|Incorrect)\b").expect("static regex is valid"));

const RIGHT_ANSWER_LEAD_INS: &[&str] = &["The correct answer is:", "The correct answers are:"];

/// Unsanitized regions of one question block.
#[derive(Debug, Default)]
struct RawQuestion {
    prompt_html: String,
    options: Vec<RawOption>,
    right_answer_html: String,
    feedback_html: String,
}

/// Option text with any `.answernumber` label already left out.
#[derive(Debug)]
struct RawOption {
    text: String,
    numbered: bool,
}

#[derive(Debug, Default)]
struct RawPage {
    questions: Vec<RawQuestion>,
    title: Option<String>,
}

/// Finds the multiple-choice blocks of a review page and builds records
/// from them. Other question types are ignored. A block with missing regions
/// still yields a record, with those fields empty.
#[derive(Clone, Default)]
pub struct QuestionParser {
    cleaner: HtmlCleaner,
}

impl QuestionParser {
    pub fn new(cleaner: HtmlCleaner) -> Self {
        Self { cleaner }
    }

    /// `page_url` resolves relative image references when embedding.
    pub async fn parse_page(&self, page_markup: &str, page_url: Option<&Url>) -> PageFetchResult {
        let content_signature = ContentSignature::of(page_markup);
        let raw = locate_questions(page_markup);

        let mut records = Vec::with_capacity(raw.questions.len());
        for question in &raw.questions {
            records.push(self.build_record(question, page_url).await);
        }

        PageFetchResult {
            records,
            content_signature,
            title: raw.title,
        }
    }

    async fn build_record(&self, raw: &RawQuestion, base: Option<&Url>) -> QuestionRecord {
        let question_text = self.cleaner.clean(&raw.prompt_html, base).await;
        let options = join_all(
            raw.options
                .iter()
                .map(|option| self.clean_option(option, base)),
        )
        .await;
        let right_answer = self.cleaner.clean(&raw.right_answer_html, base).await;
        let explanation = self.cleaner.clean(&raw.feedback_html, base).await;

        QuestionRecord::new(
            question_text,
            options,
            strip_right_answer_lead_in(&right_answer),
            explanation,
        )
    }

    async fn clean_option(&self, option: &RawOption, base: Option<&Url>) -> String {
        let cleaned = self.cleaner.clean(&escape_text(&option.text), base).await;
        tidy_option(&cleaned, option.numbered)
    }
}

fn locate_questions(page_markup: &str) -> RawPage {
    let document = Html::parse_document(page_markup);
    let selectors = &*SELECTORS;

    let title = document
        .select(&selectors.title)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let questions = document
        .select(&selectors.question)
        .map(|block| RawQuestion {
            prompt_html: first_inner_html(block, &selectors.prompt),
            options: block.select(&selectors.options).map(raw_option).collect(),
            right_answer_html: first_inner_html(block, &selectors.right_answer),
            feedback_html: first_inner_html(block, &selectors.feedback),
        })
        .collect();

    RawPage { questions, title }
}

fn raw_option(option: ElementRef<'_>) -> RawOption {
    let mut text = String::new();
    let mut numbered = false;
    for node in option.descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let in_label = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| el.value().classes().any(|class| class == ANSWER_NUMBER_CLASS));
        if in_label {
            numbered = true;
        } else {
            text.push_str(chunk);
        }
    }
    RawOption { text, numbered }
}

fn first_inner_html(block: ElementRef<'_>, selector: &Selector) -> String {
    block
        .select(selector)
        .next()
        .map(|region| region.inner_html())
        .unwrap_or_default()
}

/// Drops the option label ("b. ") and the grading words the review page
/// injects next to each choice.
fn tidy_option(option: &str, numbered: bool) -> String {
    let unlabeled = if numbered {
        Cow::Borrowed(option)
    } else {
        OPTION_LABEL.replace(option, "")
    };
    let unmarked = GRADING_MARKS.replace_all(&unlabeled, "");
    collapse_whitespace(&unmarked)
}

fn strip_right_answer_lead_in(text: &str) -> String {
    let stripped = RIGHT_ANSWER_LEAD_INS
        .iter()
        .find(|lead_in| text.contains(*lead_in))
        .map(|lead_in| text.replacen(lead_in, "", 1))
        .unwrap_or_else(|| text.to_string());
    stripped.trim().to_string()
}
