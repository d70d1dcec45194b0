#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use quiz_export_engine::{
    ExportEvent, FailureKind, FetchError, FetchKind, FetchMetadata, FetchOutput, Fetcher,
    ProgressSink,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(quiz_logging::initialize_for_tests);
}

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum Reply {
    Body { content_type: String, bytes: Vec<u8> },
    Status(u16),
    Network,
    Slow(Duration),
}

impl Reply {
    pub fn html(body: impl Into<String>) -> Self {
        Reply::Body {
            content_type: "text/html; charset=utf-8".to_string(),
            bytes: body.into().into_bytes(),
        }
    }

    pub fn image(content_type: &str, bytes: &[u8]) -> Self {
        Reply::Body {
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        }
    }
}

/// In-memory fetcher: page `n` of the script answers `page=n`, anything past
/// the end of the script is a 404. Other URLs are looked up in `extra`.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: Vec<Reply>,
    extra: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn pages(pages: Vec<Reply>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: &str, reply: Reply) -> Self {
        self.extra.insert(url.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|url| url.contains("page="))
            .collect()
    }

    fn reply_for(&self, url: &str) -> Reply {
        if let Some(reply) = self.extra.get(url) {
            return reply.clone();
        }
        let page = url
            .rsplit_once("page=")
            .and_then(|(_, n)| n.parse::<usize>().ok());
        match page {
            Some(n) => self.pages.get(n).cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, _kind: FetchKind) -> Result<FetchOutput, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.reply_for(url) {
            Reply::Body {
                content_type,
                bytes,
            } => Ok(FetchOutput {
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    redirect_count: 0,
                    content_type: Some(content_type),
                    byte_len: bytes.len() as u64,
                },
                bytes,
            }),
            Reply::Status(code) => Err(FetchError::new(
                FailureKind::HttpStatus(code),
                format!("status {code}"),
            )),
            Reply::Network => Err(FetchError::new(FailureKind::Network, "connection reset")),
            Reply::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Err(FetchError::new(FailureKind::Timeout, "too slow"))
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ExportEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ExportEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ExportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct Question<'a> {
    pub prompt: &'a str,
    pub options: &'a [&'a str],
    pub right_answer: &'a str,
    pub feedback: &'a str,
}

/// A review page shaped like the LMS markup: one `div.que.multichoice` per
/// question, plus an unrelated short-answer block that must be ignored.
/// `padding` varies the body length without changing the questions.
pub fn review_page(title: &str, questions: &[Question<'_>], padding: usize) -> String {
    let mut blocks = String::new();
    for (i, q) in questions.iter().enumerate() {
        let options: String = q
            .options
            .iter()
            .enumerate()
            .map(|(n, text)| {
                let label = (b'a' + n as u8) as char;
                format!(
                    r#"<div class="r{n}"><input type="radio" name="q{i}"><div class="d-flex"><span class="answernumber">{label}. </span><div class="flex-fill">{text}</div></div></div>"#
                )
            })
            .collect();
        blocks.push_str(&format!(
            r#"<div id="question-{i}" class="que multichoice deferredfeedback correct">
  <div class="content">
    <div class="formulation clearfix">
      <div class="qtext" id="qt{i}">{prompt}</div>
      <div class="ablock"><div class="answer">{options}</div></div>
    </div>
    <div class="outcome"><div class="feedback">
      <div class="generalfeedback">{feedback}</div>
      <div class="rightanswer">The correct answer is: {right}</div>
    </div></div>
  </div>
</div>
"#,
            prompt = q.prompt,
            feedback = q.feedback,
            right = q.right_answer,
        ));
    }
    format!(
        r#"<!DOCTYPE html><html><head><title>{title}</title></head><body>
<div class="que shortanswer"><div class="qtext">Type a word</div></div>
{blocks}<!--{pad}--></body></html>"#,
        pad = "x".repeat(padding)
    )
}

pub fn sample_questions() -> Vec<Question<'static>> {
    vec![
        Question {
            prompt: "<p>What is 2+2?</p>",
            options: &["3", "4"],
            right_answer: "4",
            feedback: "",
        },
        Question {
            prompt: "<p>Capital of <strong>France</strong>?</p>",
            options: &["Paris", "Lyon", "Nice"],
            right_answer: "Paris",
            feedback: "<p class=\"fb\">Paris has been the capital since 987.</p>",
        },
        Question {
            prompt: "Largest planet?",
            options: &["Jupiter", "Mars"],
            right_answer: "Jupiter",
            feedback: "",
        },
        Question {
            prompt: "Boiling point of water at sea level?",
            options: &["100 °C", "90 °C"],
            right_answer: "100 °C",
            feedback: "",
        },
        Question {
            prompt: "Which is a mammal?",
            options: &["Shark", "Dolphin"],
            right_answer: "Dolphin",
            feedback: "Dolphins breathe air.",
        },
    ]
}
