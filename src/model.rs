use std::fmt::Display;

use serde_json::{json, Value};

/// What the raw input is: text to transform, or the address of an article the
/// backend should fetch first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    PlainText,
    ArticleUrl,
}

impl ContentKind {
    pub const fn toggled(self) -> Self {
        match self {
            Self::PlainText => Self::ArticleUrl,
            Self::ArticleUrl => Self::PlainText,
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::ArticleUrl => write!(f, "url"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Paraphrase,
    Summarize,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paraphrase => write!(f, "paraphrase"),
            Self::Summarize => write!(f, "summarize"),
        }
    }
}

/// Route and body for one backend call. Derived from the (kind, operation)
/// pair and the raw input only.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub endpoint: &'static str,
    pub body: Value,
}

impl RequestSpec {
    pub fn resolve(kind: ContentKind, operation: Operation, raw_input: &str) -> Self {
        let endpoint = match (kind, operation) {
            (ContentKind::PlainText, Operation::Paraphrase) => "/paraphrase",
            (ContentKind::PlainText, Operation::Summarize) => "/summarize",
            (ContentKind::ArticleUrl, Operation::Paraphrase) => "/scrape_and_paraphrase",
            (ContentKind::ArticleUrl, Operation::Summarize) => "/scrape_and_summary",
        };
        let body = match kind {
            ContentKind::PlainText => json!({ "data": { "text": raw_input } }),
            ContentKind::ArticleUrl => json!({ "url": raw_input }),
        };
        Self { endpoint, body }
    }
}
