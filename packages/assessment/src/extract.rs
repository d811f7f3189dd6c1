//! Tolerant recovery of a JSON object from a vision model reply.
//!
//! The model is asked for bare JSON but routinely wraps it in prose or
//! markdown fences, leaves trailing commas, or omits values. Recovery is
//! purely syntactic: an ordered list of [`ExtractionStrategy`]s is tried
//! and the first one that yields a JSON object wins. Nothing here guesses
//! at the semantic content of a field.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// `,` followed by optional whitespace and a closing bracket or brace.
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));

/// A key with no value before the next comma: `"key": ,`.
static MISSING_VALUE_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*,").expect("valid regex"));

/// A key with no value at the end of a line: `"key":\n`.
///
/// This also matches a pretty-printed pair whose value sits on the next
/// line (`"key":\n  1`), which then fails to parse. Models emit the value
/// on the same line in practice, so such replies fall back.
static MISSING_VALUE_NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*\n").expect("valid regex"));

/// `,` followed by optional whitespace and a closing brace.
static TRAILING_OBJECT_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*\})").expect("valid regex"));

/// First fenced code block (optionally language-tagged) holding an object.
static FENCED_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]+)?\s*(\{.*?\})\s*```").expect("valid regex")
});

/// First brace-delimited span, tolerating one level of nested braces.
static EMBEDDED_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").expect("valid regex")
});

/// Returned when no strategy recovers a JSON object.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// The text has no recoverable object. The original text is kept for
    /// diagnostics.
    #[error("no recoverable JSON object in model response ({} bytes)", .raw.len())]
    NoStructure {
        /// The unmodified model reply.
        raw: String,
    },
}

/// One way of locating an object in the model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The whole reply (after repair) is the object.
    Direct,
    /// The object sits in a ```` ``` ```` fenced code block.
    FencedBlock,
    /// The object is embedded somewhere in surrounding prose.
    EmbeddedObject,
}

impl ExtractionStrategy {
    /// Strategies in the order they are attempted.
    pub const ORDER: &[Self] = &[Self::Direct, Self::FencedBlock, Self::EmbeddedObject];

    /// Attempts this strategy against the raw reply.
    #[must_use]
    pub fn apply(self, raw: &str) -> Option<Map<String, Value>> {
        match self {
            Self::Direct => parse_object(&repair(raw)),
            Self::FencedBlock => {
                let caps = FENCED_OBJECT_RE.captures(raw)?;
                parse_object(&repair(caps.get(1)?.as_str()))
            }
            Self::EmbeddedObject => {
                let found = EMBEDDED_OBJECT_RE.find(raw)?;
                parse_object(&repair(found.as_str()))
            }
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::FencedBlock => "fenced block",
            Self::EmbeddedObject => "embedded object",
        })
    }
}

/// A recovered object and the strategy that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub object: Map<String, Value>,
    pub strategy: ExtractionStrategy,
}

/// Recovers the first JSON object from `raw`.
///
/// # Errors
///
/// Returns [`ExtractionError::NoStructure`] if every strategy fails.
pub fn extract(raw: &str) -> Result<Extraction, ExtractionError> {
    ExtractionStrategy::ORDER
        .iter()
        .find_map(|&strategy| {
            strategy.apply(raw).map(|object| {
                log::debug!(
                    "Extracted {} fields from model response via {strategy} strategy",
                    object.len()
                );
                Extraction { object, strategy }
            })
        })
        .ok_or_else(|| ExtractionError::NoStructure {
            raw: raw.to_string(),
        })
}

/// Applies the syntactic repairs that cover the usual model mistakes.
#[must_use]
pub fn repair(text: &str) -> String {
    let text = TRAILING_COMMA_RE.replace_all(text, "$1");
    let text = MISSING_VALUE_COMMA_RE.replace_all(&text, ": null,");
    let text = MISSING_VALUE_NEWLINE_RE.replace_all(&text, ": null\n");
    TRAILING_OBJECT_COMMA_RE
        .replace_all(&text, "$1")
        .into_owned()
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            log::debug!("Parsed JSON but it is not an object: {other}");
            None
        }
        Err(e) => {
            log::trace!("JSON parse failed: {e}");
            None
        }
    }
}
