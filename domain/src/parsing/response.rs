//! Structured-output recovery from free-form model text.
//!
//! Models routinely wrap JSON in prose or code fences. [`ResponseParser`]
//! runs an ordered chain of [`ParseStrategy`] tiers and stops at the first
//! one that yields a value of the expected shape:
//!
//! | Tier | Strategy | Input accepted |
//! |------|----------|----------------|
//! | 1 | [`ParseStrategy::Direct`] | the whole text is JSON |
//! | 2 | [`ParseStrategy::FencedBlock`] | ` ``` ` / ` ```json ` fenced block |
//! | 3 | [`ParseStrategy::BalancedBraces`] | first balanced `{...}` substring |
//!
//! Exhausting every tier yields [`Parsed::Unparsed`], an ordinary outcome
//! that callers map to their own degraded result.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*(?:json|JSON)?[ \t]*\r?\n?(.*?)```").expect("valid fence pattern")
});

/// Outcome of running the parse chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    /// A tier produced a value of the expected shape
    Parsed(T),
    /// No tier succeeded
    Unparsed,
}

impl<T> Parsed<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Parsed::Parsed(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Parsed::Parsed(value) => Some(value),
            Parsed::Unparsed => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Parsed(value) => Parsed::Parsed(f(value)),
            Parsed::Unparsed => Parsed::Unparsed,
        }
    }
}

/// One tier of the extraction chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Direct,
    FencedBlock,
    BalancedBraces,
}

impl ParseStrategy {
    /// Tiers in the order they are attempted.
    pub const CHAIN: [ParseStrategy; 3] = [
        ParseStrategy::Direct,
        ParseStrategy::FencedBlock,
        ParseStrategy::BalancedBraces,
    ];

    /// Candidate substrings this tier would try to parse.
    fn candidates(self, text: &str) -> Vec<&str> {
        match self {
            ParseStrategy::Direct => vec![text.trim()],
            ParseStrategy::FencedBlock => FENCED_BLOCK
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .collect(),
            ParseStrategy::BalancedBraces => first_balanced_object(text).into_iter().collect(),
        }
    }
}

/// Three-tier JSON recovery shared by every agent and the summarizer.
pub struct ResponseParser;

impl ResponseParser {
    /// Parse `text` into `T`, trying each tier in order.
    pub fn parse<T: DeserializeOwned>(text: &str) -> Parsed<T> {
        match Self::parse_with_strategy(text) {
            Some((value, _)) => Parsed::Parsed(value),
            None => Parsed::Unparsed,
        }
    }

    /// Parse into an untyped JSON value.
    pub fn parse_value(text: &str) -> Parsed<serde_json::Value> {
        Self::parse(text)
    }

    /// Parse and report which tier succeeded.
    pub fn parse_with_strategy<T: DeserializeOwned>(text: &str) -> Option<(T, ParseStrategy)> {
        ParseStrategy::CHAIN.into_iter().find_map(|strategy| {
            strategy
                .candidates(text)
                .into_iter()
                .filter(|candidate| !candidate.is_empty())
                .find_map(|candidate| serde_json::from_str::<T>(candidate).ok())
                .map(|value| (value, strategy))
        })
    }
}

/// Locate the first `{...}` substring whose braces balance.
///
/// Braces inside JSON string literals (including escaped quotes) are ignored.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
