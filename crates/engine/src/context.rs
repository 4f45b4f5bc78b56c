//! Completion Context Analyzer
//!
//! Decides, from the text before the caret, which kind of completion is
//! valid at that point. This is a backward-looking heuristic over the last
//! line and last word, not a parser: it runs on every keystroke.
//!
//! Trigger priority (first match wins):
//!
//! 1. Markup only: the last line is one to three backticks -> code fence.
//! 2. Markup only: the last word is `type='` / `type="` -> chart type.
//! 3. Markup only: the last word is `server='` / `server="` -> server.
//! 4. Any known mode: the text ends with ` FROM ` (any case) -> table.
//!
//! Known misfires are accepted: a ` FROM ` inside a string literal or comment
//! still triggers table completion, and fenced code that happens to end in an
//! attribute literal still triggers attribute completion.

use crate::document::{byte_offset, DocumentMode};

const CHART_TYPE_TRIGGERS: &[&str] = &["type='", "type=\""];
const SERVER_TRIGGERS: &[&str] = &["server='", "server=\""];
const FROM_TRIGGER: &str = " from ";

/// The kind of completion a trigger opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    CodeFence,
    ChartTypeAttribute,
    ServerAttribute,
    TableAfterFrom,
}

impl TriggerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CodeFence => "code_fence",
            Self::ChartTypeAttribute => "chart_type",
            Self::ServerAttribute => "server",
            Self::TableAfterFrom => "table",
        }
    }
}

/// Result of classifying a caret position. Each trigger carries the text it
/// matched so sources can avoid re-inserting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    CodeFence { prefix: String },
    ChartTypeAttribute { prefix: String },
    ServerAttribute { prefix: String },
    TableAfterFrom,
    None,
}

impl CompletionContext {
    pub fn trigger(&self) -> Option<TriggerKind> {
        match self {
            Self::CodeFence { .. } => Some(TriggerKind::CodeFence),
            Self::ChartTypeAttribute { .. } => Some(TriggerKind::ChartTypeAttribute),
            Self::ServerAttribute { .. } => Some(TriggerKind::ServerAttribute),
            Self::TableAfterFrom => Some(TriggerKind::TableAfterFrom),
            Self::None => None,
        }
    }

    /// The matched trigger text. Empty for table and none.
    pub fn prefix(&self) -> &str {
        match self {
            Self::CodeFence { prefix }
            | Self::ChartTypeAttribute { prefix }
            | Self::ServerAttribute { prefix } => prefix,
            Self::TableAfterFrom | Self::None => "",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Classify the caret position `caret` (a char offset into `text`).
///
/// Offsets past the end are treated as the end. Never fails; anything
/// unrecognised is `CompletionContext::None`.
pub fn classify(text: &str, caret: usize, mode: DocumentMode) -> CompletionContext {
    if mode == DocumentMode::Unknown {
        return CompletionContext::None;
    }

    let pre = &text[..byte_offset(text, caret)];

    if mode == DocumentMode::Markup {
        if let Some(context) = markup_trigger(pre) {
            return context;
        }
    }

    if ends_with_from(pre) {
        return CompletionContext::TableAfterFrom;
    }

    CompletionContext::None
}

fn markup_trigger(pre: &str) -> Option<CompletionContext> {
    let last_line = after_last(pre, '\n');
    if is_fence_start(last_line) {
        return Some(CompletionContext::CodeFence { prefix: last_line.to_string() });
    }

    let last_word = after_last(pre, ' ');
    if CHART_TYPE_TRIGGERS.contains(&last_word) {
        return Some(CompletionContext::ChartTypeAttribute { prefix: last_word.to_string() });
    }
    if SERVER_TRIGGERS.contains(&last_word) {
        return Some(CompletionContext::ServerAttribute { prefix: last_word.to_string() });
    }

    None
}

/// Trimmed text after the last `delim`, or all of `s` trimmed.
fn after_last(s: &str, delim: char) -> &str {
    s.rsplit(delim).next().unwrap_or(s).trim()
}

fn is_fence_start(s: &str) -> bool {
    (1..=3).contains(&s.len()) && s.bytes().all(|b| b == b'`')
}

fn ends_with_from(pre: &str) -> bool {
    // Only ASCII letters upper-case to F, R, O, M, so comparing the last six
    // bytes ASCII-insensitively matches a full upper-case comparison.
    let n = FROM_TRIGGER.len();
    pre.len() >= n
        && pre.is_char_boundary(pre.len() - n)
        && pre[pre.len() - n..].eq_ignore_ascii_case(FROM_TRIGGER)
}
