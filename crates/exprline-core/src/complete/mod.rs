//! Completion sources for the expression editor.
//!
//! A source is anything implementing [`Complete`]; the session never knows
//! which one it holds. [`symbols::SymbolComplete`] is the language-aware
//! primary source and [`history::HistoryComplete`] decorates any source
//! with the user's past queries.

pub mod history;
pub mod symbols;


use crate::syntax::{Span, TokenTree};

pub use history::HistoryComplete;
pub use symbols::{RemoteConfig, SymbolComplete};

/// One completion request: a document snapshot, the cursor offset, and the
/// token tree over that snapshot. Immutable once built.
pub struct CompletionContext {
    text: String,
    pos: usize,
    tree: TokenTree,
}

impl CompletionContext {
    pub fn new(text: impl Into<String>, pos: usize) -> Self {
        let text = text.into();
        assert!(pos <= text.len(), "cursor offset past end of document");
        let tree = TokenTree::scan(&text);
        Self { text, pos, tree }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn tree(&self) -> &TokenTree {
        &self.tree
    }

    /// Leftward-resolved span at the cursor; the fallback replacement start
    /// when a source has no opinion of its own.
    pub fn resolve_left(&self) -> Span {
        self.tree.resolve_left(self.pos)
    }
}

/// One suggested replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text shown in the popup row.
    pub label: String,
    /// Provenance tag shown next to the label (`past query`, `function`, …).
    pub detail: Option<&'static str>,
    /// Text inserted on acceptance; may differ from `label`.
    pub insert: String,
    /// Long-form detail shown on demand, present only when `label` was cut
    /// short.
    pub info: Option<String>,
}

/// Token-shape filter deciding which typed prefixes re-narrow an existing
/// result without a fresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPattern {
    /// Letters, digits, underscore, colon.
    Identifier,
}

impl MatchPattern {
    pub fn matches(&self, s: &str) -> bool {
        match self {
            Self::Identifier => {
                !s.is_empty()
                    && s.chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
            }
        }
    }
}

/// Ranked result of one request. `options` order is significant; the first
/// entry is default-selected. Produced fresh per request, never cached here.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    /// Replacement span start.
    pub from: usize,
    /// Replacement span end (the cursor).
    pub to: usize,
    pub options: Vec<Candidate>,
    pub filter: MatchPattern,
}

#[derive(Debug, thiserror::Error)]
pub enum CompleteError {
    #[error("completion source failed: {0}")]
    Source(String),
}

/// A completion source. `Ok(None)` means "nothing to offer here"; errors
/// propagate to the caller untouched — the session layer decides what a
/// failed request means for the popup.
pub trait Complete: Send + Sync {
    fn complete(&self, ctx: &CompletionContext) -> Result<Option<CompletionResult>, CompleteError>;
}
