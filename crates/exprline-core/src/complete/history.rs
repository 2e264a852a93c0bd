//! Decorator that enriches any completion source with past queries.
//!
//! History entries only make sense as whole-query replacements, so they are
//! injected only when the replacement span starts at the very beginning of
//! the input; anywhere else the wrapped source's result passes through
//! untouched.

use tracing::debug;

use super::{Candidate, Complete, CompleteError, CompletionContext, CompletionResult, MatchPattern};

/// Labels longer than this are cut to [`LABEL_KEEP`] chars plus `...`.
const LABEL_MAX: usize = 80;
const LABEL_KEEP: usize = 76;

const HISTORY_TAG: &str = "past query";

pub struct HistoryComplete {
    inner: Box<dyn Complete>,
    /// Snapshot taken at construction; newest-last, caller-supplied order.
    history: Vec<String>,
}

impl HistoryComplete {
    pub fn new(inner: Box<dyn Complete>, history: Vec<String>) -> Self {
        Self { inner, history }
    }
}

impl Complete for HistoryComplete {
    fn complete(&self, ctx: &CompletionContext) -> Result<Option<CompletionResult>, CompleteError> {
        let primary = self.inner.complete(ctx)?;

        let start = match &primary {
            Some(res) => res.from,
            None => ctx.resolve_left().start,
        };
        if start != 0 {
            return Ok(primary);
        }

        debug!(entries = self.history.len(), "injecting past queries at expression start");
        let mut options: Vec<Candidate> = self.history.iter().map(|q| history_candidate(q)).collect();
        if let Some(res) = &primary {
            options.extend(res.options.iter().cloned());
        }

        Ok(Some(CompletionResult {
            from: start,
            to: ctx.pos(),
            options,
            filter: MatchPattern::Identifier,
        }))
    }
}

fn history_candidate(query: &str) -> Candidate {
    let truncated = query.chars().count() >= LABEL_MAX;
    let label = if truncated {
        let mut label: String = query.chars().take(LABEL_KEEP).collect();
        label.push_str("...");
        label
    } else {
        query.to_string()
    };
    Candidate {
        label,
        detail: Some(HISTORY_TAG),
        insert: query.to_string(),
        info: truncated.then(|| query.to_string()),
    }
}
