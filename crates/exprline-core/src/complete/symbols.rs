//! Language-aware primary completion source.
//!
//! Completes metric names (seeded from the remote symbol cache) and the
//! built-in function/aggregation vocabulary at identifier positions.

use std::collections::HashSet;

use crate::settings::settings;
use crate::syntax::{TokenKind, AGGREGATIONS, FUNCTIONS};

use super::{Candidate, Complete, CompleteError, CompletionContext, CompletionResult, MatchPattern};

/// Remote-lookup configuration: the base address of the metrics backend and
/// the already-resolved symbol cache to seed completion with. The core
/// never fetches on its own; an injected fetcher (see the `remote` feature)
/// may refresh the cache.
#[derive(Debug, Clone, Default)]
pub struct RemoteConfig {
    pub url: String,
    pub initial_symbols: Vec<String>,
}

/// Prefix completion over the symbol cache plus the built-in vocabulary.
pub struct SymbolComplete {
    symbols: Vec<String>,
}

impl SymbolComplete {
    pub fn new(remote: &RemoteConfig) -> Self {
        Self {
            symbols: remote.initial_symbols.clone(),
        }
    }

    /// Replace the symbol cache, e.g. with a freshly fetched name list.
    pub fn set_symbols(&mut self, symbols: Vec<String>) {
        self.symbols = symbols;
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl Complete for SymbolComplete {
    fn complete(&self, ctx: &CompletionContext) -> Result<Option<CompletionResult>, CompleteError> {
        // Only identifier-shaped tokens touching the cursor are completed.
        let Some(token) = ctx.tree().token_at_left(ctx.pos()) else {
            return Ok(None);
        };
        if token.kind != TokenKind::Identifier {
            return Ok(None);
        }

        let from = token.span.start;
        let prefix = &ctx.text()[from..ctx.pos()];
        let max = settings().completion.max_symbol_results;

        let mut seen = HashSet::new();
        let mut options = Vec::new();

        for name in &self.symbols {
            if options.len() >= max {
                break;
            }
            if starts_with_ignore_case(name, prefix) && seen.insert(name.as_str()) {
                options.push(Candidate {
                    label: name.clone(),
                    detail: Some("metric"),
                    insert: name.clone(),
                    info: None,
                });
            }
        }
        for name in AGGREGATIONS {
            if starts_with_ignore_case(name, prefix) && seen.insert(name) {
                options.push(Candidate {
                    label: (*name).to_string(),
                    detail: Some("aggregation"),
                    insert: (*name).to_string(),
                    info: None,
                });
            }
        }
        for name in FUNCTIONS {
            if starts_with_ignore_case(name, prefix) && seen.insert(name) {
                options.push(Candidate {
                    label: (*name).to_string(),
                    detail: Some("function"),
                    insert: (*name).to_string(),
                    info: None,
                });
            }
        }

        if options.is_empty() {
            return Ok(None);
        }
        Ok(Some(CompletionResult {
            from,
            to: ctx.pos(),
            options,
            filter: MatchPattern::Identifier,
        }))
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name
            .chars()
            .zip(prefix.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}
