//! Lint diagnostics backing the widget's lint flag.
//!
//! Structural checks only — bracket pairing and string termination. Full
//! semantic validation of the query language belongs to the language engine.

use crate::syntax::{closing_bracket, Span, TokenKind, TokenTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    pub message: String,
}

/// Structural diagnostics for one document snapshot.
pub fn lint(text: &str) -> Vec<Diagnostic> {
    let tree = TokenTree::scan(text);
    let mut diags = Vec::new();
    let mut open_stack: Vec<(char, Span)> = Vec::new();

    for token in tree.tokens() {
        match token.kind {
            TokenKind::Open => {
                let c = text[token.span.start..].chars().next().unwrap_or('(');
                open_stack.push((c, token.span));
            }
            TokenKind::Close => {
                let c = text[token.span.start..].chars().next().unwrap_or(')');
                match open_stack.pop() {
                    Some((open, _)) if closing_bracket(open) == Some(c) => {}
                    Some((open, span)) => diags.push(Diagnostic {
                        span: token.span,
                        severity: Severity::Error,
                        message: format!(
                            "mismatched bracket: `{c}` closes `{open}` opened at offset {}",
                            span.start
                        ),
                    }),
                    None => diags.push(Diagnostic {
                        span: token.span,
                        severity: Severity::Error,
                        message: format!("unmatched closing bracket `{c}`"),
                    }),
                }
            }
            TokenKind::UnterminatedStr => diags.push(Diagnostic {
                span: token.span,
                severity: Severity::Error,
                message: "unterminated string literal".to_string(),
            }),
            _ => {}
        }
    }

    for (open, span) in open_stack {
        diags.push(Diagnostic {
            span,
            severity: Severity::Error,
            message: format!("unclosed bracket `{open}`"),
        });
    }

    if let Some(last) = tree.tokens().last() {
        if last.kind == TokenKind::Operator {
            diags.push(Diagnostic {
                span: last.span,
                severity: Severity::Warning,
                message: "expression ends with an operator".to_string(),
            });
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_expression_is_clean() {
        assert!(lint("sum(rate(x[5m])) by (job)").is_empty());
        assert!(lint("").is_empty());
    }

    #[test]
    fn unclosed_bracket_reported_at_open_site() {
        let diags = lint("sum(rate(x");
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.severity == Severity::Error));
        assert!(diags[0].message.contains("unclosed"));
    }

    #[test]
    fn mismatched_pair_reported_at_close_site() {
        let diags = lint("sum(x]");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("mismatched"));
        assert_eq!(diags[0].span.start, 5);
    }

    #[test]
    fn stray_close_reported() {
        let diags = lint("x)");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("unmatched closing"));
    }

    #[test]
    fn trailing_operator_is_a_warning() {
        let diags = lint("up +");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn unterminated_string_reported() {
        let diags = lint("x{job=\"api");
        assert!(diags
            .iter()
            .any(|d| d.message.contains("unterminated string")));
    }
}
