//! Token-level scan of query expressions.
//!
//! The widget never parses the query language in full — the language engine
//! behind the completion source owns that. It needs just enough positional
//! structure to anchor completions and paint tokens: a flat list of
//! classified spans with leftward position resolution.

/// Aggregation operators of the query language.
pub const AGGREGATIONS: &[&str] = &[
    "avg", "bottomk", "count", "count_values", "group", "max", "min",
    "quantile", "stddev", "stdvar", "sum", "topk",
];

/// Built-in functions of the query language.
pub const FUNCTIONS: &[&str] = &[
    "abs", "absent", "ceil", "changes", "clamp_max", "clamp_min", "day_of_month",
    "day_of_week", "delta", "deriv", "exp", "floor", "histogram_quantile",
    "increase", "irate", "label_join", "label_replace", "ln", "log10", "log2",
    "predict_linear", "rate", "resets", "round", "scalar", "sort", "sort_desc",
    "sqrt", "time", "timestamp", "vector",
];

pub fn is_aggregation(name: &str) -> bool {
    AGGREGATIONS.contains(&name)
}

pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Byte range `[start, end)` in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Metric/function/label name; may contain `:` (recording rules).
    Identifier,
    Number,
    /// Number with a range-duration suffix, e.g. `5m` or `100ms`.
    Duration,
    Str,
    /// Unterminated string literal, kept distinct for the linter.
    UnterminatedStr,
    Operator,
    Comma,
    Open,
    Close,
    Comment,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Flat positional token list over one document snapshot.
pub struct TokenTree {
    tokens: Vec<Token>,
}

impl TokenTree {
    pub fn scan(text: &str) -> Self {
        Self {
            tokens: scan(text),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token covering `pos` with leftward bias: prefers the token ending at
    /// `pos` over one starting there.
    pub fn token_at_left(&self, pos: usize) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.span.start < pos && pos <= t.span.end)
    }

    /// Leftward position resolution for completion anchoring: the span of
    /// the token covering `pos` (left-biased), else the span of the nearest
    /// token ending before `pos`, else the empty span at offset 0.
    pub fn resolve_left(&self, pos: usize) -> Span {
        if let Some(t) = self.token_at_left(pos) {
            return t.span;
        }
        self.tokens
            .iter()
            .rev()
            .find(|t| t.span.end <= pos)
            .map(|t| t.span)
            .unwrap_or_else(|| Span::empty(0))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

const DURATION_UNITS: &[&str] = &["ms", "s", "m", "h", "d", "w", "y"];

fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '#' {
            let end = text[start..]
                .find('\n')
                .map(|off| start + off)
                .unwrap_or(text.len());
            push_and_skip(&mut tokens, &mut chars, TokenKind::Comment, start, end);
            continue;
        }

        if c == '"' || c == '\'' {
            let (end, terminated) = scan_string(text, start, c);
            let kind = if terminated {
                TokenKind::Str
            } else {
                TokenKind::UnterminatedStr
            };
            push_and_skip(&mut tokens, &mut chars, kind, start, end);
            continue;
        }

        if c.is_ascii_digit() {
            let mut end = start;
            let mut seen_dot = false;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() || (d == '.' && !seen_dot) {
                    seen_dot |= d == '.';
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            // A unit suffix turns the number into a range duration.
            let rest = &text[end..];
            let unit = DURATION_UNITS.iter().find(|u| {
                rest.starts_with(**u)
                    && !rest[u.len()..]
                        .chars()
                        .next()
                        .is_some_and(is_ident_char)
            });
            let kind = if let Some(u) = unit {
                for _ in 0..u.len() {
                    chars.next();
                }
                end += u.len();
                TokenKind::Duration
            } else {
                TokenKind::Number
            };
            tokens.push(Token {
                kind,
                span: Span { start, end },
            });
            continue;
        }

        if is_ident_start(c) {
            let mut end = start;
            while let Some(&(i, d)) = chars.peek() {
                if is_ident_char(d) {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Identifier,
                span: Span { start, end },
            });
            continue;
        }

        let kind = match c {
            '(' | '[' | '{' => TokenKind::Open,
            ')' | ']' | '}' => TokenKind::Close,
            ',' => TokenKind::Comma,
            _ => TokenKind::Operator,
        };
        let mut end = start + c.len_utf8();
        chars.next();
        // Two-char comparison/match operators.
        if kind == TokenKind::Operator && matches!(c, '=' | '!' | '<' | '>') {
            if let Some(&(i, d)) = chars.peek() {
                if d == '=' || (d == '~' && matches!(c, '=' | '!')) {
                    end = i + d.len_utf8();
                    chars.next();
                }
            }
        }
        tokens.push(Token {
            kind,
            span: Span { start, end },
        });
    }

    tokens
}

fn scan_string(text: &str, start: usize, quote: char) -> (usize, bool) {
    let mut escaped = false;
    for (i, c) in text[start..].char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return (start + i + c.len_utf8(), true);
        } else if c == '\n' {
            return (start + i, false);
        }
    }
    (text.len(), false)
}

fn push_and_skip(
    tokens: &mut Vec<Token>,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    kind: TokenKind,
    start: usize,
    end: usize,
) {
    while let Some(&(i, _)) = chars.peek() {
        if i < end {
            chars.next();
        } else {
            break;
        }
    }
    tokens.push(Token {
        kind,
        span: Span { start, end },
    });
}

/// The closing bracket pairing with `open`.
pub fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Display classification of a token for the highlighting decoration set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightClass {
    MetricName,
    FunctionName,
    Aggregation,
    Number,
    Duration,
    String,
    Operator,
    Bracket,
    Comment,
}

/// Classify every token of `text` for decoration. Identifier tokens are
/// split into function / aggregation / metric by the built-in vocabulary.
pub fn highlight(text: &str) -> Vec<(Span, HighlightClass)> {
    TokenTree::scan(text)
        .tokens()
        .iter()
        .map(|t| {
            let class = match t.kind {
                TokenKind::Identifier => {
                    let name = &text[t.span.start..t.span.end];
                    if is_aggregation(name) {
                        HighlightClass::Aggregation
                    } else if is_function(name) {
                        HighlightClass::FunctionName
                    } else {
                        HighlightClass::MetricName
                    }
                }
                TokenKind::Number => HighlightClass::Number,
                TokenKind::Duration => HighlightClass::Duration,
                TokenKind::Str | TokenKind::UnterminatedStr => HighlightClass::String,
                TokenKind::Operator | TokenKind::Comma => HighlightClass::Operator,
                TokenKind::Open | TokenKind::Close => HighlightClass::Bracket,
                TokenKind::Comment => HighlightClass::Comment,
            };
            (t.span, class)
        })
        .collect()
}
