//! Lexical helpers shared by the parser, validator and extractors.
//!
//! Every scan here is quote-aware: characters inside a `'...'` or `"..."`
//! literal are never treated as parentheses, separators or keywords.

use super::ast::LogicalOp;
use super::parser::ParseError;

/// Tracks whether a scan is currently inside a quoted literal.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct QuoteState {
    open: Option<char>,
}

impl QuoteState {
    /// Feeds one character and returns true when it is structural, i.e.
    /// outside any literal and not a quote delimiter itself.
    pub(crate) fn outside(&mut self, c: char) -> bool {
        match self.open {
            Some(quote) => {
                if c == quote {
                    self.open = None;
                }
                false
            }
            None if is_quote(c) => {
                self.open = Some(c);
                false
            }
            None => true,
        }
    }

    pub(crate) fn in_literal(&self) -> bool {
        self.open.is_some()
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Characters that may appear in a bare word (function names, identifiers,
/// keywords and unquoted parameters).
fn is_word_char(c: char) -> bool {
    !(c.is_whitespace() || c == '(' || c == ')' || c == ',' || is_quote(c))
}

fn keyword(word: &str) -> Option<&'static str> {
    if word.eq_ignore_ascii_case("and") {
        Some("AND")
    } else if word.eq_ignore_ascii_case("or") {
        Some("OR")
    } else if word.eq_ignore_ascii_case("not") {
        Some("NOT")
    } else {
        None
    }
}

/// Normalizes an expression for parsing.
///
/// Runs of whitespace outside literals collapse to a single space and the
/// result is trimmed. The keywords `and`, `or` and `not` are recognized as
/// whole words in any case and rewritten as `AND`, `OR`, `NOT` with exactly
/// one space on each side (none at the string edges). Literal content is
/// copied through untouched.
///
/// ```
/// use permission_expression_core::expression::normalize;
///
/// assert_eq!(
///     normalize("  hasRole('a')   and\tnot(hasRole('b'))  "),
///     "hasRole('a') AND NOT (hasRole('b'))"
/// );
/// ```
pub fn normalize(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut word = String::new();
    let mut pending_space = false;
    let mut quotes = QuoteState::default();

    for c in expression.chars() {
        let structural = quotes.outside(c);
        if structural && is_word_char(c) {
            word.push(c);
            continue;
        }

        flush_word(&mut out, &mut word, &mut pending_space);

        if structural && c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    flush_word(&mut out, &mut word, &mut pending_space);

    out.truncate(out.trim_end().len());
    out
}

fn flush_word(out: &mut String, word: &mut String, pending_space: &mut bool) {
    if word.is_empty() {
        return;
    }

    match keyword(word) {
        Some(canonical) => {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(canonical);
            *pending_space = true;
        }
        None => {
            if *pending_space && !out.is_empty() {
                out.push(' ');
            }
            *pending_space = false;
            out.push_str(word);
        }
    }
    word.clear();
}

/// Outcome of a parenthesis balance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParenBalance {
    Balanced,
    /// A `)` closed a group that was never opened.
    UnmatchedRight,
    /// This many `(` were never closed.
    UnmatchedLeft(usize),
    /// The text ends inside a quoted literal.
    UnterminatedLiteral,
}

pub(crate) fn paren_balance(s: &str) -> ParenBalance {
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();

    for c in s.chars() {
        if !quotes.outside(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return ParenBalance::UnmatchedRight;
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if quotes.in_literal() {
        ParenBalance::UnterminatedLiteral
    } else if depth > 0 {
        ParenBalance::UnmatchedLeft(depth)
    } else {
        ParenBalance::Balanced
    }
}

/// Returns the byte index of the `)` matching the `(` at `open`.
///
/// `open` must index a structural `(`.
pub(crate) fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();

    for (i, c) in s[open..].char_indices() {
        if !quotes.outside(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// A `name(args)` construct found in expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall<'a> {
    /// The identifier before the opening parenthesis.
    pub name: &'a str,
    /// The text between the parentheses, or `None` when the call is never
    /// closed.
    pub args: Option<&'a str>,
    /// Byte offset of `name`.
    pub start: usize,
}

/// Locates every `name(args)` construct in a single pass.
///
/// Keywords followed by a parenthesis (`NOT (...)`) are not calls. The
/// argument text of a call is not searched for further calls.
pub fn find_calls(s: &str) -> Vec<FunctionCall<'_>> {
    let mut calls = Vec::new();
    let mut quotes = QuoteState::default();
    let mut ident: Option<(usize, usize)> = None;
    let mut skip_until = 0usize;

    for (i, c) in s.char_indices() {
        if i < skip_until {
            continue;
        }
        if !quotes.outside(c) {
            ident = None;
            continue;
        }

        if c == '_' || c.is_ascii_alphanumeric() {
            ident = match ident {
                Some((start, end)) if end == i => Some((start, i + 1)),
                _ => Some((i, i + 1)),
            };
        } else if c == '(' {
            if let Some((start, end)) = ident.take() {
                let name = &s[start..end];
                let between_is_blank = s[end..i].trim().is_empty();
                let starts_like_ident = name.starts_with(|ch: char| ch == '_' || ch.is_ascii_alphabetic());
                if between_is_blank && starts_like_ident && keyword(name).is_none() {
                    match matching_paren(s, i) {
                        Some(close) => {
                            calls.push(FunctionCall {
                                name,
                                args: Some(&s[i + 1..close]),
                                start,
                            });
                            skip_until = close + 1;
                        }
                        None => {
                            calls.push(FunctionCall {
                                name,
                                args: None,
                                start,
                            });
                            break;
                        }
                    }
                }
            }
        } else if !c.is_whitespace() {
            ident = None;
        }
    }

    calls
}

/// Splits a function's argument text on commas outside quoted literals.
///
/// Each parameter is trimmed but keeps its quotes. Empty argument text
/// yields no parameters; a trailing empty parameter is dropped.
///
/// ```
/// use permission_expression_core::expression::split_parameters;
///
/// let params = split_parameters("'doc:edit', 'note', 'a, b'").unwrap();
/// assert_eq!(params, vec!["'doc:edit'", "'note'", "'a, b'"]);
/// ```
pub fn split_parameters(args: &str) -> Result<Vec<String>, ParseError> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut quotes = QuoteState::default();

    for c in args.chars() {
        if quotes.outside(c) && c == ',' {
            params.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }

    if quotes.in_literal() {
        return Err(ParseError::UnterminatedLiteral {
            text: args.trim().to_string(),
        });
    }

    let last = current.trim();
    if !last.is_empty() {
        params.push(last.to_string());
    }
    Ok(params)
}

/// Returns the first keyword appearing as a bare word outside literals.
pub(crate) fn bare_keyword(text: &str) -> Option<LogicalOp> {
    let mut quotes = QuoteState::default();
    let mut word = String::new();

    for c in text.chars().chain(std::iter::once(' ')) {
        if quotes.outside(c) && is_word_char(c) {
            word.push(c);
            continue;
        }
        if let Some(op) = keyword(&word).and_then(LogicalOp::from_keyword) {
            return Some(op);
        }
        word.clear();
    }
    None
}

/// Removes one pair of matching surrounding quotes, if present.
///
/// Bare identifiers are returned unchanged (trimmed).
pub fn strip_quotes(param: &str) -> &str {
    let p = param.trim();
    for quote in ['\'', '"'] {
        if p.len() >= 2 && p.starts_with(quote) && p.ends_with(quote) {
            return &p[1..p.len() - 1];
        }
    }
    p
}
