//! Permission expression parser.
//!
//! Parses by recursive splitting: a (normalized) expression is split at its
//! lowest-precedence operator outside any parentheses, and each side is
//! parsed the same way until only permission function calls remain.
//!
//! Precedence, lowest first: `OR`, `AND`, `NOT`. Within one level the
//! leftmost operator is the split point, so `A AND B AND C` groups as
//! `A AND (B AND C)`. AND and OR are associative, so the grouping never
//! changes the evaluated result.

use std::collections::BTreeSet;

use derive_more::{Display, Error};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::ast::{ExpressionNode, FunctionKind, LogicalOp};
use super::context::PermissionContext;
use super::evaluator;
use super::extract;
use super::tokenizer::{self, ParenBalance, QuoteState};

/// Deepest nesting of groups and operators `parse` accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

lazy_static! {
    static ref CALL_HEAD: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap();
}

/// Error type for expression parsing.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The expression is empty or whitespace only.
    #[display("empty expression")]
    Empty,

    /// Parentheses outside literals do not balance.
    #[display("unbalanced parentheses")]
    UnbalancedParentheses,

    /// A quoted literal is never closed.
    #[display("unterminated quoted literal in '{text}'")]
    UnterminatedLiteral {
        /// The text containing the open literal
        text: String,
    },

    /// A `()` group with nothing inside.
    #[display("empty parenthesized group")]
    EmptyGroup,

    /// An operator is missing an operand, or `NOT` follows an operand.
    #[display("misplaced operator {operator}")]
    MisplacedOperator {
        /// The offending operator
        operator: LogicalOp,
    },

    /// Text that should be a single `name(args)` call is not one.
    #[display("invalid function call: '{call}'")]
    InvalidFunctionCall {
        /// The text that failed to match
        call: String,
    },

    /// A well-formed call to a function that is not one of the four known.
    #[display("unknown function: '{name}'")]
    UnknownFunction {
        /// The unrecognized function name
        name: String,
    },

    /// Groups and operators nest deeper than [`MAX_NESTING_DEPTH`].
    #[display("expression nests deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting limit that was exceeded
        limit: usize,
    },

    /// Strict mode only: the validator rejected the expression.
    #[display("invalid expression: {}", errors.join("; "))]
    Validation {
        /// Validator error messages
        errors: Vec<String>,
    },
}

/// Parses an expression into an AST.
///
/// The input is normalized first (see [`normalize`](super::normalize)), so
/// keywords are case-insensitive and whitespace is free-form.
///
/// Keywords may not appear unquoted inside a call's arguments:
/// `hasRole(or)` fails with [`ParseError::MisplacedOperator`], while
/// `hasRole('or')` passes the literal through.
///
/// # Errors
/// Fails fast with the first problem found; malformed input is never
/// repaired.
pub fn parse(expression: &str) -> Result<ExpressionNode, ParseError> {
    let normalized = tokenizer::normalize(expression);
    if normalized.is_empty() {
        return Err(ParseError::Empty);
    }

    match tokenizer::paren_balance(&normalized) {
        ParenBalance::Balanced => {}
        ParenBalance::UnterminatedLiteral => {
            return Err(ParseError::UnterminatedLiteral { text: normalized });
        }
        ParenBalance::UnmatchedLeft(_) | ParenBalance::UnmatchedRight => {
            return Err(ParseError::UnbalancedParentheses);
        }
    }

    let node = parse_recursive(&normalized, 0)?;
    debug!(
        "parsed permission expression '{}' ({} nodes)",
        normalized,
        node.node_count()
    );
    Ok(node)
}

fn parse_recursive(s: &str, depth: usize) -> Result<ExpressionNode, ParseError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::EmptyGroup);
    }

    if let Some(inner) = strip_outer_parens(s) {
        return parse_recursive(inner, depth + 1);
    }

    let split = match find_split(s) {
        Some(split) => split,
        None => return parse_function_call(s),
    };

    let left = s[..split.position].trim();
    let right = s[split.position + split.op.keyword().len()..].trim();
    let misplaced = ParseError::MisplacedOperator { operator: split.op };

    match split.op {
        LogicalOp::Not => {
            if !left.is_empty() || right.is_empty() {
                return Err(misplaced);
            }
            Ok(ExpressionNode::not(parse_recursive(right, depth + 1)?))
        }
        LogicalOp::And | LogicalOp::Or => {
            if left.is_empty() || right.is_empty() {
                return Err(misplaced);
            }
            let left = parse_recursive(left, depth + 1)?;
            let right = parse_recursive(right, depth + 1)?;
            Ok(if split.op == LogicalOp::And {
                ExpressionNode::and(left, right)
            } else {
                ExpressionNode::or(left, right)
            })
        }
    }
}

/// Returns the interior when `s` is one parenthesized group, i.e. the `(`
/// at the start is matched by the `)` at the very end.
fn strip_outer_parens(s: &str) -> Option<&str> {
    if !s.starts_with('(') || !s.ends_with(')') {
        return None;
    }
    match tokenizer::matching_paren(s, 0) {
        Some(close) if close == s.len() - 1 => Some(&s[1..close]),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    op: LogicalOp,
    position: usize,
}

/// Finds the leftmost depth-0 operator of the lowest precedence present.
fn find_split(s: &str) -> Option<Split> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();
    let mut first_or = None;
    let mut first_and = None;
    let mut first_not = None;

    for (i, c) in s.char_indices() {
        if !quotes.outside(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && (i == 0 || bytes[i - 1] == b' ') => {
                let (slot, op) = match c {
                    'O' => (&mut first_or, LogicalOp::Or),
                    'A' => (&mut first_and, LogicalOp::And),
                    'N' => (&mut first_not, LogicalOp::Not),
                    _ => continue,
                };
                if slot.is_none() && is_keyword_at(s, i, op) {
                    *slot = Some(i);
                }
                // OR binds loosest, nothing later can beat the first one
                if first_or.is_some() {
                    break;
                }
            }
            _ => {}
        }
    }

    first_or
        .map(|position| Split {
            op: LogicalOp::Or,
            position,
        })
        .or_else(|| {
            first_and.map(|position| Split {
                op: LogicalOp::And,
                position,
            })
        })
        .or_else(|| {
            first_not.map(|position| Split {
                op: LogicalOp::Not,
                position,
            })
        })
}

/// True when `op`'s keyword starts at `i` and ends at a space or the end.
fn is_keyword_at(s: &str, i: usize, op: LogicalOp) -> bool {
    let kw = op.keyword();
    s[i..].starts_with(kw) && s[i + kw.len()..].chars().next().map_or(true, |n| n == ' ')
}

/// Parses `s` as exactly one `name(args)` call.
fn parse_function_call(s: &str) -> Result<ExpressionNode, ParseError> {
    let invalid = || ParseError::InvalidFunctionCall {
        call: s.to_string(),
    };

    let head = CALL_HEAD.captures(s).ok_or_else(invalid)?;
    let name = head.get(1).map(|m| m.as_str()).ok_or_else(invalid)?;
    let open = head.get(0).map(|m| m.end() - 1).ok_or_else(invalid)?;

    if tokenizer::matching_paren(s, open) != Some(s.len() - 1) {
        return Err(invalid());
    }

    let function = FunctionKind::from_name(name).ok_or_else(|| ParseError::UnknownFunction {
        name: name.to_string(),
    })?;
    let parameters = tokenizer::split_parameters(&s[open + 1..s.len() - 1])?;
    if let Some(operator) = parameters.iter().find_map(|p| tokenizer::bare_keyword(p)) {
        return Err(ParseError::MisplacedOperator { operator });
    }

    Ok(ExpressionNode::PermissionFunction {
        function,
        parameters,
    })
}

/// A parsed permission expression together with its source text.
///
/// # Example
/// ```
/// use permission_expression_core::{InMemoryPermissionContext, PermissionExpression};
///
/// let expr = PermissionExpression::parse("hasRole('ADMIN') OR hasPermission('doc:read')").unwrap();
/// let ctx = InMemoryPermissionContext::new().permission("doc:read");
///
/// assert!(expr.evaluate(&ctx));
/// assert!(expr.roles().contains("ADMIN"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionExpression {
    /// The original expression string
    source: String,
    /// The parsed AST
    ast: ExpressionNode,
}

impl PermissionExpression {
    /// Parses a permission expression string.
    pub fn parse(expr: &str) -> Result<Self, ParseError> {
        let ast = parse(expr)?;
        Ok(PermissionExpression {
            source: expr.to_string(),
            ast,
        })
    }

    /// Returns the original expression string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns a reference to the parsed AST.
    pub fn ast(&self) -> &ExpressionNode {
        &self.ast
    }

    /// Consumes self and returns the AST.
    pub fn into_ast(self) -> ExpressionNode {
        self.ast
    }

    /// Evaluates the expression against `ctx`.
    pub fn evaluate(&self, ctx: &dyn PermissionContext) -> bool {
        evaluator::evaluate(&self.ast, ctx)
    }

    /// Permission names referenced by the source text.
    pub fn permissions(&self) -> BTreeSet<String> {
        extract::extract_permissions(&self.source)
    }

    /// Role names referenced by the source text.
    pub fn roles(&self) -> BTreeSet<String> {
        extract::extract_roles(&self.source)
    }
}

impl std::str::FromStr for PermissionExpression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionExpression::parse(s)
    }
}
