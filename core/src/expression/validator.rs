//! Syntax validation that reports problems instead of failing.

use super::ast::{FunctionKind, LogicalOp};
use super::parser;
use super::tokenizer::{self, ParenBalance, QuoteState};

/// Errors and warnings collected by [`validate`].
///
/// Errors make the expression invalid. Warnings flag rules that parse but
/// probably do not do what their author meant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ExpressionValidationResult {
    /// Creates an empty (valid) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Records a warning.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// True when no error was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Problems that make the expression invalid.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Problems that do not stop the expression from parsing.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consumes the result, keeping only the errors.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Checks an expression and collects every problem found.
///
/// Checks, in order:
/// 1. parentheses balance (an unmatched `)` and unclosed `(` are reported
///    separately);
/// 2. each `name(args)` uses a known function and its arguments split
///    cleanly, with arity mismatches reported as warnings;
/// 3. each `AND`/`OR` has an operand on both sides and each `NOT` has one
///    after it and none directly before it.
///
/// When none of these find an error the expression is parsed as a final
/// check, so a valid result means [`parse`](super::parse) succeeds.
///
/// Never fails.
///
/// ```
/// use permission_expression_core::validate;
///
/// assert!(validate("hasRole('X')").is_valid());
/// assert!(!validate("AND hasRole('X')").is_valid());
/// ```
pub fn validate(expression: &str) -> ExpressionValidationResult {
    let mut result = ExpressionValidationResult::new();

    let normalized = tokenizer::normalize(expression);
    if normalized.is_empty() {
        result.add_error("expression must not be empty");
        return result;
    }

    validate_parentheses(&normalized, &mut result);
    validate_functions(&normalized, &mut result);
    validate_operators(&normalized, &mut result);

    if result.is_valid() {
        if let Err(err) = parser::parse(expression) {
            result.add_error(format!("failed to parse expression: {}", err));
        }
    }

    result
}

fn validate_parentheses(expression: &str, result: &mut ExpressionValidationResult) {
    match tokenizer::paren_balance(expression) {
        ParenBalance::Balanced => {}
        ParenBalance::UnmatchedRight => {
            result.add_error("unmatched right parenthesis ')'");
        }
        ParenBalance::UnmatchedLeft(count) => {
            result.add_error(format!("unmatched left parenthesis '(' ({} unclosed)", count));
        }
        ParenBalance::UnterminatedLiteral => {
            result.add_error("unterminated quoted literal");
        }
    }
}

fn validate_functions(expression: &str, result: &mut ExpressionValidationResult) {
    for call in tokenizer::find_calls(expression) {
        let function = match FunctionKind::from_name(call.name) {
            Some(function) => function,
            None => {
                result.add_error(format!("unknown function '{}'", call.name));
                continue;
            }
        };

        // an unclosed call is already reported as a parenthesis error
        let args = match call.args {
            Some(args) => args,
            None => continue,
        };

        let params = match tokenizer::split_parameters(args) {
            Ok(params) => params,
            Err(_) => {
                result.add_error(format!(
                    "malformed arguments in {}({}): unterminated quoted literal",
                    call.name, args
                ));
                continue;
            }
        };

        let arity = function.arity();
        if params.len() < arity {
            result.add_warning(format!(
                "{} expects {} parameter(s) but got {}; the rule always evaluates to false",
                function,
                arity,
                params.len()
            ));
        } else if params.len() > arity {
            result.add_warning(format!(
                "{} expects {} parameter(s) but got {}; extra parameters are ignored",
                function,
                arity,
                params.len()
            ));
        }
        if params.iter().any(|p| p.is_empty()) {
            result.add_warning(format!("empty parameter in {}({})", function, args));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Op(LogicalOp),
    Operand,
}

fn tokens(expression: &str) -> Vec<Token> {
    fn flush(word: &mut String, out: &mut Vec<Token>) {
        if !word.is_empty() {
            out.push(LogicalOp::from_keyword(word).map_or(Token::Operand, Token::Op));
            word.clear();
        }
    }

    let mut out = Vec::new();
    let mut word = String::new();
    let mut quotes = QuoteState::default();

    for c in expression.chars() {
        if !quotes.outside(c) {
            word.push(c);
            continue;
        }
        match c {
            '(' | ')' => {
                flush(&mut word, &mut out);
                out.push(if c == '(' { Token::Open } else { Token::Close });
            }
            _ if c.is_whitespace() => flush(&mut word, &mut out),
            _ => word.push(c),
        }
    }
    flush(&mut word, &mut out);
    out
}

fn validate_operators(expression: &str, result: &mut ExpressionValidationResult) {
    let tokens = tokens(expression);

    for (i, token) in tokens.iter().enumerate() {
        let op = match token {
            Token::Op(op) => *op,
            _ => continue,
        };
        let prev = i.checked_sub(1).and_then(|p| tokens.get(p));
        let next = tokens.get(i + 1);
        let has_right = matches!(
            next,
            Some(Token::Operand | Token::Open | Token::Op(LogicalOp::Not))
        );

        match op {
            LogicalOp::And | LogicalOp::Or => {
                if !matches!(prev, Some(Token::Operand | Token::Close)) {
                    result.add_error(format!("operator {} is missing its left operand", op));
                }
                if !has_right {
                    result.add_error(format!("operator {} is missing its right operand", op));
                }
            }
            LogicalOp::Not => {
                if matches!(prev, Some(Token::Operand | Token::Close)) {
                    result.add_error("operator NOT cannot directly follow an operand");
                }
                if !has_right {
                    result.add_error("operator NOT is missing its operand");
                }
            }
        }
    }
}
