//! Expression evaluator.
//!
//! Evaluates a permission expression AST against a `PermissionContext`.

use std::sync::Arc;

use log::{trace, warn};

use super::ast::{ExpressionNode, FunctionKind, LogicalOp};
use super::cache::ExpressionCache;
use super::config::ExpressionConfig;
use super::context::PermissionContext;
use super::parser::{self, ParseError};
use super::tokenizer::strip_quotes;
use super::validator::{self, ExpressionValidationResult};

/// Evaluates `node` against `ctx`.
///
/// `AND` evaluates its left side first and skips the right side when the
/// left is false; `OR` skips the right side when the left is true. Context
/// lookups may be expensive, so this order is part of the contract.
///
/// Never fails. A node that cannot be evaluated as written (a function
/// with fewer parameters than it needs, or an operator missing an operand)
/// evaluates to `false`: denying is always an acceptable fallback, granting
/// on ambiguity is not.
pub fn evaluate(node: &ExpressionNode, ctx: &dyn PermissionContext) -> bool {
    match node {
        ExpressionNode::PermissionFunction {
            function,
            parameters,
        } => evaluate_function(*function, parameters, ctx),

        ExpressionNode::LogicalOperator { op, left, right } => match op {
            LogicalOp::And => operand(left, ctx) && operand(right, ctx),
            LogicalOp::Or => operand(left, ctx) || operand(right, ctx),
            LogicalOp::Not => match right {
                Some(inner) => !evaluate(inner, ctx),
                None => {
                    warn!("NOT node without an operand, denying");
                    false
                }
            },
        },
    }
}

fn operand(node: &Option<Box<ExpressionNode>>, ctx: &dyn PermissionContext) -> bool {
    match node {
        Some(node) => evaluate(node, ctx),
        None => {
            warn!("logical operator missing an operand, treating it as false");
            false
        }
    }
}

fn evaluate_function(
    function: FunctionKind,
    parameters: &[String],
    ctx: &dyn PermissionContext,
) -> bool {
    if parameters.len() < function.arity() {
        warn!(
            "{} expects {} parameter(s) but got {}, denying",
            function,
            function.arity(),
            parameters.len()
        );
        return false;
    }

    let arg = |i: usize| strip_quotes(&parameters[i]);
    trace!("evaluating {}({})", function, parameters.join(", "));

    match function {
        FunctionKind::HasPermission => ctx.has_permission(arg(0)),
        FunctionKind::HasRole => ctx.has_role(arg(0)),
        FunctionKind::HasResourcePermission => ctx.has_resource_permission(arg(0), arg(1)),
        FunctionKind::HasConditionalPermission => {
            ctx.has_conditional_permission(arg(0), arg(1), arg(2))
        }
    }
}

/// Compiles and evaluates permission expressions.
///
/// Owns its configuration and, when enabled, its own [`ExpressionCache`].
/// Clones share the cache, so one evaluator can be cloned into every worker
/// that checks the same rule set.
///
/// # Example
/// ```
/// use permission_expression_core::{ExpressionEvaluator, InMemoryPermissionContext};
///
/// let evaluator = ExpressionEvaluator::new();
/// let ctx = InMemoryPermissionContext::new().role("ADMIN");
///
/// assert!(evaluator.evaluate_str("hasRole('ADMIN') OR hasPermission('doc:read')", &ctx).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    config: ExpressionConfig,
    cache: Option<Arc<ExpressionCache>>,
}

impl ExpressionEvaluator {
    /// Creates an evaluator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ExpressionConfig::default())
    }

    /// Creates an evaluator with a custom configuration.
    pub fn with_config(config: ExpressionConfig) -> Self {
        let cache = if config.is_cache_enabled() {
            Some(Arc::new(ExpressionCache::with_capacity_limit(
                config.get_cache_capacity(),
            )))
        } else {
            None
        };
        ExpressionEvaluator { config, cache }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }

    /// Returns the compiled-expression cache, if caching is enabled.
    pub fn cache(&self) -> Option<&ExpressionCache> {
        self.cache.as_deref()
    }

    /// Parses `expression`, reusing a cached tree when one exists.
    ///
    /// In strict mode the validator runs first and its errors are returned
    /// as [`ParseError::Validation`].
    pub fn compile(&self, expression: &str) -> Result<Arc<ExpressionNode>, ParseError> {
        let result = match &self.cache {
            Some(cache) => cache.get_or_compile(expression, |e| self.compile_uncached(e)),
            None => self.compile_uncached(expression).map(Arc::new),
        };
        if let Err(err) = &result {
            warn!("failed to compile permission expression '{}': {}", expression, err);
        }
        result
    }

    fn compile_uncached(&self, expression: &str) -> Result<ExpressionNode, ParseError> {
        if self.config.is_strict() {
            let report = validator::validate(expression);
            if !report.is_valid() {
                return Err(ParseError::Validation {
                    errors: report.into_errors(),
                });
            }
        }
        parser::parse(expression)
    }

    /// Evaluates an already parsed expression.
    pub fn evaluate(&self, node: &ExpressionNode, ctx: &dyn PermissionContext) -> bool {
        evaluate(node, ctx)
    }

    /// Parses (or fetches from cache) and evaluates an expression string.
    ///
    /// # Returns
    /// * `Ok(true)` - Access granted
    /// * `Ok(false)` - Access denied
    /// * `Err(ParseError)` - The expression is not valid
    pub fn evaluate_str(
        &self,
        expression: &str,
        ctx: &dyn PermissionContext,
    ) -> Result<bool, ParseError> {
        let node = self.compile(expression)?;
        Ok(evaluate(&node, ctx))
    }

    /// Checks an expression without evaluating it.
    pub fn validate(&self, expression: &str) -> ExpressionValidationResult {
        validator::validate(expression)
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
