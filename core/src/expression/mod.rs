//! Permission expression language for authorization rules.
//!
//! # Overview
//! An expression combines permission function calls with logical operators:
//!
//! ```text
//! hasPermission('doc:read') AND (hasRole('ADMIN') OR hasConditionalPermission('doc:edit', 'ownerId', userId))
//! ```
//!
//! Data flows as: raw text -> [`normalize`] -> [`validate`] (optional) ->
//! [`parse`] -> [`ExpressionNode`] -> [`evaluate`] -> `bool`.
//! [`extract_permissions`] and [`extract_roles`] work on the raw text.
//!
//! # Supported Expressions
//!
//! ## Functions
//! - `hasPermission('perm')` - Check a permission
//! - `hasRole('ROLE')` - Check a role
//! - `hasResourcePermission('resource', 'action')` - Check an action on a resource
//! - `hasConditionalPermission('perm', 'key', value)` - Check a permission under a condition
//!
//! Parameters are quoted literals (`'...'` or `"..."`) or bare identifiers
//! that the [`PermissionContext`] resolves itself.
//!
//! ## Operators
//! - `AND` / `and` - Logical AND
//! - `OR` / `or` - Logical OR
//! - `NOT` / `not` - Logical NOT
//! - `(` `)` - Grouping
//!
//! `NOT` binds tightest, then `AND`, then `OR`.
//!
//! # Concurrency
//! Parsing, evaluation, validation and extraction are pure functions over
//! immutable inputs and can run on any number of threads at once. The only
//! shared state is an [`ExpressionCache`], which callers own explicitly.
//!
//! # Examples
//! ```
//! use permission_expression_core::expression::{evaluate, parse, InMemoryPermissionContext};
//!
//! let node = parse("hasRole('ADMIN') OR hasPermission('doc:read')").unwrap();
//! let ctx = InMemoryPermissionContext::new().permission("doc:read");
//!
//! assert!(evaluate(&node, &ctx));
//! ```

mod ast;
mod cache;
mod config;
mod context;
mod evaluator;
mod extract;
mod parser;
mod tokenizer;
mod validator;

pub use ast::{ExpressionNode, FunctionKind, LogicalOp};
pub use cache::{ExpressionCache, DEFAULT_CACHE_CAPACITY};
pub use config::ExpressionConfig;
pub use context::{InMemoryPermissionContext, PermissionContext};
pub use evaluator::{evaluate, ExpressionEvaluator};
pub use extract::{extract_permissions, extract_roles};
pub use parser::{parse, ParseError, PermissionExpression, MAX_NESTING_DEPTH};
pub use tokenizer::{find_calls, normalize, split_parameters, strip_quotes, FunctionCall};
pub use validator::{validate, ExpressionValidationResult};
