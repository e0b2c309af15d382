//! # Permission Expressions
//!
//! A small boolean rule language for authorization checks:
//!
//! ```text
//! hasPermission('doc:read') AND (hasRole('ADMIN') OR hasConditionalPermission('doc:edit', 'ownerId', userId))
//! ```
//!
//! Rules are parsed once into an immutable [`ExpressionNode`] tree and then
//! evaluated many times against a caller-supplied [`PermissionContext`].
//!
//! ```
//! use permission_expression_core::{InMemoryPermissionContext, PermissionExpression};
//!
//! let ctx = InMemoryPermissionContext::new()
//!     .permission("doc:read")
//!     .role("EDITOR");
//!
//! let expr = PermissionExpression::parse("hasPermission('doc:read') AND NOT hasRole('GUEST')").unwrap();
//! assert!(expr.evaluate(&ctx));
//! ```
//!
//! [`ExpressionNode`]: expression::ExpressionNode
//! [`PermissionContext`]: expression::PermissionContext

pub mod expression;

pub use expression::{
    evaluate, extract_permissions, extract_roles, parse, validate, ExpressionCache,
    ExpressionConfig, ExpressionEvaluator, ExpressionNode, ExpressionValidationResult,
    FunctionKind, InMemoryPermissionContext, LogicalOp, ParseError, PermissionContext,
    PermissionExpression,
};
