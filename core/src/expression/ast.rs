//! Abstract Syntax Tree for permission expressions.

use derive_more::Display;

/// The four permission functions an expression may call.
///
/// The set is closed: adding a variant forces every `match` over it (most
/// notably the evaluator's dispatch) to be updated.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `hasPermission(permission)`
    #[display("hasPermission")]
    HasPermission,
    /// `hasRole(role)`
    #[display("hasRole")]
    HasRole,
    /// `hasResourcePermission(resource, action)`
    #[display("hasResourcePermission")]
    HasResourcePermission,
    /// `hasConditionalPermission(permission, conditionKey, conditionValue)`
    #[display("hasConditionalPermission")]
    HasConditionalPermission,
}

impl FunctionKind {
    /// All known functions, in declaration order.
    pub const ALL: [FunctionKind; 4] = [
        FunctionKind::HasPermission,
        FunctionKind::HasRole,
        FunctionKind::HasResourcePermission,
        FunctionKind::HasConditionalPermission,
    ];

    /// Resolves a function identifier as written in an expression.
    ///
    /// Matching is case-sensitive: `hasrole` is not a known function.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hasPermission" => Some(FunctionKind::HasPermission),
            "hasRole" => Some(FunctionKind::HasRole),
            "hasResourcePermission" => Some(FunctionKind::HasResourcePermission),
            "hasConditionalPermission" => Some(FunctionKind::HasConditionalPermission),
            _ => None,
        }
    }

    /// The identifier used for this function in expression text.
    pub fn name(self) -> &'static str {
        match self {
            FunctionKind::HasPermission => "hasPermission",
            FunctionKind::HasRole => "hasRole",
            FunctionKind::HasResourcePermission => "hasResourcePermission",
            FunctionKind::HasConditionalPermission => "hasConditionalPermission",
        }
    }

    /// Number of parameters the evaluator reads for this function.
    pub fn arity(self) -> usize {
        match self {
            FunctionKind::HasPermission | FunctionKind::HasRole => 1,
            FunctionKind::HasResourcePermission => 2,
            FunctionKind::HasConditionalPermission => 3,
        }
    }
}

/// Logical operators combining sub-expressions.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// Logical AND (both must be true)
    #[display("AND")]
    And,
    /// Logical OR (at least one must be true)
    #[display("OR")]
    Or,
    /// Logical NOT (inverts the result)
    #[display("NOT")]
    Not,
}

impl LogicalOp {
    /// The canonical upper-case keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        }
    }

    /// Matches a canonical keyword exactly.
    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "AND" => Some(LogicalOp::And),
            "OR" => Some(LogicalOp::Or),
            "NOT" => Some(LogicalOp::Not),
            _ => None,
        }
    }
}

/// A permission expression AST node.
///
/// Trees are built once by the parser and never mutated afterwards, so a
/// parsed node can be shared freely between threads (e.g. behind an `Arc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionNode {
    /// A permission function call.
    ///
    /// `parameters` hold the raw argument text in declaration order, still
    /// quoted: `hasRole('ADMIN')` -> `["'ADMIN'"]`. Bare identifiers such as
    /// `userId` are kept verbatim.
    PermissionFunction {
        function: FunctionKind,
        parameters: Vec<String>,
    },

    /// A logical operator.
    ///
    /// `And`/`Or` populate both sides; `Not` populates only `right`.
    LogicalOperator {
        op: LogicalOp,
        left: Option<Box<ExpressionNode>>,
        right: Option<Box<ExpressionNode>>,
    },
}

impl ExpressionNode {
    /// Creates a permission function node.
    pub fn function<I, S>(function: FunctionKind, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExpressionNode::PermissionFunction {
            function,
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a new AND node.
    pub fn and(left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::LogicalOperator {
            op: LogicalOp::And,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Creates a new OR node.
    pub fn or(left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::LogicalOperator {
            op: LogicalOp::Or,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Creates a new NOT node.
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: ExpressionNode) -> Self {
        ExpressionNode::LogicalOperator {
            op: LogicalOp::Not,
            left: None,
            right: Some(Box::new(expr)),
        }
    }

    /// Returns true for permission function leaves.
    pub fn is_function(&self) -> bool {
        matches!(self, ExpressionNode::PermissionFunction { .. })
    }

    /// Number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        match self {
            ExpressionNode::PermissionFunction { .. } => 1,
            ExpressionNode::LogicalOperator { left, right, .. } => {
                1 + left.as_ref().map_or(0, |n| n.node_count())
                    + right.as_ref().map_or(0, |n| n.node_count())
            }
        }
    }

    /// Longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            ExpressionNode::PermissionFunction { .. } => 1,
            ExpressionNode::LogicalOperator { left, right, .. } => {
                let l = left.as_ref().map_or(0, |n| n.depth());
                let r = right.as_ref().map_or(0, |n| n.depth());
                1 + l.max(r)
            }
        }
    }
}
