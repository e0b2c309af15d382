//! The authorization facts an expression is evaluated against.

use std::collections::HashSet;

/// Answers the four permission queries an expression can make.
///
/// Implement this trait over whatever holds your authorization facts: a
/// database, a cache, token claims or an in-memory set. The evaluator only
/// calls these methods; it never inspects how they are answered.
///
/// Arguments arrive with one pair of surrounding quotes removed. Bare
/// identifiers (`userId` in `hasConditionalPermission('doc:edit', 'ownerId', userId)`)
/// are passed through verbatim and are the implementation's to resolve.
///
/// # Blocking and cancellation
/// A call may block (for example on a database round trip). The evaluator
/// imposes no timeout and cannot cancel a call in progress; bounding the
/// cost of a lookup is the implementation's responsibility. Because `AND`
/// and `OR` short-circuit, not every query in an expression is made.
///
/// # Example
/// ```
/// use permission_expression_core::PermissionContext;
///
/// struct ClaimsContext {
///     scopes: Vec<String>,
/// }
///
/// impl PermissionContext for ClaimsContext {
///     fn has_permission(&self, permission: &str) -> bool {
///         self.scopes.iter().any(|s| s == permission)
///     }
///     fn has_role(&self, _role: &str) -> bool {
///         false
///     }
///     fn has_resource_permission(&self, resource: &str, action: &str) -> bool {
///         self.has_permission(&format!("{}:{}", resource, action))
///     }
///     fn has_conditional_permission(&self, _permission: &str, _key: &str, _value: &str) -> bool {
///         false
///     }
/// }
/// ```
pub trait PermissionContext {
    /// `hasPermission(permission)`
    fn has_permission(&self, permission: &str) -> bool;

    /// `hasRole(role)`
    fn has_role(&self, role: &str) -> bool;

    /// `hasResourcePermission(resource, action)`
    fn has_resource_permission(&self, resource: &str, action: &str) -> bool;

    /// `hasConditionalPermission(permission, conditionKey, conditionValue)`
    fn has_conditional_permission(
        &self,
        permission: &str,
        condition_key: &str,
        condition_value: &str,
    ) -> bool;
}

impl<T: PermissionContext + ?Sized> PermissionContext for &T {
    fn has_permission(&self, permission: &str) -> bool {
        (**self).has_permission(permission)
    }

    fn has_role(&self, role: &str) -> bool {
        (**self).has_role(role)
    }

    fn has_resource_permission(&self, resource: &str, action: &str) -> bool {
        (**self).has_resource_permission(resource, action)
    }

    fn has_conditional_permission(
        &self,
        permission: &str,
        condition_key: &str,
        condition_value: &str,
    ) -> bool {
        (**self).has_conditional_permission(permission, condition_key, condition_value)
    }
}

impl<T: PermissionContext + ?Sized> PermissionContext for Box<T> {
    fn has_permission(&self, permission: &str) -> bool {
        (**self).has_permission(permission)
    }

    fn has_role(&self, role: &str) -> bool {
        (**self).has_role(role)
    }

    fn has_resource_permission(&self, resource: &str, action: &str) -> bool {
        (**self).has_resource_permission(resource, action)
    }

    fn has_conditional_permission(
        &self,
        permission: &str,
        condition_key: &str,
        condition_value: &str,
    ) -> bool {
        (**self).has_conditional_permission(permission, condition_key, condition_value)
    }
}

/// A `PermissionContext` backed by in-memory sets.
///
/// Useful for development, testing, and callers that load a principal's
/// grants up front.
///
/// # Example
/// ```
/// use permission_expression_core::{InMemoryPermissionContext, PermissionContext};
///
/// let ctx = InMemoryPermissionContext::new()
///     .roles(["ADMIN", "USER"])
///     .permission("doc:read")
///     .resource_permission("document", "write")
///     .conditional_permission("doc:edit", "ownerId", "42");
///
/// assert!(ctx.has_role("ADMIN"));
/// assert!(ctx.has_resource_permission("document", "write"));
/// assert!(!ctx.has_conditional_permission("doc:edit", "ownerId", "7"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryPermissionContext {
    permissions: HashSet<String>,
    roles: HashSet<String>,
    resource_permissions: HashSet<(String, String)>,
    conditional_permissions: HashSet<(String, String, String)>,
}

impl InMemoryPermissionContext {
    /// Creates a context that grants nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a permission.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Grants several permissions.
    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Grants a role.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Grants several roles.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Grants `action` on `resource`.
    pub fn resource_permission(
        mut self,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.resource_permissions
            .insert((resource.into(), action.into()));
        self
    }

    /// Grants `permission` when `condition_key` equals `condition_value`.
    pub fn conditional_permission(
        mut self,
        permission: impl Into<String>,
        condition_key: impl Into<String>,
        condition_value: impl Into<String>,
    ) -> Self {
        self.conditional_permissions.insert((
            permission.into(),
            condition_key.into(),
            condition_value.into(),
        ));
        self
    }

    /// Returns the granted permissions.
    pub fn get_permissions(&self) -> &HashSet<String> {
        &self.permissions
    }

    /// Returns the granted roles.
    pub fn get_roles(&self) -> &HashSet<String> {
        &self.roles
    }
}

impl PermissionContext for InMemoryPermissionContext {
    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    fn has_resource_permission(&self, resource: &str, action: &str) -> bool {
        self.resource_permissions
            .iter()
            .any(|(r, a)| r == resource && a == action)
    }

    fn has_conditional_permission(
        &self,
        permission: &str,
        condition_key: &str,
        condition_value: &str,
    ) -> bool {
        self.conditional_permissions
            .iter()
            .any(|(p, k, v)| p == permission && k == condition_key && v == condition_value)
    }
}
