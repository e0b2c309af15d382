//! Common test utilities.
//!
//! This module provides shared test infrastructure including:
//! - A call-recording `PermissionContext`
//! - Helper functions

#![allow(dead_code)]

use std::sync::Mutex;

use permission_expression_core::{evaluate, parse, InMemoryPermissionContext, PermissionContext};

/// Delegates to an in-memory context and records every query, in order.
pub struct RecordingContext {
    inner: InMemoryPermissionContext,
    calls: Mutex<Vec<String>>,
}

impl RecordingContext {
    pub fn new(inner: InMemoryPermissionContext) -> Self {
        RecordingContext {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PermissionContext for RecordingContext {
    fn has_permission(&self, permission: &str) -> bool {
        self.record(format!("hasPermission({})", permission));
        self.inner.has_permission(permission)
    }

    fn has_role(&self, role: &str) -> bool {
        self.record(format!("hasRole({})", role));
        self.inner.has_role(role)
    }

    fn has_resource_permission(&self, resource: &str, action: &str) -> bool {
        self.record(format!("hasResourcePermission({}, {})", resource, action));
        self.inner.has_resource_permission(resource, action)
    }

    fn has_conditional_permission(
        &self,
        permission: &str,
        condition_key: &str,
        condition_value: &str,
    ) -> bool {
        self.record(format!(
            "hasConditionalPermission({}, {}, {})",
            permission, condition_key, condition_value
        ));
        self.inner
            .has_conditional_permission(permission, condition_key, condition_value)
    }
}

/// Parses and evaluates in one step; panics on a parse error.
pub fn check(expression: &str, ctx: &dyn PermissionContext) -> bool {
    let node = parse(expression)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", expression, e));
    evaluate(&node, ctx)
}
