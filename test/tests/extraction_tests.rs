//! Static extraction tests for auditing rule sets.

use std::collections::BTreeSet;

use permission_expression_core::{extract_permissions, extract_roles, PermissionExpression};
use permission_expression_test::rules::RULES;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_extract_mixed_expression() {
    let expr = "hasPermission('a') AND (hasPermission('b') OR hasRole('R'))";
    assert_eq!(extract_permissions(expr), set(&["a", "b"]));
    assert_eq!(extract_roles(expr), set(&["R"]));
}

#[test]
fn test_extract_across_nesting() {
    let expr = "NOT ((hasRole('A') or (hasPermission(\"p1\") and not hasRole(\"B\"))) AND hasResourcePermission('doc', 'read'))";
    assert_eq!(extract_roles(expr), set(&["A", "B"]));
    assert_eq!(extract_permissions(expr), set(&["p1", "doc"]));
}

#[test]
fn test_extract_from_unparseable_rule() {
    let broken = "hasRole('ADMIN') AND (hasPermission('doc:read') OR";
    assert!(PermissionExpression::parse(broken).is_err());
    assert_eq!(extract_roles(broken), set(&["ADMIN"]));
    assert_eq!(extract_permissions(broken), set(&["doc:read"]));
}

#[test]
fn test_audit_whole_rule_set() {
    let mut roles = BTreeSet::new();
    let mut permissions = BTreeSet::new();
    for rule in RULES.iter() {
        roles.extend(extract_roles(rule.expression));
        permissions.extend(extract_permissions(rule.expression));
    }

    assert_eq!(roles, set(&["ADMIN", "AUDITOR", "GUEST"]));
    assert_eq!(
        permissions,
        set(&["doc:delete", "doc:read", "doc:write", "document"])
    );
}

#[test]
fn test_every_literal_is_extracted() {
    // each hasPermission('x') / hasRole('x') literal shows up regardless of structure
    for rule in RULES.iter() {
        let expr = PermissionExpression::parse(rule.expression).unwrap();
        let roles = expr.roles();
        for name in ["ADMIN", "GUEST", "AUDITOR"] {
            let referenced = rule.expression.contains(&format!("hasRole('{}')", name))
                || rule.expression.contains(&format!("hasRole(\"{}\")", name));
            assert_eq!(roles.contains(name), referenced, "{} in {}", name, rule.name);
        }
    }
}
