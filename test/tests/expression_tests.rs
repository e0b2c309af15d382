//! End-to-end parse and evaluate tests over the sample rule set.

mod common;

use permission_expression_core::{
    parse, ExpressionNode, FunctionKind, InMemoryPermissionContext, PermissionExpression,
};
use permission_expression_test::{admin, editor, guest, owner, rules, viewer};
use rstest::rstest;

use common::{check, RecordingContext};

// =============================================================================
// Rule Set Tests
// =============================================================================

#[rstest]
#[case("read", true, true, true, true, false)]
#[case("write", true, true, false, false, false)]
#[case("edit", true, true, true, false, false)]
#[case("delete", true, false, false, false, false)]
#[case("audit", true, false, false, false, false)]
fn test_rule_decisions(
    #[case] rule: &str,
    #[case] admin_allowed: bool,
    #[case] editor_allowed: bool,
    #[case] owner_allowed: bool,
    #[case] viewer_allowed: bool,
    #[case] guest_allowed: bool,
) {
    let rule = rules::find(rule).unwrap();
    let expr = PermissionExpression::parse(rule.expression).unwrap();

    assert_eq!(expr.evaluate(&admin()), admin_allowed, "admin / {}", rule.name);
    assert_eq!(expr.evaluate(&editor()), editor_allowed, "editor / {}", rule.name);
    assert_eq!(expr.evaluate(&owner()), owner_allowed, "owner / {}", rule.name);
    assert_eq!(expr.evaluate(&viewer()), viewer_allowed, "viewer / {}", rule.name);
    assert_eq!(expr.evaluate(&guest()), guest_allowed, "guest / {}", rule.name);
}

#[test]
fn test_all_rules_parse() {
    for rule in rules::RULES.iter() {
        assert!(parse(rule.expression).is_ok(), "{}", rule.name);
    }
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[test]
fn test_single_permission() {
    let node = parse("hasPermission('doc:read')").unwrap();
    assert_eq!(
        node,
        ExpressionNode::PermissionFunction {
            function: FunctionKind::HasPermission,
            parameters: vec!["'doc:read'".to_string()],
        }
    );
    assert!(check("hasPermission('doc:read')", &viewer()));
}

#[test]
fn test_role_or_permission() {
    let ctx = InMemoryPermissionContext::new().permission("doc:read");
    assert!(check("hasRole('ADMIN') OR hasPermission('doc:read')", &ctx));
}

#[test]
fn test_not_guest() {
    assert!(!check("NOT hasRole('GUEST')", &guest()));
    assert!(check("NOT hasRole('GUEST')", &viewer()));
}

#[test]
fn test_conditional_permission_exact_arguments() {
    let ctx = RecordingContext::new(owner());
    assert!(check("hasConditionalPermission('doc:edit','ownerId','42')", &ctx));
    assert!(!check("hasConditionalPermission('ownerId','doc:edit','42')", &ctx));
    assert_eq!(
        ctx.calls(),
        vec![
            "hasConditionalPermission(doc:edit, ownerId, 42)",
            "hasConditionalPermission(ownerId, doc:edit, 42)",
        ]
    );
}

// =============================================================================
// Evaluation Properties
// =============================================================================

#[rstest]
#[case("hasRole('ADMIN') AND hasPermission('doc:read')")]
#[case("(hasRole('ADMIN')) AND (hasPermission('doc:read'))")]
#[case("(hasRole('ADMIN') AND hasPermission('doc:read'))")]
fn test_parenthesis_insensitive(#[case] expr: &str) {
    for (ctx, expected) in [(admin(), true), (viewer(), false), (guest(), false)] {
        assert_eq!(check(expr, &ctx), expected, "{}", expr);
    }
}

#[test]
fn test_double_negation() {
    let base = "hasRole('ADMIN') OR hasPermission('doc:write')";
    let negated = format!("NOT (NOT ({}))", base);
    for ctx in [admin(), editor(), owner(), viewer(), guest()] {
        assert_eq!(check(&negated, &ctx), check(base, &ctx));
    }
}

#[test]
fn test_and_short_circuits() {
    let ctx = RecordingContext::new(guest());
    assert!(!check(
        "hasPermission('doc:read') AND (hasRole('ADMIN') OR hasResourcePermission('document', 'read'))",
        &ctx
    ));
    assert_eq!(ctx.calls(), vec!["hasPermission(doc:read)"]);
}

#[test]
fn test_or_short_circuits() {
    let ctx = RecordingContext::new(admin());
    assert!(check("hasRole('ADMIN') OR hasPermission('doc:read')", &ctx));
    assert_eq!(ctx.calls(), vec!["hasRole(ADMIN)"]);
}

#[test]
fn test_repeated_evaluation_is_deterministic() {
    let node = parse(rules::find("write").unwrap().expression).unwrap();
    let ctx = RecordingContext::new(editor());

    let first = permission_expression_core::evaluate(&node, &ctx);
    let first_calls = ctx.calls();
    for _ in 0..10 {
        ctx.reset();
        assert_eq!(permission_expression_core::evaluate(&node, &ctx), first);
        assert_eq!(ctx.calls(), first_calls);
    }
}
