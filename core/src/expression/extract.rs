//! Static extraction of referenced permissions and roles.
//!
//! These scan the raw text and never parse it, so they keep working on
//! rules that would fail to parse. Intended for auditing rule sets, not for
//! making access decisions.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::ast::FunctionKind;
use super::tokenizer::split_parameters;

lazy_static! {
    static ref PERMISSION_FUNCTION: Regex = Regex::new(
        r"\b(hasPermission|hasRole|hasResourcePermission|hasConditionalPermission)\s*\(([^)]*)\)"
    )
    .unwrap();
}

/// First parameters of `hasPermission(...)` and `hasResourcePermission(...)`.
///
/// ```
/// use permission_expression_core::extract_permissions;
///
/// let found = extract_permissions("hasPermission('a') AND (hasPermission('b') OR hasRole('R'))");
/// assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
pub fn extract_permissions(expression: &str) -> BTreeSet<String> {
    first_parameters(
        expression,
        &[FunctionKind::HasPermission, FunctionKind::HasResourcePermission],
    )
}

/// First parameters of `hasRole(...)`.
pub fn extract_roles(expression: &str) -> BTreeSet<String> {
    first_parameters(expression, &[FunctionKind::HasRole])
}

fn first_parameters(expression: &str, wanted: &[FunctionKind]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for caps in PERMISSION_FUNCTION.captures_iter(expression) {
        let kind = caps.get(1).and_then(|m| FunctionKind::from_name(m.as_str()));
        if !kind.is_some_and(|k| wanted.contains(&k)) {
            continue;
        }

        let args = caps.get(2).map_or("", |m| m.as_str());
        let first = match split_parameters(args) {
            Ok(params) => params.into_iter().next(),
            // best effort: the regex may have cut a literal at a ')'
            Err(_) => args.split(',').next().map(str::to_string),
        };

        if let Some(first) = first {
            let name = first.trim().trim_matches(|c| c == '\'' || c == '"');
            if !name.is_empty() {
                found.insert(name.to_string());
            }
        }
    }

    found
}
