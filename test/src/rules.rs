//! A sample rule set for a document store.

use lazy_static::lazy_static;

/// A named authorization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub expression: &'static str,
}

lazy_static! {
    /// Rules keyed by the operation they guard.
    pub static ref RULES: Vec<Rule> = vec![
        Rule {
            name: "read",
            expression: "hasPermission('doc:read') AND NOT hasRole('GUEST')",
        },
        Rule {
            name: "write",
            expression: "hasRole('ADMIN') OR (hasPermission('doc:write') AND hasResourcePermission('document', 'write'))",
        },
        Rule {
            name: "edit",
            expression: "hasPermission('doc:write') or hasConditionalPermission('doc:edit', 'ownerId', '42')",
        },
        Rule {
            name: "delete",
            expression: "hasRole('ADMIN') AND hasPermission('doc:delete')",
        },
        Rule {
            name: "audit",
            expression: "hasRole(\"AUDITOR\") OR (hasRole('ADMIN') AND NOT hasRole('GUEST'))",
        },
    ];
}

/// Looks up a rule by name.
pub fn find(name: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.name == name)
}
