//! Permission Expression Test Fixtures
//!
//! Sample principals and a sample document-management rule set shared by
//! the integration tests in `tests/`.

pub mod principals;
pub mod rules;

pub use principals::{admin, editor, guest, owner, viewer};
pub use rules::{Rule, RULES};
