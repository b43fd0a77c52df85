//! Stable identifiers for load-time rules and document schemas.
//!
//! Rule IDs are snake_case and appear verbatim in `InvalidPolicy` errors.

/// The only policy document `version` currently accepted.
pub const SUPPORTED_POLICY_VERSION: i64 = 1;

// Schemas
pub const SCHEMA_ORG_POLICY_V1: &str = "provguard.org-policy.v1";
pub const SCHEMA_REPO_POLICY_V1: &str = "provguard.repo-policy.v1";

// Rules
pub const RULE_SUPPORTED_VERSION: &str = "supported_version";
pub const RULE_DEFAULTS_SOURCES_NON_EMPTY: &str = "defaults_sources_non_empty";
pub const RULE_PATTERN_NON_EMPTY: &str = "pattern_non_empty";
pub const RULE_PATTERN_SYNTAX: &str = "pattern_syntax";

// Entry labels used in diagnostics.
pub const ENTRY_DEFAULTS: &str = "defaults";

/// Label for the organization entry at `projects[index]`.
pub fn project_entry(index: usize) -> String {
    format!("projects[{index}]")
}
