use provguard_types::PolicyRole;
use thiserror::Error;

/// Structural failure while turning raw documents into a `Policy`.
///
/// These are configuration errors: they need a human to fix the document and
/// are never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("expected exactly 2 policy documents (organization, repository), got {count}")]
    InvalidInput { count: usize },

    #[error("{document} policy is malformed{}: {message}", at_field(.field))]
    MalformedDocument {
        document: PolicyRole,
        /// JSON path of the offending value, e.g. `defaults.sources[0].uri`.
        field: Option<String>,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{document} policy violates {rule}{}: {message}", at_field(.path))]
    InvalidPolicy {
        document: PolicyRole,
        /// Stable rule ID from `provguard_types::ids`.
        rule: &'static str,
        /// JSON path of the offending value, e.g. `projects[1].images[0].uri`.
        path: Option<String>,
        message: String,
    },
}

impl LoadError {
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            LoadError::InvalidPolicy { rule, .. } => Some(*rule),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<PolicyRole> {
        match self {
            LoadError::InvalidInput { .. } => None,
            LoadError::MalformedDocument { document, .. }
            | LoadError::InvalidPolicy { document, .. } => Some(*document),
        }
    }
}

fn at_field(field: &Option<String>) -> String {
    match field {
        Some(f) => format!(" at `{f}`"),
        None => String::new(),
    }
}
