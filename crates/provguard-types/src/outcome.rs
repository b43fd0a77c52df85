use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal classification of one evaluation.
///
/// `Audit` is never produced by the baseline engine; only the enforcement-mode
/// layer downgrades a `Fail` to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pass,
    Fail,
    Audit,
    Invalid,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pass => "pass",
            VerificationStatus::Fail => "fail",
            VerificationStatus::Audit => "audit",
            VerificationStatus::Invalid => "invalid",
        }
    }
}

/// Where in the evaluation a diagnostic was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Precondition checks on the caller-supplied identifiers.
    Input,
    /// Organization policy (defaults + projects).
    Org,
    /// Repository policy (projects override list).
    Repo,
    /// Enforcement-mode reconciliation between the two documents.
    Mode,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Input => "input",
            Phase::Org => "org policy",
            Phase::Repo => "repo policy",
            Phase::Mode => "mode",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Source,
    Image,
    Builder,
    Mode,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Source => "source",
            Field::Image => "image",
            Field::Builder => "builder",
            Field::Mode => "mode",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit-friendly explanation attached to every non-pass outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub phase: Phase,
    pub field: Field,

    /// The literal value that did not match, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Owning organization entry (`defaults` or `projects[i]`), if one was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    pub message: String,
}

impl Diagnostic {
    pub fn new(phase: Phase, field: Field, message: impl Into<String>) -> Self {
        Self {
            phase,
            field,
            value: None,
            entry: None,
            message: message.into(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.phase, self.message)?;
        if let Some(value) = &self.value {
            write!(f, ": {value:?}")?;
        }
        if let Some(entry) = &self.entry {
            write!(f, " (entry {entry})")?;
        }
        Ok(())
    }
}

/// Result of evaluating one artifact against a loaded policy.
///
/// Outcomes are terminal values. There are deliberately no combinators: callers
/// aggregating several artifacts must apply phase precedence themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerificationOutcome {
    status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diagnostic: Option<Diagnostic>,
}

impl VerificationOutcome {
    pub fn passed() -> Self {
        Self {
            status: VerificationStatus::Pass,
            diagnostic: None,
        }
    }

    pub fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            status: VerificationStatus::Fail,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn invalid(diagnostic: Diagnostic) -> Self {
        Self {
            status: VerificationStatus::Invalid,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn audited(diagnostic: Diagnostic) -> Self {
        Self {
            status: VerificationStatus::Audit,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    pub fn is_pass(&self) -> bool {
        self.status == VerificationStatus::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.status == VerificationStatus::Fail
    }

    pub fn is_audit(&self) -> bool {
        self.status == VerificationStatus::Audit
    }

    pub fn is_invalid(&self) -> bool {
        self.status == VerificationStatus::Invalid
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.status {
            VerificationStatus::Pass => "PASS",
            VerificationStatus::Fail => "FAIL",
            VerificationStatus::Audit => "AUDIT",
            VerificationStatus::Invalid => "INVALID",
        };
        match &self.diagnostic {
            Some(d) if self.status != VerificationStatus::Pass => write!(f, "{label}: {d}"),
            _ => f.write_str(label),
        }
    }
}
