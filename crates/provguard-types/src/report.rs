use crate::VerificationOutcome;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for provguard reports.
pub const SCHEMA_REPORT_V1: &str = "provguard.report.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// The three concrete identifiers an evaluation was asked about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationInputs {
    pub source_uri: String,
    pub image_uri: String,
    pub builder_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolicyRole {
    Org,
    Repo,
}

impl fmt::Display for PolicyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyRole::Org => f.write_str("org"),
            PolicyRole::Repo => f.write_str("repo"),
        }
    }
}

/// Identity of one policy document as it was read, for audit trails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDigest {
    pub role: PolicyRole,
    pub path: String,
    /// Lowercase hex SHA-256 of the raw document bytes.
    pub sha256: String,
}

/// Report envelope written by `provguard eval --report-out`.
///
/// Exactly one of `outcome` and `error` is present: `error` carries a load or
/// runtime failure that prevented evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProvguardReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub inputs: EvaluationInputs,
    #[serde(default)]
    pub policies: Vec<PolicyDigest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<VerificationOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
