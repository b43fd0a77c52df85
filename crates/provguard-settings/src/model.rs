use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A source, image, or builder identifier; may contain one `*` wildcard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResourceV1 {
    pub uri: String,
}

impl ResourceV1 {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BuilderV1 {
    pub id: String,
    #[serde(default)]
    pub level: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BuildTrackV1 {
    /// Empty means any builder is accepted.
    #[serde(default)]
    pub builders: Vec<BuilderV1>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AttestorV1 {
    pub id: String,
}

/// Reserved for source-track attestors. Parsed, never evaluated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SourceTrackV1 {
    #[serde(default)]
    pub attestors: Vec<AttestorV1>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModeV1 {
    Audit,
    Enforce,
}

/// One governance rule of the organization policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryV1 {
    #[serde(default)]
    pub sources: Vec<ResourceV1>,

    /// Empty means any image is accepted.
    #[serde(default)]
    pub images: Vec<ResourceV1>,

    #[serde(default)]
    pub build_track: BuildTrackV1,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_track: Option<SourceTrackV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModeV1>,
}

/// Organization policy document, schema v1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OrgPolicyV1 {
    /// Optional schema string for tooling (`provguard.org-policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub version: i64,

    pub defaults: EntryV1,

    /// Narrower exceptions, tried in document order after `defaults`.
    #[serde(default)]
    pub projects: Vec<EntryV1>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RepoProjectV1 {
    /// Absent applies the project to all sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ResourceV1>,
    pub image: ResourceV1,
}

/// Repository policy document, schema v1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RepoPolicyV1 {
    /// Optional schema string for tooling (`provguard.repo-policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModeV1>,

    /// Empty means the repository adds no restriction.
    #[serde(default)]
    pub projects: Vec<RepoProjectV1>,
}
