use crate::error::LoadError;
use crate::model::{EntryV1, OrgPolicyV1, RepoPolicyV1};
use provguard_domain::matcher::{WILDCARD, wildcard_count};
use provguard_types::{PolicyRole, ids};
use serde::de::DeserializeOwned;

pub fn parse_org_policy(bytes: &[u8]) -> Result<OrgPolicyV1, LoadError> {
    parse(PolicyRole::Org, bytes)
}

pub fn parse_repo_policy(bytes: &[u8]) -> Result<RepoPolicyV1, LoadError> {
    parse(PolicyRole::Repo, bytes)
}

fn parse<T: DeserializeOwned>(document: PolicyRole, bytes: &[u8]) -> Result<T, LoadError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        malformed(document, Some(path), err.inner())
    })?;
    de.end().map_err(|err| malformed(document, None, &err))?;
    Ok(value)
}

fn malformed(document: PolicyRole, path: Option<String>, err: &serde_json::Error) -> LoadError {
    let full = err.to_string();
    let location = format!(" at line {} column {}", err.line(), err.column());
    let message = full.strip_suffix(&location).unwrap_or(&full).to_string();
    LoadError::MalformedDocument {
        document,
        field: field_path(path, named_field(&message)),
        line: err.line(),
        column: err.column(),
        message,
    }
}

/// serde names the field only for missing/unknown field errors, in backticks.
fn named_field(message: &str) -> Option<String> {
    if !(message.starts_with("missing field") || message.starts_with("unknown field")) {
        return None;
    }
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}

/// Join the tracked path with the field serde named, unless the path already ends with it.
///
/// A missing field is reported at its parent object, so the name is appended.
fn field_path(path: Option<String>, named: Option<String>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty() && p != ".");
    match (path, named) {
        (Some(path), Some(name)) if path == name || path.ends_with(&format!(".{name}")) => {
            Some(path)
        }
        (Some(path), Some(name)) => Some(format!("{path}.{name}")),
        (path, named) => path.or(named),
    }
}

/// Check the organization document against load-time invariants.
///
/// Order: version, then `defaults.sources`, then every pattern in document order.
pub fn validate_org_policy(doc: &OrgPolicyV1) -> Result<(), LoadError> {
    check_version(PolicyRole::Org, doc.version)?;

    if doc.defaults.sources.is_empty() {
        return Err(LoadError::InvalidPolicy {
            document: PolicyRole::Org,
            rule: ids::RULE_DEFAULTS_SOURCES_NON_EMPTY,
            path: Some("defaults.sources".to_string()),
            message: "at least one source pattern is required".to_string(),
        });
    }

    check_entry(&doc.defaults, ids::ENTRY_DEFAULTS)?;
    for (i, entry) in doc.projects.iter().enumerate() {
        check_entry(entry, &ids::project_entry(i))?;
    }
    Ok(())
}

pub fn validate_repo_policy(doc: &RepoPolicyV1) -> Result<(), LoadError> {
    check_version(PolicyRole::Repo, doc.version)?;

    for (i, project) in doc.projects.iter().enumerate() {
        let base = ids::project_entry(i);
        if let Some(source) = &project.source {
            check_pattern(PolicyRole::Repo, &source.uri, || format!("{base}.source.uri"))?;
        }
        check_pattern(PolicyRole::Repo, &project.image.uri, || {
            format!("{base}.image.uri")
        })?;
    }
    Ok(())
}

fn check_version(document: PolicyRole, version: i64) -> Result<(), LoadError> {
    if version == ids::SUPPORTED_POLICY_VERSION {
        return Ok(());
    }
    Err(LoadError::InvalidPolicy {
        document,
        rule: ids::RULE_SUPPORTED_VERSION,
        path: Some("version".to_string()),
        message: format!(
            "unsupported version {version} (expected {})",
            ids::SUPPORTED_POLICY_VERSION
        ),
    })
}

fn check_entry(entry: &EntryV1, base: &str) -> Result<(), LoadError> {
    let org = PolicyRole::Org;
    for (j, r) in entry.sources.iter().enumerate() {
        check_pattern(org, &r.uri, || format!("{base}.sources[{j}].uri"))?;
    }
    for (j, r) in entry.images.iter().enumerate() {
        check_pattern(org, &r.uri, || format!("{base}.images[{j}].uri"))?;
    }
    for (j, b) in entry.build_track.builders.iter().enumerate() {
        check_pattern(org, &b.id, || format!("{base}.buildTrack.builders[{j}].id"))?;
    }
    Ok(())
}

fn check_pattern(
    document: PolicyRole,
    pattern: &str,
    path: impl FnOnce() -> String,
) -> Result<(), LoadError> {
    let (rule, message) = if pattern.is_empty() {
        (ids::RULE_PATTERN_NON_EMPTY, "pattern must not be empty".to_string())
    } else if wildcard_count(pattern) > 1 {
        (
            ids::RULE_PATTERN_SYNTAX,
            format!("pattern {pattern:?} has more than one `{WILDCARD}` wildcard"),
        )
    } else {
        return Ok(());
    };

    Err(LoadError::InvalidPolicy {
        document,
        rule,
        path: Some(path()),
        message,
    })
}
