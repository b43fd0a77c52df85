//! Reading policy documents from disk.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use provguard_domain::Policy;
use provguard_settings::LoadError;
use provguard_types::{PolicyDigest, PolicyRole};
use sha2::{Digest, Sha256};

/// Locations of the organization and repository documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyFiles {
    pub org: Utf8PathBuf,
    pub repo: Utf8PathBuf,
}

impl PolicyFiles {
    pub fn new(org: impl Into<Utf8PathBuf>, repo: impl Into<Utf8PathBuf>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
        }
    }
}

/// Raw bytes of both documents, in loader order, with their digests.
#[derive(Clone, Debug)]
pub struct PolicyBytes {
    pub documents: [Vec<u8>; 2],
    pub digests: Vec<PolicyDigest>,
}

/// Outcome of reading and loading both files.
///
/// Digests are available even when the content fails to load.
#[derive(Debug)]
pub struct LoadedPolicy {
    pub digests: Vec<PolicyDigest>,
    pub policy: Result<Policy, LoadError>,
}

/// Read both files. I/O failures are errors; content is not inspected.
pub fn read_policy_files(files: &PolicyFiles) -> anyhow::Result<PolicyBytes> {
    let org = read_document(&files.org).context("read organization policy")?;
    let repo = read_document(&files.repo).context("read repository policy")?;
    let digests = vec![
        digest(PolicyRole::Org, &files.org, &org),
        digest(PolicyRole::Repo, &files.repo, &repo),
    ];
    Ok(PolicyBytes {
        documents: [org, repo],
        digests,
    })
}

/// Read and load both files.
///
/// The returned error is I/O only; the loader's verdict lives in `policy`.
pub fn load_policy_files(files: &PolicyFiles) -> anyhow::Result<LoadedPolicy> {
    let bytes = read_policy_files(files)?;
    let policy = provguard_settings::load(&bytes.documents);
    Ok(LoadedPolicy {
        digests: bytes.digests,
        policy,
    })
}

fn read_document(path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("read {path}"))?;
    tracing::debug!(path = %path, bytes = bytes.len(), "read policy document");
    Ok(bytes)
}

fn digest(role: PolicyRole, path: &Utf8Path, bytes: &[u8]) -> PolicyDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    PolicyDigest {
        role,
        path: path.to_string(),
        sha256: hex::encode(hasher.finalize()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Utf8Path, name: &str, text: &str) -> Utf8PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).expect("write fixture");
        path
    }

    #[test]
    fn digests_cover_raw_bytes() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let files = PolicyFiles::new(write(dir, "org.json", ""), write(dir, "repo.json", "abc"));

        let bytes = read_policy_files(&files).expect("read");
        assert_eq!(bytes.digests[0].role, PolicyRole::Org);
        assert_eq!(
            bytes.digests[0].sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            bytes.digests[1].sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(bytes.digests[1].path, files.repo.as_str());
    }

    #[test]
    fn missing_file_is_an_io_error_naming_the_path() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let files = PolicyFiles::new(dir.join("absent.json"), dir.join("repo.json"));

        let err = read_policy_files(&files).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("read organization policy"), "{chain}");
        assert!(chain.contains("absent.json"), "{chain}");
    }

    #[test]
    fn content_errors_are_returned_separately_from_io() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let files = PolicyFiles::new(
            write(dir, "org.json", r#"{"version": 1, "defaults": {"sources": []}}"#),
            write(dir, "repo.json", r#"{"version": 1}"#),
        );

        let loaded = load_policy_files(&files).expect("files are readable");
        assert_eq!(loaded.digests.len(), 2);
        let err = loaded.policy.unwrap_err();
        assert_eq!(err.rule(), Some("defaults_sources_non_empty"));
    }
}
