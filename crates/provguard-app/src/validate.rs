//! The `validate` use case: load both documents without evaluating anything.

use provguard_types::PolicyDigest;

use crate::policy_files::{PolicyFiles, load_policy_files};

/// Read and load both files; any read or load failure is an error.
pub fn run_validate(files: &PolicyFiles) -> anyhow::Result<Vec<PolicyDigest>> {
    let loaded = load_policy_files(files)?;
    let policy = loaded.policy?;
    tracing::info!(
        projects = policy.org().projects.len(),
        repo_projects = policy.repo().projects.len(),
        "policy documents are valid"
    );
    Ok(loaded.digests)
}
