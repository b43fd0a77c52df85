//! Policy document parsing, validation, and resolution.
//!
//! This crate is intentionally IO-free: it turns raw document bytes into a
//! validated, immutable `provguard_domain::Policy`.

#![forbid(unsafe_code)]

mod error;
mod load;
mod model;
mod resolve;

pub use error::LoadError;
pub use load::{parse_org_policy, parse_repo_policy, validate_org_policy, validate_repo_policy};
pub use model::{
    AttestorV1, BuildTrackV1, BuilderV1, EntryV1, ModeV1, OrgPolicyV1, RepoPolicyV1,
    RepoProjectV1, ResourceV1, SourceTrackV1,
};
pub use resolve::resolve_policy;

use provguard_domain::Policy;

/// Load the ordered pair `[organization, repository]` of raw policy documents.
///
/// Any other number of documents is rejected before parsing.
pub fn load<B: AsRef<[u8]>>(documents: &[B]) -> Result<Policy, LoadError> {
    let [org, repo] = documents else {
        return Err(LoadError::InvalidInput {
            count: documents.len(),
        });
    };

    let org = parse_org_policy(org.as_ref())?;
    validate_org_policy(&org)?;
    let repo = parse_repo_policy(repo.as_ref())?;
    validate_repo_policy(&repo)?;

    tracing::debug!(
        org_projects = org.projects.len(),
        repo_projects = repo.projects.len(),
        "policy documents loaded"
    );

    Ok(resolve_policy(org, repo))
}
