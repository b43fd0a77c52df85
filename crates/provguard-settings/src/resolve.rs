use crate::model::{EntryV1, ModeV1, OrgPolicyV1, RepoPolicyV1, RepoProjectV1};
use provguard_domain::Policy;
use provguard_domain::policy::{BuilderRule, Entry, Mode, OrgPolicy, RepoPolicy, RepoProject};

/// Map validated documents onto the evaluated policy.
///
/// Callers are expected to have run `validate_*` first; `load` does.
pub fn resolve_policy(org: OrgPolicyV1, repo: RepoPolicyV1) -> Policy {
    let org = OrgPolicy {
        defaults: resolve_entry(org.defaults),
        projects: org.projects.into_iter().map(resolve_entry).collect(),
    };
    let repo = RepoPolicy {
        mode: repo.mode.map(resolve_mode),
        projects: repo.projects.into_iter().map(resolve_project).collect(),
    };
    Policy::new(org, repo)
}

fn resolve_entry(entry: EntryV1) -> Entry {
    // sourceTrack is accepted for forward compatibility and dropped here.
    Entry {
        sources: entry.sources.into_iter().map(|r| r.uri).collect(),
        images: entry.images.into_iter().map(|r| r.uri).collect(),
        builders: entry
            .build_track
            .builders
            .into_iter()
            .map(|b| BuilderRule {
                id: b.id,
                level: b.level,
            })
            .collect(),
        mode: entry.mode.map(resolve_mode),
    }
}

fn resolve_project(project: RepoProjectV1) -> RepoProject {
    RepoProject {
        source: project.source.map(|r| r.uri),
        image: project.image.uri,
    }
}

fn resolve_mode(mode: ModeV1) -> Mode {
    match mode {
        ModeV1::Audit => Mode::Audit,
        ModeV1::Enforce => Mode::Enforce,
    }
}
