use crate::policy::{BuilderRule, Entry, OrgPolicy, Policy, RepoPolicy, RepoProject};

pub fn builder(id: &str, level: u32) -> BuilderRule {
    BuilderRule {
        id: id.to_string(),
        level,
    }
}

pub fn entry(sources: &[&str], images: &[&str], builders: &[BuilderRule]) -> Entry {
    Entry {
        sources: sources.iter().map(|s| s.to_string()).collect(),
        images: images.iter().map(|s| s.to_string()).collect(),
        builders: builders.to_vec(),
        mode: None,
    }
}

pub fn org(defaults: Entry, projects: Vec<Entry>) -> OrgPolicy {
    OrgPolicy { defaults, projects }
}

pub fn repo(projects: Vec<RepoProject>) -> RepoPolicy {
    RepoPolicy {
        mode: None,
        projects,
    }
}

pub fn repo_project(source: Option<&str>, image: &str) -> RepoProject {
    RepoProject {
        source: source.map(|s| s.to_string()),
        image: image.to_string(),
    }
}

pub fn policy(org: OrgPolicy, repo: RepoPolicy) -> Policy {
    Policy::new(org, repo)
}
