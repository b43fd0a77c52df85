//! Immutable, evaluated form of the two policy documents.

use crate::engine::{self, EvaluationInput};
use crate::matcher::GlobMatcher;
use provguard_types::{VerificationOutcome, ids};
use std::fmt;

/// Enforcement mode. Ordered: `Audit < Enforce`, so a child may only move up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Audit,
    Enforce,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Audit => "audit",
            Mode::Enforce => "enforce",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderRule {
    pub id: String,
    /// Declared build level. Carried through but not evaluated.
    pub level: u32,
}

/// One governance rule: sources it owns, images and builders it permits.
///
/// Empty `images` / `builders` mean unconstrained; empty `sources` never matches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub sources: Vec<String>,
    pub images: Vec<String>,
    pub builders: Vec<BuilderRule>,
    pub mode: Option<Mode>,
}

/// Position of an organization entry in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryId {
    Defaults,
    Project(usize),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Defaults => f.write_str(ids::ENTRY_DEFAULTS),
            EntryId::Project(i) => f.write_str(&ids::project_entry(*i)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrgPolicy {
    pub defaults: Entry,
    pub projects: Vec<Entry>,
}

impl OrgPolicy {
    /// Entries in the order they are tried: `defaults`, then `projects` in document order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &Entry)> + '_ {
        std::iter::once((EntryId::Defaults, &self.defaults)).chain(
            self.projects
                .iter()
                .enumerate()
                .map(|(i, e)| (EntryId::Project(i), e)),
        )
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        match id {
            EntryId::Defaults => Some(&self.defaults),
            EntryId::Project(i) => self.projects.get(i),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoProject {
    /// `None` applies the project to every source.
    pub source: Option<String>,
    pub image: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepoPolicy {
    pub mode: Option<Mode>,
    pub projects: Vec<RepoProject>,
}

/// Read-only snapshot of a loaded organization + repository policy pair.
///
/// There are no mutators; share it by reference (or `Arc`) across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    org: OrgPolicy,
    repo: RepoPolicy,
}

impl Policy {
    /// Assemble a policy. Load-time invariants are the loader's job; the engine
    /// reports violations it stumbles on as `Invalid`.
    pub fn new(org: OrgPolicy, repo: RepoPolicy) -> Self {
        Self { org, repo }
    }

    pub fn org(&self) -> &OrgPolicy {
        &self.org
    }

    pub fn repo(&self) -> &RepoPolicy {
        &self.repo
    }

    /// Baseline evaluation with the default glob matcher.
    pub fn evaluate(&self, source_uri: &str, image_uri: &str, builder_id: &str) -> VerificationOutcome {
        engine::evaluate(
            self,
            &GlobMatcher,
            &EvaluationInput {
                source_uri,
                image_uri,
                builder_id,
            },
        )
    }
}
