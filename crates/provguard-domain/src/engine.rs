use crate::matcher::{PatternMatcher, WILDCARD};
use crate::policy::{Entry, EntryId, Policy, RepoPolicy};
use provguard_types::{Diagnostic, Field, Phase, VerificationOutcome};

/// The concrete identifiers an artifact's provenance claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluationInput<'a> {
    pub source_uri: &'a str,
    pub image_uri: &'a str,
    pub builder_id: &'a str,
}

/// Outcome plus the organization entry that claimed the source, if any.
#[derive(Clone, Debug)]
pub(crate) struct Evaluation {
    pub outcome: VerificationOutcome,
    pub owner: Option<EntryId>,
}

/// Decide whether `input` is permitted by `policy`.
///
/// Phase 1 selects the first organization entry whose sources match and checks
/// image and builder against it only. Phase 2 runs only if phase 1 passed.
/// Never returns `Audit`.
pub fn evaluate<M>(policy: &Policy, matcher: &M, input: &EvaluationInput<'_>) -> VerificationOutcome
where
    M: PatternMatcher + ?Sized,
{
    evaluate_detailed(policy, matcher, input).outcome
}

pub(crate) fn evaluate_detailed<M>(
    policy: &Policy,
    matcher: &M,
    input: &EvaluationInput<'_>,
) -> Evaluation
where
    M: PatternMatcher + ?Sized,
{
    let evaluation = run_phases(policy, matcher, input);

    let status = evaluation.outcome.status().as_str();
    match evaluation.outcome.diagnostic() {
        Some(d) if evaluation.outcome.is_invalid() => {
            tracing::warn!(status, diagnostic = %d, "policy evaluation is invalid");
        }
        Some(d) => tracing::info!(status, diagnostic = %d, "policy evaluation finished"),
        None => tracing::info!(status, "policy evaluation finished"),
    }

    evaluation
}

fn run_phases<M>(policy: &Policy, matcher: &M, input: &EvaluationInput<'_>) -> Evaluation
where
    M: PatternMatcher + ?Sized,
{
    if let Some(invalid) = check_input(input) {
        return Evaluation {
            outcome: invalid,
            owner: None,
        };
    }

    let org = policy.org();
    if org.defaults.sources.is_empty() {
        return Evaluation {
            outcome: VerificationOutcome::invalid(
                Diagnostic::new(
                    Phase::Org,
                    Field::Source,
                    "defaults declare no sources; the organization policy governs nothing",
                )
                .with_entry(EntryId::Defaults.to_string()),
            ),
            owner: None,
        };
    }

    // First source match owns the evaluation; later entries are never consulted.
    let Some((owner, entry)) = org
        .entries()
        .find(|(_, entry)| any_matches(matcher, &entry.sources, input.source_uri))
    else {
        return Evaluation {
            outcome: VerificationOutcome::failed(
                Diagnostic::new(Phase::Org, Field::Source, "no policy entry governs this source")
                    .with_value(input.source_uri),
            ),
            owner: None,
        };
    };
    tracing::debug!(entry = %owner, source_uri = input.source_uri, "organization entry owns source");

    if let Some(fail) = check_owning_entry(owner, entry, matcher, input) {
        return Evaluation {
            outcome: fail,
            owner: Some(owner),
        };
    }

    Evaluation {
        outcome: check_repo(policy.repo(), matcher, input),
        owner: Some(owner),
    }
}

fn check_input(input: &EvaluationInput<'_>) -> Option<VerificationOutcome> {
    let fields = [
        (Field::Source, input.source_uri),
        (Field::Image, input.image_uri),
        (Field::Builder, input.builder_id),
    ];
    for (field, value) in fields {
        if value.is_empty() {
            return Some(VerificationOutcome::invalid(Diagnostic::new(
                Phase::Input,
                field,
                format!("{field} identifier is empty"),
            )));
        }
        if value.contains(WILDCARD) {
            return Some(VerificationOutcome::invalid(
                Diagnostic::new(
                    Phase::Input,
                    field,
                    format!("{field} identifier must be concrete, not a pattern"),
                )
                .with_value(value),
            ));
        }
    }
    None
}

fn check_owning_entry<M>(
    owner: EntryId,
    entry: &Entry,
    matcher: &M,
    input: &EvaluationInput<'_>,
) -> Option<VerificationOutcome>
where
    M: PatternMatcher + ?Sized,
{
    if !entry.images.is_empty() && !any_matches(matcher, &entry.images, input.image_uri) {
        return Some(VerificationOutcome::failed(
            Diagnostic::new(Phase::Org, Field::Image, "image uri mismatch")
                .with_value(input.image_uri)
                .with_entry(owner.to_string()),
        ));
    }

    let builder_allowed = entry.builders.is_empty()
        || entry
            .builders
            .iter()
            .any(|b| matcher.matches(&b.id, input.builder_id));
    if !builder_allowed {
        return Some(VerificationOutcome::failed(
            Diagnostic::new(Phase::Org, Field::Builder, "builder id mismatch")
                .with_value(input.builder_id)
                .with_entry(owner.to_string()),
        ));
    }

    None
}

fn check_repo<M>(repo: &RepoPolicy, matcher: &M, input: &EvaluationInput<'_>) -> VerificationOutcome
where
    M: PatternMatcher + ?Sized,
{
    if repo.projects.is_empty() {
        return VerificationOutcome::passed();
    }

    let mut source_seen = false;
    for project in &repo.projects {
        let source_ok = project
            .source
            .as_deref()
            .is_none_or(|pattern| matcher.matches(pattern, input.source_uri));
        if !source_ok {
            continue;
        }
        source_seen = true;
        if matcher.matches(&project.image, input.image_uri) {
            return VerificationOutcome::passed();
        }
    }

    let diagnostic = if source_seen {
        Diagnostic::new(Phase::Repo, Field::Image, "image uri mismatch").with_value(input.image_uri)
    } else {
        Diagnostic::new(Phase::Repo, Field::Source, "source uri mismatch").with_value(input.source_uri)
    };
    VerificationOutcome::failed(diagnostic)
}

fn any_matches<M>(matcher: &M, patterns: &[String], candidate: &str) -> bool
where
    M: PatternMatcher + ?Sized,
{
    patterns.iter().any(|p| matcher.matches(p, candidate))
}
