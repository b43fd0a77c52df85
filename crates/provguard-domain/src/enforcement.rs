//! Enforcement modes layered over the baseline engine.
//!
//! The organization's effective mode comes from the owning entry, then
//! `defaults`, then `Enforce`. A repository mode may only tighten it.

use crate::engine::{self, EvaluationInput};
use crate::matcher::PatternMatcher;
use crate::policy::{EntryId, Mode, Policy};
use provguard_types::{Diagnostic, Field, Phase, VerificationOutcome};

/// Evaluate, then apply enforcement modes: a `Fail` under an effective `Audit`
/// mode becomes `Audit`; a repository that loosens the organization mode is `Invalid`.
pub fn evaluate_with_enforcement<M>(
    policy: &Policy,
    matcher: &M,
    input: &EvaluationInput<'_>,
) -> VerificationOutcome
where
    M: PatternMatcher + ?Sized,
{
    let evaluation = engine::evaluate_detailed(policy, matcher, input);
    if evaluation.outcome.is_invalid() {
        return evaluation.outcome;
    }

    let org_mode = org_mode(policy, evaluation.owner);
    let effective = match policy.repo().mode {
        Some(repo_mode) if repo_mode < org_mode => {
            tracing::warn!(
                org_mode = org_mode.as_str(),
                repo_mode = repo_mode.as_str(),
                "repository policy loosens enforcement mode"
            );
            return VerificationOutcome::invalid(Diagnostic::new(
                Phase::Mode,
                Field::Mode,
                format!(
                    "repo policy cannot loosen mode from {} to {}",
                    org_mode.as_str(),
                    repo_mode.as_str()
                ),
            ));
        }
        Some(repo_mode) => repo_mode,
        None => org_mode,
    };

    if effective == Mode::Audit
        && evaluation.outcome.is_fail()
        && let Some(diagnostic) = evaluation.outcome.diagnostic()
    {
        tracing::info!(diagnostic = %diagnostic, "failure downgraded to audit");
        return VerificationOutcome::audited(diagnostic.clone());
    }

    evaluation.outcome
}

fn org_mode(policy: &Policy, owner: Option<EntryId>) -> Mode {
    let org = policy.org();
    owner
        .and_then(|id| org.entry(id))
        .and_then(|entry| entry.mode)
        .or(org.defaults.mode)
        .unwrap_or(Mode::Enforce)
}
