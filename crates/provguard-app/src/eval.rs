//! The `eval` use case: load both policies, evaluate one artifact, build a report.

use provguard_domain::{EvaluationInput, GlobMatcher, Policy};
use provguard_types::{
    EvaluationInputs, ProvguardReport, SCHEMA_REPORT_V1, ToolMeta, VerificationOutcome,
    VerificationStatus,
};
use time::OffsetDateTime;

use crate::policy_files::{PolicyFiles, load_policy_files};

/// Input for the eval use case.
#[derive(Clone, Debug)]
pub struct EvalInput<'a> {
    pub files: &'a PolicyFiles,
    pub inputs: EvaluationInputs,
    /// Apply `mode` fields from both documents. Off means baseline semantics.
    pub enforce_modes: bool,
}

#[derive(Clone, Debug)]
pub struct EvalOutput {
    pub report: ProvguardReport,
}

impl EvalOutput {
    /// `None` when the policies failed to load; see `report.error`.
    pub fn outcome(&self) -> Option<&VerificationOutcome> {
        self.report.outcome.as_ref()
    }
}

/// Run the eval use case.
///
/// Only unreadable files are errors. A document that fails to load still yields
/// a report, with `error` set and no outcome.
pub fn run_eval(input: EvalInput<'_>) -> anyhow::Result<EvalOutput> {
    let started_at = OffsetDateTime::now_utc();

    let loaded = load_policy_files(input.files)?;
    let (outcome, error) = match loaded.policy {
        Ok(policy) => (Some(evaluate(&policy, &input.inputs, input.enforce_modes)), None),
        Err(err) => {
            tracing::warn!(error = %err, "policy documents failed to load");
            (None, Some(err.to_string()))
        }
    };

    let report = ProvguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "provguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        inputs: input.inputs,
        policies: loaded.digests,
        outcome,
        error,
    };
    Ok(EvalOutput { report })
}

fn evaluate(policy: &Policy, inputs: &EvaluationInputs, enforce_modes: bool) -> VerificationOutcome {
    let input = EvaluationInput {
        source_uri: &inputs.source_uri,
        image_uri: &inputs.image_uri,
        builder_id: &inputs.builder_id,
    };
    if enforce_modes {
        provguard_domain::evaluate_with_enforcement(policy, &GlobMatcher, &input)
    } else {
        provguard_domain::evaluate(policy, &GlobMatcher, &input)
    }
}

/// Map outcome status to exit code: 0 = pass/audit, 2 = fail, 3 = invalid.
pub fn status_exit_code(status: VerificationStatus) -> i32 {
    match status {
        VerificationStatus::Pass => 0,
        VerificationStatus::Audit => 0,
        VerificationStatus::Fail => 2,
        VerificationStatus::Invalid => 3,
    }
}

/// Exit code for a finished report; 1 when no outcome was produced.
pub fn report_exit_code(report: &ProvguardReport) -> i32 {
    report
        .outcome
        .as_ref()
        .map_or(1, |outcome| status_exit_code(outcome.status()))
}
