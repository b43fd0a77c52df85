//! Stable DTOs and IDs used across the provguard workspace.
//!
//! This crate is intentionally boring:
//! - the four-state verification outcome and its diagnostic
//! - stable string IDs for load rules and schemas
//! - the emitted report envelope

#![forbid(unsafe_code)]

pub mod ids;
pub mod outcome;
pub mod report;

pub use outcome::{Diagnostic, Field, Phase, VerificationOutcome, VerificationStatus};
pub use report::{
    EvaluationInputs, PolicyDigest, PolicyRole, ProvguardReport, ToolMeta, SCHEMA_REPORT_V1,
};
