//! Use case orchestration for provguard.
//!
//! This crate provides the application layer: it reads policy files, hands the
//! bytes to the loader, runs the engine, and assembles the report. It is
//! intentionally thin and delegates evaluation to `provguard-domain`.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod eval;
mod policy_files;
mod report;
mod validate;

pub use eval::{EvalInput, EvalOutput, report_exit_code, run_eval, status_exit_code};
pub use policy_files::{
    LoadedPolicy, PolicyBytes, PolicyFiles, load_policy_files, read_policy_files,
};
pub use report::{serialize_report, write_report};
pub use validate::run_validate;
