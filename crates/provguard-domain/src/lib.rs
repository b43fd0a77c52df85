//! Pure provenance policy evaluation (no IO).
//!
//! Input: a `Policy` assembled elsewhere (normally by `provguard-settings`) plus
//! three concrete identifiers.
//! Output: a four-state `VerificationOutcome`.

#![forbid(unsafe_code)]

pub mod matcher;
pub mod policy;

mod enforcement;
mod engine;

pub use enforcement::evaluate_with_enforcement;
pub use engine::{EvaluationInput, evaluate};
pub use matcher::{GlobMatcher, PatternMatcher};
pub use policy::Policy;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;
