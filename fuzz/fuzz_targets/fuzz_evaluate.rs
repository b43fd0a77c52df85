//! Fuzz target for evaluation over a fixed, valid policy.
//!
//! Goal: arbitrary identifiers never panic the engine, and repeated evaluation
//! of the same input yields the same outcome.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

const ORG: &str = r#"{
  "version": 1,
  "defaults": {
    "sources": [{ "uri": "git+https://github.com/acme/*" }],
    "images": [{ "uri": "registry.acme.com/*" }],
    "mode": "audit"
  },
  "projects": [
    {
      "sources": [{ "uri": "git+https://github.com/partner/*" }],
      "buildTrack": { "builders": [{ "id": "https://builder.example/*", "level": 3 }] }
    }
  ]
}"#;

const REPO: &str = r#"{
  "version": 1,
  "mode": "enforce",
  "projects": [{ "image": { "uri": "registry.acme.com/widgets:*" } }]
}"#;

fn policy() -> Option<&'static provguard_domain::Policy> {
    static POLICY: OnceLock<Option<provguard_domain::Policy>> = OnceLock::new();
    POLICY
        .get_or_init(|| provguard_settings::load(&[ORG, REPO]).ok())
        .as_ref()
}

#[derive(Arbitrary, Debug)]
struct EvalInput {
    source_uri: String,
    image_uri: String,
    builder_id: String,
}

fuzz_target!(|input: EvalInput| {
    let Some(policy) = policy() else {
        return;
    };
    let eval = provguard_domain::EvaluationInput {
        source_uri: &input.source_uri,
        image_uri: &input.image_uri,
        builder_id: &input.builder_id,
    };
    let matcher = provguard_domain::GlobMatcher;
    let first = provguard_domain::evaluate_with_enforcement(policy, &matcher, &eval);
    let second = provguard_domain::evaluate_with_enforcement(policy, &matcher, &eval);
    assert_eq!(first, second);
});
