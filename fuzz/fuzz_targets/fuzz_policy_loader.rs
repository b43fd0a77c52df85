//! Fuzz target for the policy document loader.
//!
//! Goal: loading **never panics** on any byte input. Malformed or invalid
//! documents must come back as `LoadError`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_loader
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct LoaderInput {
    org: Vec<u8>,
    repo: Vec<u8>,
}

fuzz_target!(|input: LoaderInput| {
    if input.org.len() > 64 * 1024 || input.repo.len() > 64 * 1024 {
        return;
    }

    // Errors are fine; panics are not.
    let _ = provguard_settings::load(&[input.org, input.repo]);
});
