//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Determinism of repeated evaluation
//! - Unconstrained image / builder lists
//! - Ownership exclusivity of the first matching entry
//! - The baseline engine never producing `Audit`

use crate::engine::{EvaluationInput, evaluate};
use crate::matcher::GlobMatcher;
use crate::policy::Policy;
use crate::test_support::{builder, entry, org, policy, repo, repo_project};
use provguard_types::{Field, VerificationStatus};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Lowercase path segment, never containing glob metacharacters.
fn arb_segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,11}").unwrap()
}

fn arb_source() -> impl Strategy<Value = String> {
    (arb_segment(), arb_segment())
        .prop_map(|(org, repo)| format!("git+https://github.com/{org}/{repo}"))
}

fn arb_image() -> impl Strategy<Value = String> {
    (arb_segment(), arb_segment(), 0u32..20)
        .prop_map(|(host, name, tag)| format!("{host}.example.com/{name}:v{tag}"))
}

fn arb_builder_id() -> impl Strategy<Value = String> {
    arb_segment().prop_map(|b| format!("https://builders.example.com/{b}"))
}

/// Either a literal taken from the candidate pool, or a prefix pattern.
fn arb_pattern(pool: Vec<String>) -> impl Strategy<Value = String> {
    prop::sample::select(pool).prop_flat_map(|literal| {
        let cut = literal.rfind('/').map(|i| i + 1).unwrap_or(0);
        let prefix = format!("{}*", &literal[..cut]);
        prop_oneof![Just(literal), Just(prefix)]
    })
}

fn arb_policy() -> impl Strategy<Value = Policy> {
    let sources = prop::collection::vec(arb_source(), 1..4);
    let images = prop::collection::vec(arb_image(), 1..4);
    (sources, images).prop_flat_map(|(sources, images)| {
        let src_pats = prop::collection::vec(arb_pattern(sources.clone()), 1..3);
        let img_pats = prop::collection::vec(arb_pattern(images.clone()), 0..3);
        let project_src = prop::collection::vec(arb_pattern(sources), 0..3);
        let project_img = prop::collection::vec(arb_pattern(images.clone()), 0..3);
        let repo_imgs = prop::collection::vec(arb_pattern(images), 0..2);
        (src_pats, img_pats, project_src, project_img, repo_imgs).prop_map(
            |(src_pats, img_pats, project_src, project_img, repo_imgs)| {
                let s: Vec<&str> = src_pats.iter().map(String::as_str).collect();
                let i: Vec<&str> = img_pats.iter().map(String::as_str).collect();
                let ps: Vec<&str> = project_src.iter().map(String::as_str).collect();
                let pi: Vec<&str> = project_img.iter().map(String::as_str).collect();
                let projects = repo_imgs
                    .iter()
                    .map(|img| repo_project(None, img))
                    .collect();
                policy(org(entry(&s, &i, &[]), vec![entry(&ps, &pi, &[])]), repo(projects))
            },
        )
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        p in arb_policy(),
        source in arb_source(),
        image in arb_image(),
        builder_id in arb_builder_id(),
    ) {
        let input = EvaluationInput {
            source_uri: &source,
            image_uri: &image,
            builder_id: &builder_id,
        };
        let first = evaluate(&p, &GlobMatcher, &input);
        let second = evaluate(&p, &GlobMatcher, &input);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn baseline_never_audits(
        p in arb_policy(),
        source in arb_source(),
        image in arb_image(),
        builder_id in arb_builder_id(),
    ) {
        let outcome = p.evaluate(&source, &image, &builder_id);
        prop_assert_ne!(outcome.status(), VerificationStatus::Audit);
        if !outcome.is_pass() {
            prop_assert!(outcome.diagnostic().is_some());
        }
    }

    #[test]
    fn empty_images_and_builders_accept_any_value(
        source in arb_source(),
        image in arb_image(),
        builder_id in arb_builder_id(),
    ) {
        let p = policy(org(entry(&[source.as_str()], &[], &[]), vec![]), repo(vec![]));
        prop_assert!(p.evaluate(&source, &image, &builder_id).is_pass());
    }

    #[test]
    fn non_empty_builders_require_a_match(
        source in arb_source(),
        image in arb_image(),
        allowed in arb_builder_id(),
        candidate in arb_builder_id(),
    ) {
        let p = policy(
            org(entry(&[source.as_str()], &[], &[builder(&allowed, 2)]), vec![]),
            repo(vec![]),
        );
        let outcome = p.evaluate(&source, &image, &candidate);
        if allowed == candidate {
            prop_assert!(outcome.is_pass());
        } else {
            prop_assert!(outcome.is_fail());
            prop_assert_eq!(outcome.diagnostic().unwrap().field, Field::Builder);
        }
    }

    #[test]
    fn first_owning_entry_denial_is_final(
        source in arb_source(),
        image in arb_image(),
        other_image in arb_image(),
    ) {
        prop_assume!(image != other_image);
        let first = entry(&[source.as_str()], &[other_image.as_str()], &[]);
        let second = entry(&[source.as_str()], &[image.as_str()], &[]);
        let p = policy(
            org(entry(&["git+https://nowhere.invalid/*"], &[], &[]), vec![first, second]),
            repo(vec![]),
        );
        let outcome = p.evaluate(&source, &image, "https://builders.example.com/b");
        prop_assert!(outcome.is_fail());
        prop_assert_eq!(outcome.diagnostic().unwrap().entry.as_deref(), Some("projects[0]"));
    }
}
