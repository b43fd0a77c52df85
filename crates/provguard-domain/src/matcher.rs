//! Pattern matching capability consumed by the engine.
//!
//! The engine never inspects patterns itself; it only asks a `PatternMatcher`.

use globset::GlobBuilder;

/// The single wildcard token a pattern may contain.
pub const WILDCARD: char = '*';

/// Glob-style predicate over a pattern and a concrete candidate.
///
/// Implementations must be total: a pattern they cannot interpret simply does
/// not match.
pub trait PatternMatcher {
    fn matches(&self, pattern: &str, candidate: &str) -> bool;
}

impl<F> PatternMatcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, pattern: &str, candidate: &str) -> bool {
        self(pattern, candidate)
    }
}

/// Shell-glob matcher backed by `globset`.
///
/// `*` matches any substring, including `/`. Every other character is literal,
/// so `?`, `[...]` and `{a,b}` carry no glob meaning. Matching is
/// case-sensitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobMatcher;

impl PatternMatcher for GlobMatcher {
    fn matches(&self, pattern: &str, candidate: &str) -> bool {
        match compile(pattern) {
            Some(glob) => glob.is_match(candidate),
            None => false,
        }
    }
}

fn compile(pattern: &str) -> Option<globset::GlobMatcher> {
    let glob = pattern
        .split(WILDCARD)
        .map(escape_literal)
        .collect::<Vec<_>>()
        .join("*");
    GlobBuilder::new(&glob)
        .literal_separator(false)
        .case_insensitive(false)
        .backslash_escape(false)
        .build()
        .ok()
        .map(|glob| glob.compile_matcher())
}

/// Wrap every glob metacharacter in a single-character class.
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '?' | '*' | '[' | ']' | '{' | '}' | '\\' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Number of wildcard tokens in `pattern`.
pub fn wildcard_count(pattern: &str) -> usize {
    pattern.matches(WILDCARD).count()
}
