// File: promptscrub-core/src/validators.rs
//! Programmatic checks applied to raw pattern matches.
//!
//! Some built-in patterns are deliberately loose. These checks run on each
//! match before it becomes a candidate and reject the shapes that are
//! obviously not PII, such as a markdown rule line matched as a phone number.
//!
//! License: MIT OR APACHE 2.0

use crate::patterns::builtin::Validation;

const MIN_PHONE_DIGITS: usize = 7;

/// Runs the check named by `validation` on the match `haystack[start..end]`.
pub fn passes(validation: Validation, haystack: &str, start: usize, end: usize) -> bool {
    match validation {
        Validation::None => true,
        Validation::PhoneDigits => is_plausible_phone(&haystack[start..end]),
        Validation::StandaloneHost => is_standalone_host(haystack, start, end),
    }
}

/// A phone match carries at least 7 digits.
///
/// The loosest phone alternative accepts any long run of digits, spaces,
/// dashes and parentheses, which would otherwise flag separator lines. There
/// is no upper bound: that alternative is greedy, so several numbers written
/// back to back arrive as one match and must be reported together.
pub fn is_plausible_phone(candidate: &str) -> bool {
    candidate.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

/// A host-like match touching an `@` is part of an email address, which the
/// email detector already reports in full.
pub fn is_standalone_host(haystack: &str, start: usize, end: usize) -> bool {
    let preceded_by_at = haystack[..start].ends_with('@');
    let followed_by_at = haystack[end..].starts_with('@');
    !(preceded_by_at || followed_by_at)
}
