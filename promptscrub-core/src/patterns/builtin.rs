//! The built-in pattern battery.
//!
//! Order matters: detectors run, and report, in the order listed here.
//! Confidence constants encode how much each detector is trusted relative to
//! the others.
//!
//! Digits and word boundaries are ASCII-only: `[0-9]` and `(?-u:\b)` rather
//! than the Unicode `\d` and `\b`, so full-width or Arabic-Indic numerals are
//! not reported as numbers.

/// Extra check applied to a raw regex match before it becomes a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validation {
    None,
    /// The match must contain a plausible number of digits.
    PhoneDigits,
    /// The match must not be the host part of an email address.
    StandaloneHost,
}

/// Static description of one built-in detector.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinPattern {
    pub category: &'static str,
    pub pattern: &'static str,
    pub confidence: f64,
    pub case_insensitive: bool,
    pub validation: Validation,
}

pub const BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    BuiltinPattern {
        category: "PHONE",
        pattern: r"\+?[0-9]{2}?\s?\(?[0-9]{3}\)?\s?-?[0-9]{2}\s?[0-9]\s?-?[0-9]{4}|\(?[0-9]{3}\)?\s?-?[0-9]{2}\s?[0-9]\s?-?[0-9]{4}|\+?[0-9\s()\-]{10,}",
        confidence: 0.95,
        case_insensitive: false,
        validation: Validation::PhoneDigits,
    },
    BuiltinPattern {
        category: "EMAIL",
        pattern: r"[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}(?:\.[a-zA-Z]{2,})*",
        confidence: 0.98,
        case_insensitive: false,
        validation: Validation::None,
    },
    BuiltinPattern {
        category: "IP_ADDRESS",
        pattern: r"(?-u:\b)(?:[0-9]{1,3}\.){3}[0-9]{1,3}(?-u:\b)",
        confidence: 0.92,
        case_insensitive: false,
        validation: Validation::None,
    },
    BuiltinPattern {
        category: "URL",
        pattern: r"(?:https?://)?(?:[a-zA-Z0-9-]*[a-zA-Z][a-zA-Z0-9-]*\.)+[a-zA-Z]{2,}(?::[0-9]+)?(?:/[a-zA-Z0-9&%_./-]*)?",
        confidence: 0.90,
        case_insensitive: false,
        validation: Validation::StandaloneHost,
    },
    BuiltinPattern {
        category: "CREDIT_CARD",
        pattern: r"(?-u:\b)(?:[0-9]{4}[\s-]?){3}[0-9]{4}(?-u:\b)",
        confidence: 0.88,
        case_insensitive: false,
        validation: Validation::None,
    },
    BuiltinPattern {
        category: "SSN",
        pattern: r"(?-u:\b)[0-9]{3}-?[0-9]{2}-?[0-9]{4}(?-u:\b)",
        confidence: 0.93,
        case_insensitive: false,
        validation: Validation::None,
    },
    BuiltinPattern {
        category: "ADDRESS",
        pattern: r"(?-u:\b)[0-9]+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Square|Sq|Terrace|Ter|Way|Wy)(?-u:\b)",
        confidence: 0.75,
        case_insensitive: true,
        validation: Validation::None,
    },
    BuiltinPattern {
        category: "DATE",
        pattern: r"(?-u:\b)(?:[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}|[0-9]{1,2}-[0-9]{1,2}-[0-9]{2,4}|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+[0-9]{1,2},\s+[0-9]{4})(?-u:\b)",
        confidence: 0.70,
        case_insensitive: true,
        validation: Validation::None,
    },
];
