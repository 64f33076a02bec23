//! Pattern definitions and their compilation.
//!
//! `builtin` lists the fixed detector battery (phone, email, IP, URL, credit
//! card, SSN, address, date). `compiler` turns that battery, minus any
//! disabled categories and plus any user-defined detectors, into compiled
//! regexes that the pattern engine runs over the input.

pub mod builtin;
pub mod compiler;
