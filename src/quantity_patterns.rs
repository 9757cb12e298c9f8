//! # Quantity Patterns Module
//!
//! This module contains the regex pattern used to find quantity tokens inside
//! an ingredient line.

use lazy_static::lazy_static;
use regex::Regex;

// Alternation order matters: the regex engine is leftmost-first, so a mixed
// number ("1 1/2") wins over the fraction ("1/2") or integer ("1") it contains.
pub const QUANTITY_PATTERN: &str = r"(?P<mixed>(?P<whole>\d+)\s+(?P<mnum>\d+)/(?P<mden>\d+))|(?P<fraction>(?P<num>\d+)/(?P<den>\d+))|(?P<decimal>\d+(?:\.\d+)?)";

// Lazy static regex for the quantity pattern to avoid recompilation
lazy_static! {
    pub static ref QUANTITY_REGEX: Regex =
        Regex::new(QUANTITY_PATTERN).expect("Quantity pattern should be valid");
}
