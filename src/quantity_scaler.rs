//! # Quantity Scaler
//!
//! This module rescales the numeric quantities embedded in free-text ingredient
//! lines. A line is split into a token stream of literal text and quantity
//! tokens; quantities are multiplied by the scaling ratio and formatted back,
//! everything else is copied through verbatim.
//!
//! ## Features
//!
//! - Mixed numbers ("1 1/2"), fractions ("1/2"), decimals ("1.5") and integers ("2")
//! - Several quantities per line, each scaled independently
//! - Whole-number tokens stay whole ("2 eggs" never becomes "2.0 eggs")
//! - Best-effort: a token that cannot be evaluated is left untouched
//!
//! ## Usage
//!
//! ```rust
//! use copycat::quantity_scaler::scale_line;
//!
//! assert_eq!(scale_line("1 1/2 cups sugar", 2.0), "3.0 cups sugar");
//! assert_eq!(scale_line("2 eggs", 1.5), "3 eggs");
//! ```

use crate::quantity_patterns::QUANTITY_REGEX;
use std::fmt;
use tracing::{debug, trace};

/// The lexical form a quantity token was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    /// Whole number followed by a fraction (e.g., "1 1/2")
    Mixed {
        whole: u64,
        numerator: u64,
        denominator: u64,
    },
    /// Simple fraction (e.g., "3/4")
    Fraction { numerator: u64, denominator: u64 },
    /// Number written with a decimal point (e.g., "1.5")
    Decimal,
    /// Plain whole number (e.g., "2")
    Integer,
}

/// A quantity found inside an ingredient line
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityToken {
    /// The exact source text of the token
    pub text: String,
    /// How the token was written
    pub kind: QuantityKind,
}

/// A piece of a tokenized ingredient line
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Text copied through unchanged
    Literal(String),
    /// A numeric quantity subject to scaling
    Quantity(QuantityToken),
}

/// Servings state for one displayed recipe
///
/// Both serving counts are kept at 1 or above, so the ratio is always
/// positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingContext {
    original_servings: u32,
    current_servings: u32,
}

/// Errors raised when building a scaling context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    /// The recipe declared zero servings
    ZeroOriginalServings,
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleError::ZeroOriginalServings => {
                write!(f, "Cannot scale recipe: original servings must be at least 1")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

impl ScalingContext {
    /// Create a context displaying the recipe at its original size
    pub fn new(original_servings: u32) -> Result<Self, ScaleError> {
        if original_servings == 0 {
            return Err(ScaleError::ZeroOriginalServings);
        }
        Ok(Self {
            original_servings,
            current_servings: original_servings,
        })
    }

    pub fn original_servings(&self) -> u32 {
        self.original_servings
    }

    pub fn current_servings(&self) -> u32 {
        self.current_servings
    }

    /// Set the displayed servings, clamped to at least 1
    pub fn set_current(&mut self, servings: u32) {
        self.current_servings = servings.max(1);
    }

    /// Add one serving
    pub fn increment(&mut self) {
        self.current_servings = self.current_servings.saturating_add(1);
    }

    /// Remove one serving; never goes below 1
    pub fn decrement(&mut self) {
        if self.current_servings > 1 {
            self.current_servings -= 1;
        }
    }

    /// current servings ÷ original servings
    pub fn ratio(&self) -> f64 {
        self.current_servings as f64 / self.original_servings as f64
    }
}

impl QuantityToken {
    /// Numeric value of the token, or `None` for a zero denominator
    pub fn value(&self) -> Option<f64> {
        match self.kind {
            QuantityKind::Mixed {
                whole,
                numerator,
                denominator,
            } => {
                if denominator == 0 {
                    return None;
                }
                Some(whole as f64 + numerator as f64 / denominator as f64)
            }
            QuantityKind::Fraction {
                numerator,
                denominator,
            } => {
                if denominator == 0 {
                    return None;
                }
                Some(numerator as f64 / denominator as f64)
            }
            QuantityKind::Decimal | QuantityKind::Integer => self.text.parse().ok(),
        }
    }

    /// Whether the scaled value is written with one decimal place
    pub fn keeps_decimal(&self) -> bool {
        !matches!(self.kind, QuantityKind::Integer)
    }

    /// Scale the token and format it back to text
    ///
    /// Returns the original text unchanged when the token has no usable value.
    pub fn scaled(&self, ratio: f64) -> String {
        let Some(value) = self.value() else {
            debug!("Leaving unparseable quantity '{}' untouched", self.text);
            return self.text.clone();
        };

        let scaled = value * ratio;
        if !scaled.is_finite() {
            debug!(
                "Scaling '{}' by {} gave a non-finite result, leaving it untouched",
                self.text, ratio
            );
            return self.text.clone();
        }

        // f64::round rounds half away from zero
        if self.keeps_decimal() {
            format!("{:.1}", (scaled * 10.0).round() / 10.0)
        } else {
            format!("{:.0}", scaled.round())
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(text) => write!(f, "{}", text),
            Token::Quantity(quantity) => write!(f, "{}", quantity.text),
        }
    }
}

/// Split an ingredient line into literal and quantity tokens
///
/// Concatenating the `Display` output of every token reproduces the input.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for captures in QUANTITY_REGEX.captures_iter(line) {
        let Some(whole_match) = captures.get(0) else {
            continue;
        };

        if whole_match.start() > last_end {
            tokens.push(Token::Literal(
                line[last_end..whole_match.start()].to_string(),
            ));
        }

        let number = |name: &str| -> Option<u64> {
            captures.name(name).and_then(|m| m.as_str().parse().ok())
        };

        let kind = if captures.name("mixed").is_some() {
            match (number("whole"), number("mnum"), number("mden")) {
                (Some(whole), Some(numerator), Some(denominator)) => Some(QuantityKind::Mixed {
                    whole,
                    numerator,
                    denominator,
                }),
                _ => None,
            }
        } else if captures.name("fraction").is_some() {
            match (number("num"), number("den")) {
                (Some(numerator), Some(denominator)) => Some(QuantityKind::Fraction {
                    numerator,
                    denominator,
                }),
                _ => None,
            }
        } else if whole_match.as_str().contains('.') {
            Some(QuantityKind::Decimal)
        } else {
            Some(QuantityKind::Integer)
        };

        let text = whole_match.as_str().to_string();
        match kind {
            Some(kind) => tokens.push(Token::Quantity(QuantityToken { text, kind })),
            // Digit runs too long for u64 stay literal
            None => tokens.push(Token::Literal(text)),
        }

        last_end = whole_match.end();
    }

    if last_end < line.len() {
        tokens.push(Token::Literal(line[last_end..].to_string()));
    }

    trace!("Tokenized '{}' into {} tokens", line, tokens.len());
    tokens
}

/// Scale every quantity in an ingredient line by `ratio`
pub fn scale_line(line: &str, ratio: f64) -> String {
    let scaled: String = tokenize(line)
        .into_iter()
        .map(|token| match token {
            Token::Literal(text) => text,
            Token::Quantity(quantity) => quantity.scaled(ratio),
        })
        .collect();

    trace!("Scaled '{}' by {} -> '{}'", line, ratio, scaled);
    scaled
}
