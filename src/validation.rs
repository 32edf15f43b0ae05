//! Input Validation - Per-Symbology Rules
//!
//! Rules only inspect the raw text. They never see the prefixed payload.

use serde::{Deserialize, Serialize};
use crate::profiles::Symbology;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum ValidationResult {
    Accepted(String),
    Rejected(String),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }
}

/// Validation rule trait - one rule per symbology
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn symbology(&self) -> Symbology;
    fn validate(&self, raw_text: &str) -> ValidationResult;
}

pub const EAN13_REJECTION: &str = "must be exactly 12 digits";
pub const CODE128_REJECTION: &str = "must be 1-20 alphanumeric characters";
pub const QR_REJECTION: &str = "input cannot be empty";

// --- Concrete Rules ---

/// The engine appends the 13th (check) digit. Any numeric character passes
/// here; digits the encoder cannot represent fail at encoding time.
pub struct Ean13Rule;

impl ValidationRule for Ean13Rule {
    fn name(&self) -> &'static str { "ean13_digits" }

    fn symbology(&self) -> Symbology { Symbology::Ean13 }

    fn validate(&self, raw_text: &str) -> ValidationResult {
        if raw_text.chars().count() == 12 && raw_text.chars().all(char::is_numeric) {
            ValidationResult::Accepted(raw_text.to_string())
        } else {
            ValidationResult::Rejected(EAN13_REJECTION.to_string())
        }
    }
}

pub struct Code128Rule;

impl ValidationRule for Code128Rule {
    fn name(&self) -> &'static str { "code128_alphanumeric" }

    fn symbology(&self) -> Symbology { Symbology::Code128 }

    fn validate(&self, raw_text: &str) -> ValidationResult {
        let len = raw_text.chars().count();
        if (1..=20).contains(&len) && raw_text.chars().all(char::is_alphanumeric) {
            ValidationResult::Accepted(raw_text.to_string())
        } else {
            ValidationResult::Rejected(CODE128_REJECTION.to_string())
        }
    }
}

/// Capacity is only known to the engine, so only emptiness is checked here.
pub struct QrRule;

impl ValidationRule for QrRule {
    fn name(&self) -> &'static str { "qr_non_empty" }

    fn symbology(&self) -> Symbology { Symbology::Qr }

    fn validate(&self, raw_text: &str) -> ValidationResult {
        if raw_text.is_empty() {
            ValidationResult::Rejected(QR_REJECTION.to_string())
        } else {
            ValidationResult::Accepted(raw_text.to_string())
        }
    }
}

/// Validator dispatches to the rule registered for a symbology
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(Ean13Rule),
                Box::new(Code128Rule),
                Box::new(QrRule),
            ],
        }
    }

    pub fn validate(&self, symbology: Symbology, raw_text: &str) -> ValidationResult {
        match self.rules.iter().find(|r| r.symbology() == symbology) {
            Some(rule) => {
                let result = rule.validate(raw_text);
                tracing::debug!(rule = rule.name(), accepted = result.is_accepted(), "validated input");
                result
            }
            None => ValidationResult::Rejected(format!("no validation rule for {}", symbology)),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate `raw_text` with the default rule set
pub fn validate(symbology: Symbology, raw_text: &str) -> ValidationResult {
    Validator::new().validate(symbology, raw_text)
}
