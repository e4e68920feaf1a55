pub mod expense;
pub mod itinerary;
pub mod ledger;
pub mod place;
pub mod trip;

use thiserror::Error;

/// Raised when a stored or submitted enum label is not one we know.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Form inputs arrive as empty strings when left blank.
pub fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
