//! Ingredient amount normalization.
//!
//! Collapses the two stored amount shapes (free text or structured
//! quantity/unit) into one canonical `{quantity, unit}` pair that the
//! grocery aggregator can merge on.

use crate::types::{IngredientAmount, Language};

/// Canonical amount produced by [`normalize_amount`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAmount {
    pub quantity: f64,
    pub unit: String,
}

/// Normalize one ingredient amount.
///
/// Structured amounts pass through directly, with the unit defaulting to the
/// language's generic counting noun when absent. Free text goes through
/// [`parse_free_text`]. A missing amount means "one of it".
pub fn normalize_amount(amount: Option<&IngredientAmount>, language: Language) -> NormalizedAmount {
    match amount {
        Some(IngredientAmount::Structured { quantity, unit }) => NormalizedAmount {
            quantity: *quantity,
            unit: unit
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(language.generic_unit())
                .to_string(),
        },
        Some(IngredientAmount::FreeText(text)) => parse_free_text(text, language),
        None => NormalizedAmount {
            quantity: 1.0,
            unit: language.generic_unit().to_string(),
        },
    }
}

/// Extract the leading numeric run from a free-text amount.
///
/// "2 cups" parses to quantity 2, unit "cups". Fractions are not understood:
/// "1/2 cup" parses to quantity 1 with "/2 cup" left in the unit, because
/// only the leading `[0-9.]` run counts as the quantity. Known limitation,
/// kept so quantities merge the same way they always have for stored data.
fn parse_free_text(text: &str, language: Language) -> NormalizedAmount {
    let text = text.trim();
    let digits: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let quantity = if digits.is_empty() {
        1.0
    } else {
        digits.parse().unwrap_or(1.0)
    };

    // The leading run is all ASCII, so its char count is its byte length.
    let unit = text[digits.len()..].trim();
    NormalizedAmount {
        quantity,
        unit: if unit.is_empty() {
            language.generic_unit().to_string()
        } else {
            unit.to_string()
        },
    }
}
