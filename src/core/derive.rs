use crate::domain::model::{Matrix, Term, Tier};
use crate::utils::error::{PricingError, Result};

/// Standard and unlimited follow lite at a fixed ratio.
pub const STANDARD_RATIO: f64 = 2.0;
pub const UNLIMITED_RATIO: f64 = 3.0;

/// 將輸入框的文字轉成價格；空字串視為 0
pub fn parse_cell_input(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PricingError::InvalidInputError {
            input: raw.to_string(),
        }),
    }
}

/// Applies one cell edit to a copy of `snapshot`.
///
/// The result is always computed from the snapshot passed in, never from the
/// matrix currently on screen, so successive edits in a session do not
/// compound. Editing `lite` rewrites the whole term; editing `standard` or
/// `unlimited` touches only that cell.
///
/// Fails with `InvalidInputError` when a derived price overflows to a
/// non-finite value (e.g. lite = `1e308`).
pub fn derive_edit(snapshot: &Matrix, term: Term, tier: Tier, value: f64) -> Result<Matrix> {
    let mut next = *snapshot;
    let prices = next.term_mut(term);

    match tier {
        Tier::Lite => {
            prices.lite = value;
            prices.standard = value * STANDARD_RATIO;
            prices.unlimited = value * UNLIMITED_RATIO;
        }
        Tier::Standard | Tier::Unlimited => prices.set(tier, value),
    }

    // 倍數計算可能溢位成 inf
    if Tier::ALL.iter().any(|t| !prices.get(*t).is_finite()) {
        return Err(PricingError::InvalidInputError {
            input: value.to_string(),
        });
    }

    Ok(next)
}
