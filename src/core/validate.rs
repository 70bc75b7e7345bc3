use crate::domain::model::{Term, Tier, MAX_SAFE_INTEGER};
use crate::utils::error::{FieldError, PricingError, Result};
use serde_json::{Map, Number, Value};

/// 驗證儲存請求的價格表。
///
/// Every problem is collected before returning. Keys outside the three terms
/// and three tiers are kept as they are. Numeric strings such as `"12.5"`
/// are converted to JSON numbers in the returned value.
pub fn validate_matrix_payload(payload: Value) -> Result<Value> {
    let mut root = match payload {
        Value::Object(root) => root,
        _ => {
            return Err(PricingError::ValidationError {
                errors: vec![FieldError::new("value", "must be of type object")],
            })
        }
    };

    let mut errors = Vec::new();
    for term in Term::ALL {
        match root.get_mut(term.as_str()) {
            None => errors.push(FieldError::new(term.as_str(), "is required")),
            Some(Value::Object(prices)) => validate_tier_prices(term, prices, &mut errors),
            Some(_) => errors.push(FieldError::new(term.as_str(), "must be of type object")),
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(root))
    } else {
        Err(PricingError::ValidationError { errors })
    }
}

fn validate_tier_prices(term: Term, prices: &mut Map<String, Value>, errors: &mut Vec<FieldError>) {
    for tier in Tier::ALL {
        let path = format!("{}.{}", term, tier);
        match prices.get_mut(tier.as_str()) {
            None => errors.push(FieldError::new(path, "is required")),
            Some(value) => match coerce_number(value) {
                Some(number) => *value = Value::Number(number),
                None => errors.push(FieldError::new(path, "must be a number")),
            },
        }
    }
}

/// Prices outside ±`MAX_SAFE_INTEGER` are rejected; they would not read back
/// exactly as `f64`.
fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(number) => {
            let safe = match (number.as_i64(), number.as_u64(), number.as_f64()) {
                (Some(v), _, _) => v.unsigned_abs() <= MAX_SAFE_INTEGER as u64,
                (_, Some(v), _) => v <= MAX_SAFE_INTEGER as u64,
                (_, _, Some(v)) => v.abs() <= MAX_SAFE_INTEGER,
                _ => false,
            };
            safe.then(|| number.clone())
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            let parsed = trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.abs() <= MAX_SAFE_INTEGER)?;
            if parsed.fract() == 0.0 {
                Some(Number::from(parsed as i64))
            } else {
                Number::from_f64(parsed)
            }
        }
        _ => None,
    }
}
