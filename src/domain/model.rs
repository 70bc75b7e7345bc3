use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 訂閱期間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Months36,
    Months24,
    Months12,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::Months36, Term::Months24, Term::Months12];

    /// JSON key, e.g. `36months`
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Months36 => "36months",
            Term::Months24 => "24months",
            Term::Months12 => "12months",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Term::Months36 => "36 months",
            Term::Months24 => "24 months",
            Term::Months12 => "12 months",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Term::ALL
            .into_iter()
            .find(|term| term.as_str() == s)
            .ok_or_else(|| format!("unknown term '{}'", s))
    }
}

/// 方案等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Lite,
    Standard,
    Unlimited,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Lite, Tier::Standard, Tier::Unlimited];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Lite => "lite",
            Tier::Standard => "standard",
            Tier::Unlimited => "unlimited",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Lite => "Lite",
            Tier::Standard => "Standard",
            Tier::Unlimited => "Unlimited",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| format!("unknown tier '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierPrices {
    #[serde(serialize_with = "serialize_price")]
    pub lite: f64,
    #[serde(serialize_with = "serialize_price")]
    pub standard: f64,
    #[serde(serialize_with = "serialize_price")]
    pub unlimited: f64,
}

impl TierPrices {
    pub fn new(lite: f64, standard: f64, unlimited: f64) -> Self {
        Self {
            lite,
            standard,
            unlimited,
        }
    }

    pub fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Lite => self.lite,
            Tier::Standard => self.standard,
            Tier::Unlimited => self.unlimited,
        }
    }

    pub fn set(&mut self, tier: Tier, value: f64) {
        match tier {
            Tier::Lite => self.lite = value,
            Tier::Standard => self.standard = value,
            Tier::Unlimited => self.unlimited = value,
        }
    }
}

/// 三個期間 × 三個方案的價格表。
///
/// Unknown keys in incoming JSON are ignored here; the save endpoint keeps
/// them by validating the raw JSON instead of this type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Matrix {
    #[serde(rename = "36months")]
    pub months_36: TierPrices,
    #[serde(rename = "24months")]
    pub months_24: TierPrices,
    #[serde(rename = "12months")]
    pub months_12: TierPrices,
}

impl Matrix {
    /// All nine prices set to zero.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn term(&self, term: Term) -> &TierPrices {
        match term {
            Term::Months36 => &self.months_36,
            Term::Months24 => &self.months_24,
            Term::Months12 => &self.months_12,
        }
    }

    pub fn term_mut(&mut self, term: Term) -> &mut TierPrices {
        match term {
            Term::Months36 => &mut self.months_36,
            Term::Months24 => &mut self.months_24,
            Term::Months12 => &mut self.months_12,
        }
    }

    pub fn price(&self, term: Term, tier: Tier) -> f64 {
        self.term(term).get(tier)
    }
}

// 整數價格輸出為 JSON 整數 (10 而不是 10.0)
fn serialize_price<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match as_whole_number(*value) {
        Some(whole) => serializer.serialize_i64(whole),
        None => serializer.serialize_f64(*value),
    }
}

/// Largest integer an `f64` holds exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn as_whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Some(value as i64)
    } else {
        None
    }
}

/// Human-readable price: `10`, `12.5`.
pub fn format_price(value: f64) -> String {
    match as_whole_number(value) {
        Some(whole) => whole.to_string(),
        None => value.to_string(),
    }
}
