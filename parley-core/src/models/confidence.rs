use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Confidence score clamped to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// High confidence threshold.
    pub const HIGH: f64 = 0.8;
    /// Moderate confidence, used by the rule-based fallback.
    pub const MODERATE: f64 = 0.5;
    /// Low confidence threshold.
    pub const LOW: f64 = 0.3;

    /// Create a new Confidence, clamping to [0.0, 1.0]. NaN maps to 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_high(self) -> bool {
        self.0 >= Self::HIGH
    }

    pub fn is_low(self) -> bool {
        self.0 < Self::LOW
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(Self::MODERATE)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl Add<f64> for Confidence {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Self::new(self.0 + rhs)
    }
}

impl Mul<f64> for Confidence {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.0 * rhs)
    }
}
