use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative coverage label derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CoverageStatus {
    /// Not correlated with any coverage data.
    #[default]
    Unknown,
    #[serde(rename = "No Coverage")]
    NoCoverage,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CoverageStatus {
    pub const EXCELLENT_THRESHOLD: f64 = 95.0;
    pub const GOOD_THRESHOLD: f64 = 80.0;
    pub const FAIR_THRESHOLD: f64 = 60.0;

    /// Classify a percentage in `[0, 100]`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= Self::EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if percentage >= Self::GOOD_THRESHOLD {
            Self::Good
        } else if percentage >= Self::FAIR_THRESHOLD {
            Self::Fair
        } else if percentage > 0.0 {
            Self::Poor
        } else {
            Self::NoCoverage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::NoCoverage => "No Coverage",
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
