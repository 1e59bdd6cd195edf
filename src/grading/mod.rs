//! Fitness test grading.
//!
//! Converts a raw measured result (a decimal number or an `m:ss` time) into
//! one of five rank labels using the per-test threshold table. Every input
//! maps to a label; malformed or unknown input yields [`Rank::Undetermined`].

mod parse;
pub mod thresholds;

pub use parse::{parse_duration, parse_numeric};
pub use thresholds::{Direction, TestCategory, TestType, ThresholdSpec};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rank {
    Excellent,
    Good,
    Pass,
    Fail,
    Undetermined,
}

impl Rank {
    /// Best to worst, with `Undetermined` last.
    pub const ALL: [Rank; 5] = [
        Rank::Excellent,
        Rank::Good,
        Rank::Pass,
        Rank::Fail,
        Rank::Undetermined,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Rank::Excellent => "Giỏi",
            Rank::Good => "Khá",
            Rank::Pass => "Đạt",
            Rank::Fail => "Chưa đạt",
            Rank::Undetermined => "Không xác định",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Rank::Excellent => "excellent",
            Rank::Good => "good",
            Rank::Pass => "pass",
            Rank::Fail => "fail",
            Rank::Undetermined => "undetermined",
        }
    }

    /// True for the three ranks that meet the standard.
    pub fn is_passing(self) -> bool {
        matches!(self, Rank::Excellent | Rank::Good | Rank::Pass)
    }
}

/// Direction-aware comparison, best cutoff first. Bounds are inclusive.
pub fn grade_value(spec: &ThresholdSpec, value: f64) -> Rank {
    if spec.lower_is_better {
        if value <= spec.excellent {
            Rank::Excellent
        } else if value <= spec.good {
            Rank::Good
        } else if value <= spec.pass {
            Rank::Pass
        } else {
            Rank::Fail
        }
    } else if value >= spec.excellent {
        Rank::Excellent
    } else if value >= spec.good {
        Rank::Good
    } else if value >= spec.pass {
        Rank::Pass
    } else {
        Rank::Fail
    }
}

/// Rank together with the normalized value it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Graded {
    pub rank: Rank,
    pub value: Option<f64>,
}

pub fn grade_detailed(code: &str, result: Option<&str>) -> Graded {
    let undetermined = Graded {
        rank: Rank::Undetermined,
        value: None,
    };
    let Some(text) = result.map(str::trim).filter(|t| !t.is_empty()) else {
        return undetermined;
    };
    let Some(spec) = thresholds::lookup(code) else {
        tracing::debug!(code, "unknown test type code");
        return undetermined;
    };
    let Some(value) = parse_numeric(text) else {
        return undetermined;
    };
    Graded {
        rank: grade_value(spec, value),
        value: Some(value),
    }
}

pub fn grade(code: &str, result: Option<&str>) -> Rank {
    grade_detailed(code, result).rank
}

/// Display label for a measured result, e.g. `classify("RUN_100M", Some("13.3"))`
/// gives `"Giỏi"`.
pub fn classify(code: &str, result: Option<&str>) -> &'static str {
    grade(code, result).label()
}
