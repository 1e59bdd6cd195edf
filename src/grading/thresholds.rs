use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::parse::parse_numeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TestCategory {
    Sprint,
    Endurance,
    Strength,
    Jump,
    Swim,
}

/// Rank cutoffs for one test type, in the test's natural unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSpec {
    pub excellent: f64,
    pub good: f64,
    pub pass: f64,
    pub lower_is_better: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CutoffTexts {
    pub excellent: &'static str,
    pub good: &'static str,
    pub pass: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestType {
    pub code: &'static str,
    pub name: &'static str,
    pub category: TestCategory,
    pub unit: &'static str,
    pub direction: Direction,
    pub cutoff_texts: CutoffTexts,
    pub thresholds: ThresholdSpec,
}

struct Row {
    code: &'static str,
    name: &'static str,
    category: TestCategory,
    unit: &'static str,
    cutoffs: [&'static str; 3],
    direction: Direction,
}

const fn row(
    code: &'static str,
    name: &'static str,
    category: TestCategory,
    unit: &'static str,
    cutoffs: [&'static str; 3],
    direction: Direction,
) -> Row {
    Row {
        code,
        name,
        category,
        unit,
        cutoffs,
        direction,
    }
}

use Direction::{HigherIsBetter as Higher, LowerIsBetter as Lower};
use TestCategory::*;

// Grading standard. Timed events are in seconds (`m:ss` is converted), counts in
// repetitions, jumps in meters. Order here is the catalog order.
const ROWS: &[Row] = &[
    row("RUN_30M", "Chạy 30m", Sprint, "seconds", ["4.4", "4.6", "5.0"], Lower),
    row("RUN_60M", "Chạy 60m", Sprint, "seconds", ["7.8", "8.2", "8.6"], Lower),
    row("RUN_100M", "Chạy 100m", Sprint, "seconds", ["13.3", "13.6", "14.0"], Lower),
    row("SHUTTLE_4X10M", "Chạy con thoi 4x10m", Sprint, "seconds", ["9.0", "9.5", "10.0"], Lower),
    row("RUN_400M", "Chạy 400m", Endurance, "seconds", ["1:05", "1:10", "1:15"], Lower),
    row("RUN_800M", "Chạy 800m", Endurance, "seconds", ["2:20", "2:35", "2:50"], Lower),
    row("RUN_1500M", "Chạy 1500m", Endurance, "seconds", ["5:00", "5:30", "6:00"], Lower),
    row("RUN_3000M", "Chạy 3000m", Endurance, "seconds", ["11:30", "12:10", "12:50"], Lower),
    row("RUN_5000M", "Chạy 5000m", Endurance, "seconds", ["20:30", "22:00", "23:30"], Lower),
    row("PULL_UPS", "Kéo xà đơn", Strength, "reps", ["23", "19", "15"], Higher),
    row("PUSH_UPS", "Chống đẩy", Strength, "reps", ["45", "38", "30"], Higher),
    row("SIT_UPS", "Gập bụng", Strength, "reps", ["50", "42", "35"], Higher),
    row("LONG_JUMP", "Bật xa tại chỗ", Jump, "meters", ["4.5", "4.2", "3.9"], Higher),
    row("SWIM_50M", "Bơi 50m", Swim, "seconds", ["0:40", "0:45", "0:50"], Lower),
    row("SWIM_100M", "Bơi 100m", Swim, "seconds", ["1:40", "1:55", "2:10"], Lower),
];

// A cutoff that fails to parse becomes NaN, which no comparison can satisfy.
fn cutoff(text: &str) -> f64 {
    parse_numeric(text).unwrap_or(f64::NAN)
}

static CATALOG: LazyLock<Vec<TestType>> = LazyLock::new(|| {
    ROWS.iter()
        .map(|r| TestType {
            code: r.code,
            name: r.name,
            category: r.category,
            unit: r.unit,
            direction: r.direction,
            cutoff_texts: CutoffTexts {
                excellent: r.cutoffs[0],
                good: r.cutoffs[1],
                pass: r.cutoffs[2],
            },
            thresholds: ThresholdSpec {
                excellent: cutoff(r.cutoffs[0]),
                good: cutoff(r.cutoffs[1]),
                pass: cutoff(r.cutoffs[2]),
                lower_is_better: r.direction == Direction::LowerIsBetter,
            },
        })
        .collect()
});

static INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, t)| (t.code, i))
        .collect()
});

static FINGERPRINT: LazyLock<String> = LazyLock::new(|| {
    let mut hasher = Sha256::new();
    for r in ROWS {
        let dir = match r.direction {
            Direction::LowerIsBetter => "lower",
            Direction::HigherIsBetter => "higher",
        };
        hasher.update(format!(
            "{}|{}|{}|{}|{}\n",
            r.code, r.cutoffs[0], r.cutoffs[1], r.cutoffs[2], dir
        ));
    }
    format!("{:x}", hasher.finalize())
});

/// All test types in catalog order.
pub fn catalog() -> &'static [TestType] {
    CATALOG.as_slice()
}

/// Exact, case-sensitive lookup by test-type code.
pub fn test_type(code: &str) -> Option<&'static TestType> {
    INDEX.get(code).map(|&i| &CATALOG[i])
}

pub fn lookup(code: &str) -> Option<&'static ThresholdSpec> {
    test_type(code).map(|t| &t.thresholds)
}

/// Position of `code` in the catalog, used to order reports.
pub fn catalog_position(code: &str) -> Option<usize> {
    INDEX.get(code).copied()
}

/// SHA-256 hex digest of the table's canonical text form.
pub fn fingerprint() -> &'static str {
    FINGERPRINT.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_fifteen_unique_codes() {
        assert_eq!(catalog().len(), 15);
        assert_eq!(INDEX.len(), 15);
    }

    #[test]
    fn every_cutoff_text_parses() {
        for t in catalog() {
            let s = t.thresholds;
            assert!(s.excellent.is_finite(), "{} excellent", t.code);
            assert!(s.good.is_finite(), "{} good", t.code);
            assert!(s.pass.is_finite(), "{} pass", t.code);
        }
    }

    #[test]
    fn cutoffs_are_ordered_by_direction() {
        for t in catalog() {
            let s = t.thresholds;
            if s.lower_is_better {
                assert!(s.excellent <= s.good && s.good <= s.pass, "{}", t.code);
            } else {
                assert!(s.excellent >= s.good && s.good >= s.pass, "{}", t.code);
            }
        }
    }

    #[test]
    fn reference_rows_match_standard() {
        assert_eq!(
            lookup("RUN_100M"),
            Some(&ThresholdSpec {
                excellent: 13.3,
                good: 13.6,
                pass: 14.0,
                lower_is_better: true,
            })
        );
        assert_eq!(
            lookup("PULL_UPS"),
            Some(&ThresholdSpec {
                excellent: 23.0,
                good: 19.0,
                pass: 15.0,
                lower_is_better: false,
            })
        );
        assert_eq!(
            lookup("RUN_3000M"),
            Some(&ThresholdSpec {
                excellent: 690.0,
                good: 730.0,
                pass: 770.0,
                lower_is_better: true,
            })
        );
    }

    #[test]
    fn lookup_is_exact_match() {
        assert!(lookup("run_100m").is_none());
        assert!(lookup(" RUN_100M").is_none());
        assert!(lookup("UNKNOWN_CODE_XYZ").is_none());
        assert_eq!(catalog_position("RUN_30M"), Some(0));
        assert_eq!(catalog_position("SWIM_100M"), Some(14));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let fp = fingerprint();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, fingerprint());
    }
}
