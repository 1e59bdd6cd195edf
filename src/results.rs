use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::grading::{self, thresholds, Rank};

/// VB6-style 1-decimal rounding: `Int(10*x + 0.5) / 10`.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// One measured result as it arrives from the records layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentTestRecord {
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    pub code: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub result_value: Option<String>,
}

// Upstream records carry ids and measurements as strings or bare numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string, number or null, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedRecord {
    #[serde(flatten)]
    pub record: AssessmentTestRecord,
    pub rank: Rank,
    pub result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_value: Option<f64>,
}

pub fn grade_record(record: &AssessmentTestRecord) -> GradedRecord {
    let graded = grading::grade_detailed(&record.code, record.result_value.as_deref());
    GradedRecord {
        record: record.clone(),
        rank: graded.rank,
        result: graded.rank.label(),
        normalized_value: graded.value,
    }
}

pub fn grade_records(records: &[AssessmentTestRecord]) -> Vec<GradedRecord> {
    records.iter().map(grade_record).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankCounts {
    pub excellent: usize,
    pub good: usize,
    pub pass: usize,
    pub fail: usize,
    pub undetermined: usize,
}

impl RankCounts {
    pub fn add(&mut self, rank: Rank) {
        match rank {
            Rank::Excellent => self.excellent += 1,
            Rank::Good => self.good += 1,
            Rank::Pass => self.pass += 1,
            Rank::Fail => self.fail += 1,
            Rank::Undetermined => self.undetermined += 1,
        }
    }

    pub fn get(&self, rank: Rank) -> usize {
        match rank {
            Rank::Excellent => self.excellent,
            Rank::Good => self.good,
            Rank::Pass => self.pass,
            Rank::Fail => self.fail,
            Rank::Undetermined => self.undetermined,
        }
    }

    pub fn total(&self) -> usize {
        Rank::ALL.iter().map(|r| self.get(*r)).sum()
    }

    /// Share of determined results that met the standard, in percent.
    /// Undetermined results are left out of the denominator.
    pub fn pass_rate(&self) -> f64 {
        let determined = self.total() - self.undetermined;
        if determined == 0 {
            return 0.0;
        }
        let passing: usize = Rank::ALL
            .iter()
            .filter(|r| r.is_passing())
            .map(|r| self.get(*r))
            .sum();
        round_off_1_decimal(100.0 * passing as f64 / determined as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub code: String,
    pub name: Option<&'static str>,
    pub known: bool,
    pub total: usize,
    pub counts: RankCounts,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    /// Records left out because they belong to another batch.
    pub skipped: usize,
    pub counts: RankCounts,
    pub pass_rate: f64,
    pub per_test: Vec<TestSummary>,
}

/// Rank distribution of one assessment batch.
///
/// With `batch_id` set, records tagged with a different batch are skipped;
/// untagged records still count. Per-test rows follow catalog order, with
/// unknown codes after the known ones in first-seen order.
pub fn summarize_batch(batch_id: Option<&str>, records: &[AssessmentTestRecord]) -> BatchSummary {
    let mut counts = RankCounts::default();
    let mut skipped = 0_usize;
    let mut per_code: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<(String, RankCounts)> = Vec::new();

    for r in records {
        if let (Some(want), Some(have)) = (batch_id, r.batch_id.as_deref()) {
            if want != have {
                skipped += 1;
                continue;
            }
        }
        let rank = grading::grade(&r.code, r.result_value.as_deref());
        counts.add(rank);
        let idx = *per_code.entry(r.code.as_str()).or_insert_with(|| {
            rows.push((r.code.clone(), RankCounts::default()));
            rows.len() - 1
        });
        rows[idx].1.add(rank);
    }

    let mut per_test: Vec<TestSummary> = rows
        .into_iter()
        .map(|(code, c)| {
            let test_type = thresholds::test_type(&code);
            TestSummary {
                name: test_type.map(|t| t.name),
                known: test_type.is_some(),
                total: c.total(),
                pass_rate: c.pass_rate(),
                counts: c,
                code,
            }
        })
        .collect();
    per_test.sort_by_key(|t| thresholds::catalog_position(&t.code).unwrap_or(usize::MAX));

    tracing::debug!(
        batch_id = ?batch_id,
        total = counts.total(),
        skipped,
        tests = per_test.len(),
        "batch summarized"
    );

    BatchSummary {
        batch_id: batch_id.map(str::to_string),
        generated_at: Utc::now(),
        total: counts.total(),
        skipped,
        pass_rate: counts.pass_rate(),
        counts,
        per_test,
    }
}
