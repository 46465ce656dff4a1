use crate::dataset::Dataset;
use crate::derivation::{format_one_decimal, round_one_decimal};
use serde::Serialize;

/// Minimum score that counts as a pass.
pub const PASS_THRESHOLD: f64 = 60.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub subject: String,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    /// Percentage of students at or above the pass line, one decimal.
    pub pass_rate: String,
}

/// Student counts per average-score band.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub pass: usize,
    pub fail: usize,
}

impl GradeDistribution {
    pub fn record(&mut self, average: f64) {
        match average {
            a if a >= 90.0 => self.excellent += 1,
            a if a >= 80.0 => self.good += 1,
            a if a >= 70.0 => self.average += 1,
            a if a >= 60.0 => self.pass += 1,
            _ => self.fail += 1,
        }
    }

    /// Band labels and counts, best band first.
    pub fn bands(&self) -> [(&'static str, usize); 5] {
        [
            ("excellent", self.excellent),
            ("good", self.good),
            ("average", self.average),
            ("pass", self.pass),
            ("fail", self.fail),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_students: usize,
    /// Mean of the students' total scores.
    pub average_score: f64,
    pub subject_stats: Vec<SubjectStats>,
    pub grade_distribution: GradeDistribution,
}

/// Aggregate a dataset. Subject figures include zero and non-numeric cells as 0.
pub fn compute(dataset: &Dataset) -> Statistics {
    let students = dataset.students();
    if students.is_empty() {
        return Statistics {
            total_students: 0,
            average_score: 0.0,
            subject_stats: Vec::new(),
            grade_distribution: GradeDistribution::default(),
        };
    }

    let count = students.len() as f64;
    let total_sum: f64 = students.iter().map(|s| s.total_score).sum();

    let subject_stats = dataset
        .subjects()
        .iter()
        .map(|subject| {
            let scores: Vec<f64> = students
                .iter()
                .map(|s| s.score(subject).unwrap_or(0.0))
                .collect();
            let passed = scores.iter().filter(|&&score| score >= PASS_THRESHOLD).count();

            SubjectStats {
                subject: subject.clone(),
                average: round_one_decimal(scores.iter().sum::<f64>() / count),
                max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                min: scores.iter().copied().fold(f64::INFINITY, f64::min),
                pass_rate: format_one_decimal(passed as f64 / count * 100.0),
            }
        })
        .collect();

    let mut grade_distribution = GradeDistribution::default();
    for student in students {
        grade_distribution.record(student.average_value());
    }

    Statistics {
        total_students: students.len(),
        average_score: round_one_decimal(total_sum / count),
        subject_stats,
        grade_distribution,
    }
}
