//! Presentation-ready model of one student's report card.
//!
//! [`render`] is pure: everything it needs comes from the record, the batch
//! size and the [`ReportConfig`]. Turning the model into HTML is the job of
//! [`crate::html`].

use crate::comment::{REWARD_PUNISHMENT_FIELD, TEACHER_COMMENT_FIELD, comment_for};
use crate::config::ReportConfig;
use crate::derivation::parse_leading_number;
use crate::grading::{evaluation_level, grade_level, score_color};
use crate::student::StudentRecord;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref AWARD_SEPARATORS: Regex = Regex::new(r"[;,，；]").unwrap();
}

pub const AWARDS_FIELD: &str = "获奖情况";
pub const MESSAGE_FIELD: &str = "寄语";
pub const SCHOOL_FIELD: &str = "学校";
pub const ID_CARD_FIELD: &str = "身份证号";

const EVALUATION_SUFFIX: &str = "评价结果";
const DEFAULT_ELECTIVE_RESULT: &str = "良好";
const UNFILLED: &str = "未填写";

fn with_score_suffix(subject: &str) -> String {
    format!("{}成绩", subject)
}

fn exact_name(subject: &str) -> String {
    subject.to_string()
}

fn bare_token(subject: &str) -> String {
    subject.trim().to_string()
}

/// Field-name variants tried, in order, when looking up a headline subject.
const CANDIDATE_FIELDS: &[fn(&str) -> String] = &[with_score_suffix, exact_name, bare_token];

/// A headline row: display label, the column looked up, whether it carries an
/// evaluation column, and the score shown when nothing is found.
struct Headline {
    label: &'static str,
    subject: &'static str,
    numbered: bool,
    with_evaluation: bool,
    fallback: &'static str,
}

const HEADLINES: &[Headline] = &[
    Headline { label: "语文", subject: "语文", numbered: true, with_evaluation: true, fallback: "" },
    Headline { label: "数学", subject: "数学", numbered: true, with_evaluation: true, fallback: "" },
    Headline { label: "外语", subject: "英语", numbered: true, with_evaluation: true, fallback: "" },
    Headline { label: "科学", subject: "科学", numbered: true, with_evaluation: true, fallback: "" },
    Headline { label: "美术", subject: "美术", numbered: false, with_evaluation: false, fallback: DEFAULT_ELECTIVE_RESULT },
    Headline { label: "信息技术", subject: "信息技术", numbered: false, with_evaluation: false, fallback: DEFAULT_ELECTIVE_RESULT },
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeaderSection {
    pub title: String,
    pub subtitle: String,
    pub period: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdentitySection {
    pub name: String,
    pub class: String,
    pub student_id: String,
    pub school: Option<String>,
    pub id_card: Option<String>,
    /// Row switches from the config. A shown row may still hold an empty value.
    pub show_school: bool,
    pub show_id_card: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectRow {
    pub subject: String,
    /// Source text when it holds no number, otherwise the coerced score.
    pub display: String,
    pub score: f64,
    pub grade: &'static str,
    pub evaluation: &'static str,
    pub color: &'static str,
    /// Bar fill in percent, clamped to 0..=100.
    pub bar_width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationRow {
    pub number: Option<usize>,
    pub item: String,
    pub result: String,
    pub score: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummarySection {
    pub total_score: f64,
    pub average_score: String,
    pub rank: usize,
    pub total_students: usize,
    pub subject_count: usize,
    pub overall_grade: &'static str,
    pub overall_color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentSection {
    pub teacher_message: String,
    pub comment: String,
    pub awards: Vec<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignatureSection {
    pub principal: String,
    pub director: String,
    pub class_teacher: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportCard {
    pub header: HeaderSection,
    pub identity: IdentitySection,
    pub subjects: Vec<SubjectRow>,
    pub evaluation: Vec<EvaluationRow>,
    pub summary: SummarySection,
    pub comments: CommentSection,
    pub signatures: SignatureSection,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderModel {
    Report(Box<ReportCard>),
    /// The record has no subject columns, so there is nothing to grade.
    NoSubjectData { name: String },
}

impl RenderModel {
    pub fn report(&self) -> Option<&ReportCard> {
        match self {
            RenderModel::Report(card) => Some(card.as_ref()),
            RenderModel::NoSubjectData { .. } => None,
        }
    }
}

/// Format a cell for display: a value with a numeric prefix prints as that
/// number (`"92.50"` → `"92.5"`), anything else prints unchanged.
pub fn display_value(raw: &str) -> String {
    match parse_leading_number(raw) {
        Some(number) => number.to_string(),
        None => raw.to_string(),
    }
}

/// First non-empty value among the candidate field names for `subject`.
pub fn lookup_subject(record: &StudentRecord, subject: &str) -> Option<String> {
    CANDIDATE_FIELDS
        .iter()
        .map(|candidate| candidate(subject))
        .find_map(|field| record.fields.non_empty(&field).map(display_value))
}

/// Awards listed in `获奖情况` (or `奖惩情况`), split on ASCII and full-width
/// commas and semicolons. `["无"]` when there are none.
pub fn awards(record: &StudentRecord) -> Vec<String> {
    let text = record
        .fields
        .non_empty(AWARDS_FIELD)
        .or_else(|| record.fields.non_empty(REWARD_PUNISHMENT_FIELD))
        .unwrap_or_default();

    let list: Vec<String> = AWARD_SEPARATORS
        .split(text)
        .map(str::trim)
        .filter(|award| !award.is_empty())
        .map(str::to_string)
        .collect();

    if list.is_empty() {
        vec!["无".to_string()]
    } else {
        list
    }
}

fn subject_rows(record: &StudentRecord) -> Vec<SubjectRow> {
    record
        .scores
        .iter()
        .map(|s| {
            let display = if parse_leading_number(&s.raw).is_none() && !s.raw.is_empty() {
                s.raw.clone()
            } else {
                s.score.to_string()
            };
            SubjectRow {
                subject: s.subject.clone(),
                display,
                score: s.score,
                grade: grade_level(s.score),
                evaluation: evaluation_level(s.score),
                color: score_color(s.score),
                bar_width: s.score.clamp(0.0, 100.0),
            }
        })
        .collect()
}

fn evaluation_rows(record: &StudentRecord) -> Vec<EvaluationRow> {
    let mut rows = Vec::with_capacity(HEADLINES.len() + 1);
    let mut number = 0;

    for headline in HEADLINES {
        let result = if headline.with_evaluation {
            lookup_subject(record, &format!("{}{}", headline.subject, EVALUATION_SUFFIX))
                .unwrap_or_default()
        } else {
            String::new()
        };
        let score = lookup_subject(record, headline.subject)
            .unwrap_or_else(|| headline.fallback.to_string());

        let row_number = if headline.numbered {
            number += 1;
            Some(number)
        } else {
            None
        };

        rows.push(EvaluationRow {
            number: row_number,
            item: headline.label.to_string(),
            result,
            score,
        });

        // Music has no column of its own and is always shown as the default.
        if headline.subject == "科学" {
            rows.push(EvaluationRow {
                number: None,
                item: "音乐".to_string(),
                result: String::new(),
                score: DEFAULT_ELECTIVE_RESULT.to_string(),
            });
        }
    }

    rows
}

/// Build the render model for one record of a batch of `total_students`.
///
/// # Arguments
/// * `record` - A derived and ranked student record
/// * `total_students` - Size of the batch the record was ranked in
/// * `config` - Titles, signatures and which identity rows to show
///
/// # Returns
/// * `RenderModel` - The report card, or [`RenderModel::NoSubjectData`] when
///   the record has no subject columns
pub fn render(record: &StudentRecord, total_students: usize, config: &ReportConfig) -> RenderModel {
    if record.subjects.is_empty() {
        return RenderModel::NoSubjectData {
            name: record.name().to_string(),
        };
    }

    let fields = &record.fields;
    let average = record.average_value();

    let identity = IdentitySection {
        name: record.name().to_string(),
        class: record.class().unwrap_or(UNFILLED).to_string(),
        student_id: record.student_id().unwrap_or_default().to_string(),
        school: config.show_school.then(|| {
            fields
                .non_empty(SCHOOL_FIELD)
                .unwrap_or(config.school_name.as_str())
                .to_string()
        }),
        id_card: config
            .show_id_card
            .then(|| fields.get(ID_CARD_FIELD).unwrap_or_default().to_string()),
        show_school: config.show_school,
        show_id_card: config.show_id_card,
    };

    let card = ReportCard {
        header: HeaderSection {
            title: format!("{}素质发展", config.report_title),
            subtitle: "报告单".to_string(),
            period: config.report_period.clone(),
        },
        identity,
        subjects: subject_rows(record),
        evaluation: evaluation_rows(record),
        summary: SummarySection {
            total_score: record.total_score,
            average_score: record.average_score.clone(),
            rank: record.rank,
            total_students,
            subject_count: record.valid_score_count,
            overall_grade: grade_level(average),
            overall_color: score_color(average),
        },
        comments: CommentSection {
            teacher_message: fields
                .get(TEACHER_COMMENT_FIELD)
                .unwrap_or_default()
                .to_string(),
            comment: comment_for(record, total_students),
            awards: awards(record),
            message: fields.get(MESSAGE_FIELD).unwrap_or_default().to_string(),
        },
        signatures: SignatureSection {
            principal: config.principal_name.clone(),
            director: config.director_name.clone(),
            class_teacher: config.teacher_name.clone(),
        },
    };

    RenderModel::Report(Box::new(card))
}
