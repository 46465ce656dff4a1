//! Narrative comment text for a report card.

use crate::student::StudentRecord;

pub const TEACHER_COMMENT_FIELD: &str = "班主任评语";
pub const REWARD_PUNISHMENT_FIELD: &str = "奖惩情况";
pub const REMARK_FIELD: &str = "备注";
pub const GENERAL_COMMENT_FIELD: &str = "评语";

pub const STRENGTH_THRESHOLD: f64 = 85.0;
pub const WEAKNESS_THRESHOLD: f64 = 70.0;

/// Comment text written by staff, if the row carries any.
///
/// The first non-empty of teacher comment, remark and general comment is used,
/// with the reward/punishment note appended on its own line.
pub fn teacher_supplied(record: &StudentRecord) -> Option<String> {
    let fields = &record.fields;
    let punishment = fields.non_empty(REWARD_PUNISHMENT_FIELD);
    let comment = fields
        .non_empty(TEACHER_COMMENT_FIELD)
        .or_else(|| fields.non_empty(REMARK_FIELD))
        .or_else(|| fields.non_empty(GENERAL_COMMENT_FIELD));

    if comment.is_none() && punishment.is_none() {
        return None;
    }

    let mut text = comment.unwrap_or_default().to_string();
    if let Some(punishment) = punishment {
        text.push_str(&format!("\n{}：{}", REWARD_PUNISHMENT_FIELD, punishment));
    }
    Some(text)
}

fn opening(record: &StudentRecord, total_students: usize) -> String {
    let name = record.name();
    let rank = record.rank;
    match record.average_value() {
        a if a >= 90.0 => format!(
            "{name}同学学习态度端正，成绩优异，在班级{total_students}名学生中排名第{rank}位，表现出色。"
        ),
        a if a >= 80.0 => format!(
            "{name}同学学习认真，成绩良好，在班级中排名第{rank}位，具有较强的学习能力。"
        ),
        a if a >= 70.0 => format!(
            "{name}同学学习基础较好，成绩中等，目前班级排名第{rank}位，还有提升空间。"
        ),
        a if a >= 60.0 => format!(
            "{name}同学学习态度较好，但成绩有待提高，在班级中排名第{rank}位，需要加强努力。"
        ),
        _ => format!(
            "{name}同学需要端正学习态度，加强基础知识学习，目前排名第{rank}位，建议家长和老师共同关注。"
        ),
    }
}

fn closing(rank: usize, total_students: usize) -> &'static str {
    if total_students == 0 {
        return "要制定学习计划，提高学习效率，争取更大进步。";
    }
    let percentile = rank as f64 / total_students as f64 * 100.0;
    if percentile <= 20.0 {
        "希望继续保持优秀成绩，发挥榜样作用。"
    } else if percentile <= 50.0 {
        "继续努力，争取更好的成绩。"
    } else {
        "要制定学习计划，提高学习效率，争取更大进步。"
    }
}

/// Build a comment from the scores alone.
pub fn generate(record: &StudentRecord, total_students: usize) -> String {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    for score in &record.scores {
        if score.score >= STRENGTH_THRESHOLD {
            strengths.push(score.subject.as_str());
        } else if score.score < WEAKNESS_THRESHOLD {
            improvements.push(score.subject.as_str());
        }
    }

    let mut comment = opening(record, total_students);
    if !strengths.is_empty() {
        comment.push_str(&format!(
            "在{}等科目上表现突出，值得继续保持。",
            strengths.join("、")
        ));
    }
    if !improvements.is_empty() {
        comment.push_str(&format!(
            "建议在{}等科目上加强练习，巩固基础知识。",
            improvements.join("、")
        ));
    }
    comment.push_str(closing(record.rank, total_students));
    comment
}

/// Staff-written text when present, otherwise a generated comment.
pub fn comment_for(record: &StudentRecord, total_students: usize) -> String {
    teacher_supplied(record).unwrap_or_else(|| generate(record, total_students))
}
