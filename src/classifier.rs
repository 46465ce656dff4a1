//! Detects which header columns hold subject scores.

/// Header labels that always describe the student rather than a score.
pub const EXCLUDED_COLUMNS: &[&str] = &[
    "班级",
    "姓名",
    "班主任评语",
    "奖惩情况",
    "获奖情况",
    "学号",
    "性别",
    "身份证号",
    "年龄",
    "出生日期",
    "备注",
    "评语",
    "家长姓名",
    "联系电话",
    "地址",
    "学校",
    "身高",
    "体重",
    "视力",
    "健康状况",
    "体重kg",
    "身高cm",
    "学生上课表现",
    "请假",
    "早退",
    "学校课程教育目标",
    "学生期末总评",
    "正式上课",
    "寄语",
    "语文评价结果",
    "数学评价结果",
    "英语评价结果",
    "科学评价结果",
];

/// Substrings that mark a generic score column.
pub const SCORE_KEYWORDS: &[&str] = &["成绩", "分数", "得分"];

pub const KNOWN_SUBJECTS: &[&str] = &[
    "语文",
    "数学",
    "英语",
    "科学",
    "体育",
    "音乐",
    "美术",
    "信息技术",
    "劳动技术",
    "综合实践",
];

/// Returns true if a single header label names a subject score column.
pub fn is_subject_column(header: &str) -> bool {
    let name = header.trim();
    if name.is_empty() || EXCLUDED_COLUMNS.contains(&name) {
        return false;
    }

    let has_score_keyword = SCORE_KEYWORDS.iter().any(|kw| name.contains(kw));
    let is_known_subject = KNOWN_SUBJECTS.iter().any(|subject| name.contains(subject));

    has_score_keyword || is_known_subject
}

/// Classify a header row, returning subject column names in header order.
///
/// Names are trimmed and a name repeated in the header is reported once, at its
/// first position.
///
/// # Examples
/// ```
/// use report_card::classifier::classify;
///
/// let subjects = classify(&["姓名", "班级", "语文", "物理成绩", "备注"]);
/// assert_eq!(subjects, vec!["语文", "物理成绩"]);
/// ```
pub fn classify<S: AsRef<str>>(header: &[S]) -> Vec<String> {
    let mut subjects: Vec<String> = Vec::new();

    for column in header {
        let name = column.as_ref().trim();
        let is_subject = is_subject_column(name);
        log::debug!("column '{}' classified as subject: {}", name, is_subject);

        if is_subject && !subjects.iter().any(|s| s == name) {
            subjects.push(name.to_string());
        }
    }

    subjects
}
