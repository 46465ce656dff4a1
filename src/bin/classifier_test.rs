use report_card::classifier::{classify, is_subject_column};

// Known subject names and score keywords are both recognised
#[cfg_attr(test, test)]
fn test_classify_known_subjects_and_keywords() {
    println!("\n====== Testing classify ======");
    let header = ["姓名", "班级", "语文", "数学", "物理成绩", "化学分数", "总得分", "备注"];
    let subjects = classify(&header);

    assert_eq!(
        subjects,
        vec!["语文", "数学", "物理成绩", "化学分数", "总得分"]
    );
    println!("✓ Subjects detected in header order: {:?}", subjects);
}

// Metadata columns never classify, even when they contain a subject token
#[cfg_attr(test, test)]
fn test_exclusion_list_wins() {
    println!("\n====== Testing exclusion list ======");
    for name in ["姓名", "班级", "学号", "班主任评语", "获奖情况", "语文评价结果", "寄语"] {
        assert!(!is_subject_column(name), "{} should not be a subject", name);
    }
    println!("✓ Metadata columns are excluded");

    // Subject tokens embedded in longer names still count
    assert!(is_subject_column("英语口语"));
    assert!(is_subject_column(" 信息技术 "));
    println!("✓ Subject tokens inside longer names are recognised");
}

#[cfg_attr(test, test)]
fn test_blank_headers_are_never_subjects() {
    println!("\n====== Testing blank headers ======");
    assert!(!is_subject_column(""));
    assert!(!is_subject_column("   "));
    assert!(classify(&["", "  ", "姓名"]).is_empty());
    println!("✓ Blank header cells are ignored");
}

// Zero subjects is not an error at this layer
#[cfg_attr(test, test)]
fn test_no_subjects() {
    println!("\n====== Testing header without subjects ======");
    let subjects = classify(&["姓名", "班级", "联系电话"]);
    assert!(subjects.is_empty());
    println!("✓ Header without subjects yields an empty list");
}

#[cfg_attr(test, test)]
fn test_classification_is_idempotent() {
    println!("\n====== Testing idempotence ======");
    let header = vec![
        "姓名".to_string(),
        "科学".to_string(),
        "语文".to_string(),
        "体育成绩".to_string(),
    ];
    let first = classify(&header);
    let second = classify(&header);
    assert_eq!(first, second);
    assert_eq!(first, vec!["科学", "语文", "体育成绩"]);
    println!("✓ Same header, same subjects, same order");
}

#[cfg_attr(test, test)]
fn test_duplicate_subject_headers_collapse() {
    println!("\n====== Testing duplicate subject headers ======");
    let subjects = classify(&["姓名", "数学", "语文", "数学 "]);
    assert_eq!(subjects, vec!["数学", "语文"]);
    println!("✓ Duplicated subject header reported once at its first position");
}

pub fn run_tests() {
    println!("Starting classifier tests");
    test_classify_known_subjects_and_keywords();
    test_exclusion_list_wins();
    test_blank_headers_are_never_subjects();
    test_no_subjects();
    test_classification_is_idempotent();
    test_duplicate_subject_headers_collapse();
    println!("All tests passed!");
}

fn main() {
    run_tests();
}
