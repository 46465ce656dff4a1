use report_card::template::{
    TEMPLATE_HEADERS, TEMPLATE_SAMPLE_ROWS, template_csv, template_rows, template_xlsx,
};
use report_card::{Dataset, RawTable, ReportError, ingest};
use std::fs;
use tempfile::tempdir;

fn assert_sample_dataset(dataset: &Dataset) {
    assert_eq!(dataset.len(), 3);
    assert_eq!(
        dataset.subjects(),
        ["语文", "数学", "英语", "科学", "美术", "信息技术"]
    );

    let ranked: Vec<(&str, f64, usize)> = dataset
        .students()
        .iter()
        .map(|s| (s.name(), s.total_score, s.rank))
        .collect();
    assert_eq!(
        ranked,
        vec![("王五", 369.0, 1), ("张三", 355.0, 2), ("李四", 353.0, 3)]
    );

    // Elective grades are words, so they neither add nor count
    let zhangsan = &dataset.students()[1];
    assert_eq!(zhangsan.valid_score_count, 4);
    assert_eq!(zhangsan.average_score, "88.8");
    assert_eq!(zhangsan.field("美术"), Some("良好"));
    assert_eq!(zhangsan.class(), Some("初一(1)班"));
}

#[cfg_attr(test, test)]
fn test_template_layout() {
    println!("\n====== Testing template layout ======");
    let rows = template_rows();
    assert_eq!(rows.len(), 1 + TEMPLATE_SAMPLE_ROWS.len());
    assert_eq!(rows[0], TEMPLATE_HEADERS);
    assert!(rows.iter().all(|row| row.len() == TEMPLATE_HEADERS.len()));
    println!("✓ Header plus {} sample rows, all full width", TEMPLATE_SAMPLE_ROWS.len());
}

#[cfg_attr(test, test)]
fn test_xlsx_template_round_trip() {
    println!("\n====== Testing XLSX template round trip ======");
    let bytes = template_xlsx().unwrap();
    assert!(bytes.starts_with(b"PK"));

    let table = RawTable::from_bytes(&bytes, "学生成绩报告单模板.xlsx").unwrap();
    assert_eq!(table.rows.len(), 4);
    assert_sample_dataset(&ingest(&table).unwrap());
    println!("✓ Template XLSX ingests into the three sample students");
}

#[cfg_attr(test, test)]
fn test_csv_template_round_trip() {
    println!("\n====== Testing CSV template round trip ======");
    let bytes = template_csv().unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let table = RawTable::from_bytes(&bytes, "template.csv").unwrap();
    assert_sample_dataset(&ingest(&table).unwrap());
    println!("✓ Template CSV ingests into the three sample students");
}

#[cfg_attr(test, test)]
fn test_read_from_path() {
    println!("\n====== Testing file input ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.xlsx");
    fs::write(&path, template_xlsx().unwrap()).unwrap();

    let table = RawTable::from_path(&path).unwrap();
    assert_sample_dataset(&ingest(&table).unwrap());
    println!("✓ Workbook read from disk");

    let missing = RawTable::from_path(dir.path().join("missing.xlsx"));
    assert!(matches!(missing, Err(ReportError::Io(_))));
    println!("✓ Missing file reports an I/O error");
}

#[cfg_attr(test, test)]
fn test_unsupported_and_corrupt_input() {
    println!("\n====== Testing unsupported input ======");
    match RawTable::from_bytes(b"%PDF-1.4", "x.pdf") {
        Err(ReportError::UnsupportedFormat(ext)) => assert_eq!(ext, "pdf"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
    assert!(matches!(
        RawTable::from_bytes(b"data", "upload"),
        Err(ReportError::UnsupportedFormat(_))
    ));
    println!("✓ Unknown extensions rejected");

    let corrupt = RawTable::from_bytes(b"not a workbook", "scores.xlsx").unwrap_err();
    assert!(corrupt.is_client_error());
    println!("✓ Corrupt workbook is reported as a client error: {}", corrupt);
}

pub fn run_tests() {
    println!("Starting template tests");
    test_template_layout();
    test_xlsx_template_round_trip();
    test_csv_template_round_trip();
    test_read_from_path();
    test_unsupported_and_corrupt_input();
    println!("All tests passed!");
}

fn main() {
    run_tests();
}
