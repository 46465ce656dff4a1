use crate::error::Result;
use rust_xlsxwriter::Workbook;

/// Columns of the downloadable upload template, in order.
pub const TEMPLATE_HEADERS: &[&str] = &[
    "姓名",
    "班级",
    "语文",
    "语文评价结果",
    "数学",
    "数学评价结果",
    "英语",
    "英语评价结果",
    "科学",
    "科学评价结果",
    "美术",
    "信息技术",
    "获奖情况",
    "寄语",
    "班主任评语",
];

/// Example rows shipped with the template.
pub const TEMPLATE_SAMPLE_ROWS: &[&[&str]] = &[
    &[
        "张三", "初一(1)班", "92", "良好", "88", "良好", "90", "良好", "85", "合格", "良好", "优秀",
        "三好学生",
        "该生学习认真，积极向上，希望继续保持！",
        "张三同学在本学期表现优秀，学习态度端正，成绩稳步提升。",
    ],
    &[
        "李四", "初一(1)班", "85", "", "92", "良好", "87", "", "89", "良好", "合格", "良好",
        "优秀班干部",
        "作为班干部，工作负责，是老师的好帮手。",
        "李四同学工作能力强，乐于助人，深受同学们喜爱。",
    ],
    &[
        "王五", "初一(2)班", "90", "良好", "95", "优秀", "93", "", "91", "", "优秀", "良好",
        "数学竞赛二等奖",
        "数学天赋突出，希望在其他科目上也能均衡发展。",
        "王五同学数学成绩突出，思维敏捷，建议加强文科学习。",
    ],
];

pub const TEMPLATE_SHEET_NAME: &str = "学生成绩模板";
pub const TEMPLATE_FILE_NAME: &str = "学生成绩报告单模板.xlsx";

const COLUMN_WIDTHS: &[f64] = &[
    8.0, 12.0, 6.0, 12.0, 6.0, 12.0, 6.0, 12.0, 6.0, 12.0, 8.0, 10.0, 15.0, 25.0, 30.0,
];

/// Header row followed by the sample rows.
pub fn template_rows() -> Vec<Vec<&'static str>> {
    std::iter::once(TEMPLATE_HEADERS)
        .chain(TEMPLATE_SAMPLE_ROWS.iter().copied())
        .map(|row| row.to_vec())
        .collect()
}

/// The upload template as an XLSX workbook.
///
/// Every cell is written as text so scores round-trip exactly as typed.
pub fn template_xlsx() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (r, row) in template_rows().iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32, c as u16, *value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// The upload template as UTF-8 CSV (with BOM so spreadsheet apps detect the encoding).
pub fn template_csv() -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(b"\xEF\xBB\xBF".to_vec());
    for row in template_rows() {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}
