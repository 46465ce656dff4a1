use crate::classifier::classify;
use crate::dataset::Dataset;
use crate::derivation::{assign_ranks, derive};
use crate::error::{ReportError, Result};
use crate::student::{Fields, NAME_FIELD, StudentRecord};
use crate::table::{CellValue, RawTable};

/// Trimmed header labels by column position. Blank header cells are `None`
/// and their column is ignored without shifting the others.
pub fn header_names(table: &RawTable) -> Vec<Option<String>> {
    table
        .header()
        .unwrap_or_default()
        .iter()
        .map(|cell| Some(cell.to_trimmed_string()).filter(|name| !name.is_empty()))
        .collect()
}

fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

/// Turn data rows into underived student records.
///
/// Rows whose cells are all blank, and rows without a name, are dropped
/// silently. Kept rows stay in sheet order.
///
/// # Errors
/// `MalformedInput` when the table has no data row or no `姓名` column.
pub fn normalize(table: &RawTable, subjects: &[String]) -> Result<Vec<StudentRecord>> {
    if table.rows.len() < 2 {
        return Err(ReportError::malformed(
            "a header row and at least one data row are required",
        ));
    }

    let headers = header_names(table);
    if !headers.iter().flatten().any(|name| name == NAME_FIELD) {
        return Err(ReportError::malformed(format!(
            "missing required field: {}",
            NAME_FIELD
        )));
    }

    let mut records = Vec::new();
    for (offset, row) in table.data_rows().iter().enumerate() {
        let line = offset + 2;
        if is_blank_row(row) {
            log::debug!("row {} skipped: blank", line);
            continue;
        }

        let mut fields = Fields::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(header) = header {
                let value = row
                    .get(index)
                    .map(CellValue::to_trimmed_string)
                    .unwrap_or_default();
                fields.insert(header.as_str(), value);
            }
        }

        if fields.non_empty(NAME_FIELD).is_none() {
            log::debug!("row {} skipped: no {}", line, NAME_FIELD);
            continue;
        }

        records.push(StudentRecord::new(fields, subjects.to_vec()));
    }

    Ok(records)
}

/// Run the whole pipeline: classify the header, normalize rows, derive scores
/// and rank the batch.
///
/// # Arguments
/// * `table` - Decoded sheet, header row first
///
/// # Returns
/// * `Result<Dataset>` - Ranked records, best total first, with the batch's subject list
///
/// # Errors
/// Everything [`normalize`] rejects, plus `MalformedInput` when no row
/// survives filtering.
///
/// # Examples
/// ```
/// use report_card::normalizer::ingest;
/// use report_card::table::RawTable;
///
/// let table = RawTable::from_strings(&[
///     &["姓名", "班级", "语文", "数学"],
///     &["张三", "1班", "90", "80"],
///     &["李四", "1班", "90", "85"],
/// ]);
/// let dataset = ingest(&table).unwrap();
/// assert_eq!(dataset.students()[0].name(), "李四");
/// assert_eq!(dataset.students()[0].rank, 1);
/// ```
pub fn ingest(table: &RawTable) -> Result<Dataset> {
    let headers: Vec<String> = header_names(table).into_iter().flatten().collect();
    let subjects = classify(&headers);

    let mut records = normalize(table, &subjects)?;
    if records.is_empty() {
        return Err(ReportError::malformed("no valid student rows found"));
    }

    records.iter_mut().for_each(derive);
    assign_ranks(&mut records);

    log::info!(
        "ingested {} students across {} subjects",
        records.len(),
        subjects.len()
    );
    Ok(Dataset::new(subjects, records))
}
