use crate::error::{ReportError, Result};
use crate::normalizer::ingest;
use crate::student::StudentRecord;
use crate::table::RawTable;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Ranked students of the most recent upload, best total first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    subjects: Vec<String>,
    students: Vec<StudentRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_students: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub students: &'a [StudentRecord],
    pub pagination: Pagination,
}

impl Dataset {
    pub fn new(subjects: Vec<String>, students: Vec<StudentRecord>) -> Self {
        Dataset { subjects, students }
    }

    /// Subject columns shared by every record of the batch.
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&StudentRecord> {
        self.students.get(index).ok_or(ReportError::NotFound {
            index,
            len: self.students.len(),
        })
    }

    /// The first `count` records.
    pub fn preview(&self, count: usize) -> &[StudentRecord] {
        &self.students[..count.min(self.students.len())]
    }

    /// One page of records. Pages are 1-based; a page past the end is empty.
    ///
    /// # Examples
    /// ```
    /// use report_card::dataset::Dataset;
    ///
    /// let dataset = Dataset::default();
    /// let page = dataset.page(3, 50);
    /// assert!(page.students.is_empty());
    /// assert!(!page.pagination.has_next);
    /// ```
    pub fn page(&self, page: usize, limit: usize) -> Page<'_> {
        let page = page.max(1);
        let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        let total = self.students.len();

        let start = (page - 1).saturating_mul(limit);
        let end = start.saturating_add(limit);
        let students = self
            .students
            .get(start.min(total)..end.min(total))
            .unwrap_or_default();

        Page {
            students,
            pagination: Pagination {
                current_page: page,
                total_pages: total.div_ceil(limit),
                total_students: total,
                has_next: end < total,
                has_prev: start > 0,
            },
        }
    }
}

/// Session-scoped holder of the current dataset.
///
/// Readers take a cheap snapshot; a new upload swaps the whole dataset at once
/// and a failed upload leaves the previous one in place.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Arc<Dataset>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Dataset> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::clone(&dataset);
        dataset
    }

    pub fn clear(&self) {
        self.replace(Dataset::default());
    }

    /// Ingest a table and install the result. Nothing changes on error.
    pub fn ingest_table(&self, table: &RawTable) -> Result<Arc<Dataset>> {
        let dataset = ingest(table)?;
        Ok(self.replace(dataset))
    }
}
