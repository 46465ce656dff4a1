use thiserror::Error;

/// Errors raised while ingesting a score sheet or producing report output.
///
/// `MalformedInput` and `NotFound` are the two conditions callers are expected
/// to surface to users; the remaining variants wrap collaborator failures.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The uploaded table cannot be turned into a dataset.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A record index outside the current dataset.
    #[error("student {index} not found (dataset holds {len} records)")]
    NotFound { index: usize, len: usize },

    /// A record path segment that is not a record index at all.
    #[error("student '{0}' not found")]
    InvalidIndex(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("{0}")]
    Render(#[from] handlebars::RenderError),

    #[error("chart drawing failed: {0}")]
    Chart(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ReportError::MalformedInput(reason.into())
    }

    /// True for errors caused by the caller's input rather than the service.
    /// Decoding failures count: the bytes came from the uploader.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReportError::MalformedInput(_)
                | ReportError::NotFound { .. }
                | ReportError::InvalidIndex(_)
                | ReportError::UnsupportedFormat(_)
                | ReportError::Spreadsheet(_)
                | ReportError::Csv(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
