/*!
# Student Report Cards

Turns a spreadsheet of student scores into ranked student records and
per-student report cards.

## Overview

Teachers keep scores in loosely structured sheets: arbitrary column names,
numbers typed as text, optional metadata columns. This crate reads the first
sheet of such a workbook, works out which columns are subject scores, builds a
consistent record for every named student, ranks the batch and renders a
report card for each student.

## Architecture

### Pipeline
- **Tabular Reader** (`table`) - first worksheet of XLSX/XLS/ODS via calamine, or CSV
- **Column Classifier** (`classifier`) - subject columns by keyword, allowlist and exclusion list
- **Record Normalizer** (`normalizer`) - trimmed field maps, blank and unnamed rows dropped
- **Derivation Engine** (`derivation`) - score coercion, totals, averages, ranking

### Presentation
- **Report Renderer** (`render`) - pure render model per student
- **Grading** (`grading`, `comment`) - grade ladders, colours, narrative comments
- **HTML** (`html`) - handlebars report cards and batch export
- **Charts** (`chart`) - SVG bar charts of batch statistics

### Session
- **Dataset store** (`dataset`) - atomically replaced, paginated current dataset
- **Statistics** (`statistics`) - per-subject figures and grade distribution
- **Template** (`template`) - downloadable upload template (XLSX/CSV)
- **Web** (`app`, feature `web`) - axum JSON API around the above

## REST API Endpoints

- `POST /api/upload` - Upload a score sheet (multipart field `file`)
- `GET /api/students` - Paginated records (`page`, `limit`)
- `GET /api/students/{index}` - One record
- `GET /api/students/{index}/report` - One report card (HTML + model)
- `POST /api/reports/generate` - All report cards
- `GET /api/statistics` - Batch statistics
- `GET /api/template` - Upload template
- `DELETE /api/data` - Clear the current dataset
*/

pub mod chart;
pub mod classifier;
pub mod comment;
pub mod config;
pub mod dataset;
pub mod derivation;
pub mod error;
pub mod grading;
pub mod html;
pub mod normalizer;
pub mod render;
pub mod statistics;
pub mod student;
pub mod table;
pub mod template;

#[cfg(feature = "web")]
pub mod app;

pub use config::{ReportConfig, ServerSettings};
pub use dataset::{Dataset, DatasetStore};
pub use error::{ReportError, Result};
pub use normalizer::ingest;
pub use render::{RenderModel, render};
pub use student::StudentRecord;
pub use table::{CellValue, RawTable};
