use serde::ser::{Serialize, SerializeMap, Serializer};

/// Header of the one column every upload must carry.
pub const NAME_FIELD: &str = "姓名";
pub const CLASS_FIELD: &str = "班级";
pub const STUDENT_ID_FIELD: &str = "学号";

/// Ordered association of header name to trimmed cell text.
///
/// Inserting a name that is already present overwrites the value in place, so
/// a duplicated header keeps its first position and its last value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Fields(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`Fields::get`] but treats an empty value as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One subject cell after coercion.
#[derive(Clone, Debug, PartialEq)]
pub struct SubjectScore {
    pub subject: String,
    /// Trimmed source text, kept for display.
    pub raw: String,
    /// Coerced numeric value; 0 when the text holds no number.
    pub score: f64,
}

impl SubjectScore {
    /// Only strictly positive scores count toward totals and averages.
    pub fn is_valid(&self) -> bool {
        self.score > 0.0
    }
}

/// A normalized spreadsheet row plus the values derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct StudentRecord {
    pub fields: Fields,
    pub subjects: Vec<String>,
    pub scores: Vec<SubjectScore>,
    pub total_score: f64,
    pub valid_score_count: usize,
    /// One-decimal text, or exactly `"0"` when no score is valid.
    pub average_score: String,
    /// 1-based position by total score; 0 until the batch is ranked.
    pub rank: usize,
}

impl StudentRecord {
    /// An underived record. Call [`crate::derivation::derive`] to fill scores.
    pub fn new(fields: Fields, subjects: Vec<String>) -> Self {
        StudentRecord {
            fields,
            subjects,
            scores: Vec::new(),
            total_score: 0.0,
            valid_score_count: 0,
            average_score: "0".to_string(),
            rank: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.fields.get(NAME_FIELD).unwrap_or_default()
    }

    pub fn class(&self) -> Option<&str> {
        self.fields.non_empty(CLASS_FIELD)
    }

    pub fn student_id(&self) -> Option<&str> {
        self.fields.non_empty(STUDENT_ID_FIELD)
    }

    /// Raw text of any column, including metadata columns.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// Coerced score of a subject column.
    pub fn score(&self, subject: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.subject == subject)
            .map(|s| s.score)
    }

    /// Average as a number; the `"0"` sentinel reads as 0.
    pub fn average_value(&self) -> f64 {
        self.average_score.parse().unwrap_or(0.0)
    }
}

/// Serializes as one flat object: every column keyed by its header (subject
/// columns carry their coerced number), followed by the derived fields.
impl Serialize for StudentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 5))?;
        for (name, value) in self.fields.iter() {
            match self.score(name) {
                Some(score) => map.serialize_entry(name, &score)?,
                None => map.serialize_entry(name, value)?,
            }
        }
        map.serialize_entry("totalScore", &self.total_score)?;
        map.serialize_entry("averageScore", &self.average_score)?;
        map.serialize_entry("subjects", &self.subjects)?;
        map.serialize_entry("subjectCount", &self.valid_score_count)?;
        map.serialize_entry("rank", &self.rank)?;
        map.end()
    }
}
