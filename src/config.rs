use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// User-editable report settings, supplied at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Title prefix; the report heading appends `素质发展`.
    pub report_title: String,
    /// Term label, e.g. `2024-2025学年第一学期`.
    pub report_period: String,
    /// Fallback school name for rows without a `学校` column.
    pub school_name: String,
    pub principal_name: String,
    pub director_name: String,
    pub teacher_name: String,
    pub show_id_card: bool,
    pub show_school: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            report_title: "浙江省初中".to_string(),
            report_period: "2024-2025学年第一学期".to_string(),
            school_name: String::new(),
            principal_name: String::new(),
            director_name: String::new(),
            teacher_name: String::new(),
            show_id_card: false,
            show_school: false,
        }
    }
}

impl ReportConfig {
    /// Read settings from a JSON file. Keys missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like [`ReportConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Listener and storage settings for the HTTP service, read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Where report settings are persisted, if anywhere.
    pub config_path: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
            config_path: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerSettings {
    /// Reads `HOST`, `PORT`, `REPORT_CONFIG` and `MAX_UPLOAD_BYTES`; unset or
    /// unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        ServerSettings {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            config_path: lookup("REPORT_CONFIG").filter(|v| !v.is_empty()),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
