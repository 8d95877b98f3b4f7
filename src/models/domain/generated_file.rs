use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub file_name: String,
    pub file_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub scanned: usize,
    pub removed: usize,
    pub failed: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Html,
    Pdf,
}

impl FileFormat {
    pub const ACCEPTED: [FileFormat; 2] = [FileFormat::Html, FileFormat::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Html => ".html",
            FileFormat::Pdf => ".pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileFormat::Html => "text/html; charset=utf-8",
            FileFormat::Pdf => "application/pdf",
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ACCEPTED
            .into_iter()
            .find(|format| file_name.ends_with(format.extension()))
    }
}
