use serde::Serialize;

use crate::models::domain::{GeneratedFile, NormalizedMaterialSet};

pub const DOWNLOAD_ROUTE: &str = "/api/download-pdf";

pub fn download_url(file_name: &str) -> String {
    format!("{DOWNLOAD_ROUTE}/{file_name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum DownloadReference {
    Single {
        file_name: String,
        download_url: String,
    },
    Pair {
        questions_file: String,
        answers_file: String,
        questions_download_url: String,
        answers_download_url: String,
    },
}

impl DownloadReference {
    pub fn single(file: &GeneratedFile) -> Self {
        DownloadReference::Single {
            file_name: file.file_name.clone(),
            download_url: download_url(&file.file_name),
        }
    }

    pub fn pair(questions: &GeneratedFile, answers: &GeneratedFile) -> Self {
        DownloadReference::Pair {
            questions_file: questions.file_name.clone(),
            answers_file: answers.file_name.clone(),
            questions_download_url: download_url(&questions.file_name),
            answers_download_url: download_url(&answers.file_name),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<NormalizedMaterialSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<DownloadReference>,
}

impl GenerationResponse {
    pub fn document(message: impl Into<String>, content: Option<String>, file: &GeneratedFile) -> Self {
        GenerationResponse {
            success: true,
            message: message.into(),
            content,
            materials: None,
            pdf: Some(DownloadReference::single(file)),
        }
    }

    pub fn materials(
        message: impl Into<String>,
        materials: NormalizedMaterialSet,
        questions: &GeneratedFile,
        answers: &GeneratedFile,
    ) -> Self {
        GenerationResponse {
            success: true,
            message: message.into(),
            content: None,
            materials: Some(materials),
            pdf: Some(DownloadReference::pair(questions, answers)),
        }
    }
}
