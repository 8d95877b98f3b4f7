use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::content_block::ContentBlock;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub title: String,
    pub grades: BTreeSet<u8>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub agent_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_count: Option<usize>,
    pub generated_at: DateTime<Utc>,
}

impl DocumentMetadata {
    pub fn new(
        title: &str,
        grades: BTreeSet<u8>,
        languages: Vec<String>,
        subject: Option<String>,
        agent_label: &str,
    ) -> Self {
        DocumentMetadata {
            title: title.to_string(),
            grades,
            languages,
            subject: subject.filter(|s| !s.trim().is_empty()),
            agent_label: agent_label.to_string(),
            question_count: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = Some(count);
        self
    }

    pub fn grades_display(&self) -> String {
        self.grades
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn languages_display(&self) -> String {
        self.languages.join(", ")
    }
}

/// Metadata plus ordered blocks; a pure value until the store persists its markup.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderedDocument {
    pub metadata: DocumentMetadata,
    pub blocks: Vec<ContentBlock>,
}

impl RenderedDocument {
    pub fn new(metadata: DocumentMetadata, blocks: Vec<ContentBlock>) -> Self {
        Self { metadata, blocks }
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grades_display_is_sorted_and_deduplicated() {
        let grades: BTreeSet<u8> = [7, 6, 7].into_iter().collect();
        let metadata = DocumentMetadata::new("Water Cycle", grades, vec![], None, "Content");
        assert_eq!(metadata.grades_display(), "6, 7");
    }

    #[test]
    fn blank_subject_is_treated_as_absent() {
        let metadata = DocumentMetadata::new(
            "Water Cycle",
            BTreeSet::from([5]),
            vec!["English".to_string()],
            Some("   ".to_string()),
            "Content",
        );
        assert!(metadata.subject.is_none());
    }
}
