use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::models::domain::LessonPlan;

pub const DEFAULT_QUESTION_COUNT: u32 = 25;
pub const DEFAULT_LANGUAGE: &str = "English";

fn default_languages() -> Vec<String> {
    vec![DEFAULT_LANGUAGE.to_string()]
}

fn validate_grades(grades: &[i64]) -> Result<(), ValidationError> {
    if grades.iter().all(|grade| (1..=12).contains(grade)) {
        Ok(())
    } else {
        Err(ValidationError::new("grade_range").with_message("Grades must be between 1 and 12".into()))
    }
}

/// Sorted, de-duplicated grade set; call only after validation.
pub fn grade_set(grades: &[i64]) -> BTreeSet<u8> {
    grades
        .iter()
        .filter_map(|grade| u8::try_from(*grade).ok())
        .collect()
}

/// Languages with blanks removed, falling back to English.
pub fn language_list(languages: &[String]) -> Vec<String> {
    let languages: Vec<String> = languages
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if languages.is_empty() {
        default_languages()
    } else {
        languages
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    Worksheet,
}

impl QuestionType {
    pub fn describe(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple choice questions",
            QuestionType::Worksheet => "mixed questions",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Multiple Choice Questions",
            QuestionType::Worksheet => "Mixed Questions",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Prebook,
    #[default]
    External,
}

/// Either generated prose or a raw question/answer payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    Prose(String),
    Materials {
        #[serde(default)]
        questions: Value,
        #[serde(default)]
        answers: Value,
    },
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    pub content: DocumentContent,

    #[validate(
        length(min = 1, message = "At least one grade is required"),
        custom(function = "validate_grades")
    )]
    pub grades: Vec<i64>,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    pub subject: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Agent label is required"))]
    pub agent_label: String,

    #[serde(default)]
    pub question_type: Option<QuestionType>,

    #[validate(range(min = 1, max = 100, message = "Question count must be between 1 and 100"))]
    pub question_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentGenerationRequest {
    #[validate(length(min = 1, max = 5000, message = "Prompt is required"))]
    pub prompt: String,

    #[validate(
        length(min = 1, message = "At least one grade is required"),
        custom(function = "validate_grades")
    )]
    pub grades: Vec<i64>,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    pub subject: Option<String>,

    #[serde(default)]
    pub content_source: ContentSource,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DifferentiatedMaterialsRequest {
    #[validate(length(min = 1, max = 20000, message = "Source content is required"))]
    pub source_content: String,

    #[validate(
        length(min = 1, message = "At least one grade is required"),
        custom(function = "validate_grades")
    )]
    pub grades: Vec<i64>,

    #[serde(default)]
    pub question_type: QuestionType,

    #[validate(range(min = 1, max = 100, message = "Question count must be between 1 and 100"))]
    pub question_count: Option<i64>,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    pub subject: Option<String>,
}

impl DifferentiatedMaterialsRequest {
    pub fn question_count(&self) -> u32 {
        self.question_count
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or(DEFAULT_QUESTION_COUNT)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonPlanDocumentRequest {
    pub plan: LessonPlan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document_request(body: Value) -> DocumentRequest {
        serde_json::from_value(body).expect("request should deserialize")
    }

    #[test]
    fn content_accepts_prose_or_materials() {
        let prose = document_request(json!({
            "title": "Water Cycle",
            "content": "# Intro",
            "grades": [6],
            "agentLabel": "Content"
        }));
        assert_eq!(prose.content, DocumentContent::Prose("# Intro".to_string()));

        let materials = document_request(json!({
            "title": "Water Cycle",
            "content": { "questions": [{ "question": "Why?" }] },
            "grades": [6],
            "agentLabel": "Worksheet"
        }));
        match materials.content {
            DocumentContent::Materials { questions, answers } => {
                assert!(questions.is_array());
                assert!(answers.is_null());
            }
            other => panic!("expected materials, got {other:?}"),
        }
    }

    #[test]
    fn languages_default_to_english() {
        let request = document_request(json!({
            "title": "t", "content": "c", "grades": [1], "agentLabel": "a"
        }));
        assert_eq!(request.languages, vec!["English".to_string()]);
        assert_eq!(language_list(&["  ".to_string()]), vec!["English".to_string()]);
    }

    #[test]
    fn grades_must_be_in_range_and_present() {
        let empty = document_request(json!({
            "title": "t", "content": "c", "grades": [], "agentLabel": "a"
        }));
        assert!(empty.validate().is_err());

        let out_of_range = document_request(json!({
            "title": "t", "content": "c", "grades": [0, 13], "agentLabel": "a"
        }));
        assert!(out_of_range.validate().is_err());

        let valid = document_request(json!({
            "title": "t", "content": "c", "grades": [7, 6, 7], "agentLabel": "a"
        }));
        assert!(valid.validate().is_ok());
        assert_eq!(grade_set(&valid.grades), BTreeSet::from([6, 7]));
    }

    #[test]
    fn question_count_rejects_zero_and_negative() {
        for count in [0, -3, 101] {
            let request = document_request(json!({
                "title": "t", "content": "c", "grades": [6], "agentLabel": "a",
                "questionCount": count
            }));
            assert!(request.validate().is_err(), "{count} should be rejected");
        }
    }

    #[test]
    fn differentiated_request_defaults() {
        let request: DifferentiatedMaterialsRequest = serde_json::from_value(json!({
            "sourceContent": "Plants make food.",
            "grades": [6, 7]
        }))
        .expect("request should deserialize");

        assert_eq!(request.question_count(), DEFAULT_QUESTION_COUNT);
        assert_eq!(request.question_type, QuestionType::MultipleChoice);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn question_type_uses_kebab_case() {
        let parsed: QuestionType = serde_json::from_value(json!("multiple-choice")).unwrap();
        assert_eq!(parsed, QuestionType::MultipleChoice);
        assert_eq!(QuestionType::Worksheet.describe(), "mixed questions");
    }
}
