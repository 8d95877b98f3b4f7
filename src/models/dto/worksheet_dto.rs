use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Shape the worksheet prompt asks the model for. Responses are not parsed into this
/// type; they go through the normalizer, which tolerates any deviation from it.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct WorksheetPayload {
    pub questions: Vec<WorksheetQuestionDto>,
    pub answers: Vec<WorksheetAnswerDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct WorksheetQuestionDto {
    /// The question prompt shown to students.
    pub question: String,
    /// Answer choices in display order; empty for free-response questions.
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetAnswerDto {
    /// Letter of the correct option ("A".."D"), or the expected answer for free-response questions.
    pub correct_answer: String,
    pub explanation: String,
}

pub fn worksheet_schema() -> String {
    let schema = schemars::schema_for!(WorksheetPayload);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_both_arrays() {
        let schema = worksheet_schema();
        assert!(schema.contains("\"questions\""));
        assert!(schema.contains("\"answers\""));
        assert!(schema.contains("\"correctAnswer\""));
    }
}
