#[cfg(test)]
pub mod fixtures {
    use std::collections::BTreeSet;

    use serde_json::{json, Value};

    use crate::models::domain::DocumentMetadata;

    /// A worksheet payload with `count` four-option questions whose answer is always B
    pub fn worksheet_payload(count: usize) -> Value {
        let questions: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("What is {i} + 1?"),
                    "options": [i.to_string(), (i + 1).to_string(), (i + 2).to_string(), (i + 3).to_string()]
                })
            })
            .collect();
        let answers: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "correctAnswer": "B",
                    "explanation": format!("{i} plus one is {}", i + 1)
                })
            })
            .collect();
        json!({ "questions": questions, "answers": answers })
    }

    /// Creates metadata for grades 6 and 7 without a subject
    pub fn test_metadata(title: &str) -> DocumentMetadata {
        DocumentMetadata::new(
            title,
            BTreeSet::from([6, 7]),
            vec!["English".to_string()],
            None,
            "Test Agent",
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::{material_coordinator, normalizer};

    #[test]
    fn test_fixtures_worksheet_payload() {
        let payload = worksheet_payload(3);
        assert_eq!(payload["questions"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["answers"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_fixture_payload_normalizes_and_renders() {
        let (questions, answers) = normalizer::extract_material_arrays(&worksheet_payload(5));
        let set = normalizer::normalize(&questions, &answers).expect("fixture normalizes");

        assert!(set
            .questions
            .iter()
            .all(|q| q.correct_label.as_deref() == Some("B")));
        assert_eq!(set.answers[2].correct_answer_text, "B. 3");

        let docs = material_coordinator::render_material_set(&test_metadata("Sums"), &set)
            .expect("aligned set renders");
        assert_eq!(docs.answers.title(), "Sums - Answer Key");
    }
}
