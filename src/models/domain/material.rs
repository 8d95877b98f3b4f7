use serde::{Deserialize, Serialize};

/// One labeled answer choice of a question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub label: String,
    pub text: String,
}

impl QuestionOption {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuestion {
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub correct_label: Option<String>, // None for free-response questions
    pub explanation: String,
}

impl NormalizedQuestion {
    pub fn option(&self, label: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.label == label)
    }

    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.correct_label
            .as_deref()
            .and_then(|label| self.option(label))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAnswer {
    pub correct_answer_text: String,
    pub explanation: String,
}

/// Index-aligned questions and answers: `answers[i]` always belongs to `questions[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NormalizedMaterialSet {
    pub questions: Vec<NormalizedQuestion>,
    pub answers: Vec<NormalizedAnswer>,
}

impl NormalizedMaterialSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        self.questions.len() == self.answers.len()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&NormalizedQuestion, &NormalizedAnswer)> {
        self.questions.iter().zip(self.answers.iter())
    }
}
