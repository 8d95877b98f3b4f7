use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{NormalizedAnswer, NormalizedMaterialSet, NormalizedQuestion, QuestionOption},
};

pub const QUESTION_PLACEHOLDER: &str = "Question text unavailable.";
pub const OPTION_PLACEHOLDER: &str = "Option unavailable.";
pub const ANSWER_PLACEHOLDER: &str = "Answer not provided.";
pub const EXPLANATION_PLACEHOLDER: &str = "No explanation provided.";

const MAX_OPTIONS: usize = 26;

/// A logical field looked up in loosely-shaped model output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    QuestionArray,
    AnswerArray,
    QuestionText,
    Options,
    OptionText,
    CorrectAnswer,
    Explanation,
}

/// Candidate keys per field, highest priority first.
pub const FIELD_CANDIDATES: &[(Field, &[&str])] = &[
    (Field::QuestionArray, &["questions", "items", "worksheet"]),
    (
        Field::AnswerArray,
        &["answers", "answer_key", "answerKey", "solutions"],
    ),
    (
        Field::QuestionText,
        &["question", "question_text", "text", "questionText"],
    ),
    (Field::Options, &["options", "choices", "answers"]),
    (Field::OptionText, &["text", "option", "value", "content"]),
    (
        Field::CorrectAnswer,
        &[
            "correctAnswer",
            "correct_answer",
            "correct_option",
            "answer",
            "correct",
            "solution",
            "correctLabel",
            "correctAnswerText",
        ],
    ),
    (
        Field::Explanation,
        &["explanation", "rationale", "reasoning", "details"],
    ),
];

static LETTER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:option\s+)?([A-Za-z])(?:[).:]|$)")
        .expect("LETTER_PREFIX is a valid regex pattern")
});

static EMBEDDED_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([A-Za-z])[).]\s+").expect("EMBEDDED_LABEL is a valid regex pattern")
});

pub fn candidates(field: Field) -> &'static [&'static str] {
    FIELD_CANDIDATES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Returns the value of the first candidate key that is present.
pub fn resolve<'a>(object: &'a Map<String, Value>, field: Field) -> Option<&'a Value> {
    candidates(field)
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Value::Object(map) => resolve(map, Field::OptionText).and_then(value_text),
        _ => None,
    }
}

fn resolve_text(object: Option<&Map<String, Value>>, field: Field) -> Option<String> {
    object
        .and_then(|map| resolve(map, field))
        .and_then(value_text)
}

fn position_label(index: usize) -> String {
    char::from(b'A' + (index % MAX_OPTIONS) as u8).to_string()
}

fn explicit_label(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    (first.is_ascii_alphabetic() && (rest.is_empty() || rest == ")" || rest == "."))
        .then(|| first.to_ascii_uppercase().to_string())
}

/// Strips a leading "A) " style label when it agrees with the option's position.
fn strip_embedded_label(text: &str, label: &str) -> String {
    if let Some(caps) = EMBEDDED_LABEL.captures(text) {
        if caps[1].eq_ignore_ascii_case(label) {
            return text[caps[0].len()..].trim().to_string();
        }
    }
    text.to_string()
}

/// Keeps the proposed labels when they are valid and distinct, otherwise relabels by position.
fn assign_labels(proposed: Vec<(Option<String>, String)>) -> Vec<QuestionOption> {
    let mut seen = HashSet::new();
    let keep_proposed = proposed
        .iter()
        .all(|(label, _)| label.as_ref().is_some_and(|l| seen.insert(l.clone())));

    proposed
        .into_iter()
        .enumerate()
        .map(|(index, (label, text))| {
            let label = match label {
                Some(label) if keep_proposed => label,
                _ => position_label(index),
            };
            QuestionOption { label, text }
        })
        .collect()
}

/// Relabels loose entries and strips any embedded label prefix from their text.
fn assign_loose_labels(proposed: Vec<(Option<String>, String)>) -> Vec<QuestionOption> {
    let mut options = assign_labels(proposed);
    for option in options.iter_mut() {
        option.text = strip_embedded_label(&option.text, &option.label);
    }
    options
}

fn option_entry_text(value: &Value) -> String {
    value_text(value).unwrap_or_else(|| OPTION_PLACEHOLDER.to_string())
}

fn parse_options(value: &Value) -> Vec<QuestionOption> {
    match value {
        Value::Array(items) => {
            let proposed: Vec<(Option<String>, String)> = items
                .iter()
                .take(MAX_OPTIONS)
                .map(|item| {
                    let label = item
                        .as_object()
                        .and_then(|map| map.get("label"))
                        .and_then(Value::as_str)
                        .and_then(explicit_label);
                    (label, option_entry_text(item))
                })
                .collect();
            // Entries that carry their own label are already canonical text.
            let carried: Vec<bool> = proposed.iter().map(|(label, _)| label.is_some()).collect();
            let mut options = assign_labels(proposed);
            for (option, carried) in options.iter_mut().zip(carried) {
                if !carried {
                    option.text = strip_embedded_label(&option.text, &option.label);
                }
            }
            options
        }
        Value::Object(map) => assign_loose_labels(
            map.iter()
                .take(MAX_OPTIONS)
                .map(|(key, item)| (explicit_label(key), option_entry_text(item)))
                .collect(),
        ),
        Value::String(s) => assign_loose_labels(
            s.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(MAX_OPTIONS)
                .map(|line| (None, line.to_string()))
                .collect(),
        ),
        other => assign_loose_labels(vec![(None, option_entry_text(other))]),
    }
}

/// Resolves `"<label>. <text>"` when both halves name the same option.
fn labelled_option(raw: &str, options: &[QuestionOption]) -> Option<String> {
    let caps = EMBEDDED_LABEL.captures(raw)?;
    let rest = raw[caps[0].len()..].trim();
    options
        .iter()
        .find(|o| o.label.eq_ignore_ascii_case(&caps[1]) && o.text.trim() == rest)
        .map(|o| o.label.clone())
}

/// Maps a raw correct-answer value onto one of the option labels.
pub fn resolve_correct_label(value: &Value, options: &[QuestionOption]) -> Option<String> {
    if options.is_empty() {
        return None;
    }

    let by_index = |index: usize| options.get(index).map(|o| o.label.clone());
    let has_label =
        |label: &str| options.iter().find(|o| o.label.eq_ignore_ascii_case(label)).map(|o| o.label.clone());

    match value {
        Value::Number(n) => n.as_u64().and_then(|i| by_index(i as usize)),
        Value::String(raw) => {
            let raw = raw.trim();
            if raw.len() == 1 {
                if let Some(label) = has_label(raw) {
                    return Some(label);
                }
            }
            if let Some(label) = labelled_option(raw, options) {
                return Some(label);
            }
            if let Some(option) = options
                .iter()
                .find(|o| o.text.trim().eq_ignore_ascii_case(raw))
            {
                return Some(option.label.clone());
            }
            if let Some(caps) = LETTER_PREFIX.captures(raw) {
                if let Some(label) = has_label(&caps[1]) {
                    return Some(label);
                }
            }
            raw.parse::<usize>().ok().and_then(by_index)
        }
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(s) => format!("string ({} bytes)", s.len()),
        Value::Array(items) => format!("array ({} items)", items.len()),
        Value::Object(map) => format!("object ({} keys)", map.len()),
    }
}

struct NormalizedItem {
    question: NormalizedQuestion,
    answer: NormalizedAnswer,
    gaps: usize,
}

fn normalize_item(raw_question: &Value, raw_answer: &Value) -> NormalizedItem {
    let question_obj = raw_question.as_object();
    let answer_obj = raw_answer.as_object();
    let mut gaps = 0;

    let text = match raw_question {
        Value::Object(_) => resolve_text(question_obj, Field::QuestionText),
        other => value_text(other),
    }
    .unwrap_or_else(|| {
        gaps += 1;
        QUESTION_PLACEHOLDER.to_string()
    });

    let options = question_obj
        .and_then(|map| resolve(map, Field::Options))
        .map(parse_options)
        .unwrap_or_default();

    // The answer entry wins; questions frequently carry their own key as a fallback.
    let correct_value = match raw_answer {
        Value::Object(map) => resolve(map, Field::CorrectAnswer),
        Value::String(_) | Value::Number(_) if is_present(raw_answer) => Some(raw_answer),
        _ => None,
    }
    .or_else(|| question_obj.and_then(|map| resolve(map, Field::CorrectAnswer)));

    let correct_label = correct_value.and_then(|value| resolve_correct_label(value, &options));

    let correct_answer_text = match correct_label
        .as_deref()
        .and_then(|label| options.iter().find(|o| o.label == label))
    {
        Some(option) => format!("{}. {}", option.label, option.text),
        None => correct_value.and_then(value_text).unwrap_or_else(|| {
            gaps += 1;
            ANSWER_PLACEHOLDER.to_string()
        }),
    };

    let question_explanation = resolve_text(question_obj, Field::Explanation)
        .or_else(|| resolve_text(answer_obj, Field::Explanation));
    let answer_explanation = resolve_text(answer_obj, Field::Explanation)
        .or_else(|| resolve_text(question_obj, Field::Explanation));
    if answer_explanation.is_none() {
        gaps += 1;
    }

    NormalizedItem {
        question: NormalizedQuestion {
            text,
            options,
            correct_label,
            explanation: question_explanation
                .unwrap_or_else(|| EXPLANATION_PLACEHOLDER.to_string()),
        },
        answer: NormalizedAnswer {
            correct_answer_text,
            explanation: answer_explanation.unwrap_or_else(|| EXPLANATION_PLACEHOLDER.to_string()),
        },
        gaps,
    }
}

/// Converts raw question/answer lists into an index-aligned canonical set.
///
/// Fails only when neither input is an array. Field-level gaps degrade to placeholder text.
pub fn normalize(raw_questions: &Value, raw_answers: &Value) -> AppResult<NormalizedMaterialSet> {
    let (questions, answers) = match (raw_questions.as_array(), raw_answers.as_array()) {
        (None, None) => {
            return Err(AppError::NormalizationError(format!(
                "no interpretable question or answer array (questions: {}, answers: {})",
                describe(raw_questions),
                describe(raw_answers)
            )))
        }
        (questions, answers) => (
            questions.map(Vec::as_slice).unwrap_or(&[]),
            answers.map(Vec::as_slice).unwrap_or(&[]),
        ),
    };

    let null = Value::Null;
    let count = questions.len().max(answers.len());
    let mut set = NormalizedMaterialSet {
        questions: Vec::with_capacity(count),
        answers: Vec::with_capacity(count),
    };
    let mut gaps = 0;

    for index in 0..count {
        let item = normalize_item(
            questions.get(index).unwrap_or(&null),
            answers.get(index).unwrap_or(&null),
        );
        gaps += item.gaps;
        set.questions.push(item.question);
        set.answers.push(item.answer);
    }

    if gaps > 0 {
        log::warn!(
            "Normalized {} items with {} field gaps replaced by placeholders",
            count,
            gaps
        );
    }

    Ok(set)
}

/// Splits a model worksheet payload into its raw question and answer arrays.
pub fn extract_material_arrays(payload: &Value) -> (Value, Value) {
    match payload {
        Value::Array(_) => (payload.clone(), Value::Null),
        Value::Object(map) => {
            let pick = |field| {
                candidates(field)
                    .iter()
                    .filter_map(|key| map.get(*key))
                    .find(|value| value.is_array())
                    .cloned()
                    .unwrap_or(Value::Null)
            };
            (pick(Field::QuestionArray), pick(Field::AnswerArray))
        }
        _ => (Value::Null, Value::Null),
    }
}

/// Normalizes an already-canonical set by round-tripping it through the raw path.
pub fn renormalize(set: &NormalizedMaterialSet) -> AppResult<NormalizedMaterialSet> {
    let questions = serde_json::to_value(&set.questions)?;
    let answers = serde_json::to_value(&set.answers)?;
    normalize(&questions, &answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidate_table_priority_is_fixed() {
        assert_eq!(
            candidates(Field::QuestionText),
            &["question", "question_text", "text", "questionText"]
        );
        assert_eq!(candidates(Field::Options), &["options", "choices", "answers"]);
        assert_eq!(
            &candidates(Field::CorrectAnswer)[..6],
            &["correctAnswer", "correct_answer", "correct_option", "answer", "correct", "solution"]
        );
        assert_eq!(
            candidates(Field::Explanation),
            &["explanation", "rationale", "reasoning", "details"]
        );
    }

    #[test]
    fn resolve_takes_first_present_key() {
        let value = json!({ "text": "second", "question": "first" });
        let map = value.as_object().unwrap();
        assert_eq!(resolve(map, Field::QuestionText), Some(&json!("first")));

        let value = json!({ "question": "  ", "question_text": "fallback" });
        let map = value.as_object().unwrap();
        assert_eq!(resolve(map, Field::QuestionText), Some(&json!("fallback")));
    }

    #[test]
    fn scenario_array_options_with_numeric_answer() {
        let questions = json!([{
            "question": "What is 2+2?",
            "options": ["3", "4", "5", "6"],
            "correctAnswer": 1,
            "explanation": "Basic addition"
        }]);

        let set = normalize(&questions, &Value::Null).unwrap();
        let question = &set.questions[0];

        assert_eq!(question.text, "What is 2+2?");
        assert_eq!(
            question.options,
            vec![
                QuestionOption::new("A", "3"),
                QuestionOption::new("B", "4"),
                QuestionOption::new("C", "5"),
                QuestionOption::new("D", "6"),
            ]
        );
        assert_eq!(question.correct_label.as_deref(), Some("B"));
        assert_eq!(question.explanation, "Basic addition");
        assert_eq!(set.answers[0].correct_answer_text, "B. 4");
    }

    #[test]
    fn object_options_keep_key_order() {
        let questions = json!([{ "question": "Pick", "options": { "B": "y", "A": "x" } }]);
        let set = normalize(&questions, &json!([])).unwrap();

        assert_eq!(
            set.questions[0].options,
            vec![QuestionOption::new("B", "y"), QuestionOption::new("A", "x")]
        );
    }

    #[test]
    fn object_options_with_odd_keys_are_relabelled() {
        let questions = json!([{ "question": "Pick", "choices": { "first": "x", "second": "y" } }]);
        let set = normalize(&questions, &json!([])).unwrap();

        assert_eq!(
            set.questions[0].options,
            vec![QuestionOption::new("A", "x"), QuestionOption::new("B", "y")]
        );
    }

    #[test]
    fn answers_resolved_from_answer_list_by_index() {
        let questions = json!([
            { "question_text": "Capital of India?", "choices": ["Mumbai", "New Delhi"] },
            { "questionText": "Largest planet?", "answers": ["Jupiter", "Mars"] }
        ]);
        let answers = json!([
            { "correct_answer": "New Delhi", "rationale": "Seat of government" },
            { "answer": "A", "reasoning": "By mass" }
        ]);

        let set = normalize(&questions, &answers).unwrap();

        assert_eq!(set.questions[0].correct_label.as_deref(), Some("B"));
        assert_eq!(set.answers[0].correct_answer_text, "B. New Delhi");
        assert_eq!(set.answers[0].explanation, "Seat of government");
        assert_eq!(set.questions[1].correct_label.as_deref(), Some("A"));
        assert_eq!(set.answers[1].explanation, "By mass");
    }

    #[test]
    fn letter_with_delimiter_resolves_label() {
        let options = vec![QuestionOption::new("A", "x"), QuestionOption::new("B", "y")];
        assert_eq!(resolve_correct_label(&json!("b)"), &options).as_deref(), Some("B"));
        assert_eq!(resolve_correct_label(&json!("B. y"), &options).as_deref(), Some("B"));
        assert_eq!(resolve_correct_label(&json!("Option A"), &options).as_deref(), Some("A"));
        assert_eq!(resolve_correct_label(&json!("1"), &options).as_deref(), Some("B"));
        assert_eq!(resolve_correct_label(&json!("A plant"), &options), None);
        assert_eq!(resolve_correct_label(&json!(7), &options), None);
    }

    #[test]
    fn free_response_keeps_text_answer() {
        let questions = json!([{ "question": "Define photosynthesis." }]);
        let answers = json!([{ "solution": "Plants make food from sunlight." }]);

        let set = normalize(&questions, &answers).unwrap();

        assert!(set.questions[0].options.is_empty());
        assert!(set.questions[0].correct_label.is_none());
        assert_eq!(set.answers[0].correct_answer_text, "Plants make food from sunlight.");
        assert_eq!(set.answers[0].explanation, EXPLANATION_PLACEHOLDER);
    }

    #[test]
    fn missing_fields_degrade_to_placeholders() {
        let set = normalize(&json!([{}, "Plain string question"]), &json!([null])).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.is_aligned());
        assert_eq!(set.questions[0].text, QUESTION_PLACEHOLDER);
        assert_eq!(set.answers[0].correct_answer_text, ANSWER_PLACEHOLDER);
        assert_eq!(set.questions[1].text, "Plain string question");
    }

    #[test]
    fn unreadable_option_entries_get_placeholder() {
        let set = normalize(&json!([{ "question": "Q", "options": [null, "4"] }]), &Value::Null).unwrap();
        assert_eq!(
            set.questions[0].options,
            vec![
                QuestionOption::new("A", OPTION_PLACEHOLDER),
                QuestionOption::new("B", "4")
            ]
        );
    }

    #[test]
    fn empty_option_list_is_free_response() {
        let set = normalize(&json!([{ "question": "Q", "options": [] }]), &Value::Null).unwrap();
        assert!(set.questions[0].options.is_empty());
    }

    #[test]
    fn embedded_labels_are_stripped_when_they_match_position() {
        let set = normalize(
            &json!([{ "question": "Q", "options": ["A) red", "B) blue", "D. green"] }]),
            &Value::Null,
        )
        .unwrap();
        let texts: Vec<&str> = set.questions[0].options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["red", "blue", "D. green"]);
    }

    #[test]
    fn longer_list_wins_and_sets_stay_aligned() {
        let set = normalize(&json!([{ "question": "Only one" }]), &json!(["a", "b", "c"])).unwrap();
        assert_eq!(set.questions.len(), 3);
        assert_eq!(set.answers.len(), 3);
        assert_eq!(set.questions[2].text, QUESTION_PLACEHOLDER);
        assert_eq!(set.answers[2].correct_answer_text, "c");
    }

    #[test]
    fn non_array_inputs_fail_with_shape_only() {
        let err = normalize(&json!({ "secret": "payload" }), &Value::Null).unwrap_err();
        match err {
            AppError::NormalizationError(message) => {
                assert!(message.contains("object (1 keys)"));
                assert!(!message.contains("payload"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let questions = json!([
            { "question": "What is 2+2?", "options": ["3", "4"], "correctAnswer": "4", "explanation": "Sum" },
            { "text": "Pick", "options": { "B": "y", "A": "x" }, "answer": "A" },
            { "question": "Explain rain." },
            { "question": "Odd", "options": ["x"], "correct": 9 },
            { "question": "Q", "options": ["A) A) red", "B) blue"], "correctAnswer": "A" },
            { "question": "Lookalike", "options": ["B. y", "y"], "correctAnswer": "B" }
        ]);
        let answers = json!([null, { "details": "Because" }, { "solution": "Condensation" }]);

        let once = normalize(&questions, &answers).unwrap();
        let twice = renormalize(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.questions[4].options[0].text, "A) red");
        assert_eq!(once.questions[5].correct_label.as_deref(), Some("B"));
        assert_eq!(twice.answers[5].correct_answer_text, "B. y");
    }

    #[test]
    fn labelled_answer_text_resolves_to_its_own_option() {
        let options = vec![QuestionOption::new("A", "B. y"), QuestionOption::new("B", "y")];
        assert_eq!(
            resolve_correct_label(&json!("B. y"), &options).as_deref(),
            Some("B")
        );
        assert_eq!(
            resolve_correct_label(&json!("A. B. y"), &options).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn labelled_array_entries_keep_their_text() {
        let options = parse_options(&json!([
            { "label": "A", "text": "A) red" },
            { "label": "B", "text": "blue" }
        ]));
        assert_eq!(options[0].text, "A) red");

        let loose = parse_options(&json!(["A) red", "B) blue"]));
        assert_eq!(loose[0].text, "red");
    }

    #[test]
    fn extract_arrays_from_payload_variants() {
        let (q, a) = extract_material_arrays(&json!({ "items": [1], "answer_key": [2] }));
        assert_eq!(q, json!([1]));
        assert_eq!(a, json!([2]));

        let (q, a) = extract_material_arrays(&json!([{ "question": "x" }]));
        assert!(q.is_array());
        assert!(a.is_null());

        let (q, a) = extract_material_arrays(&json!("prose"));
        assert!(q.is_null() && a.is_null());
    }
}
