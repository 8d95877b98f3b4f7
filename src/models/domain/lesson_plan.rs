use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A weekly lesson plan as produced by the planner agent. Every section is optional;
/// model output is routinely incomplete.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonPlan {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub grade: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub week_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub curriculum: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub objectives: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub daily_lessons: Vec<DailyLesson>,
    #[serde(deserialize_with = "lenient_vec")]
    pub assessments: Vec<Assessment>,
    #[serde(deserialize_with = "lenient_list")]
    pub resources: Vec<String>,
    #[serde(deserialize_with = "lenient_object")]
    pub ncert_alignment: Option<CurriculumAlignment>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyLesson {
    #[serde(deserialize_with = "lenient_string")]
    pub day: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub topic: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub objectives: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub activities: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub materials: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub homework: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub ncert_reference: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assessment {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub points: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurriculumAlignment {
    #[serde(deserialize_with = "lenient_vec")]
    pub textbooks: Vec<TextbookReference>,
    #[serde(deserialize_with = "lenient_string")]
    pub chapters: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub learning_outcomes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextbookReference {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub language: Option<String>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// Accepts strings, numbers, booleans or arrays of those; anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Accepts an array of scalars or a single scalar.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(&other).into_iter().collect(),
    })
}

/// Keeps the elements that parse; a non-array value is an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_fields_become_text() {
        let plan: LessonPlan = serde_json::from_value(json!({
            "title": "Fractions Week",
            "grade": 5,
            "weekNumber": 3,
            "dailyLessons": [{ "day": "Monday", "duration": 40 }]
        }))
        .expect("plan should parse");

        assert_eq!(plan.grade.as_deref(), Some("5"));
        assert_eq!(plan.week_number.as_deref(), Some("3"));
        assert_eq!(plan.daily_lessons[0].duration.as_deref(), Some("40"));
    }

    #[test]
    fn malformed_sections_degrade_to_defaults() {
        let plan: LessonPlan = serde_json::from_value(json!({
            "objectives": "Understand halves",
            "resources": null,
            "subject": {},
            "dailyLessons": null,
            "ncertAlignment": "see textbook"
        }))
        .expect("plan should parse");

        assert_eq!(plan.objectives, vec!["Understand halves".to_string()]);
        assert!(plan.resources.is_empty());
        assert!(plan.subject.is_none());
        assert!(plan.daily_lessons.is_empty());
        assert!(plan.ncert_alignment.is_none());
    }
}
