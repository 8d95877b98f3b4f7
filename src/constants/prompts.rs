use std::collections::BTreeSet;

use crate::models::dto::{
    request::{ContentSource, QuestionType},
    worksheet_dto::worksheet_schema,
};

pub const CONTENT_GENERATION_PROMPT: &str = r#"You are an expert Indian education specialist creating content for multi-grade classrooms.

## REQUIREMENTS

- Create culturally relevant content for Indian students
- Include local examples, festivals, and cultural references
- Adapt difficulty for the specified grade levels
- If multiple languages are requested, provide bilingual content
- Follow NCERT pedagogy principles
- Make content engaging and interactive

## FORMATTING

Write plain prose with light markdown only:
- `#`, `##` or `###` at the start of a line for headings
- `**bold**` and `*italic*` for emphasis
- `*`, `-` or `1.` at the start of a line for list items
- Blank lines between paragraphs

Start a paragraph with "Key Point:" for essential takeaways, "Activity:" for classroom
activities and "Indian Example:" or "Cultural Context:" for local references.
Do not emit HTML."#;

pub const WORKSHEET_GENERATION_PROMPT: &str = r#"You are an expert educator creating differentiated worksheets from educational content.

## TASK

1. Analyze the provided text content carefully
2. Create the requested number of questions suitable for the listed grades
3. Ensure questions test understanding and application
4. Include Indian cultural examples where appropriate
5. Provide detailed explanations for all answers

## OUTPUT FORMAT

Return ONLY a valid JSON object with two arrays of equal length, `questions` and `answers`,
where `answers[i]` answers `questions[i]`. Multiple choice questions have exactly 4 options
(A, B, C, D) and the answer gives the correct letter. No markdown, no commentary.

The object must conform to this JSON schema:
"#;

pub fn content_generation_prompt(
    prompt: &str,
    grades: &BTreeSet<u8>,
    languages: &[String],
    source: ContentSource,
) -> String {
    let source = match source {
        ContentSource::Prebook => "NCERT curriculum books",
        ContentSource::External => "external educational resources",
    };
    format!(
        "Context:\n- Target grades: {}\n- Languages: {}\n- Content source: {}\n\nGenerate educational content based on: {}",
        join_grades(grades),
        languages.join(", "),
        source,
        prompt
    )
}

pub fn worksheet_system_prompt() -> String {
    format!("{WORKSHEET_GENERATION_PROMPT}{}", worksheet_schema())
}

pub fn worksheet_prompt(
    source_content: &str,
    grades: &BTreeSet<u8>,
    question_type: QuestionType,
    question_count: u32,
) -> String {
    let grades = join_grades(grades);
    format!(
        "Based on this educational content, create {question_count} {} for grades {grades}:\n\n\"{source_content}\"\n\n\
         Make questions that:\n- Test key concepts and understanding\n- Are appropriate for grades {grades}\n\
         - Include practical applications\n- Use Indian context where relevant\n\n\
         Return in JSON format with questions and answers arrays.",
        question_type.describe()
    )
}

fn join_grades(grades: &BTreeSet<u8>) -> String {
    grades
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worksheet_prompt_mentions_count_type_and_grades() {
        let prompt = worksheet_prompt(
            "Plants make food.",
            &BTreeSet::from([6, 7]),
            QuestionType::MultipleChoice,
            30,
        );
        assert!(prompt.contains("create 30 multiple choice questions for grades 6, 7"));
        assert!(prompt.contains("\"Plants make food.\""));
    }

    #[test]
    fn worksheet_system_prompt_embeds_schema() {
        assert!(worksheet_system_prompt().contains("\"questions\""));
    }

    #[test]
    fn content_prompt_names_source() {
        let prompt = content_generation_prompt(
            "Monsoon",
            &BTreeSet::from([5]),
            &["English".to_string(), "Hindi".to_string()],
            ContentSource::Prebook,
        );
        assert!(prompt.contains("NCERT curriculum books"));
        assert!(prompt.contains("Languages: English, Hindi"));
    }
}
