use std::collections::BTreeSet;

use crate::{
    models::domain::{
        lesson_plan::{Assessment, CurriculumAlignment, DailyLesson},
        ContentBlock, DocumentMetadata, LessonPlan, RenderedDocument,
    },
    services::renderer::escape_html,
};

pub const AGENT_LABEL: &str = "Lesson Planner";
const DEFAULT_TITLE: &str = "Weekly Lesson Plan";
const DEFAULT_DURATION: &str = "40";
const NOT_SPECIFIED: &str = "Not specified";

fn labeled(label: &str, value: &str) -> ContentBlock {
    ContentBlock::paragraph(format!("<strong>{label}:</strong> {}", escape_html(value)))
}

fn escaped_items(items: &[String]) -> Vec<String> {
    items.iter().map(|item| escape_html(item)).collect()
}

/// A labeled list, or the label followed by `fallback` when the list is empty.
fn labeled_list(label: &str, items: &[String], fallback: &str) -> Vec<ContentBlock> {
    if items.is_empty() {
        vec![labeled(label, fallback)]
    } else {
        vec![
            ContentBlock::paragraph(format!("<strong>{label}:</strong>")),
            ContentBlock::list(false, escaped_items(items)),
        ]
    }
}

fn overview_blocks(plan: &LessonPlan) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::heading(2, "Overview")];
    blocks.push(labeled(
        "Week",
        plan.week_number.as_deref().unwrap_or(NOT_SPECIFIED),
    ));
    blocks.push(labeled(
        "Grade",
        plan.grade.as_deref().unwrap_or(NOT_SPECIFIED),
    ));
    if let Some(curriculum) = &plan.curriculum {
        blocks.push(labeled("Curriculum", curriculum));
    }
    blocks
}

fn objective_blocks(objectives: &[String]) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::heading(2, "Learning Objectives")];
    if objectives.is_empty() {
        blocks.push(ContentBlock::paragraph(NOT_SPECIFIED));
    } else {
        blocks.push(ContentBlock::list(true, escaped_items(objectives)));
    }
    blocks
}

fn daily_lesson_blocks(index: usize, lesson: &DailyLesson) -> Vec<ContentBlock> {
    let day = lesson
        .day
        .clone()
        .unwrap_or_else(|| format!("Day {}", index + 1));
    let topic = lesson.topic.as_deref().unwrap_or("Topic to be decided");
    let duration = lesson.duration.as_deref().unwrap_or(DEFAULT_DURATION);

    let mut blocks = vec![ContentBlock::heading(
        3,
        escape_html(&format!("{day} - {topic} ({duration} minutes)")),
    )];
    blocks.extend(labeled_list("Learning Goals", &lesson.objectives, NOT_SPECIFIED));
    blocks.extend(labeled_list(
        "Activities",
        &lesson.activities,
        "Standard classroom activities",
    ));
    blocks.extend(labeled_list(
        "Materials Needed",
        &lesson.materials,
        "Basic classroom materials",
    ));
    blocks.push(labeled(
        "Homework",
        lesson.homework.as_deref().unwrap_or("Review today's topics"),
    ));
    if let Some(reference) = &lesson.ncert_reference {
        blocks.push(labeled("NCERT Reference", reference));
    }
    if let Some(notes) = &lesson.notes {
        blocks.push(ContentBlock::paragraph(format!(
            "<strong>Teacher Notes:</strong> <em>{}</em>",
            escape_html(notes)
        )));
    }
    blocks
}

fn assessment_blocks(index: usize, assessment: &Assessment) -> Vec<ContentBlock> {
    let title = assessment
        .title
        .clone()
        .or_else(|| assessment.kind.clone())
        .unwrap_or_else(|| format!("Assessment {}", index + 1));

    let mut blocks = vec![
        ContentBlock::heading(3, escape_html(&title)),
        labeled("Type", assessment.kind.as_deref().unwrap_or(NOT_SPECIFIED)),
        labeled(
            "Description",
            assessment.description.as_deref().unwrap_or(NOT_SPECIFIED),
        ),
    ];
    if let Some(points) = &assessment.points {
        blocks.push(labeled("Points", points));
    }
    if let Some(due_date) = &assessment.due_date {
        blocks.push(labeled("Due Date", due_date));
    }
    blocks
}

fn alignment_blocks(alignment: Option<&CurriculumAlignment>) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::heading(2, "NCERT Curriculum Alignment")];
    let Some(alignment) = alignment else {
        blocks.push(ContentBlock::paragraph(
            "Standard NCERT textbooks for the grade level",
        ));
        return blocks;
    };

    if alignment.textbooks.is_empty() {
        blocks.push(labeled(
            "Textbook References",
            "Standard NCERT textbooks for the grade level",
        ));
    } else {
        let books = alignment
            .textbooks
            .iter()
            .map(|book| {
                let title = escape_html(book.title.as_deref().unwrap_or("Untitled textbook"));
                match &book.language {
                    Some(language) => format!("<strong>{title}</strong> ({})", escape_html(language)),
                    None => format!("<strong>{title}</strong>"),
                }
            })
            .collect();
        blocks.push(ContentBlock::paragraph("<strong>Textbook References:</strong>"));
        blocks.push(ContentBlock::list(false, books));
    }
    if let Some(chapters) = &alignment.chapters {
        blocks.push(labeled("Relevant Chapters", chapters));
    }
    if let Some(outcomes) = &alignment.learning_outcomes {
        blocks.push(labeled("Learning Outcomes", outcomes));
    }
    blocks
}

/// Lays out every section of the plan; absent sections render placeholder text.
pub fn lesson_plan_blocks(plan: &LessonPlan) -> Vec<ContentBlock> {
    let mut blocks = overview_blocks(plan);
    blocks.extend(objective_blocks(&plan.objectives));

    blocks.push(ContentBlock::heading(2, "Daily Lesson Plan"));
    if plan.daily_lessons.is_empty() {
        blocks.push(ContentBlock::paragraph("No daily lessons provided."));
    }
    for (index, lesson) in plan.daily_lessons.iter().enumerate() {
        blocks.extend(daily_lesson_blocks(index, lesson));
    }

    blocks.push(ContentBlock::heading(2, "Assessment Strategy"));
    if plan.assessments.is_empty() {
        blocks.push(ContentBlock::paragraph("No assessments provided."));
    }
    for (index, assessment) in plan.assessments.iter().enumerate() {
        blocks.extend(assessment_blocks(index, assessment));
    }

    blocks.push(ContentBlock::heading(2, "Resources &amp; Materials"));
    if plan.resources.is_empty() {
        blocks.push(ContentBlock::paragraph(NOT_SPECIFIED));
    } else {
        blocks.push(ContentBlock::list(false, escaped_items(&plan.resources)));
    }

    blocks.extend(alignment_blocks(plan.ncert_alignment.as_ref()));
    blocks
}

/// Grades mentioned in the free-text grade field, e.g. "6" or "Grades 6 and 7".
pub fn grades_from_text(grade: Option<&str>) -> BTreeSet<u8> {
    grade
        .unwrap_or_default()
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|part| part.parse::<u8>().ok())
        .filter(|grade| (1..=12).contains(grade))
        .collect()
}

fn plan_languages(plan: &LessonPlan) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    let textbooks = plan
        .ncert_alignment
        .as_ref()
        .map(|alignment| alignment.textbooks.as_slice())
        .unwrap_or_default();
    for language in textbooks.iter().filter_map(|book| book.language.as_ref()) {
        if !languages.contains(language) {
            languages.push(language.clone());
        }
    }
    if languages.is_empty() {
        languages.push("English".to_string());
    }
    languages
}

pub fn lesson_plan_document(plan: &LessonPlan) -> RenderedDocument {
    let metadata = DocumentMetadata::new(
        plan.title.as_deref().unwrap_or(DEFAULT_TITLE),
        grades_from_text(plan.grade.as_deref()),
        plan_languages(plan),
        plan.subject.clone(),
        AGENT_LABEL,
    );
    RenderedDocument::new(metadata, lesson_plan_blocks(plan))
}
