use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        ContentBlock, DocumentMetadata, NormalizedAnswer, NormalizedMaterialSet,
        NormalizedQuestion, RenderedDocument,
    },
    services::renderer::escape_html,
};

const INSTRUCTIONS: &str = "<strong>Instructions:</strong> Read each question carefully. \
     Choose the best option for multiple-choice questions and write complete answers for the rest.";

/// The question paper and its answer key, built from the same material set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualDocuments {
    pub questions: RenderedDocument,
    pub answers: RenderedDocument,
}

pub fn question_label(index: usize) -> String {
    format!("Question {}", index + 1)
}

pub fn answer_label(index: usize) -> String {
    format!("Answer to {}", question_label(index))
}

fn question_blocks(index: usize, question: &NormalizedQuestion) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::heading(3, question_label(index)),
        ContentBlock::paragraph(escape_html(&question.text)),
    ];
    if !question.options.is_empty() {
        let items = question
            .options
            .iter()
            .map(|option| escape_html(&format!("{}. {}", option.label, option.text)))
            .collect();
        blocks.push(ContentBlock::list(false, items));
    }
    blocks
}

fn answer_blocks(index: usize, answer: &NormalizedAnswer) -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading(3, answer_label(index)),
        ContentBlock::paragraph(format!(
            "<strong>Correct Answer:</strong> {}",
            escape_html(&answer.correct_answer_text)
        )),
        ContentBlock::paragraph(format!(
            "<strong>Explanation:</strong> {}",
            escape_html(&answer.explanation)
        )),
    ]
}

fn questions_document(metadata: &DocumentMetadata, set: &NormalizedMaterialSet) -> RenderedDocument {
    let mut meta = metadata.clone().with_question_count(set.len());
    meta.agent_label = format!("{} - Questions", metadata.agent_label);

    let mut blocks = vec![
        ContentBlock::paragraph(INSTRUCTIONS),
        ContentBlock::paragraph(format!("<strong>Total Questions:</strong> {}", set.len())),
    ];
    for (index, question) in set.questions.iter().enumerate() {
        blocks.extend(question_blocks(index, question));
    }
    RenderedDocument::new(meta, blocks)
}

fn answers_document(metadata: &DocumentMetadata, set: &NormalizedMaterialSet) -> RenderedDocument {
    let mut meta = metadata.clone().with_question_count(set.len());
    meta.title = format!("{} - Answer Key", metadata.title);
    meta.agent_label = format!("{} - Answers", metadata.agent_label);

    let blocks = set
        .answers
        .iter()
        .enumerate()
        .flat_map(|(index, answer)| answer_blocks(index, answer))
        .collect();
    RenderedDocument::new(meta, blocks)
}

/// Builds both documents; answer block `i` always refers back to question `i`.
pub fn render_material_set(
    metadata: &DocumentMetadata,
    set: &NormalizedMaterialSet,
) -> AppResult<DualDocuments> {
    if !set.is_aligned() {
        log::error!(
            "Refusing to render misaligned material set: {} questions, {} answers",
            set.questions.len(),
            set.answers.len()
        );
        return Err(AppError::RenderError(format!(
            "material set is misaligned: {} questions, {} answers",
            set.questions.len(),
            set.answers.len()
        )));
    }

    Ok(DualDocuments {
        questions: questions_document(metadata, set),
        answers: answers_document(metadata, set),
    })
}
