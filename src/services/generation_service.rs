use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::prompts::{
        content_generation_prompt, worksheet_prompt, worksheet_system_prompt,
        CONTENT_GENERATION_PROMPT,
    },
    errors::AppResult,
    models::{
        domain::{DocumentMetadata, GeneratedFile, LessonPlan, NormalizedMaterialSet, RenderedDocument},
        dto::{
            request::{
                grade_set, language_list, ContentGenerationRequest, DifferentiatedMaterialsRequest,
                DocumentContent, DocumentRequest, QuestionType,
            },
            response::GenerationResponse,
        },
    },
    repositories::DocumentStore,
    services::{
        lesson_plan_formatter, material_coordinator, normalizer, prose_transformer, renderer,
        model_service::ContentModel,
    },
};

pub const CONTENT_AGENT_LABEL: &str = "Hyper-Local Content Generator";
pub const MATERIALS_AGENT_LABEL: &str = "Differentiated Materials";
const TITLE_PREVIEW_CHARS: usize = 50;

fn content_title(prompt: &str) -> String {
    let preview: String = prompt.trim().chars().take(TITLE_PREVIEW_CHARS).collect();
    if prompt.trim().chars().count() > TITLE_PREVIEW_CHARS {
        format!("Generated Educational Content: {preview}...")
    } else {
        format!("Generated Educational Content: {preview}")
    }
}

/// Warns when a material set does not hold the requested number of items.
fn check_question_count(
    requested: Option<u32>,
    question_type: QuestionType,
    produced: usize,
) -> bool {
    match requested {
        Some(requested) if requested as usize != produced => {
            log::warn!(
                "Requested {} {}, got {}",
                requested,
                question_type.describe(),
                produced
            );
            false
        }
        _ => true,
    }
}

/// Drives model output through normalization, rendering and storage.
pub struct GenerationService {
    model: Arc<dyn ContentModel>,
    store: Arc<dyn DocumentStore>,
}

impl GenerationService {
    pub fn new(model: Arc<dyn ContentModel>, store: Arc<dyn DocumentStore>) -> Self {
        Self { model, store }
    }

    async fn save_document(&self, document: &RenderedDocument) -> AppResult<GeneratedFile> {
        let markup = renderer::render_document(document);
        self.store.save(document.title(), &markup).await
    }

    /// Renders prose into a single document and saves it.
    pub async fn publish_prose(
        &self,
        metadata: DocumentMetadata,
        prose: &str,
    ) -> AppResult<GeneratedFile> {
        let blocks = prose_transformer::to_blocks(prose);
        log::info!(
            "Transformed {} bytes of prose into {} blocks",
            prose.len(),
            blocks.len()
        );
        self.save_document(&RenderedDocument::new(metadata, blocks))
            .await
    }

    /// Renders both halves of a material set and saves them concurrently.
    pub async fn publish_materials(
        &self,
        metadata: &DocumentMetadata,
        set: &NormalizedMaterialSet,
    ) -> AppResult<(GeneratedFile, GeneratedFile)> {
        let documents = material_coordinator::render_material_set(metadata, set)?;

        let (questions, answers) = futures::try_join!(
            self.save_document(&documents.questions),
            self.save_document(&documents.answers),
        )?;
        log::info!(
            "Saved material set of {} items as {} and {}",
            set.len(),
            questions.file_name,
            answers.file_name
        );
        Ok((questions, answers))
    }

    pub async fn create_document(&self, request: DocumentRequest) -> AppResult<GenerationResponse> {
        request.validate()?;

        let metadata = DocumentMetadata::new(
            &request.title,
            grade_set(&request.grades),
            language_list(&request.languages),
            request.subject.clone(),
            &request.agent_label,
        );

        match request.content {
            DocumentContent::Prose(prose) => {
                let file = self.publish_prose(metadata, &prose).await?;
                Ok(GenerationResponse::document(
                    "Document generated successfully",
                    Some(prose),
                    &file,
                ))
            }
            DocumentContent::Materials { questions, answers } => {
                let set = normalizer::normalize(&questions, &answers)?;
                check_question_count(
                    request.question_count.and_then(|count| u32::try_from(count).ok()),
                    request.question_type.unwrap_or_default(),
                    set.len(),
                );
                let (questions_file, answers_file) = self.publish_materials(&metadata, &set).await?;
                Ok(GenerationResponse::materials(
                    format!("Generated {} questions with answer key", set.len()),
                    set,
                    &questions_file,
                    &answers_file,
                ))
            }
        }
    }

    pub async fn generate_content(
        &self,
        request: ContentGenerationRequest,
    ) -> AppResult<GenerationResponse> {
        request.validate()?;

        let grades = grade_set(&request.grades);
        let languages = language_list(&request.languages);
        let prompt =
            content_generation_prompt(&request.prompt, &grades, &languages, request.content_source);
        let content = self
            .model
            .generate_text(CONTENT_GENERATION_PROMPT, &prompt)
            .await?;

        let metadata = DocumentMetadata::new(
            &content_title(&request.prompt),
            grades,
            languages,
            request.subject,
            CONTENT_AGENT_LABEL,
        );
        let file = self.publish_prose(metadata, &content).await?;

        Ok(GenerationResponse::document(
            "Content generated successfully",
            Some(content),
            &file,
        ))
    }

    pub async fn generate_materials(
        &self,
        request: DifferentiatedMaterialsRequest,
    ) -> AppResult<GenerationResponse> {
        request.validate()?;

        let grades = grade_set(&request.grades);
        let question_count = request.question_count();
        let prompt = worksheet_prompt(
            &request.source_content,
            &grades,
            request.question_type,
            question_count,
        );
        let payload = self
            .model
            .generate_json(&worksheet_system_prompt(), &prompt)
            .await?;

        let (raw_questions, raw_answers) = normalizer::extract_material_arrays(&payload);
        let set = if raw_answers.is_null() {
            normalizer::normalize(&raw_questions, &raw_questions)?
        } else {
            normalizer::normalize(&raw_questions, &raw_answers)?
        };
        check_question_count(Some(question_count), request.question_type, set.len());

        let title = format!(
            "{} - Grades {}",
            request.question_type.title(),
            grades
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        let metadata = DocumentMetadata::new(
            &title,
            grades,
            language_list(&request.languages),
            request.subject,
            MATERIALS_AGENT_LABEL,
        );
        let (questions_file, answers_file) = self.publish_materials(&metadata, &set).await?;

        Ok(GenerationResponse::materials(
            format!("Differentiated Materials ({} Questions)", set.len()),
            set,
            &questions_file,
            &answers_file,
        ))
    }

    pub async fn publish_lesson_plan(&self, plan: &LessonPlan) -> AppResult<GenerationResponse> {
        let document = lesson_plan_formatter::lesson_plan_document(plan);
        let file = self.save_document(&document).await?;

        Ok(GenerationResponse::document(
            "Lesson plan document generated successfully",
            None,
            &file,
        ))
    }

    pub async fn download(&self, file_name: &str) -> AppResult<Vec<u8>> {
        let bytes = self.store.read(file_name).await?;
        log::info!("Serving download {} ({} bytes)", file_name, bytes.len());
        Ok(bytes)
    }
}
