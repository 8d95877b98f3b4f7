pub mod content_block;
pub mod document;
pub mod generated_file;
pub mod lesson_plan;
pub mod material;
pub use content_block::{CalloutKind, ContentBlock};
pub use document::{DocumentMetadata, RenderedDocument};
pub use generated_file::{CleanupReport, FileFormat, GeneratedFile};
pub use lesson_plan::LessonPlan;
pub use material::{NormalizedAnswer, NormalizedMaterialSet, NormalizedQuestion, QuestionOption};
