pub mod cleanup_service;
pub mod generation_service;
pub mod http_helpers;
pub mod lesson_plan_formatter;
pub mod material_coordinator;
pub mod model_service;
pub mod normalizer;
pub mod prose_transformer;
pub mod renderer;
