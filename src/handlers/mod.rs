pub mod agent_handler;
pub mod document_handler;
pub mod health_handler;

use actix_web::web;

use crate::errors::AppError;

pub use agent_handler::{
    generate_content, generate_differentiated_materials, generate_lesson_plan_document,
};
pub use document_handler::{create_document, download, download_pdf};
pub use health_handler::{health_check, health_check_ready};

/// Registers every route; malformed JSON bodies surface as validation errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(health_check)
    .service(health_check_ready)
    .service(create_document)
    .service(download_pdf)
    .service(download)
    .service(generate_content)
    .service(generate_differentiated_materials)
    .service(generate_lesson_plan_document);
}
