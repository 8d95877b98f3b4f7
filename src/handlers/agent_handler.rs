use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        ContentGenerationRequest, DifferentiatedMaterialsRequest, LessonPlanDocumentRequest,
    },
    services::http_helpers::success_json,
};

#[post("/api/agents/content-generation")]
pub async fn generate_content(
    state: web::Data<AppState>,
    request: web::Json<ContentGenerationRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .generation_service
        .generate_content(request.into_inner())
        .await?;
    Ok(success_json(response))
}

#[post("/api/agents/differentiated-materials")]
pub async fn generate_differentiated_materials(
    state: web::Data<AppState>,
    request: web::Json<DifferentiatedMaterialsRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .generation_service
        .generate_materials(request.into_inner())
        .await?;
    Ok(success_json(response))
}

#[post("/api/agents/lesson-planner/generate-pdf")]
pub async fn generate_lesson_plan_document(
    state: web::Data<AppState>,
    request: web::Json<LessonPlanDocumentRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .generation_service
        .publish_lesson_plan(&request.plan)
        .await?;
    Ok(success_json(response))
}
