use actix_web::{get, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::request::DocumentRequest,
    repositories::document_store::validate_file_name,
    services::http_helpers::{attachment, success_json},
};

#[post("/api/documents")]
pub async fn create_document(
    state: web::Data<AppState>,
    request: web::Json<DocumentRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .generation_service
        .create_document(request.into_inner())
        .await?;
    Ok(success_json(response))
}

async fn serve_file(
    state: &AppState,
    req: &HttpRequest,
    file_name: &str,
) -> Result<HttpResponse, AppError> {
    let format = validate_file_name(file_name)?;
    log::info!(
        "[{}] Download requested: {}",
        get_request_id(req).unwrap_or_default(),
        file_name
    );

    let bytes = state.generation_service.download(file_name).await?;
    Ok(attachment(file_name, format, bytes))
}

#[get("/api/download-pdf/{file_name}")]
pub async fn download_pdf(
    state: web::Data<AppState>,
    req: HttpRequest,
    file_name: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    serve_file(&state, &req, &file_name).await
}

#[get("/download/{file_name}")]
pub async fn download(
    state: web::Data<AppState>,
    req: HttpRequest,
    file_name: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    serve_file(&state, &req, &file_name).await
}
