use actix_web::{
    http::header::{
        CacheControl, CacheDirective, ContentDisposition, DispositionParam, DispositionType,
    },
    HttpResponse,
};

use crate::models::domain::FileFormat;

/// Creates a download response for a stored document
pub fn attachment(file_name: &str, format: FileFormat, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name.to_string())],
        })
        .insert_header(CacheControl(vec![CacheDirective::NoCache]))
        .body(bytes)
}

/// Creates a success JSON response
pub fn success_json<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}
