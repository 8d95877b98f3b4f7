pub mod request;
pub mod response;
pub mod worksheet_dto;
