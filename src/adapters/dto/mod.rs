pub mod image_dto;
pub mod upload_dto;
