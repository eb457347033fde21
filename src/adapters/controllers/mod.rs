pub mod health_controller;
pub mod image_controller;
pub mod upload_controller;
