pub mod auth_config;
pub mod constants;
pub mod embedding;
pub mod face_image;
