pub mod capture;
pub mod capture_scorer;
pub mod image_decoder;
