pub mod payload_image_decoder;
pub mod simulated_capture_scorer;
