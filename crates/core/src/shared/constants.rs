/// Length of the identity embedding produced by the capture scorer.
pub const EMBEDDING_DIM: usize = 512;

/// Number of captures an enrollment aggregates into one template.
pub const ENROLLMENT_SAMPLES: usize = 5;

pub const DEFAULT_MIN_QUALITY: f64 = 0.6;
pub const DEFAULT_MIN_LIVENESS: f64 = 0.5;
pub const DEFAULT_MAX_MASK: f64 = 0.5;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.50;

pub const MIN_QUALITY_ENV: &str = "FACE_MIN_QUALITY";
pub const MIN_LIVENESS_ENV: &str = "FACE_MIN_LIVENESS";
pub const MAX_MASK_ENV: &str = "FACE_MAX_MASK";
pub const SIMILARITY_THRESHOLD_ENV: &str = "FACE_AUTH_THRESHOLD";

/// Largest accepted image payload after transport decoding (10 MB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_IMAGE_DIMENSION: u32 = 100;
pub const MAX_IMAGE_DIMENSION: u32 = 4096;
