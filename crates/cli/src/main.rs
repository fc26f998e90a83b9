use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use faceauth_core::biometrics::domain::similarity_decider;
use faceauth_core::capture::domain::capture_scorer::CaptureScorer;
use faceauth_core::capture::domain::image_decoder::ImageDecoder;
use faceauth_core::capture::infrastructure::payload_image_decoder::{
    Base64ImageDecoder, RawImageDecoder,
};
use faceauth_core::capture::infrastructure::simulated_capture_scorer::SimulatedCaptureScorer;
use faceauth_core::pipeline::enroll_face_use_case::EnrollFaceUseCase;
use faceauth_core::pipeline::enrollment_template::EnrollmentTemplate;
use faceauth_core::pipeline::verify_face_use_case::VerifyFaceUseCase;
use faceauth_core::shared::auth_config::AuthConfig;
use faceauth_core::shared::embedding::Embedding;

const EXIT_ENROLLMENT_REJECTED: i32 = 2;
const EXIT_NOT_VERIFIED: i32 = 3;

/// Face enrollment and verification against stored templates.
#[derive(Parser)]
#[command(name = "faceauth")]
struct Cli {
    /// JSON file with threshold settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum capture quality for enrollment (0.0-1.0).
    #[arg(long, global = true)]
    min_quality: Option<f64>,

    /// Minimum liveness score (0.0-1.0).
    #[arg(long, global = true)]
    min_liveness: Option<f64>,

    /// Maximum mask score for enrollment (0.0-1.0).
    #[arg(long, global = true)]
    max_mask: Option<f64>,

    /// Similarity required to accept a verification (0.0-1.0).
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Capture scorer backend.
    #[arg(long, global = true, value_enum, default_value = "simulated")]
    scorer: ScorerKind,

    /// Seed for the simulated scorer.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Image files contain base64 text instead of raw JPEG/PNG bytes.
    #[arg(long, global = true)]
    base64: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enroll a face from exactly five images and write the template.
    Enroll {
        /// Face images, in capture order.
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Template file to write.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Verify one image against a stored template.
    Verify {
        image: PathBuf,

        /// Template file written by `enroll`.
        #[arg(long, short)]
        template: PathBuf,
    },
    /// Print the similarity between two stored templates.
    Compare { first: PathBuf, second: PathBuf },
    /// Report the scorer backend and effective thresholds.
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScorerKind {
    /// Random passing scores; no face model required.
    Simulated,
}

/// On-disk template layout.
#[derive(Serialize, Deserialize)]
struct StoredTemplate {
    embedding: Embedding,
    dimension: usize,
    average_quality: f64,
    sample_count: usize,
}

impl From<&EnrollmentTemplate> for StoredTemplate {
    fn from(template: &EnrollmentTemplate) -> Self {
        Self {
            embedding: template.embedding().clone(),
            dimension: template.dimension(),
            average_quality: (template.average_quality() * 1000.0).round() / 1000.0,
            sample_count: template.sample_count(),
        }
    }
}

#[derive(Serialize)]
struct HealthReport<'a> {
    status: &'a str,
    backend: &'a str,
    model_backed: bool,
    config: AuthConfig,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match &cli.command {
        Command::Enroll { images, output } => run_enroll(&cli, config, images, output),
        Command::Verify { image, template } => run_verify(&cli, config, image, template),
        Command::Compare { first, second } => run_compare(first, second),
        Command::Health => run_health(&cli, config),
    }
}

fn run_enroll(
    cli: &Cli,
    config: AuthConfig,
    images: &[PathBuf],
    output: &Path,
) -> Result<i32, Box<dyn std::error::Error>> {
    let payloads = images
        .iter()
        .map(|path| read_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    let use_case = EnrollFaceUseCase::new(build_decoder(cli.base64), build_scorer(cli), config);
    let template = match use_case.execute(&payloads) {
        Ok(template) => template,
        Err(e) if e.is_rejection() => {
            eprintln!("Enrollment rejected: {e}");
            return Ok(EXIT_ENROLLMENT_REJECTED);
        }
        Err(e) => return Err(e.into()),
    };

    let json = serde_json::to_string_pretty(&StoredTemplate::from(&template))?;
    fs::write(output, json)
        .map_err(|e| format!("Failed to write template {}: {e}", output.display()))?;
    log::info!("Template written to {}", output.display());
    Ok(0)
}

fn run_verify(
    cli: &Cli,
    config: AuthConfig,
    image: &Path,
    template: &Path,
) -> Result<i32, Box<dyn std::error::Error>> {
    let stored = load_template(template)?;
    let payload = read_file(image)?;

    let use_case = VerifyFaceUseCase::new(build_decoder(cli.base64), build_scorer(cli), config);
    let decision = use_case.execute(&payload, &stored.embedding)?;

    println!("{}", serde_json::to_string_pretty(&decision)?);
    if decision.verified {
        Ok(0)
    } else {
        eprintln!("{}", decision.reason);
        Ok(EXIT_NOT_VERIFIED)
    }
}

fn run_compare(first: &Path, second: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let a = load_template(first)?;
    let b = load_template(second)?;
    if a.embedding.len() != b.embedding.len() {
        return Err(format!(
            "Templates have different dimensions: {} vs {}",
            a.embedding.len(),
            b.embedding.len()
        )
        .into());
    }

    let similarity = similarity_decider::score(&a.embedding, &b.embedding);
    println!("{}", serde_json::json!({ "similarity": similarity }));
    Ok(0)
}

fn run_health(cli: &Cli, config: AuthConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let scorer = build_scorer(cli);
    let report = HealthReport {
        status: "healthy",
        backend: scorer.backend(),
        model_backed: scorer.is_model_backed(),
        config,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

/// Defaults, then the config file, then `FACE_*` variables, then flags.
fn resolve_config(cli: &Cli) -> Result<AuthConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AuthConfig::load(path)?.with_overrides(|key| std::env::var(key).ok())?,
        None => AuthConfig::from_env()?,
    };

    if let Some(v) = cli.min_quality {
        config.min_quality = v;
    }
    if let Some(v) = cli.min_liveness {
        config.min_liveness = v;
    }
    if let Some(v) = cli.max_mask {
        config.max_mask = v;
    }
    if let Some(v) = cli.threshold {
        config.similarity_threshold = v;
    }
    config.validate()?;
    Ok(config)
}

fn build_scorer(cli: &Cli) -> Arc<dyn CaptureScorer> {
    match cli.scorer {
        ScorerKind::Simulated => {
            log::warn!("No face model configured; using simulated capture scores");
            let scorer = match cli.seed {
                Some(seed) => SimulatedCaptureScorer::seeded(seed),
                None => SimulatedCaptureScorer::new(),
            };
            Arc::new(scorer)
        }
    }
}

fn build_decoder(base64: bool) -> Box<dyn ImageDecoder> {
    if base64 {
        Box::new(Base64ImageDecoder)
    } else {
        Box::new(RawImageDecoder)
    }
}

fn load_template(path: &Path) -> Result<StoredTemplate, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read template {}: {e}", path.display()))?;
    let template: StoredTemplate = serde_json::from_str(&json)
        .map_err(|e| format!("Invalid template {}: {e}", path.display()))?;
    if template.dimension != template.embedding.len() {
        return Err(format!(
            "Template {} declares dimension {} but holds {} values",
            path.display(),
            template.dimension,
            template.embedding.len()
        )
        .into());
    }
    Ok(template)
}

fn read_file(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}
