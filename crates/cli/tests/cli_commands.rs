use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tempfile::TempDir;

const CONFIG_VARS: &[&str] = &[
    "FACE_MIN_QUALITY",
    "FACE_MIN_LIVENESS",
    "FACE_MAX_MASK",
    "FACE_AUTH_THRESHOLD",
];

fn faceauth() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_faceauth"));
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn png_bytes(shade: u8) -> Vec<u8> {
    let img = RgbImage::from_pixel(160, 160, Rgb([shade, 120, 90]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn write_images(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("face{i}.png"));
            fs::write(&path, png_bytes(i as u8 * 40)).unwrap();
            path
        })
        .collect()
}

fn enroll(dir: &Path, extra: &[&str]) -> (Output, PathBuf) {
    let output_path = dir.join("template.json");
    let output = faceauth()
        .args(["--seed", "7"])
        .args(extra)
        .arg("enroll")
        .args(write_images(dir, 5))
        .arg("--output")
        .arg(&output_path)
        .output()
        .unwrap();
    (output, output_path)
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_health_reports_simulated_backend_and_env_threshold() {
    let output = faceauth()
        .env("FACE_AUTH_THRESHOLD", "0.7")
        .arg("health")
        .output()
        .unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["backend"], "simulated");
    assert_eq!(report["model_backed"], false);
    assert_eq!(report["config"]["similarity_threshold"], 0.7);
    assert_eq!(report["config"]["min_quality"], 0.6);
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("auth.json");
    fs::write(&config, r#"{ "min_liveness": 0.8, "max_mask": 0.3 }"#).unwrap();

    let output = faceauth()
        .arg("--config")
        .arg(&config)
        .args(["--max-mask", "0.4", "health"])
        .output()
        .unwrap();

    let report = stdout_json(&output);
    assert_eq!(report["config"]["min_liveness"], 0.8);
    assert_eq!(report["config"]["max_mask"], 0.4);
}

#[test]
fn test_out_of_range_threshold_is_rejected() {
    let output = faceauth()
        .args(["--threshold", "1.5", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_enroll_writes_unit_template() {
    let dir = TempDir::new().unwrap();
    let (output, template_path) = enroll(dir.path(), &[]);

    assert!(output.status.success(), "{output:?}");
    let template: Value =
        serde_json::from_str(&fs::read_to_string(template_path).unwrap()).unwrap();
    assert_eq!(template["dimension"], 512);
    assert_eq!(template["sample_count"], 5);

    let quality = template["average_quality"].as_f64().unwrap();
    assert!((0.7..0.95).contains(&quality));

    let norm: f64 = template["embedding"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap().powi(2))
        .sum::<f64>()
        .sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
fn test_enroll_requires_five_images() {
    let dir = TempDir::new().unwrap();
    let output = faceauth()
        .arg("enroll")
        .args(write_images(dir.path(), 4))
        .arg("--output")
        .arg(dir.path().join("t.json"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exactly 5 face images"));
}

#[test]
fn test_enroll_rejection_names_first_image() {
    let dir = TempDir::new().unwrap();
    let (output, template_path) = enroll(dir.path(), &["--min-quality", "0.99"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Image 1: Face quality too low"), "{stderr}");
    assert!(!template_path.exists());
}

#[test]
fn test_enroll_rejects_non_image_file() {
    let dir = TempDir::new().unwrap();
    let images = write_images(dir.path(), 5);
    fs::write(&images[1], "not an image").unwrap();

    let output = faceauth()
        .arg("enroll")
        .args(&images)
        .arg("--output")
        .arg(dir.path().join("t.json"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Image 2"));
}

#[test]
fn test_verify_reports_decision_for_unrelated_capture() {
    let dir = TempDir::new().unwrap();
    let (_, template) = enroll(dir.path(), &[]);
    let candidate = dir.path().join("candidate.png");
    fs::write(&candidate, png_bytes(10)).unwrap();

    let output = faceauth()
        .args(["--seed", "99", "verify"])
        .arg(&candidate)
        .arg("--template")
        .arg(&template)
        .output()
        .unwrap();

    // Simulated embeddings carry no identity, so they do not match.
    assert_eq!(output.status.code(), Some(3));
    let decision = stdout_json(&output);
    assert_eq!(decision["verified"], false);
    assert_eq!(decision["reason"], "below_threshold");
    assert_eq!(decision["threshold"], 0.5);
    assert!(decision["liveness_score"].as_f64().unwrap() >= 0.8);
}

#[test]
fn test_verify_liveness_failure() {
    let dir = TempDir::new().unwrap();
    let (_, template) = enroll(dir.path(), &[]);
    let candidate = dir.path().join("candidate.png");
    fs::write(&candidate, png_bytes(10)).unwrap();

    let output = faceauth()
        .args(["--min-liveness", "1.0", "verify"])
        .arg(&candidate)
        .arg("--template")
        .arg(&template)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout_json(&output)["reason"], "liveness_failed");
}

#[test]
fn test_verify_accepts_base64_payload() {
    let dir = TempDir::new().unwrap();
    let (_, template) = enroll(dir.path(), &[]);
    let candidate = dir.path().join("candidate.b64");
    let encoded = general_purpose::STANDARD.encode(png_bytes(10));
    fs::write(&candidate, format!("data:image/png;base64,{encoded}")).unwrap();

    let output = faceauth()
        .args(["--base64", "verify"])
        .arg(&candidate)
        .arg("--template")
        .arg(&template)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout_json(&output)["similarity"].is_number());
}

#[test]
fn test_compare_template_with_itself() {
    let dir = TempDir::new().unwrap();
    let (_, template) = enroll(dir.path(), &[]);

    let output = faceauth()
        .arg("compare")
        .arg(&template)
        .arg(&template)
        .output()
        .unwrap();

    assert!(output.status.success());
    let similarity = stdout_json(&output)["similarity"].as_f64().unwrap();
    assert!((similarity - 1.0).abs() < 1e-5);
}

#[test]
fn test_verify_rejects_inconsistent_template() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("bad.json");
    fs::write(
        &template,
        r#"{ "embedding": [1.0, 0.0], "dimension": 512, "average_quality": 0.8, "sample_count": 5 }"#,
    )
    .unwrap();
    let candidate = dir.path().join("candidate.png");
    fs::write(&candidate, png_bytes(10)).unwrap();

    let output = faceauth()
        .arg("verify")
        .arg(&candidate)
        .arg("--template")
        .arg(&template)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("declares dimension 512"));
}
