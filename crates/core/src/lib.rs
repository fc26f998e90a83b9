//! Face enrollment and verification decisioning.
//!
//! Captures are scored by an opaque [`CaptureScorer`](capture::domain::capture_scorer::CaptureScorer),
//! admitted by the [`CaptureGate`](biometrics::domain::capture_gate::CaptureGate), and
//! then either aggregated into an enrollment template or compared against a
//! stored one. The use cases in [`pipeline`] sequence those steps.

pub mod biometrics;
pub mod capture;
pub mod pipeline;
pub mod shared;
