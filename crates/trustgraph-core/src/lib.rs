// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Heuristic analyzers, trapdoor aggregation, and certificate issuance
//! for scoring the trustworthiness of free-form text.
//!
//! # Invariants
//!
//! 1. **Trapdoors beat the blend**: a confidence trapdoor forces the
//!    assertion's score, visited in the fixed order uncited content, AI
//!    generation, missing provenance, vague attribution. Aggregator caps
//!    are applied as a minimum, so every triggered cap is reported and
//!    the lowest one binds.
//!
//! 2. **Bounded outputs**: every component score lies in [0, 1] and the
//!    final score in [0, 100]. Non-finite intermediates are clamped by
//!    `clamp_score` and logged; out-of-contract reports are rejected.
//!
//! 3. **No partial certificates**: any failing stage aborts the
//!    evaluation before the issuer runs.
//!
//! 4. **Unique ids under concurrency**: certificate ids carry a
//!    process-wide atomic sequence number.

pub mod aggregator;
pub mod certificate;
pub mod confidence;
pub mod extractor;
pub mod fabrication;
pub mod integrity;
pub mod pipeline;
pub mod similarity;
mod text;

pub use aggregator::{Aggregator, ModuleInputs};
pub use certificate::{content_fingerprint, CertificateIssuer};
pub use confidence::ConfidenceScorer;
pub use extractor::AssertionExtractor;
pub use fabrication::{
    ExternalFabricationDetector, FabricationDetector, HeuristicFabricationDetector,
};
pub use integrity::IntegrityChecker;
pub use pipeline::{Analysis, EvaluationRequest, TrustPipeline};
pub use similarity::similarity;
