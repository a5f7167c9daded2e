// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! TrustGraph Kernel, a heuristic trust scorer for free-form text.

pub mod config;
pub mod content;
pub mod error;
pub mod evaluation;
pub mod report;
pub mod score;

pub use config::TrustConfig;
pub use content::{Assertion, Citation, CitationKind, Content};
pub use error::{ErrorKind, ErrorReport, TrustError, TrustResult};
pub use evaluation::{
    AggregateResult, AggregatorTrapdoor, CertificateInfo, ComponentScores, ContentInfo,
    Evaluation, IssuedCertificate, ModuleDetails, ModuleResults, SignalBreakdown, Signals,
    TriggeredCap, TrustCertificate, TrustEvaluation, Validity,
};
pub use report::{
    AssertionConfidence, ConfidenceReport, ExtractionReport, FabricationReport, IntegrityIssue,
    IntegrityReport, IssueKind, ModuleResult, ModuleStatus, Trapdoor,
};
pub use score::{
    clamp_score, round_to, ProvenanceDeclaration, RiskLevel, Severity, TrustBand, TrustLevel,
};
