// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Analyzer Reports
// ─────────────────────────────────────────────────────────────────────
//! Typed outputs of the four analyzers and the uniform [`ModuleResult`]
//! envelope each of them reduces to.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{Assertion, Citation};
use crate::error::{TrustError, TrustResult};
use crate::score::{RiskLevel, Severity};

pub const EXTRACTOR_MODULE: &str = "Assertion Extractor";
pub const INTEGRITY_MODULE: &str = "Integrity Checker";
pub const CONFIDENCE_MODULE: &str = "Confidence Scorer";
pub const FABRICATION_MODULE: &str = "Fabrication Detector";
pub const AGGREGATOR_MODULE: &str = "Trust Aggregator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Processed,
    Analyzed,
    Computed,
    /// Nothing to score; a fixed default was reported instead.
    InsufficientContent,
}

/// Uniform envelope produced by every analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleResult {
    pub module_name: String,
    pub status: ModuleStatus,
    pub scores: BTreeMap<String, f64>,
    pub issues: Vec<String>,
    pub metadata: serde_json::Value,
}

impl ModuleResult {
    fn new(module_name: &str, status: ModuleStatus) -> Self {
        Self {
            module_name: module_name.to_string(),
            status,
            scores: BTreeMap::new(),
            issues: Vec::new(),
            metadata: serde_json::Value::Null,
        }
    }

    fn score(mut self, name: &str, value: f64) -> Self {
        self.scores.insert(name.to_string(), value);
        self
    }
}

// ─── Extraction ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub assertions: Vec<Assertion>,
    pub assertions_count: usize,
    pub citations: Vec<Citation>,
    pub citations_count: usize,
    /// Whitespace-separated tokens in the source content.
    pub word_count: usize,
    /// Fixed heuristic placeholder, not derived from the text.
    pub extraction_confidence: f64,
}

impl ExtractionReport {
    pub fn to_module_result(&self, preview_limit: usize) -> ModuleResult {
        let preview: Vec<&str> = self
            .assertions
            .iter()
            .take(preview_limit)
            .map(|a| a.text.as_str())
            .collect();
        let mut result = ModuleResult::new(EXTRACTOR_MODULE, ModuleStatus::Processed)
            .score("extraction_confidence", self.extraction_confidence);
        result.metadata = serde_json::json!({
            "assertions_count": self.assertions_count,
            "citations_count": self.citations_count,
            "word_count": self.word_count,
            "assertions_preview": preview,
            "citations": self.citations,
        });
        result
    }
}

// ─── Integrity ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Contradiction,
    Redundancy,
    UnsupportedClaim,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contradiction => f.write_str("contradiction"),
            Self::Redundancy => f.write_str("redundancy"),
            Self::UnsupportedClaim => f.write_str("unsupported claim"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub assertion_1: String,
    /// Second assertion of the pair; absent for single-assertion checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    /// The opposing pair or phrase that triggered the issue.
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub integrity_score: f64,
    /// Display-capped lists. The `*_count` fields are exact.
    pub contradictions: Vec<IntegrityIssue>,
    pub redundancies: Vec<IntegrityIssue>,
    pub unsupported_claims: Vec<IntegrityIssue>,
    pub contradiction_count: usize,
    pub redundancy_count: usize,
    pub unsupported_count: usize,
    pub issues_found: usize,
    pub assertions_checked: usize,
}

impl IntegrityReport {
    pub fn to_module_result(&self) -> ModuleResult {
        let mut result = ModuleResult::new(INTEGRITY_MODULE, ModuleStatus::Analyzed)
            .score("integrity_score", self.integrity_score);
        result.issues = self
            .contradictions
            .iter()
            .chain(&self.redundancies)
            .chain(&self.unsupported_claims)
            .map(|issue| format!("{} ({:?}): {}", issue.kind, issue.severity, issue.assertion_1))
            .collect();
        result.metadata = serde_json::json!({
            "issues_found": self.issues_found,
            "contradiction_count": self.contradiction_count,
            "redundancy_count": self.redundancy_count,
            "unsupported_count": self.unsupported_count,
            "assertions_checked": self.assertions_checked,
        });
        result
    }
}

// ─── Confidence ─────────────────────────────────────────────────────

/// Hard override rules of the confidence scorer, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trapdoor {
    UncitedContent,
    AiGenerated,
    MissingProvenance,
    VagueAttribution,
}

impl Trapdoor {
    pub const PRECEDENCE: [Trapdoor; 4] = [
        Self::UncitedContent,
        Self::AiGenerated,
        Self::MissingProvenance,
        Self::VagueAttribution,
    ];

    pub fn reason(&self) -> &'static str {
        match self {
            Self::UncitedContent => "substantial content with zero citations",
            Self::AiGenerated => "AI-generation markers dominate the text",
            Self::MissingProvenance => "long content with no human or source provenance markers",
            Self::VagueAttribution => "repeated vague attributions without named sources",
        }
    }
}

impl fmt::Display for Trapdoor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionConfidence {
    pub assertion: String,
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapdoor: Option<Trapdoor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub overall_confidence: f64,
    pub assertion_confidences: Vec<AssertionConfidence>,
    pub total_assertions: usize,
    pub high_confidence_count: usize,
    pub medium_confidence_count: usize,
    pub low_confidence_count: usize,
    /// Content-level signal axes.
    pub language_certainty: f64,
    pub citation_support: f64,
    pub ai_authenticity: f64,
    pub provenance_score: f64,
    pub author_detected: bool,
    /// Deduplicated, in first-triggered order.
    pub triggered_trapdoors: Vec<Trapdoor>,
    pub ai_generation_risk: RiskLevel,
    pub status: ModuleStatus,
}

impl ConfidenceReport {
    pub fn trapdoor_reasons(&self) -> Vec<&'static str> {
        self.triggered_trapdoors.iter().map(Trapdoor::reason).collect()
    }

    pub fn to_module_result(&self) -> ModuleResult {
        let mut result = ModuleResult::new(CONFIDENCE_MODULE, self.status)
            .score("overall_confidence", self.overall_confidence)
            .score("language_certainty", self.language_certainty)
            .score("citation_support", self.citation_support)
            .score("ai_authenticity", self.ai_authenticity)
            .score("provenance", self.provenance_score);
        result.issues = self
            .trapdoor_reasons()
            .into_iter()
            .map(str::to_string)
            .collect();
        result.metadata = serde_json::json!({
            "total_assertions": self.total_assertions,
            "high_confidence_count": self.high_confidence_count,
            "medium_confidence_count": self.medium_confidence_count,
            "low_confidence_count": self.low_confidence_count,
            "author_detected": self.author_detected,
            "ai_generation_risk": self.ai_generation_risk,
        });
        result
    }
}

// ─── Fabrication ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricationReport {
    /// 1.0 = authentic.
    pub authenticity_score: f64,
    pub fabrication_risk: RiskLevel,
    pub total_flags: usize,
    pub ai_artifacts: Vec<String>,
    pub suspicious_patterns: Vec<String>,
    pub fact_density: f64,
}

impl FabricationReport {
    pub fn ai_likelihood(&self) -> f64 {
        1.0 - self.authenticity_score
    }

    /// Reject reports that break the boundary contract.
    pub fn validate(&self) -> TrustResult<()> {
        if !self.authenticity_score.is_finite() || !(0.0..=1.0).contains(&self.authenticity_score) {
            return Err(TrustError::analyzer(
                FABRICATION_MODULE,
                format!(
                    "authenticity_score must be in [0, 1], got {}",
                    self.authenticity_score
                ),
            ));
        }
        if !self.fact_density.is_finite() || self.fact_density < 0.0 {
            return Err(TrustError::analyzer(
                FABRICATION_MODULE,
                format!("fact_density must be finite and >= 0, got {}", self.fact_density),
            ));
        }
        Ok(())
    }

    pub fn to_module_result(&self) -> ModuleResult {
        let mut result = ModuleResult::new(FABRICATION_MODULE, ModuleStatus::Analyzed)
            .score("authenticity_score", self.authenticity_score)
            .score("fact_density", self.fact_density);
        result.issues = self
            .ai_artifacts
            .iter()
            .chain(&self.suspicious_patterns)
            .cloned()
            .collect();
        result.metadata = serde_json::json!({
            "fabrication_risk": self.fabrication_risk,
            "total_flags": self.total_flags,
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fabrication(score: f64) -> FabricationReport {
        FabricationReport {
            authenticity_score: score,
            fabrication_risk: RiskLevel::Low,
            total_flags: 0,
            ai_artifacts: vec![],
            suspicious_patterns: vec![],
            fact_density: 0.1,
        }
    }

    #[test]
    fn test_ai_likelihood_is_complement() {
        assert!((fabrication(0.75).ai_likelihood() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_fabrication_validate_rejects_nan() {
        let err = fabrication(f64::NAN).validate().unwrap_err();
        assert!(matches!(err, TrustError::Analyzer { .. }));
    }

    #[test]
    fn test_fabrication_validate_rejects_out_of_range() {
        assert!(fabrication(1.2).validate().is_err());
        assert!(fabrication(1.0).validate().is_ok());
    }

    #[test]
    fn test_extraction_envelope_previews() {
        let report = ExtractionReport {
            assertions: (0..8).map(|i| Assertion::new(format!("assertion number {i}"))).collect(),
            assertions_count: 8,
            citations: vec![Citation::url("https://example.org")],
            citations_count: 1,
            word_count: 24,
            extraction_confidence: 0.85,
        };
        let env = report.to_module_result(5);
        assert_eq!(env.module_name, EXTRACTOR_MODULE);
        assert_eq!(env.metadata["assertions_preview"].as_array().unwrap().len(), 5);
        assert_eq!(env.metadata["assertions_count"], 8);
        assert_eq!(env.scores["extraction_confidence"], 0.85);
    }

    #[test]
    fn test_trapdoor_precedence_matches_ordering() {
        let mut sorted = Trapdoor::PRECEDENCE;
        sorted.sort();
        assert_eq!(sorted, Trapdoor::PRECEDENCE);
    }
}
