// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Aggregate, Certificate, and Evaluation Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::report::ModuleResult;
use crate::score::{ProvenanceDeclaration, TrustBand, TrustLevel};

/// Reduced aggregator input, derived from the four module results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub assertions: usize,
    pub citations: usize,
    pub contradictions: usize,
    pub author_detected: bool,
    /// `1 − authenticity_score`, in [0, 1].
    pub ai_likelihood: f64,
    pub word_count: usize,
}

/// Score caps applied by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregatorTrapdoor {
    /// No citations, and either no author or a substantial body of text.
    UncitedContent,
    /// Declared original while the text reads as machine-generated.
    MisdeclaredAi,
}

impl fmt::Display for AggregatorTrapdoor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UncitedContent => f.write_str("uncited content"),
            Self::MisdeclaredAi => f.write_str("AI content declared as original"),
        }
    }
}

/// A cap that fired, with the ceiling it imposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggeredCap {
    pub trapdoor: AggregatorTrapdoor,
    pub cap: f64,
}

/// Named contributions to the 0–100 score.
///
/// The additive entries reconcile exactly:
/// `base + assertion + citation + author − contradiction − alignment
///  + trapdoor_adjustment + multiplier_adjustment + clamp_adjustment
///  + rounding_adjustment = final_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub base_score: f64,
    pub assertion_score: f64,
    pub citation_score: f64,
    pub author_bonus: f64,
    pub contradiction_penalty: f64,
    pub alignment_penalty: f64,
    /// Score before trapdoors.
    pub subtotal: f64,
    /// Non-positive change imposed by the binding cap, if any.
    pub trapdoor_adjustment: f64,
    pub trapdoors: Vec<TriggeredCap>,
    pub transparency_multiplier: f64,
    pub multiplier_adjustment: f64,
    pub clamp_adjustment: f64,
    pub rounding_adjustment: f64,
    pub final_score: f64,
}

impl SignalBreakdown {
    /// Re-derive the final score from the additive entries.
    pub fn reconcile(&self) -> f64 {
        self.base_score + self.assertion_score + self.citation_score + self.author_bonus
            - self.contradiction_penalty
            - self.alignment_penalty
            + self.trapdoor_adjustment
            + self.multiplier_adjustment
            + self.clamp_adjustment
            + self.rounding_adjustment
    }

    pub fn trapdoor_fired(&self, trapdoor: AggregatorTrapdoor) -> bool {
        self.trapdoors.iter().any(|t| t.trapdoor == trapdoor)
    }
}

/// Per-analyzer scores in [0, 1], under readable names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub source_data: f64,
    pub integrity: f64,
    pub confidence: f64,
    pub authenticity: f64,
}

impl ComponentScores {
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("Source Data", self.source_data),
            ("Integrity", self.integrity),
            ("Confidence", self.confidence),
            ("Authenticity", self.authenticity),
        ]
    }
}

/// Final verdict of the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// 0–100, one decimal.
    pub score: f64,
    /// `score / 100`, three decimals.
    pub trust_score: f64,
    pub trust_band: TrustBand,
    pub trust_level: TrustLevel,
    pub declaration: ProvenanceDeclaration,
    pub signals: Signals,
    pub component_scores: ComponentScores,
    pub breakdown: SignalBreakdown,
    pub insights: Vec<String>,
    pub disclaimer: String,
    /// Modules whose absence was covered by a neutral default.
    pub defaults_applied: Vec<String>,
}

// ─── Certificate ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub id: String,
    pub issued_at: String,
    pub issuer: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub content_length: usize,
    pub word_count: usize,
    /// SHA-256 of the UTF-8 content, lowercase hex.
    pub content_fingerprint: String,
    pub evaluation_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEvaluation {
    pub overall_trust_score: f64,
    pub trust_level: TrustLevel,
    pub trust_band: TrustBand,
    pub component_scores: ComponentScores,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDetails {
    pub modules_used: Vec<String>,
    pub methodology_tag: String,
    pub evaluation_methodology: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub valid_from: String,
    /// Certificates do not expire.
    pub expires_at: Option<String>,
    pub signature: String,
}

/// Immutable audit record of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustCertificate {
    pub certificate_info: CertificateInfo,
    pub content_info: ContentInfo,
    pub trust_evaluation: TrustEvaluation,
    pub module_details: ModuleDetails,
    pub validity: Validity,
}

impl TrustCertificate {
    pub fn certificate_id(&self) -> &str {
        &self.certificate_info.id
    }

    pub fn issued_at(&self) -> &str {
        &self.certificate_info.issued_at
    }

    pub fn content_fingerprint(&self) -> &str {
        &self.content_info.content_fingerprint
    }

    pub fn signature(&self) -> &str {
        &self.validity.signature
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedCertificate {
    pub certificate: TrustCertificate,
    pub readable_summary: String,
}

// ─── Evaluation ─────────────────────────────────────────────────────

/// The four analyzer envelopes, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleResults {
    pub extraction: ModuleResult,
    pub integrity: ModuleResult,
    pub confidence: ModuleResult,
    pub fabrication: ModuleResult,
}

/// The single structured result returned for one evaluation.
///
/// Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0–1.
    pub trust_score: f64,
    pub trust_level: TrustLevel,
    pub trust_band: TrustBand,
    pub assertion_type: ProvenanceDeclaration,
    pub component_scores: ComponentScores,
    pub insights: Vec<String>,
    pub disclaimer: String,
    pub signal_breakdown: SignalBreakdown,
    pub module_results: ModuleResults,
    pub certificate: TrustCertificate,
    pub readable_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_reconciles() {
        let b = SignalBreakdown {
            base_score: 60.0,
            assertion_score: 10.0,
            citation_score: 0.0,
            author_bonus: 0.0,
            contradiction_penalty: 0.0,
            alignment_penalty: 0.0,
            subtotal: 70.0,
            trapdoor_adjustment: -45.0,
            trapdoors: vec![TriggeredCap {
                trapdoor: AggregatorTrapdoor::UncitedContent,
                cap: 25.0,
            }],
            transparency_multiplier: 0.7,
            multiplier_adjustment: -7.5,
            clamp_adjustment: 0.0,
            rounding_adjustment: 0.0,
            final_score: 17.5,
        };
        assert!((b.reconcile() - b.final_score).abs() < 1e-9);
        assert!(b.trapdoor_fired(AggregatorTrapdoor::UncitedContent));
        assert!(!b.trapdoor_fired(AggregatorTrapdoor::MisdeclaredAi));
    }

    #[test]
    fn test_component_entries_are_readable() {
        let c = ComponentScores {
            source_data: 0.85,
            integrity: 1.0,
            confidence: 0.5,
            authenticity: 0.9,
        };
        let names: Vec<&str> = c.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["Source Data", "Integrity", "Confidence", "Authenticity"]);
    }
}
