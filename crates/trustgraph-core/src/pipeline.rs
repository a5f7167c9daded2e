// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Evaluation Pipeline
// ─────────────────────────────────────────────────────────────────────
//! Runs the linear flow:
//!
//! ```text
//! content → extractor → (assertions, citations)
//!         → integrity + confidence → fabrication
//!         → aggregator → certificate
//! ```
//!
//! Every stage is a pure function of its inputs, so one pipeline can be
//! shared behind an `Arc` and called from many threads. A failing stage
//! aborts the evaluation before any certificate is issued.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use trustgraph_types::{
    ConfidenceReport, Content, Evaluation, ExtractionReport, FabricationReport,
    IntegrityReport, ModuleResults, ProvenanceDeclaration, TrustConfig, TrustResult,
};

use crate::aggregator::{Aggregator, ModuleInputs};
use crate::certificate::CertificateIssuer;
use crate::confidence::ConfidenceScorer;
use crate::extractor::AssertionExtractor;
use crate::fabrication::{FabricationDetector, HeuristicFabricationDetector};
use crate::integrity::IntegrityChecker;

/// Boundary request: the text plus an optional provenance label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub content: String,
    #[serde(default)]
    pub assertion_type: Option<String>,
}

impl EvaluationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            assertion_type: None,
        }
    }

    pub fn with_assertion_type(mut self, label: impl Into<String>) -> Self {
        self.assertion_type = Some(label.into());
        self
    }
}

/// The four analyzer reports for one piece of content.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub extraction: ExtractionReport,
    pub integrity: IntegrityReport,
    pub confidence: ConfidenceReport,
    pub fabrication: FabricationReport,
}

impl Analysis {
    pub fn inputs(&self) -> ModuleInputs<'_> {
        ModuleInputs {
            extraction: Some(&self.extraction),
            integrity: Some(&self.integrity),
            confidence: Some(&self.confidence),
            fabrication: Some(&self.fabrication),
        }
    }

    pub fn module_results(&self, preview_limit: usize) -> ModuleResults {
        ModuleResults {
            extraction: self.extraction.to_module_result(preview_limit),
            integrity: self.integrity.to_module_result(),
            confidence: self.confidence.to_module_result(),
            fabrication: self.fabrication.to_module_result(),
        }
    }
}

pub struct TrustPipeline {
    config: TrustConfig,
    extractor: AssertionExtractor,
    integrity: IntegrityChecker,
    confidence: ConfidenceScorer,
    fabrication: Arc<dyn FabricationDetector>,
    aggregator: Aggregator,
    issuer: CertificateIssuer,
}

impl TrustPipeline {
    /// Build every component from one validated configuration, with the
    /// heuristic fabrication detector.
    pub fn new(config: TrustConfig) -> TrustResult<Self> {
        config.validate()?;
        Ok(Self {
            extractor: AssertionExtractor::new(config.extraction.clone()),
            integrity: IntegrityChecker::new(config.integrity.clone()),
            confidence: ConfidenceScorer::new(config.confidence.clone()),
            fabrication: Arc::new(HeuristicFabricationDetector::new(
                config.fabrication.clone(),
            )),
            aggregator: Aggregator::new(config.aggregation.clone()),
            issuer: CertificateIssuer::new(config.certificate.clone()),
            config,
        })
    }

    /// Replace the fabrication detector, e.g. with a model-backed one.
    pub fn with_fabrication_detector(mut self, detector: Arc<dyn FabricationDetector>) -> Self {
        self.fabrication = detector;
        self
    }

    /// Run the four analyzers without aggregating.
    pub fn analyze(&self, content: &Content) -> TrustResult<Analysis> {
        let extraction = self.extractor.extract(content);
        let integrity = self.integrity.check(&extraction.assertions)?;
        let confidence = self
            .confidence
            .score(content, &extraction.assertions, &extraction.citations)?;
        let fabrication = self.fabrication.detect(content);
        fabrication.validate()?;
        Ok(Analysis {
            extraction,
            integrity,
            confidence,
            fabrication,
        })
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> TrustResult<Evaluation> {
        let content =
            Content::validated(request.content.as_str(), self.config.min_content_chars)?;
        let declaration = ProvenanceDeclaration::from_optional(request.assertion_type.as_deref());

        let analysis = self.analyze(&content)?;
        let aggregate = self.aggregator.aggregate(&analysis.inputs(), declaration)?;
        let issued = self.issuer.issue(&content, &aggregate)?;

        log::debug!(
            "evaluated {} words: trust_score={} level={}",
            content.word_count(),
            aggregate.trust_score,
            aggregate.trust_level
        );

        Ok(Evaluation {
            trust_score: aggregate.trust_score,
            trust_level: aggregate.trust_level,
            trust_band: aggregate.trust_band,
            assertion_type: declaration,
            component_scores: aggregate.component_scores,
            insights: aggregate.insights,
            disclaimer: aggregate.disclaimer,
            signal_breakdown: aggregate.breakdown,
            module_results: analysis.module_results(self.config.extraction.preview_limit),
            certificate: issued.certificate,
            readable_summary: issued.readable_summary,
        })
    }

    pub fn evaluate_text(
        &self,
        text: &str,
        assertion_type: Option<&str>,
    ) -> TrustResult<Evaluation> {
        self.evaluate(&EvaluationRequest {
            content: text.to_string(),
            assertion_type: assertion_type.map(str::to_string),
        })
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use trustgraph_types::{RiskLevel, TrustBand, TrustError, TrustLevel};

    use crate::fabrication::ExternalFabricationDetector;

    const SOURCED: &str = "By Maria Lopez\nWe measured nitrate levels in 12 wells across the \
        valley (Lopez, 2021). Our analysis confirmed seasonal peaks after spring fertilizer use \
        (Chen, 2019). The regional survey published at https://example.org/nitrate-survey matches \
        these readings. We found the deepest wells had the lowest concentrations overall.";

    fn pipeline() -> TrustPipeline {
        TrustPipeline::new(TrustConfig::default()).unwrap()
    }

    fn uncited(words: usize) -> String {
        let body: Vec<String> = (0..words).map(|i| format!("token{i}")).collect();
        format!("{}.", body.join(" "))
    }

    fn fixed_detector(authenticity: f64) -> Arc<dyn FabricationDetector> {
        Arc::new(ExternalFabricationDetector::new(move |_| FabricationReport {
            authenticity_score: authenticity,
            fabrication_risk: RiskLevel::Medium,
            total_flags: 0,
            ai_artifacts: vec![],
            suspicious_patterns: vec![],
            fact_density: 0.0,
        }))
    }

    #[test]
    fn test_short_content_is_validation_error() {
        let err = pipeline().evaluate_text("   tiny   ", None).unwrap_err();
        assert!(matches!(err, TrustError::Validation(_)));
        assert_eq!(err.report().kind, trustgraph_types::ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = TrustConfig::default();
        config.confidence.blend.language = 0.9;
        assert!(matches!(
            TrustPipeline::new(config),
            Err(TrustError::Config(_))
        ));
    }

    #[test]
    fn test_sourced_original_content_is_high_trust() {
        let eval = pipeline().evaluate_text(SOURCED, Some("original")).unwrap();
        assert_eq!(eval.assertion_type, ProvenanceDeclaration::Original);
        assert_eq!(eval.trust_band, TrustBand::HighTrust);
        assert_eq!(eval.trust_level, TrustLevel::High);
        assert_eq!(eval.trust_score, 1.0);
        assert_eq!(eval.signal_breakdown.citation_score, 20.0);
        assert_eq!(eval.signal_breakdown.author_bonus, 10.0);
        assert!(eval.signal_breakdown.trapdoors.is_empty());
        assert_eq!(eval.certificate.trust_evaluation.overall_trust_score, 1.0);
        assert_eq!(eval.certificate.module_details.modules_used.len(), 5);
    }

    #[test]
    fn test_uncited_undeclared_content_is_unverified() {
        let eval = pipeline().evaluate_text(&uncited(80), None).unwrap();
        assert_eq!(eval.assertion_type, ProvenanceDeclaration::Unsure);
        assert!(eval.trust_score <= 0.175);
        assert_eq!(eval.trust_band, TrustBand::Unverified);
        assert_eq!(eval.signal_breakdown.transparency_multiplier, 0.7);
    }

    #[test]
    fn test_unknown_label_behaves_as_unsure() {
        let p = pipeline();
        let unknown = p
            .evaluate(&EvaluationRequest::new(SOURCED).with_assertion_type("handwritten"))
            .unwrap();
        let unsure = p.evaluate_text(SOURCED, Some("unsure")).unwrap();
        assert_eq!(unknown.assertion_type, ProvenanceDeclaration::Unsure);
        assert_eq!(unknown.trust_score, unsure.trust_score);
        assert_eq!(unknown.insights, unsure.insights);
    }

    #[test]
    fn test_idempotent_except_certificate_identity() {
        let p = pipeline();
        let a = p.evaluate_text(SOURCED, Some("mixed")).unwrap();
        let b = p.evaluate_text(SOURCED, Some("mixed")).unwrap();
        assert_eq!(a.trust_score, b.trust_score);
        assert_eq!(a.trust_level, b.trust_level);
        assert_eq!(a.insights, b.insights);
        assert_eq!(a.module_results, b.module_results);
        assert_ne!(a.certificate.certificate_id(), b.certificate.certificate_id());
        assert_eq!(
            a.certificate.content_fingerprint(),
            b.certificate.content_fingerprint()
        );
    }

    #[test]
    fn test_custom_detector_drives_misdeclaration_cap() {
        let p = pipeline().with_fabrication_detector(fixed_detector(0.1));
        let eval = p.evaluate_text(SOURCED, Some("original")).unwrap();
        assert!(eval
            .signal_breakdown
            .trapdoor_fired(trustgraph_types::AggregatorTrapdoor::MisdeclaredAi));
        assert!(eval.trust_score <= 0.3);
    }

    #[test]
    fn test_out_of_contract_detector_fails_without_certificate() {
        let p = pipeline().with_fabrication_detector(fixed_detector(1.5));
        let err = p.evaluate_text(SOURCED, None).unwrap_err();
        assert!(matches!(err, TrustError::Analyzer { .. }));
    }

    #[test]
    fn test_wire_field_names() {
        let eval = pipeline().evaluate_text(SOURCED, None).unwrap();
        let json = serde_json::to_value(&eval).unwrap();
        for key in [
            "trust_score",
            "trust_level",
            "trust_band",
            "assertion_type",
            "component_scores",
            "insights",
            "disclaimer",
            "signal_breakdown",
            "module_results",
            "certificate",
            "readable_summary",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["assertion_type"], "unsure");
        assert_eq!(
            json["certificate"]["certificate_info"]["type"],
            "Trust Evaluation Certificate"
        );
        assert!(json["certificate"]["validity"]["expires_at"].is_null());
    }

    #[test]
    fn test_request_deserializes_without_label() {
        let req: EvaluationRequest =
            serde_json::from_str(r#"{"content": "Some content to evaluate."}"#).unwrap();
        assert_eq!(req, EvaluationRequest::new("Some content to evaluate."));
        let eval = pipeline().evaluate(&req).unwrap();
        assert_eq!(eval.assertion_type, ProvenanceDeclaration::Unsure);
    }

    #[test]
    fn test_shared_across_threads() {
        let p = Arc::new(pipeline());
        let scores: Vec<f64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let p = Arc::clone(&p);
                    s.spawn(move || p.evaluate_text(SOURCED, None).unwrap().trust_score)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(scores.windows(2).all(|w| w[0] == w[1]));
    }

    proptest! {
        #[test]
        fn outputs_stay_in_bounds(
            text in "[A-Za-z0-9 ,.!?()%]{0,400}",
            label in prop::option::of("[a-z]{2,8}"),
        ) {
            match pipeline().evaluate_text(&text, label.as_deref()) {
                Ok(eval) => {
                    prop_assert!((0.0..=1.0).contains(&eval.trust_score));
                    for (_, score) in eval.component_scores.entries() {
                        prop_assert!((0.0..=1.0).contains(&score));
                    }
                    prop_assert!((0.0..=100.0).contains(&eval.signal_breakdown.final_score));
                    for module in [
                        &eval.module_results.extraction,
                        &eval.module_results.integrity,
                        &eval.module_results.confidence,
                        &eval.module_results.fabrication,
                    ] {
                        for score in module.scores.values() {
                            prop_assert!(score.is_finite() && *score >= 0.0);
                        }
                    }
                }
                Err(err) => prop_assert!(matches!(err, TrustError::Validation(_))),
            }
        }
    }
}
