// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Fabrication Detector Interface
// ─────────────────────────────────────────────────────────────────────
//! Fabrication detector trait and heuristic fallback implementation.
//!
//! A model-backed detector runs behind this trait, either embedded or
//! via an external inference service wrapped in
//! [`ExternalFabricationDetector`]. The heuristic detector provides
//! deterministic scoring for testing and offline use.

use std::sync::LazyLock;

use regex::Regex;

use trustgraph_types::config::FabricationConfig;
use trustgraph_types::{clamp_score, round_to, Content, FabricationReport, RiskLevel};

use crate::text::phrases_present;

/// Percentages quoted to a decimal place, e.g. `87.34%`.
static PRECISE_PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}\.\d+%").expect("percent pattern is valid"));

/// Trait for fabrication detectors.
///
/// `authenticity_score` ∈ [0, 1]:
/// - 1.0 = authentic
/// - 0.0 = almost certainly fabricated or machine-generated
pub trait FabricationDetector: Send + Sync {
    fn detect(&self, content: &Content) -> FabricationReport;
}

/// Deterministic phrase-and-pattern detector (no model required).
pub struct HeuristicFabricationDetector {
    config: FabricationConfig,
}

impl HeuristicFabricationDetector {
    pub fn new(config: FabricationConfig) -> Self {
        Self { config }
    }

    fn suspicious_patterns(&self, text: &str, lower: &str) -> Vec<String> {
        let mut found: Vec<String> = PRECISE_PERCENT_RE
            .find_iter(text)
            .map(|m| format!("over-precise statistic: {}", m.as_str()))
            .collect();
        found.extend(
            phrases_present(lower, &self.config.absolute_phrases)
                .into_iter()
                .map(|p| format!("absolute guarantee: {p}")),
        );
        found.extend(
            phrases_present(lower, &self.config.consensus_phrases)
                .into_iter()
                .map(|p| format!("unsourced consensus: {p}")),
        );
        found
    }

    fn risk(&self, authenticity: f64) -> RiskLevel {
        if authenticity >= self.config.low_risk_min {
            RiskLevel::Low
        } else if authenticity >= self.config.medium_risk_min {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn config(&self) -> &FabricationConfig {
        &self.config
    }
}

/// Share of whitespace tokens that carry a digit.
fn fact_density(text: &str) -> f64 {
    let mut words = 0usize;
    let mut numeric = 0usize;
    for token in text.split_whitespace() {
        words += 1;
        if token.chars().any(|c| c.is_ascii_digit()) {
            numeric += 1;
        }
    }
    if words == 0 {
        return 0.0;
    }
    numeric as f64 / words as f64
}

impl FabricationDetector for HeuristicFabricationDetector {
    fn detect(&self, content: &Content) -> FabricationReport {
        let text = content.text();
        let lower = text.to_lowercase();

        let ai_artifacts: Vec<String> = phrases_present(&lower, &self.config.ai_artifacts)
            .into_iter()
            .map(str::to_string)
            .collect();
        let suspicious_patterns = self.suspicious_patterns(text, &lower);

        let raw = 1.0
            - ai_artifacts.len() as f64 * self.config.artifact_penalty
            - suspicious_patterns.len() as f64 * self.config.suspicious_penalty;
        let authenticity_score = round_to(clamp_score(raw, 0.0, 1.0), 3);

        FabricationReport {
            authenticity_score,
            fabrication_risk: self.risk(authenticity_score),
            total_flags: ai_artifacts.len() + suspicious_patterns.len(),
            ai_artifacts,
            suspicious_patterns,
            fact_density: round_to(fact_density(text), 3),
        }
    }
}

/// External detector that calls a scoring function.
///
/// Used to delegate detection to a model living outside this crate while
/// keeping the rest of the pipeline in Rust. The returned report is
/// validated by the pipeline before use.
type DetectFn = Box<dyn Fn(&str) -> FabricationReport + Send + Sync>;

pub struct ExternalFabricationDetector {
    detect_fn: DetectFn,
}

impl ExternalFabricationDetector {
    pub fn new(detect_fn: impl Fn(&str) -> FabricationReport + Send + Sync + 'static) -> Self {
        Self {
            detect_fn: Box::new(detect_fn),
        }
    }
}

impl FabricationDetector for ExternalFabricationDetector {
    fn detect(&self, content: &Content) -> FabricationReport {
        (self.detect_fn)(content.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> HeuristicFabricationDetector {
        HeuristicFabricationDetector::new(FabricationConfig::default())
    }

    #[test]
    fn test_clean_text_is_authentic() {
        let report = detector().detect(&Content::new(
            "The survey covered 40 farms across two counties in 2022.",
        ));
        assert_eq!(report.authenticity_score, 1.0);
        assert_eq!(report.fabrication_risk, RiskLevel::Low);
        assert_eq!(report.total_flags, 0);
        assert_eq!(report.ai_likelihood(), 0.0);
    }

    #[test]
    fn test_artifacts_and_patterns_penalize() {
        let report = detector().detect(&Content::new(
            "As an AI, I can say this method is 100% guaranteed. Experts agree that 87.34% of users \
             benefit. In conclusion, it never fails.",
        ));
        assert_eq!(report.ai_artifacts, vec!["as an ai", "in conclusion"]);
        assert_eq!(report.suspicious_patterns.len(), 4);
        assert_eq!(report.suspicious_patterns[0], "over-precise statistic: 87.34%");
        assert_eq!(report.total_flags, 6);
        // 1 − 2·0.1 − 4·0.15
        assert!((report.authenticity_score - 0.2).abs() < 1e-9);
        assert_eq!(report.fabrication_risk, RiskLevel::High);
    }

    #[test]
    fn test_medium_risk_band() {
        let report = detector().detect(&Content::new(
            "Studies show the drug works and experts agree it is safe for adults.",
        ));
        // 1 − 2·0.15 = 0.7 → LOW boundary is inclusive
        assert!((report.authenticity_score - 0.7).abs() < 1e-9);
        assert_eq!(report.fabrication_risk, RiskLevel::Low);

        let report = detector().detect(&Content::new(
            "Studies show it works, experts agree, and it is widely known to be safe.",
        ));
        assert!((report.authenticity_score - 0.55).abs() < 1e-9);
        assert_eq!(report.fabrication_risk, RiskLevel::Medium);
    }

    #[test]
    fn test_fact_density() {
        let report = detector().detect(&Content::new("In 2020 sales rose 12 percent"));
        // 2 of 6 tokens carry digits
        assert!((report.fact_density - 0.333).abs() < 1e-9);
    }

    #[test]
    fn test_distinct_artifacts_and_floor() {
        let text = "as an ai ".repeat(3)
            + "in conclusion delve into rich tapestry regenerate response my knowledge cutoff";
        let report = detector().detect(&Content::new(text));
        // six distinct artifacts, repeats count once
        assert_eq!(report.authenticity_score, 0.4);
        assert!(report.validate().is_ok());

        let heavy = "As an AI, 100% guaranteed, always works, never fails, without exception, \
                     scientifically proven, experts agree, scientists agree, studies show.";
        let report = detector().detect(&Content::new(heavy));
        assert_eq!(report.authenticity_score, 0.0);
    }

    #[test]
    fn test_external_detector() {
        let detector = ExternalFabricationDetector::new(|text| FabricationReport {
            authenticity_score: if text.contains("model") { 0.4 } else { 0.9 },
            fabrication_risk: RiskLevel::Medium,
            total_flags: 1,
            ai_artifacts: vec![],
            suspicious_patterns: vec![],
            fact_density: 0.0,
        });
        let report = detector.detect(&Content::new("written by a model"));
        assert!((report.authenticity_score - 0.4).abs() < 1e-9);
    }
}
