// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Confidence Scorer (Signal Blend + Trapdoors)
// ─────────────────────────────────────────────────────────────────────
//! Per-assertion and overall confidence from four signal axes:
//! - **Language certainty**: hedging vs. assertive vocabulary.
//! - **Citation support**: citations per ~50 words.
//! - **AI authenticity**: AI-marker phrases, fabrication flags, and
//!   sentence repetition (1.0 = human-like).
//! - **Provenance**: first-person research phrasing, bylines, DOIs,
//!   ISBNs, URLs, and journal names.
//!
//! Four hard trapdoors override the blend. They are visited in the order
//! of [`Trapdoor::PRECEDENCE`] and the first one that fires, on the full
//! content or on the assertion itself, sets the assertion's confidence.

use std::sync::LazyLock;

use regex::Regex;

use trustgraph_types::config::ConfidenceConfig;
use trustgraph_types::report::CONFIDENCE_MODULE;
use trustgraph_types::{
    clamp_score, round_to, Assertion, AssertionConfidence, Citation, ConfidenceReport, Content,
    ModuleStatus, RiskLevel, Trapdoor, TrustError, TrustResult,
};

use crate::text::{count_phrases, repetition_ratio, URL_RE};

static DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b10\.\d{4,9}/\S+").expect("doi pattern is valid"));

static ISBN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bisbn(?:-1[03])?:?\s*[0-9][0-9 \-]{8,16}[0-9x]\b")
        .expect("isbn pattern is valid")
});

/// A line opening with "By Firstname [M.] Lastname".
static BYLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[Bb]y\s+\p{Lu}\p{Ll}+(?:\s+\p{Lu}\.)?\s+\p{Lu}\p{Ll}+")
        .expect("byline pattern is valid")
});

/// Provenance marker counts for a span of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvenanceMarkers {
    pub human: usize,
    pub source: usize,
}

impl ProvenanceMarkers {
    pub fn total(&self) -> usize {
        self.human + self.source
    }
}

/// Everything the trapdoors and the blend read from one span of text.
#[derive(Debug, Clone, Copy)]
struct TextSignals {
    words: usize,
    citations: usize,
    language: f64,
    citation_support: f64,
    ai_authenticity: f64,
    markers: ProvenanceMarkers,
    provenance: f64,
    vague: usize,
}

pub struct ConfidenceScorer {
    config: ConfidenceConfig,
}

impl ConfidenceScorer {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    /// Weighted mean of certainty markers; `no_marker_certainty` when none.
    pub fn language_certainty(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let high = count_phrases(&lower, &self.config.high_markers);
        let medium = count_phrases(&lower, &self.config.medium_markers);
        let low = count_phrases(&lower, &self.config.low_markers);
        let total = high + medium + low;
        if total == 0 {
            return self.config.no_marker_certainty;
        }
        let weighted = high as f64 * self.config.high_weight
            + medium as f64 * self.config.medium_weight
            + low as f64 * self.config.low_weight;
        clamp_score(weighted / total as f64, 0.0, 1.0)
    }

    /// Zero without citations, otherwise `0.5 + 0.5·density`, capped at 1.
    pub fn citation_support(&self, text: &str, citations: usize) -> f64 {
        if citations == 0 {
            return 0.0;
        }
        let words = text.split_whitespace().count() as f64;
        let blocks = (words / self.config.words_per_citation).max(1.0);
        clamp_score(0.5 + 0.5 * citations as f64 / blocks, 0.0, 1.0)
    }

    /// Human-likeness in [0, 1]; low values mean AI-generated.
    pub fn ai_authenticity(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let ai_markers = count_phrases(&lower, &self.config.ai_markers);
        let fabrication_flags = count_phrases(&lower, &self.config.fabrication_flags);
        let score = 1.0
            - ai_markers as f64 * self.config.ai_marker_penalty
            - fabrication_flags as f64 * self.config.fabrication_flag_penalty
            - repetition_ratio(text) * self.config.repetition_penalty;
        clamp_score(score, 0.0, 1.0)
    }

    pub fn provenance_markers(&self, text: &str) -> ProvenanceMarkers {
        let lower = text.to_lowercase();
        let human = count_phrases(&lower, &self.config.human_markers)
            + BYLINE_RE.find_iter(text).count();
        let source = DOI_RE.find_iter(text).count()
            + ISBN_RE.find_iter(text).count()
            + URL_RE.find_iter(text).count()
            + count_phrases(&lower, &self.config.journal_names);
        ProvenanceMarkers { human, source }
    }

    pub fn vague_attributions(&self, text: &str) -> usize {
        count_phrases(&text.to_lowercase(), &self.config.vague_attributions)
    }

    pub fn ai_generation_risk(&self, ai_authenticity: f64) -> RiskLevel {
        RiskLevel::from_authenticity(
            ai_authenticity,
            self.config.ai_risk_high_below,
            self.config.ai_risk_medium_below,
        )
    }

    /// Confidence forced by a trapdoor.
    pub fn forced_value(&self, trapdoor: Trapdoor) -> f64 {
        let t = &self.config.trapdoors;
        match trapdoor {
            Trapdoor::UncitedContent => t.uncited_value,
            Trapdoor::AiGenerated => t.ai_value,
            Trapdoor::MissingProvenance => t.unsourced_value,
            Trapdoor::VagueAttribution => t.vague_value,
        }
    }

    fn signals(&self, text: &str, citations: usize, citation_basis: usize) -> TextSignals {
        let markers = self.provenance_markers(text);
        TextSignals {
            words: text.split_whitespace().count(),
            citations,
            language: self.language_certainty(text),
            citation_support: self.citation_support(text, citation_basis),
            ai_authenticity: self.ai_authenticity(text),
            markers,
            provenance: clamp_score(
                markers.total() as f64 * self.config.provenance_per_marker,
                0.0,
                1.0,
            ),
            vague: self.vague_attributions(text),
        }
    }

    fn fires(&self, trapdoor: Trapdoor, s: &TextSignals) -> bool {
        let t = &self.config.trapdoors;
        match trapdoor {
            Trapdoor::UncitedContent => s.words > t.uncited_min_words && s.citations == 0,
            Trapdoor::AiGenerated => s.ai_authenticity < t.ai_threshold,
            Trapdoor::MissingProvenance => {
                s.words > t.unsourced_min_words && s.markers.total() == 0
            }
            Trapdoor::VagueAttribution => s.vague > t.vague_max,
        }
    }

    fn blend(&self, s: &TextSignals) -> f64 {
        let w = &self.config.blend;
        clamp_score(
            s.language * w.language
                + s.citation_support * w.citation
                + s.ai_authenticity * w.ai_authenticity
                + s.provenance * w.provenance,
            0.0,
            1.0,
        )
    }

    pub fn score(
        &self,
        content: &Content,
        assertions: &[Assertion],
        citations: &[Citation],
    ) -> TrustResult<ConfidenceReport> {
        if let Some(idx) = assertions.iter().position(|a| a.text.trim().is_empty()) {
            return Err(TrustError::analyzer(
                CONFIDENCE_MODULE,
                format!("assertion at index {idx} is blank"),
            ));
        }
        if let Some(idx) = citations.iter().position(|c| c.text.trim().is_empty()) {
            return Err(TrustError::analyzer(
                CONFIDENCE_MODULE,
                format!("citation at index {idx} is blank"),
            ));
        }

        let doc = self.signals(content.text(), citations.len(), citations.len());
        let doc_fired: Vec<Trapdoor> = Trapdoor::PRECEDENCE
            .into_iter()
            .filter(|t| self.fires(*t, &doc))
            .collect();
        let ai_generation_risk = self.ai_generation_risk(doc.ai_authenticity);
        let author_detected = doc.markers.human > 0;

        let mut triggered = doc_fired.clone();
        let mut assertion_confidences = Vec::with_capacity(assertions.len());
        for assertion in assertions {
            let inline = citations
                .iter()
                .filter(|c| assertion.text.contains(c.text.as_str()))
                .count();
            // The blend measures support by every citation in the document;
            // the assertion-level trapdoor only counts citations it contains.
            let local = self.signals(&assertion.text, inline, citations.len());
            let mut forced = None;
            for trapdoor in Trapdoor::PRECEDENCE {
                let local_fire = self.fires(trapdoor, &local);
                if local_fire && !triggered.contains(&trapdoor) {
                    triggered.push(trapdoor);
                }
                if forced.is_none() && (doc_fired.contains(&trapdoor) || local_fire) {
                    forced = Some(trapdoor);
                }
            }
            let confidence_score = match forced {
                Some(t) => self.forced_value(t),
                None => round_to(self.blend(&local), 3),
            };
            assertion_confidences.push(AssertionConfidence {
                assertion: assertion.text.clone(),
                confidence_score,
                trapdoor: forced,
            });
        }

        for t in &triggered {
            log::info!("confidence trapdoor triggered: {}", t.reason());
        }

        let status = if assertions.is_empty() {
            ModuleStatus::InsufficientContent
        } else {
            ModuleStatus::Computed
        };
        let overall_confidence = if assertions.is_empty() {
            self.config.empty_confidence
        } else {
            let sum: f64 = assertion_confidences.iter().map(|a| a.confidence_score).sum();
            round_to(sum / assertion_confidences.len() as f64, 3)
        };

        let high = self.config.high_confidence_min;
        let medium = self.config.medium_confidence_min;
        let high_confidence_count = assertion_confidences
            .iter()
            .filter(|a| a.confidence_score >= high)
            .count();
        let medium_confidence_count = assertion_confidences
            .iter()
            .filter(|a| a.confidence_score >= medium && a.confidence_score < high)
            .count();
        let low_confidence_count =
            assertion_confidences.len() - high_confidence_count - medium_confidence_count;

        Ok(ConfidenceReport {
            overall_confidence,
            total_assertions: assertions.len(),
            assertion_confidences,
            high_confidence_count,
            medium_confidence_count,
            low_confidence_count,
            language_certainty: round_to(doc.language, 3),
            citation_support: round_to(doc.citation_support, 3),
            ai_authenticity: round_to(doc.ai_authenticity, 3),
            provenance_score: round_to(doc.provenance, 3),
            author_detected,
            triggered_trapdoors: triggered,
            ai_generation_risk,
            status,
        })
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ConfidenceScorer {
        ConfidenceScorer::new(ConfidenceConfig::default())
    }

    fn filler(words: usize) -> String {
        (0..words)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_language_certainty_no_markers_is_low_neutral() {
        assert_eq!(scorer().language_certainty("The bridge spans the river"), 0.3);
    }

    #[test]
    fn test_language_certainty_weighted_mean() {
        // one high (1.0) + one low (0.3) → 0.65
        let c = scorer().language_certainty("It is proven, though it might vary");
        assert!((c - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_citation_support_zero_without_citations() {
        assert_eq!(scorer().citation_support("some text here", 0), 0.0);
    }

    #[test]
    fn test_citation_support_density() {
        // 100 words → 2 blocks; 1 citation → 0.5 + 0.25
        let text = filler(100);
        assert!((scorer().citation_support(&text, 1) - 0.75).abs() < 1e-9);
        assert_eq!(scorer().citation_support(&text, 4), 1.0);
    }

    #[test]
    fn test_ai_authenticity_penalizes_markers_and_repetition() {
        let s = scorer();
        assert_eq!(s.ai_authenticity("We measured the flow rate twice"), 1.0);
        let text = "In conclusion, it is important to note the rich tapestry. \
                    In conclusion, it is important to note the rich tapestry.";
        // 6 markers·0.15 + repetition 0.5·0.5 → clamped to 0
        assert_eq!(s.ai_authenticity(text), 0.0);
    }

    #[test]
    fn test_provenance_markers() {
        let s = scorer();
        let m = s.provenance_markers(
            "By Jane Doe\nWe surveyed 40 farms. See doi 10.1000/xyz123, the Journal of Soil \
             Science and Nature Communications.",
        );
        assert_eq!(m.human, 2);
        // doi + "journal of" + "nature communications"
        assert_eq!(m.source, 3);
    }

    #[test]
    fn test_everyday_words_are_not_journal_names() {
        let m = scorer().provenance_markers("Such is human nature, and the science of bread.");
        assert_eq!(m.total(), 0);
    }

    fn unsourced_report(extra: &str) -> ConfidenceReport {
        let claim = "The river rose after the storm (Lee, 2021)";
        let text = format!("{claim}. {extra} {}.", filler(110));
        scorer()
            .score(
                &Content::new(text),
                &[Assertion::new(claim)],
                &[Citation::year_ref("(Lee, 2021)")],
            )
            .unwrap()
    }

    #[test]
    fn test_long_text_without_provenance_forces_value() {
        let report = unsourced_report("");
        assert_eq!(report.triggered_trapdoors, vec![Trapdoor::MissingProvenance]);
        let a = &report.assertion_confidences[0];
        assert_eq!(a.trapdoor, Some(Trapdoor::MissingProvenance));
        assert_eq!(a.confidence_score, 0.2);
        assert_eq!(report.overall_confidence, 0.2);
        assert_eq!(report.provenance_score, 0.0);
    }

    #[test]
    fn test_human_nature_does_not_count_as_provenance() {
        let report = unsourced_report("Such is human nature.");
        assert_eq!(report.triggered_trapdoors, vec![Trapdoor::MissingProvenance]);
        assert_eq!(report.assertion_confidences[0].confidence_score, 0.2);
    }

    #[test]
    fn test_ai_generated_outranks_vague_attribution() {
        let s = scorer();
        // Five AI markers (authenticity 0.25) and three vague attributions.
        let text = "In conclusion, studies show it is important to note the rich tapestry of soil. \
                    Research indicates soil plays a crucial role and is a testament to patience. \
                    Experts say soil matters.";
        let assertions = vec![
            Assertion::new("Experts say soil matters"),
            Assertion::new("Research indicates soil plays a crucial role"),
        ];
        let report = s.score(&Content::new(text), &assertions, &[]).unwrap();
        assert_eq!(
            report.triggered_trapdoors,
            vec![Trapdoor::AiGenerated, Trapdoor::VagueAttribution]
        );
        assert!((report.ai_authenticity - 0.25).abs() < 1e-9);
        assert_eq!(report.ai_generation_risk, RiskLevel::High);
        for a in &report.assertion_confidences {
            assert_eq!(a.trapdoor, Some(Trapdoor::AiGenerated));
            assert_eq!(a.confidence_score, 0.1);
        }
        assert_eq!(report.overall_confidence, 0.1);
        assert_eq!(report.low_confidence_count, 2);
    }

    #[test]
    fn test_repetition_compounds_ai_markers() {
        let s = scorer();
        let sentence = "The pump failed again";
        let text = vec![sentence; 4].join(". ") + ".";
        let report = s
            .score(&Content::new(text), &[Assertion::new(sentence)], &[])
            .unwrap();
        // repetition 0.75·0.5 leaves authenticity at 0.625, above the 0.3 cutoff
        assert!(report.triggered_trapdoors.is_empty());

        let flagged = "It is worth noting that the pump failed again";
        let text = vec![flagged; 4].join(". ") + ".";
        let report = s
            .score(&Content::new(text), &[Assertion::new(flagged)], &[])
            .unwrap();
        assert_eq!(report.triggered_trapdoors, vec![Trapdoor::AiGenerated]);
        assert_eq!(report.assertion_confidences[0].confidence_score, 0.1);
    }

    #[test]
    fn test_uncited_long_content_forces_zero() {
        let s = scorer();
        let text = format!("We measured the load. {}.", filler(60));
        let content = Content::new(text.clone());
        let assertions = vec![Assertion::new("We measured the load")];
        let report = s.score(&content, &assertions, &[]).unwrap();
        assert_eq!(report.triggered_trapdoors[0], Trapdoor::UncitedContent);
        assert_eq!(report.assertion_confidences[0].confidence_score, 0.0);
        assert_eq!(report.overall_confidence, 0.0);
    }

    #[test]
    fn test_first_trapdoor_wins() {
        let s = scorer();
        // Uncited (a) and vague attribution (d) both fire; (a) wins.
        let text = format!(
            "Studies show it works. Research indicates it helps. Experts say it is safe. {}",
            filler(60)
        );
        let content = Content::new(text);
        let assertions = vec![Assertion::new("Studies show it works")];
        let report = s.score(&content, &assertions, &[]).unwrap();
        assert!(report.triggered_trapdoors.contains(&Trapdoor::VagueAttribution));
        assert_eq!(report.assertion_confidences[0].trapdoor, Some(Trapdoor::UncitedContent));
        assert_eq!(report.assertion_confidences[0].confidence_score, 0.0);
    }

    #[test]
    fn test_vague_attribution_alone_forces_value() {
        let s = scorer();
        let text = "Studies show coffee helps. Research indicates tea helps. Experts say water helps.";
        let content = Content::new(text);
        let assertions = vec![
            Assertion::new("Studies show coffee helps"),
            Assertion::new("Research indicates tea helps"),
        ];
        let report = s.score(&content, &assertions, &[]).unwrap();
        assert_eq!(report.triggered_trapdoors, vec![Trapdoor::VagueAttribution]);
        assert!(report
            .assertion_confidences
            .iter()
            .all(|a| a.confidence_score == 0.15));
        assert_eq!(report.low_confidence_count, 2);
    }

    #[test]
    fn test_blend_without_trapdoors() {
        let s = scorer();
        let text = "We measured a proven drop in runoff (Lee, 2021).";
        let content = Content::new(text);
        let citations = vec![Citation::year_ref("(Lee, 2021)")];
        let assertions = vec![Assertion::new(
            "We measured a proven drop in runoff (Lee, 2021)",
        )];
        let report = s.score(&content, &assertions, &citations).unwrap();
        assert!(report.triggered_trapdoors.is_empty());
        // language 1.0·0.2 + citation 1.0·0.4 + authenticity 1.0·0.3 + provenance 0.25·0.1
        assert!((report.overall_confidence - 0.925).abs() < 1e-9);
        assert_eq!(report.high_confidence_count, 1);
        assert!(report.author_detected);
        assert_eq!(report.ai_generation_risk, RiskLevel::Low);
    }

    #[test]
    fn test_empty_assertions_returns_fixed_default() {
        let report = scorer()
            .score(&Content::new("Too short to hold claims"), &[], &[])
            .unwrap();
        assert_eq!(report.status, ModuleStatus::InsufficientContent);
        assert_eq!(report.overall_confidence, 0.25);
        assert!(report.assertion_confidences.is_empty());
    }

    #[test]
    fn test_ai_generation_risk_buckets() {
        let s = scorer();
        assert_eq!(s.ai_generation_risk(0.1), RiskLevel::High);
        assert_eq!(s.ai_generation_risk(0.45), RiskLevel::Medium);
        assert_eq!(s.ai_generation_risk(0.9), RiskLevel::Low);
    }

    #[test]
    fn test_blank_citation_is_analyzer_fault() {
        let err = scorer()
            .score(
                &Content::new("A claim that is long enough."),
                &[Assertion::new("A claim that is long enough")],
                &[Citation::url("  ")],
            )
            .unwrap_err();
        assert!(matches!(err, TrustError::Analyzer { .. }));
    }
}
