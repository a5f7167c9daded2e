// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{TrustError, TrustResult};
use crate::score::ProvenanceDeclaration;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

fn check_unit(name: &str, value: f64) -> TrustResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(TrustError::Config(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> TrustResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrustError::Config(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

fn check_non_empty(name: &str, list: &[String]) -> TrustResult<()> {
    if list.is_empty() {
        return Err(TrustError::Config(format!("{name} must not be empty")));
    }
    if let Some(blank) = list.iter().position(|w| w.trim().is_empty()) {
        return Err(TrustError::Config(format!(
            "{name}[{blank}] must not be blank"
        )));
    }
    Ok(())
}

/// Runtime configuration for the whole evaluation pipeline.
///
/// Every keyword list and weight table the analyzers read lives here, so a
/// pipeline is fully described by one value. Each section falls back to
/// its defaults when omitted from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Minimum trimmed character count accepted at the boundary.
    pub min_content_chars: usize,
    pub extraction: ExtractionConfig,
    pub integrity: IntegrityConfig,
    pub confidence: ConfidenceConfig,
    pub fabrication: FabricationConfig,
    pub aggregation: AggregationConfig,
    pub certificate: CertificateConfig,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            min_content_chars: 10,
            extraction: ExtractionConfig::default(),
            integrity: IntegrityConfig::default(),
            confidence: ConfidenceConfig::default(),
            fabrication: FabricationConfig::default(),
            aggregation: AggregationConfig::default(),
            certificate: CertificateConfig::default(),
        }
    }
}

impl TrustConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> TrustResult<()> {
        if self.min_content_chars == 0 {
            return Err(TrustError::Config(
                "min_content_chars must be > 0".to_string(),
            ));
        }
        self.extraction.validate()?;
        self.integrity.validate()?;
        self.confidence.validate()?;
        self.fabrication.validate()?;
        self.aggregation.validate()?;
        self.certificate.validate()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> TrustResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TrustError::Config(format!("JSON parse error: {e}")))
    }
}

// ─── Extraction ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sentence fragments must be strictly longer than this (trimmed chars).
    pub min_assertion_chars: usize,
    /// Heuristic placeholder reported as the extraction confidence.
    /// Not computed from the text.
    pub extraction_confidence: f64,
    /// Assertions shown in the module envelope; downstream analyzers
    /// always see the full list.
    pub preview_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_assertion_chars: 10,
            extraction_confidence: 0.85,
            preview_limit: 5,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> TrustResult<()> {
        check_unit("extraction.extraction_confidence", self.extraction_confidence)
    }
}

// ─── Integrity ──────────────────────────────────────────────────────

/// Two words whose presence on opposite sides of a similar pair signals
/// a contradiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpposingPair {
    pub negative: String,
    pub positive: String,
}

impl OpposingPair {
    pub fn new(negative: &str, positive: &str) -> Self {
        Self {
            negative: negative.to_string(),
            positive: positive.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    pub redundancy_threshold: f64,
    pub contradiction_threshold: f64,
    pub opposing_pairs: Vec<OpposingPair>,
    pub unsupported_phrases: Vec<String>,
    pub weight_high: f64,
    pub weight_medium: f64,
    pub weight_low: f64,
    /// Display cap per issue list; counts stay exact.
    pub max_reported_issues: usize,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            redundancy_threshold: 0.85,
            contradiction_threshold: 0.6,
            opposing_pairs: vec![
                OpposingPair::new("not", "is"),
                OpposingPair::new("false", "true"),
                OpposingPair::new("impossible", "possible"),
                OpposingPair::new("never", "always"),
            ],
            unsupported_phrases: words(&[
                "it is well known",
                "everyone knows",
                "obviously",
                "clearly",
                "of course",
            ]),
            weight_high: 0.3,
            weight_medium: 0.15,
            weight_low: 0.05,
            max_reported_issues: 5,
        }
    }
}

impl IntegrityConfig {
    pub fn validate(&self) -> TrustResult<()> {
        check_unit("integrity.redundancy_threshold", self.redundancy_threshold)?;
        check_unit("integrity.contradiction_threshold", self.contradiction_threshold)?;
        check_non_negative("integrity.weight_high", self.weight_high)?;
        check_non_negative("integrity.weight_medium", self.weight_medium)?;
        check_non_negative("integrity.weight_low", self.weight_low)?;
        if self.opposing_pairs.iter().any(|p| {
            p.negative.trim().is_empty() || p.positive.trim().is_empty()
        }) {
            return Err(TrustError::Config(
                "integrity.opposing_pairs entries must not be blank".to_string(),
            ));
        }
        check_non_empty("integrity.unsupported_phrases", &self.unsupported_phrases)
    }
}

// ─── Confidence ─────────────────────────────────────────────────────

/// Hard override rules, listed in precedence order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapdoorConfig {
    /// (a) more than this many words with zero citations.
    pub uncited_min_words: usize,
    pub uncited_value: f64,
    /// (b) AI authenticity strictly below this.
    pub ai_threshold: f64,
    pub ai_value: f64,
    /// (c) more than this many words with zero provenance markers.
    pub unsourced_min_words: usize,
    pub unsourced_value: f64,
    /// (d) more than this many vague attributions.
    pub vague_max: usize,
    pub vague_value: f64,
}

impl Default for TrapdoorConfig {
    fn default() -> Self {
        Self {
            uncited_min_words: 50,
            uncited_value: 0.0,
            ai_threshold: 0.3,
            ai_value: 0.1,
            unsourced_min_words: 100,
            unsourced_value: 0.2,
            vague_max: 2,
            vague_value: 0.15,
        }
    }
}

/// Per-assertion blend used when no trapdoor fires. Must sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub language: f64,
    pub citation: f64,
    pub ai_authenticity: f64,
    pub provenance: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            language: 0.2,
            citation: 0.4,
            ai_authenticity: 0.3,
            provenance: 0.1,
        }
    }
}

impl BlendWeights {
    pub fn sum(&self) -> f64 {
        self.language + self.citation + self.ai_authenticity + self.provenance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub high_markers: Vec<String>,
    pub medium_markers: Vec<String>,
    pub low_markers: Vec<String>,
    pub high_weight: f64,
    pub medium_weight: f64,
    pub low_weight: f64,
    /// Language certainty when no marker is present. Absence of a
    /// signal is not confidence.
    pub no_marker_certainty: f64,
    pub words_per_citation: f64,

    pub ai_markers: Vec<String>,
    pub fabrication_flags: Vec<String>,
    pub ai_marker_penalty: f64,
    pub fabrication_flag_penalty: f64,
    pub repetition_penalty: f64,

    /// First-person research phrasing and bylines.
    pub human_markers: Vec<String>,
    pub journal_names: Vec<String>,
    pub provenance_per_marker: f64,

    pub vague_attributions: Vec<String>,

    pub trapdoors: TrapdoorConfig,
    pub blend: BlendWeights,

    pub ai_risk_high_below: f64,
    pub ai_risk_medium_below: f64,
    pub high_confidence_min: f64,
    pub medium_confidence_min: f64,
    /// Overall confidence reported when there is nothing to score.
    pub empty_confidence: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high_markers: words(&[
                "proven",
                "established",
                "confirmed",
                "verified",
                "certain",
                "demonstrated",
            ]),
            medium_markers: words(&[
                "likely", "probable", "suggests", "indicates", "appears",
            ]),
            low_markers: words(&[
                "might", "could", "possibly", "maybe", "perhaps", "unclear",
            ]),
            high_weight: 1.0,
            medium_weight: 0.6,
            low_weight: 0.3,
            no_marker_certainty: 0.3,
            words_per_citation: 50.0,

            ai_markers: words(&[
                "as an ai",
                "as a language model",
                "it is important to note",
                "it's important to note",
                "it is worth noting",
                "in conclusion",
                "delve into",
                "in today's fast-paced world",
                "plays a crucial role",
                "a testament to",
                "rich tapestry",
                "navigate the complexities",
                "ever-evolving landscape",
            ]),
            fabrication_flags: words(&[
                "studies have proven",
                "scientifically proven",
                "100% guaranteed",
                "experts unanimously agree",
                "according to sources",
                "it has been proven that",
            ]),
            ai_marker_penalty: 0.15,
            fabrication_flag_penalty: 0.2,
            repetition_penalty: 0.5,

            human_markers: words(&[
                "i measured",
                "we measured",
                "i interviewed",
                "we interviewed",
                "we surveyed",
                "i observed",
                "we observed",
                "i found",
                "we found",
                "i tested",
                "we tested",
                "our analysis",
                "our study",
                "in my experience",
                "written by",
                "author:",
            ]),
            journal_names: words(&[
                "journal of",
                "proceedings of",
                "the lancet",
                "nature communications",
                "nature medicine",
                "science advances",
                "scientific reports",
                "plos one",
                "new england journal of medicine",
                "nejm",
                "arxiv",
                "pubmed",
            ]),
            provenance_per_marker: 0.25,

            vague_attributions: words(&[
                "studies show",
                "research indicates",
                "research shows",
                "experts say",
                "experts agree",
                "scientists say",
                "it has been shown",
                "many believe",
                "sources say",
            ]),

            trapdoors: TrapdoorConfig::default(),
            blend: BlendWeights::default(),

            ai_risk_high_below: 0.3,
            ai_risk_medium_below: 0.6,
            high_confidence_min: 0.8,
            medium_confidence_min: 0.5,
            empty_confidence: 0.25,
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> TrustResult<()> {
        check_non_empty("confidence.high_markers", &self.high_markers)?;
        check_non_empty("confidence.medium_markers", &self.medium_markers)?;
        check_non_empty("confidence.low_markers", &self.low_markers)?;
        check_non_empty("confidence.ai_markers", &self.ai_markers)?;
        check_non_empty("confidence.fabrication_flags", &self.fabrication_flags)?;
        check_non_empty("confidence.human_markers", &self.human_markers)?;
        check_non_empty("confidence.journal_names", &self.journal_names)?;
        check_non_empty("confidence.vague_attributions", &self.vague_attributions)?;
        for (name, value) in [
            ("confidence.high_weight", self.high_weight),
            ("confidence.medium_weight", self.medium_weight),
            ("confidence.low_weight", self.low_weight),
            ("confidence.no_marker_certainty", self.no_marker_certainty),
            ("confidence.trapdoors.uncited_value", self.trapdoors.uncited_value),
            ("confidence.trapdoors.ai_threshold", self.trapdoors.ai_threshold),
            ("confidence.trapdoors.ai_value", self.trapdoors.ai_value),
            ("confidence.trapdoors.unsourced_value", self.trapdoors.unsourced_value),
            ("confidence.trapdoors.vague_value", self.trapdoors.vague_value),
            ("confidence.ai_risk_high_below", self.ai_risk_high_below),
            ("confidence.ai_risk_medium_below", self.ai_risk_medium_below),
            ("confidence.high_confidence_min", self.high_confidence_min),
            ("confidence.medium_confidence_min", self.medium_confidence_min),
            ("confidence.empty_confidence", self.empty_confidence),
        ] {
            check_unit(name, value)?;
        }
        for (name, value) in [
            ("confidence.ai_marker_penalty", self.ai_marker_penalty),
            ("confidence.fabrication_flag_penalty", self.fabrication_flag_penalty),
            ("confidence.repetition_penalty", self.repetition_penalty),
            ("confidence.provenance_per_marker", self.provenance_per_marker),
        ] {
            check_non_negative(name, value)?;
        }
        if !self.words_per_citation.is_finite() || self.words_per_citation <= 0.0 {
            return Err(TrustError::Config(format!(
                "confidence.words_per_citation must be > 0, got {}",
                self.words_per_citation
            )));
        }
        if (self.blend.sum() - 1.0).abs() > 1e-9 {
            return Err(TrustError::Config(format!(
                "confidence.blend weights must sum to 1.0, got {}",
                self.blend.sum()
            )));
        }
        if self.ai_risk_high_below > self.ai_risk_medium_below {
            return Err(TrustError::Config(format!(
                "confidence.ai_risk_high_below ({}) must not exceed ai_risk_medium_below ({})",
                self.ai_risk_high_below, self.ai_risk_medium_below
            )));
        }
        if self.medium_confidence_min > self.high_confidence_min {
            return Err(TrustError::Config(format!(
                "confidence.medium_confidence_min ({}) must not exceed high_confidence_min ({})",
                self.medium_confidence_min, self.high_confidence_min
            )));
        }
        Ok(())
    }
}

// ─── Fabrication ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricationConfig {
    pub ai_artifacts: Vec<String>,
    /// Absolute guarantees that rarely survive scrutiny.
    pub absolute_phrases: Vec<String>,
    /// Consensus claims with no named source.
    pub consensus_phrases: Vec<String>,
    pub artifact_penalty: f64,
    pub suspicious_penalty: f64,
    pub low_risk_min: f64,
    pub medium_risk_min: f64,
}

impl Default for FabricationConfig {
    fn default() -> Self {
        Self {
            ai_artifacts: words(&[
                "as an ai",
                "as a language model",
                "i cannot browse",
                "my knowledge cutoff",
                "it is important to note",
                "in conclusion",
                "delve into",
                "rich tapestry",
                "regenerate response",
            ]),
            absolute_phrases: words(&[
                "100% guaranteed",
                "always works",
                "never fails",
                "without exception",
                "scientifically proven",
            ]),
            consensus_phrases: words(&[
                "experts agree",
                "scientists agree",
                "studies show",
                "everyone agrees",
                "it is widely known",
            ]),
            artifact_penalty: 0.1,
            suspicious_penalty: 0.15,
            low_risk_min: 0.7,
            medium_risk_min: 0.4,
        }
    }
}

impl FabricationConfig {
    pub fn validate(&self) -> TrustResult<()> {
        check_non_empty("fabrication.ai_artifacts", &self.ai_artifacts)?;
        check_non_empty("fabrication.absolute_phrases", &self.absolute_phrases)?;
        check_non_empty("fabrication.consensus_phrases", &self.consensus_phrases)?;
        check_non_negative("fabrication.artifact_penalty", self.artifact_penalty)?;
        check_non_negative("fabrication.suspicious_penalty", self.suspicious_penalty)?;
        check_unit("fabrication.low_risk_min", self.low_risk_min)?;
        check_unit("fabrication.medium_risk_min", self.medium_risk_min)?;
        if self.medium_risk_min > self.low_risk_min {
            return Err(TrustError::Config(format!(
                "fabrication.medium_risk_min ({}) must not exceed low_risk_min ({})",
                self.medium_risk_min, self.low_risk_min
            )));
        }
        Ok(())
    }
}

// ─── Aggregation ────────────────────────────────────────────────────

/// Transparency multiplier keyed by provenance declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplierTable {
    pub original: f64,
    pub ai: f64,
    pub copied: f64,
    pub mixed: f64,
    pub unsure: f64,
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self {
            original: 1.0,
            ai: 1.10,
            copied: 1.10,
            mixed: 1.15,
            unsure: 0.70,
        }
    }
}

impl MultiplierTable {
    pub fn get(&self, declaration: ProvenanceDeclaration) -> f64 {
        match declaration {
            ProvenanceDeclaration::Original => self.original,
            ProvenanceDeclaration::Ai => self.ai,
            ProvenanceDeclaration::Copied => self.copied,
            ProvenanceDeclaration::Mixed => self.mixed,
            ProvenanceDeclaration::Unsure => self.unsure,
        }
    }
}

/// Component values substituted when a module result is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralDefaults {
    pub source_data: f64,
    pub integrity: f64,
    pub confidence: f64,
    pub authenticity: f64,
}

impl Default for NeutralDefaults {
    fn default() -> Self {
        Self {
            source_data: 0.8,
            integrity: 0.8,
            confidence: 0.7,
            authenticity: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub base_score: f64,
    pub per_assertion: f64,
    pub assertion_cap: f64,
    /// Bonus for exactly one, exactly two, and three or more citations.
    pub citation_tiers: [f64; 3],
    pub author_bonus: f64,
    pub per_contradiction: f64,
    pub contradiction_cap: f64,
    /// Declared-original content above this AI likelihood is penalized.
    pub alignment_ai_threshold: f64,
    pub alignment_penalty_max: f64,
    pub uncited_cap: f64,
    /// Uncited cap when the caller disclosed `ai` or `mixed`.
    pub uncited_disclosed_cap: f64,
    /// Uncited content longer than this is capped even with an author.
    pub uncited_word_threshold: usize,
    pub misdeclared_ai_threshold: f64,
    pub misdeclared_cap: f64,
    pub multipliers: MultiplierTable,
    pub defaults: NeutralDefaults,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            base_score: 60.0,
            per_assertion: 2.5,
            assertion_cap: 20.0,
            citation_tiers: [10.0, 15.0, 20.0],
            author_bonus: 10.0,
            per_contradiction: 10.0,
            contradiction_cap: 30.0,
            alignment_ai_threshold: 0.6,
            alignment_penalty_max: 20.0,
            uncited_cap: 25.0,
            uncited_disclosed_cap: 40.0,
            uncited_word_threshold: 50,
            misdeclared_ai_threshold: 0.7,
            misdeclared_cap: 30.0,
            multipliers: MultiplierTable::default(),
            defaults: NeutralDefaults::default(),
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> TrustResult<()> {
        for (name, value) in [
            ("aggregation.base_score", self.base_score),
            ("aggregation.per_assertion", self.per_assertion),
            ("aggregation.assertion_cap", self.assertion_cap),
            ("aggregation.author_bonus", self.author_bonus),
            ("aggregation.per_contradiction", self.per_contradiction),
            ("aggregation.contradiction_cap", self.contradiction_cap),
            ("aggregation.alignment_penalty_max", self.alignment_penalty_max),
            ("aggregation.uncited_cap", self.uncited_cap),
            ("aggregation.uncited_disclosed_cap", self.uncited_disclosed_cap),
            ("aggregation.misdeclared_cap", self.misdeclared_cap),
            ("aggregation.multipliers.original", self.multipliers.original),
            ("aggregation.multipliers.ai", self.multipliers.ai),
            ("aggregation.multipliers.copied", self.multipliers.copied),
            ("aggregation.multipliers.mixed", self.multipliers.mixed),
            ("aggregation.multipliers.unsure", self.multipliers.unsure),
        ] {
            check_non_negative(name, value)?;
        }
        if self.base_score > 100.0 {
            return Err(TrustError::Config(format!(
                "aggregation.base_score must be <= 100, got {}",
                self.base_score
            )));
        }
        if self.citation_tiers.windows(2).any(|w| w[0] > w[1]) {
            return Err(TrustError::Config(format!(
                "aggregation.citation_tiers must be non-decreasing, got {:?}",
                self.citation_tiers
            )));
        }
        check_unit("aggregation.alignment_ai_threshold", self.alignment_ai_threshold)?;
        check_unit("aggregation.misdeclared_ai_threshold", self.misdeclared_ai_threshold)?;
        check_unit("aggregation.defaults.source_data", self.defaults.source_data)?;
        check_unit("aggregation.defaults.integrity", self.defaults.integrity)?;
        check_unit("aggregation.defaults.confidence", self.defaults.confidence)?;
        check_unit("aggregation.defaults.authenticity", self.defaults.authenticity)
    }
}

// ─── Certificate ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateConfig {
    pub issuer: String,
    pub version: String,
    pub id_prefix: String,
    pub methodology_tag: String,
    pub methodology: String,
    /// Insights repeated in the readable summary.
    pub summary_insights: usize,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            issuer: "TrustGraph Evaluation System".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            id_prefix: "TG".to_string(),
            methodology_tag: "signal-trapdoor-transparency/v1".to_string(),
            methodology: "Rule-based trust analysis: assertion and citation signals, \
                          integrity checks, confidence trapdoors, fabrication detection, \
                          and a provenance transparency multiplier."
                .to_string(),
            summary_insights: 3,
        }
    }
}

impl CertificateConfig {
    pub fn validate(&self) -> TrustResult<()> {
        if self.id_prefix.trim().is_empty() {
            return Err(TrustError::Config(
                "certificate.id_prefix must not be blank".to_string(),
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err(TrustError::Config(
                "certificate.issuer must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
