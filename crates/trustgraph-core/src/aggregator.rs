// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Trust Aggregator
// ─────────────────────────────────────────────────────────────────────
//! Signal + trapdoor + transparency-multiplier scoring.
//!
//! ```text
//! subtotal = base + assertions + citations + author − contradictions − alignment
//! capped   = min(subtotal, caps…)
//! final    = round₁(clamp₀¹⁰⁰(capped · multiplier[declaration]))
//! ```
//!
//! The aggregator is the single source of truth for the final score.
//! Absent module reports are replaced by neutral defaults, never by a
//! re-weighted average over the modules that are present.

use trustgraph_types::config::AggregationConfig;
use trustgraph_types::{
    clamp_score, round_to, AggregateResult, AggregatorTrapdoor, ComponentScores,
    ConfidenceReport, ExtractionReport, FabricationReport, IntegrityReport,
    ProvenanceDeclaration, SignalBreakdown, Signals, TriggeredCap, TrustBand, TrustError,
    TrustResult,
};

/// The analyzer reports handed to the aggregator. Any may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleInputs<'a> {
    pub extraction: Option<&'a ExtractionReport>,
    pub integrity: Option<&'a IntegrityReport>,
    pub confidence: Option<&'a ConfidenceReport>,
    pub fabrication: Option<&'a FabricationReport>,
}

pub struct Aggregator {
    config: AggregationConfig,
}

fn check_component(name: &str, value: f64) -> TrustResult<f64> {
    if !value.is_finite() {
        return Err(TrustError::Numerical(format!("{name} score is {value}")));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(TrustError::Aggregation(format!(
            "{name} score must be in [0, 1], got {value}"
        )));
    }
    Ok(value)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Reduce the module reports to [`Signals`] and component scores,
    /// substituting neutral defaults for anything missing.
    ///
    /// Returns the names of the modules that were defaulted.
    pub fn reduce(
        &self,
        inputs: &ModuleInputs<'_>,
    ) -> TrustResult<(Signals, ComponentScores, Vec<String>)> {
        let defaults = &self.config.defaults;
        let mut defaulted = Vec::new();

        let source_data = match inputs.extraction {
            Some(e) => {
                if e.assertions_count != e.assertions.len() || e.citations_count != e.citations.len()
                {
                    return Err(TrustError::Aggregation(format!(
                        "extraction counts disagree with its lists: {} vs {} assertions, \
                         {} vs {} citations",
                        e.assertions_count,
                        e.assertions.len(),
                        e.citations_count,
                        e.citations.len()
                    )));
                }
                check_component("source_data", e.extraction_confidence)?
            }
            None => {
                defaulted.push("extraction".to_string());
                defaults.source_data
            }
        };
        let integrity = match inputs.integrity {
            Some(i) => check_component("integrity", i.integrity_score)?,
            None => {
                defaulted.push("integrity".to_string());
                defaults.integrity
            }
        };
        let confidence = match inputs.confidence {
            Some(c) => check_component("confidence", c.overall_confidence)?,
            None => {
                defaulted.push("confidence".to_string());
                defaults.confidence
            }
        };
        let authenticity = match inputs.fabrication {
            Some(f) => check_component("authenticity", f.authenticity_score)?,
            None => {
                defaulted.push("fabrication".to_string());
                defaults.authenticity
            }
        };

        for module in &defaulted {
            log::warn!("{module} report missing, using neutral default");
        }

        let signals = Signals {
            assertions: inputs.extraction.map_or(0, |e| e.assertions_count),
            citations: inputs.extraction.map_or(0, |e| e.citations_count),
            contradictions: inputs.integrity.map_or(0, |i| i.contradiction_count),
            author_detected: inputs.confidence.is_some_and(|c| c.author_detected),
            ai_likelihood: round_to(1.0 - authenticity, 3),
            word_count: inputs.extraction.map_or(0, |e| e.word_count),
        };
        let components = ComponentScores {
            source_data: round_to(source_data, 3),
            integrity: round_to(integrity, 3),
            confidence: round_to(confidence, 3),
            authenticity: round_to(authenticity, 3),
        };
        Ok((signals, components, defaulted))
    }

    /// Citation credit: tiered for one, two, and three or more.
    pub fn citation_score(&self, citations: usize) -> f64 {
        match citations {
            0 => 0.0,
            1 => self.config.citation_tiers[0],
            2 => self.config.citation_tiers[1],
            _ => self.config.citation_tiers[2],
        }
    }

    pub fn alignment_penalty(&self, signals: &Signals, declaration: ProvenanceDeclaration) -> f64 {
        let threshold = self.config.alignment_ai_threshold;
        if declaration != ProvenanceDeclaration::Original || signals.ai_likelihood <= threshold {
            return 0.0;
        }
        let max = self.config.alignment_penalty_max;
        (max * (signals.ai_likelihood - threshold) / (1.0 - threshold)).min(max)
    }

    /// Caps that fire for these signals, in evaluation order.
    pub fn trapdoors(
        &self,
        signals: &Signals,
        declaration: ProvenanceDeclaration,
    ) -> Vec<TriggeredCap> {
        let c = &self.config;
        let mut caps = Vec::new();
        if signals.citations == 0
            && (!signals.author_detected || signals.word_count > c.uncited_word_threshold)
        {
            let cap = match declaration {
                ProvenanceDeclaration::Ai | ProvenanceDeclaration::Mixed => c.uncited_disclosed_cap,
                _ => c.uncited_cap,
            };
            caps.push(TriggeredCap {
                trapdoor: AggregatorTrapdoor::UncitedContent,
                cap,
            });
        }
        if declaration == ProvenanceDeclaration::Original
            && signals.ai_likelihood > c.misdeclared_ai_threshold
        {
            caps.push(TriggeredCap {
                trapdoor: AggregatorTrapdoor::MisdeclaredAi,
                cap: c.misdeclared_cap,
            });
        }
        caps
    }

    /// The full arithmetic, one named entry per step.
    pub fn score_signals(
        &self,
        signals: &Signals,
        declaration: ProvenanceDeclaration,
    ) -> SignalBreakdown {
        let c = &self.config;
        let assertion_score = (signals.assertions as f64 * c.per_assertion).min(c.assertion_cap);
        let citation_score = self.citation_score(signals.citations);
        let author_bonus = if signals.author_detected {
            c.author_bonus
        } else {
            0.0
        };
        let contradiction_penalty =
            (signals.contradictions as f64 * c.per_contradiction).min(c.contradiction_cap);
        let alignment_penalty = self.alignment_penalty(signals, declaration);

        let subtotal = c.base_score + assertion_score + citation_score + author_bonus
            - contradiction_penalty
            - alignment_penalty;

        let trapdoors = self.trapdoors(signals, declaration);
        let capped = trapdoors.iter().fold(subtotal, |acc, t| acc.min(t.cap));
        for t in &trapdoors {
            log::info!("aggregator trapdoor: {} (cap {})", t.trapdoor, t.cap);
        }

        let transparency_multiplier = c.multipliers.get(declaration);
        let multiplied = capped * transparency_multiplier;
        let clamped = clamp_score(multiplied, 0.0, 100.0);
        let final_score = round_to(clamped, 1);

        SignalBreakdown {
            base_score: c.base_score,
            assertion_score,
            citation_score,
            author_bonus,
            contradiction_penalty,
            alignment_penalty,
            subtotal,
            trapdoor_adjustment: capped - subtotal,
            trapdoors,
            transparency_multiplier,
            multiplier_adjustment: multiplied - capped,
            clamp_adjustment: clamped - multiplied,
            rounding_adjustment: final_score - clamped,
            final_score,
        }
    }

    pub fn aggregate(
        &self,
        inputs: &ModuleInputs<'_>,
        declaration: ProvenanceDeclaration,
    ) -> TrustResult<AggregateResult> {
        let (signals, component_scores, defaults_applied) = self.reduce(inputs)?;
        let breakdown = self.score_signals(&signals, declaration);
        let score = breakdown.final_score;

        let trust_band = TrustBand::from_score(score);
        let insights = self.insights(
            inputs,
            &signals,
            &breakdown,
            declaration,
            trust_band,
            &defaults_applied,
        );
        let disclaimer = self.disclaimer(&signals, &breakdown, declaration, trust_band);

        log::debug!(
            "aggregate: score={score} band={trust_band} declaration={declaration} \
             citations={} trapdoors={}",
            signals.citations,
            breakdown.trapdoors.len()
        );

        Ok(AggregateResult {
            score,
            trust_score: round_to(score / 100.0, 3),
            trust_band,
            trust_level: trust_band.level(),
            declaration,
            signals,
            component_scores,
            breakdown,
            insights,
            disclaimer,
            defaults_applied,
        })
    }

    /// Ranked findings: caps first, overall commentary last.
    fn insights(
        &self,
        inputs: &ModuleInputs<'_>,
        signals: &Signals,
        breakdown: &SignalBreakdown,
        declaration: ProvenanceDeclaration,
        band: TrustBand,
        defaults_applied: &[String],
    ) -> Vec<String> {
        let mut out = Vec::new();

        for t in &breakdown.trapdoors {
            out.push(match t.trapdoor {
                AggregatorTrapdoor::UncitedContent => format!(
                    "Trapdoor activated: no citations support this content; score capped at {}.",
                    t.cap
                ),
                AggregatorTrapdoor::MisdeclaredAi => format!(
                    "Trapdoor activated: content declared original reads as AI-generated \
                     ({:.0}% AI likelihood); score capped at {}.",
                    signals.ai_likelihood * 100.0,
                    t.cap
                ),
            });
        }

        if breakdown.alignment_penalty > 0.0 {
            out.push(format!(
                "Declared original but AI likelihood is {:.0}%; \
                 alignment penalty of {:.1} points applied.",
                signals.ai_likelihood * 100.0,
                breakdown.alignment_penalty
            ));
        }

        out.push(match signals.citations {
            0 => "No citations found; add sources to support the claims.".to_string(),
            1 | 2 => format!(
                "Only {} found; three or more earn full citation credit.",
                plural(signals.citations, "citation", "citations")
            ),
            n => format!("{n} citations provide strong source support."),
        });

        let m = breakdown.transparency_multiplier;
        out.push(if m > 1.0 {
            format!("Provenance disclosed as {declaration}; transparency bonus of {m:.2}x applied.")
        } else if m < 1.0 {
            format!(
                "Provenance declared as {declaration}; \
                 transparency multiplier of {m:.2}x lowered the score."
            )
        } else {
            format!("Provenance declared as {declaration}; no transparency adjustment.")
        });

        if let Some(integrity) = inputs.integrity.filter(|i| i.issues_found > 0) {
            out.push(format!(
                "Found {} ({}, {}, {}).",
                plural(integrity.issues_found, "integrity issue", "integrity issues"),
                plural(integrity.contradiction_count, "contradiction", "contradictions"),
                plural(integrity.redundancy_count, "redundancy", "redundancies"),
                plural(integrity.unsupported_count, "unsupported claim", "unsupported claims"),
            ));
        }

        if let Some(fabrication) = inputs.fabrication.filter(|f| f.total_flags > 0) {
            out.push(format!(
                "Detected {}.",
                plural(
                    fabrication.total_flags,
                    "potential fabrication indicator",
                    "potential fabrication indicators"
                )
            ));
        }

        if let Some(confidence) = inputs.confidence.filter(|c| !c.triggered_trapdoors.is_empty()) {
            out.push(format!(
                "Confidence overrides: {}.",
                confidence.trapdoor_reasons().join("; ")
            ));
        }

        if !defaults_applied.is_empty() {
            out.push(format!(
                "Neutral defaults used for missing modules: {}.",
                defaults_applied.join(", ")
            ));
        }

        out.push(
            match band {
                TrustBand::HighTrust => {
                    "Content shows high trustworthiness across all evaluated dimensions."
                }
                TrustBand::Verified => {
                    "Content shows moderate trustworthiness with some areas for improvement."
                }
                TrustBand::LowTrust => {
                    "Content shows significant trust concerns that should be addressed."
                }
                TrustBand::Unverified => {
                    "Content could not be verified and should be treated as unsupported."
                }
            }
            .to_string(),
        );
        out
    }

    fn disclaimer(
        &self,
        signals: &Signals,
        breakdown: &SignalBreakdown,
        declaration: ProvenanceDeclaration,
        band: TrustBand,
    ) -> String {
        let citations = match signals.citations {
            0 => "no citations were found, which limits the score".to_string(),
            1 | 2 => format!(
                "{} partially support the claims",
                plural(signals.citations, "citation", "citations")
            ),
            n => format!("{n} citations adequately support the claims"),
        };
        let m = breakdown.transparency_multiplier;
        let direction = if m > 1.0 {
            "raised"
        } else if m < 1.0 {
            "lowered"
        } else {
            "left unchanged"
        };
        let alignment = if breakdown.trapdoor_fired(AggregatorTrapdoor::MisdeclaredAi)
            || breakdown.alignment_penalty > 0.0
        {
            format!(
                "the original declaration conflicts with an estimated {:.0}% AI likelihood",
                signals.ai_likelihood * 100.0
            )
        } else {
            format!(
                "the {declaration} declaration is consistent with an estimated {:.0}% AI likelihood",
                signals.ai_likelihood * 100.0
            )
        };
        format!(
            "This {band} rating ({}/100) is a heuristic estimate, not a verification of factual \
             accuracy. In this evaluation {citations}; the {declaration} declaration {direction} \
             the score by a {m:.2}x transparency multiplier; and {alignment}.",
            breakdown.final_score
        )
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }
}
