// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Integrity Checker
// ─────────────────────────────────────────────────────────────────────
//! Pairwise contradiction and redundancy detection plus single-assertion
//! unsupported-claim phrasing.
//!
//! Every unordered pair is compared with [`similarity`]. A similar pair in
//! which one side carries the negative word of an opposing pair and the
//! other carries only the positive word is a contradiction; a pair that is
//! not a contradiction but nearly identical is a redundancy.
//!
//! `integrity = max(0, 1 − Σ severity_weight / assertion_count)`.

use trustgraph_types::config::{IntegrityConfig, OpposingPair};
use trustgraph_types::report::INTEGRITY_MODULE;
use trustgraph_types::{
    clamp_score, round_to, Assertion, IntegrityIssue, IntegrityReport, IssueKind, Severity,
    TrustError, TrustResult,
};

use crate::similarity::similarity;
use crate::text::contains_phrase;

pub struct IntegrityChecker {
    config: IntegrityConfig,
    /// Lowercased copies of the configured lists.
    opposing: Vec<OpposingPair>,
    unsupported: Vec<String>,
}

impl IntegrityChecker {
    pub fn new(config: IntegrityConfig) -> Self {
        let opposing = config
            .opposing_pairs
            .iter()
            .map(|p| OpposingPair {
                negative: p.negative.to_lowercase(),
                positive: p.positive.to_lowercase(),
            })
            .collect();
        let unsupported = config
            .unsupported_phrases
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        Self {
            config,
            opposing,
            unsupported,
        }
    }

    /// The first opposing pair that separates `a` from `b`, if any.
    ///
    /// Both inputs must be lowercase.
    pub fn opposition(&self, a: &str, b: &str) -> Option<&OpposingPair> {
        self.opposing.iter().find(|pair| {
            let a_neg = contains_phrase(a, &pair.negative);
            let b_neg = contains_phrase(b, &pair.negative);
            let a_pos = contains_phrase(a, &pair.positive);
            let b_pos = contains_phrase(b, &pair.positive);
            (a_neg && b_pos && !b_neg) || (b_neg && a_pos && !a_neg)
        })
    }

    fn severity_weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.config.weight_high,
            Severity::Medium => self.config.weight_medium,
            Severity::Low => self.config.weight_low,
        }
    }

    pub fn check(&self, assertions: &[Assertion]) -> TrustResult<IntegrityReport> {
        if let Some(idx) = assertions.iter().position(|a| a.text.trim().is_empty()) {
            return Err(TrustError::analyzer(
                INTEGRITY_MODULE,
                format!("assertion at index {idx} is blank"),
            ));
        }

        let lowered: Vec<String> = assertions.iter().map(|a| a.text.to_lowercase()).collect();
        let mut contradictions = Vec::new();
        let mut redundancies = Vec::new();
        let mut unsupported_claims = Vec::new();

        for i in 0..assertions.len() {
            for j in (i + 1)..assertions.len() {
                let sim = similarity(&assertions[i].text, &assertions[j].text);

                if sim > self.config.contradiction_threshold {
                    if let Some(pair) = self.opposition(&lowered[i], &lowered[j]) {
                        contradictions.push(IntegrityIssue {
                            kind: IssueKind::Contradiction,
                            severity: Severity::High,
                            assertion_1: assertions[i].text.clone(),
                            assertion_2: Some(assertions[j].text.clone()),
                            similarity: Some(round_to(sim, 3)),
                            trigger: format!("{}/{}", pair.negative, pair.positive),
                        });
                        continue;
                    }
                }

                if sim > self.config.redundancy_threshold {
                    redundancies.push(IntegrityIssue {
                        kind: IssueKind::Redundancy,
                        severity: Severity::Medium,
                        assertion_1: assertions[i].text.clone(),
                        assertion_2: Some(assertions[j].text.clone()),
                        similarity: Some(round_to(sim, 3)),
                        trigger: "near-duplicate".to_string(),
                    });
                }
            }
        }

        for (assertion, lower) in assertions.iter().zip(&lowered) {
            if let Some(phrase) = self.unsupported.iter().find(|p| contains_phrase(lower, p)) {
                unsupported_claims.push(IntegrityIssue {
                    kind: IssueKind::UnsupportedClaim,
                    severity: Severity::Medium,
                    assertion_1: assertion.text.clone(),
                    assertion_2: None,
                    similarity: None,
                    trigger: phrase.clone(),
                });
            }
        }

        let penalty: f64 = contradictions
            .iter()
            .chain(&redundancies)
            .chain(&unsupported_claims)
            .map(|issue| self.severity_weight(issue.severity))
            .sum();
        let integrity_score = if assertions.is_empty() {
            1.0
        } else {
            round_to(
                clamp_score(1.0 - penalty / assertions.len() as f64, 0.0, 1.0),
                3,
            )
        };

        let contradiction_count = contradictions.len();
        let redundancy_count = redundancies.len();
        let unsupported_count = unsupported_claims.len();
        let issues_found = contradiction_count + redundancy_count + unsupported_count;
        if issues_found > 0 {
            log::debug!(
                "integrity: {contradiction_count} contradictions, {redundancy_count} redundancies, \
                 {unsupported_count} unsupported claims across {} assertions",
                assertions.len()
            );
        }

        let cap = self.config.max_reported_issues;
        contradictions.truncate(cap);
        redundancies.truncate(cap);
        unsupported_claims.truncate(cap);

        Ok(IntegrityReport {
            integrity_score,
            contradictions,
            redundancies,
            unsupported_claims,
            contradiction_count,
            redundancy_count,
            unsupported_count,
            issues_found,
            assertions_checked: assertions.len(),
        })
    }

    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }
}
