// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Certificate Issuer
// ─────────────────────────────────────────────────────────────────────
//! Turns an aggregate verdict into an immutable, uniquely identified
//! audit record plus a plain-text summary.
//!
//! Ids are `<prefix>-<UTC yyyymmddHHMMSS>-<sequence>`. The sequence is a
//! process-wide atomic counter, so ids never collide within a process
//! even when many evaluations are issued in the same second.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use trustgraph_types::config::CertificateConfig;
use trustgraph_types::report::{
    AGGREGATOR_MODULE, CONFIDENCE_MODULE, EXTRACTOR_MODULE, FABRICATION_MODULE,
    INTEGRITY_MODULE,
};
use trustgraph_types::{
    AggregateResult, CertificateInfo, Content, ContentInfo, IssuedCertificate, ModuleDetails,
    TrustCertificate, TrustError, TrustEvaluation, TrustResult, Validity,
};

const CERTIFICATE_KIND: &str = "Trust Evaluation Certificate";
const SIGNATURE_PREFIX: &str = "TG_SIG_";

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// SHA-256 of the UTF-8 text, lowercase hex.
pub fn content_fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

fn signature(id: &str, fingerprint: &str, trust_score: f64, issued_at: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(b"|");
    hasher.update(fingerprint.as_bytes());
    hasher.update(b"|");
    hasher.update(format!("{trust_score:.3}").as_bytes());
    hasher.update(b"|");
    hasher.update(issued_at.as_bytes());
    format!("{SIGNATURE_PREFIX}{}", hex::encode(hasher.finalize()))
}

pub struct CertificateIssuer {
    config: CertificateConfig,
}

impl CertificateIssuer {
    pub fn new(config: CertificateConfig) -> Self {
        Self { config }
    }

    pub fn issue(
        &self,
        content: &Content,
        aggregate: &AggregateResult,
    ) -> TrustResult<IssuedCertificate> {
        self.issue_at(content, aggregate, Utc::now())
    }

    /// Issue with an explicit timestamp.
    pub fn issue_at(
        &self,
        content: &Content,
        aggregate: &AggregateResult,
        at: DateTime<Utc>,
    ) -> TrustResult<IssuedCertificate> {
        Self::check_bounds(aggregate)?;

        let id = self.next_id(at);
        let issued_at = at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let fingerprint = content_fingerprint(content.text());
        let signature = signature(&id, &fingerprint, aggregate.trust_score, &issued_at);

        let certificate = TrustCertificate {
            certificate_info: CertificateInfo {
                id,
                issued_at: issued_at.clone(),
                issuer: self.config.issuer.clone(),
                version: self.config.version.clone(),
                kind: CERTIFICATE_KIND.to_string(),
            },
            content_info: ContentInfo {
                content_length: content.length(),
                word_count: content.word_count(),
                content_fingerprint: fingerprint,
                evaluation_timestamp: issued_at.clone(),
            },
            trust_evaluation: TrustEvaluation {
                overall_trust_score: aggregate.trust_score,
                trust_level: aggregate.trust_level,
                trust_band: aggregate.trust_band,
                component_scores: aggregate.component_scores,
                insights: aggregate.insights.clone(),
            },
            module_details: ModuleDetails {
                modules_used: Self::modules_used(aggregate),
                methodology_tag: self.config.methodology_tag.clone(),
                evaluation_methodology: self.config.methodology.clone(),
            },
            validity: Validity {
                valid_from: issued_at,
                expires_at: None,
                signature,
            },
        };
        log::debug!(
            "issued certificate {} (score {})",
            certificate.certificate_id(),
            aggregate.trust_score
        );

        let readable_summary = self.render_summary(&certificate);
        Ok(IssuedCertificate {
            certificate,
            readable_summary,
        })
    }

    fn next_id(&self, at: DateTime<Utc>) -> String {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}-{}-{seq:06}",
            self.config.id_prefix,
            at.format("%Y%m%d%H%M%S")
        )
    }

    fn check_bounds(aggregate: &AggregateResult) -> TrustResult<()> {
        let out_of_unit = |v: f64| !v.is_finite() || !(0.0..=1.0).contains(&v);
        if !aggregate.score.is_finite() || !(0.0..=100.0).contains(&aggregate.score) {
            return Err(TrustError::Certificate(format!(
                "score must be in [0, 100], got {}",
                aggregate.score
            )));
        }
        if out_of_unit(aggregate.trust_score) {
            return Err(TrustError::Certificate(format!(
                "trust_score must be in [0, 1], got {}",
                aggregate.trust_score
            )));
        }
        if let Some((name, value)) = aggregate
            .component_scores
            .entries()
            .into_iter()
            .find(|(_, v)| out_of_unit(*v))
        {
            return Err(TrustError::Certificate(format!(
                "{name} component must be in [0, 1], got {value}"
            )));
        }
        Ok(())
    }

    /// Module names that contributed a real report; defaulted ones are left out.
    fn modules_used(aggregate: &AggregateResult) -> Vec<String> {
        [
            ("extraction", EXTRACTOR_MODULE),
            ("integrity", INTEGRITY_MODULE),
            ("confidence", CONFIDENCE_MODULE),
            ("fabrication", FABRICATION_MODULE),
        ]
        .into_iter()
        .filter(|(key, _)| !aggregate.defaults_applied.iter().any(|d| d == key))
        .map(|(_, name)| name.to_string())
        .chain(std::iter::once(AGGREGATOR_MODULE.to_string()))
        .collect()
    }

    /// True when the signature matches the certificate's own fields.
    pub fn verify(&self, certificate: &TrustCertificate) -> bool {
        let expected = signature(
            certificate.certificate_id(),
            certificate.content_fingerprint(),
            certificate.trust_evaluation.overall_trust_score,
            certificate.issued_at(),
        );
        expected == certificate.signature()
    }

    pub fn matches_content(&self, certificate: &TrustCertificate, text: &str) -> bool {
        certificate.content_fingerprint() == content_fingerprint(text)
    }

    pub fn render_summary(&self, certificate: &TrustCertificate) -> String {
        let info = &certificate.certificate_info;
        let eval = &certificate.trust_evaluation;
        let title = format!("{} Certificate", self.config.issuer);

        let mut lines = vec![
            title.clone(),
            "=".repeat(title.chars().count()),
            format!("Certificate ID: {}", info.id),
            format!(
                "Trust Score: {}/1.0 ({}, {})",
                eval.overall_trust_score, eval.trust_level, eval.trust_band
            ),
            format!("Issued: {}", info.issued_at),
            String::new(),
            "Key Findings:".to_string(),
        ];
        lines.extend(
            eval.insights
                .iter()
                .take(self.config.summary_insights)
                .map(|i| format!("• {i}")),
        );
        lines.push(String::new());
        lines.push("Component Scores:".to_string());
        lines.extend(
            eval.component_scores
                .entries()
                .iter()
                .map(|(name, score)| format!("• {name}: {score}/1.0")),
        );
        lines.join("\n")
    }

    pub fn config(&self) -> &CertificateConfig {
        &self.config
    }
}
