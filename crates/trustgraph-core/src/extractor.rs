// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Assertion Extractor
// ─────────────────────────────────────────────────────────────────────
//! Splits content into sentence-level assertions and pulls out surface
//! citations: absolute URLs and parenthetical year references such as
//! `(Smith, 2021)`.

use std::sync::LazyLock;

use regex::Regex;

use trustgraph_types::config::ExtractionConfig;
use trustgraph_types::{Assertion, Citation, Content, ExtractionReport};

use crate::text::{SENTENCE_END_RE, URL_RE};

/// Parenthetical fragment containing a four-digit year.
static YEAR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\d{4}[^)]*\)").expect("year-ref pattern is valid"));

pub struct AssertionExtractor {
    config: ExtractionConfig,
}

impl AssertionExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Sentence fragments whose trimmed length exceeds the minimum,
    /// with their byte offsets into `text`.
    pub fn extract_assertions(&self, text: &str) -> Vec<Assertion> {
        let mut assertions = Vec::new();
        let mut start = 0;
        for sep in SENTENCE_END_RE.find_iter(text) {
            self.push_fragment(&mut assertions, &text[start..sep.start()], start);
            start = sep.end();
        }
        self.push_fragment(&mut assertions, &text[start..], start);
        assertions
    }

    fn push_fragment(&self, out: &mut Vec<Assertion>, fragment: &str, offset: usize) {
        let trimmed = fragment.trim();
        if trimmed.chars().count() > self.config.min_assertion_chars {
            let lead = fragment.len() - fragment.trim_start().len();
            out.push(Assertion::at(trimmed, offset + lead));
        }
    }

    /// URLs first, then parenthetical year references, each in text order.
    pub fn extract_citations(&self, text: &str) -> Vec<Citation> {
        URL_RE
            .find_iter(text)
            .map(|m| Citation::url(m.as_str()))
            .chain(YEAR_REF_RE.find_iter(text).map(|m| Citation::year_ref(m.as_str())))
            .collect()
    }

    pub fn extract(&self, content: &Content) -> ExtractionReport {
        let assertions = self.extract_assertions(content.text());
        let citations = self.extract_citations(content.text());
        log::debug!(
            "extracted {} assertions and {} citations from {} words",
            assertions.len(),
            citations.len(),
            content.word_count()
        );
        ExtractionReport {
            assertions_count: assertions.len(),
            citations_count: citations.len(),
            assertions,
            citations,
            word_count: content.word_count(),
            extraction_confidence: self.config.extraction_confidence,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustgraph_types::CitationKind;

    fn extractor() -> AssertionExtractor {
        AssertionExtractor::new(ExtractionConfig::default())
    }

    #[test]
    fn test_short_fragments_dropped() {
        let a = extractor().extract_assertions("Yes. The sky appears blue at noon! Why? Ok.");
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].text, "The sky appears blue at noon");
    }

    #[test]
    fn test_exactly_ten_chars_is_not_an_assertion() {
        assert!(extractor().extract_assertions("0123456789.").is_empty());
        assert_eq!(extractor().extract_assertions("0123456789a.").len(), 1);
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "First claim is here.   Second claim follows now?";
        let a = extractor().extract_assertions(text);
        assert_eq!(a.len(), 2);
        for assertion in &a {
            let off = assertion.source_offset.unwrap();
            assert_eq!(&text[off..off + assertion.text.len()], assertion.text);
        }
    }

    #[test]
    fn test_runs_of_punctuation_split_once() {
        let a = extractor().extract_assertions("Is this really the case?!... It certainly seems so");
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_citations_urls_then_year_refs() {
        let text = "According to the WHO (2023), see (Smith et al., 2019) and https://who.int/report.";
        let c = extractor().extract_citations(text);
        assert_eq!(c.len(), 3);
        assert_eq!(c[0].kind, CitationKind::Url);
        assert_eq!(c[0].text, "https://who.int/report.");
        assert_eq!(c[1], Citation::year_ref("(2023)"));
        assert_eq!(c[2], Citation::year_ref("(Smith et al., 2019)"));
    }

    #[test]
    fn test_parenthetical_without_year_is_not_a_citation() {
        assert!(extractor().extract_citations("This (see above) matters").is_empty());
    }

    #[test]
    fn test_extract_report_counts() {
        let content = Content::new(
            "Vaccines prevented millions of deaths (WHO, 2023). Coverage reached 95 percent in 2020.",
        );
        let report = extractor().extract(&content);
        assert_eq!(report.assertions_count, 2);
        assert_eq!(report.citations_count, 1);
        assert_eq!(report.word_count, content.word_count());
        assert_eq!(report.extraction_confidence, 0.85);
    }
}
