// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Score Primitives
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_score: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_score: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Round half away from zero to `decimals` places.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Caller's claim about how the content was produced.
///
/// Unrecognized labels resolve to `Unsure`, never to an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ProvenanceDeclaration {
    Original,
    Ai,
    Copied,
    Mixed,
    #[default]
    Unsure,
}

impl ProvenanceDeclaration {
    pub const ALL: [ProvenanceDeclaration; 5] = [
        Self::Original,
        Self::Ai,
        Self::Copied,
        Self::Mixed,
        Self::Unsure,
    ];

    /// Resolve a caller label, case-insensitively; anything unknown is `Unsure`.
    pub fn parse_lossy(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "original" => Self::Original,
            "ai" => Self::Ai,
            "copied" => Self::Copied,
            "mixed" => Self::Mixed,
            "unsure" => Self::Unsure,
            other => {
                log::debug!("unrecognized assertion_type {other:?}, treating as unsure");
                Self::Unsure
            }
        }
    }

    pub fn from_optional(label: Option<&str>) -> Self {
        label.map(Self::parse_lossy).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Ai => "ai",
            Self::Copied => "copied",
            Self::Mixed => "mixed",
            Self::Unsure => "unsure",
        }
    }
}

impl From<String> for ProvenanceDeclaration {
    fn from(label: String) -> Self {
        Self::parse_lossy(&label)
    }
}

impl fmt::Display for ProvenanceDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical label derived from the 0–100 trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustBand {
    #[serde(rename = "High Trust")]
    HighTrust,
    #[serde(rename = "Verified")]
    Verified,
    #[serde(rename = "Low Trust")]
    LowTrust,
    #[serde(rename = "Unverified")]
    Unverified,
}

impl TrustBand {
    /// Map a 0–100 score onto the band thresholds 75 / 50 / 25.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::HighTrust
        } else if score >= 50.0 {
            Self::Verified
        } else if score >= 25.0 {
            Self::LowTrust
        } else {
            Self::Unverified
        }
    }

    pub fn level(&self) -> TrustLevel {
        match self {
            Self::HighTrust => TrustLevel::High,
            Self::Verified => TrustLevel::Medium,
            Self::LowTrust => TrustLevel::Low,
            Self::Unverified => TrustLevel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighTrust => "High Trust",
            Self::Verified => "Verified",
            Self::LowTrust => "Low Trust",
            Self::Unverified => "Unverified",
        }
    }
}

impl fmt::Display for TrustBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustLevel {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "VERY LOW")]
    VeryLow,
}

impl TrustLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::VeryLow => "VERY LOW",
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integrity issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Three-step risk scale shared by AI-generation and fabrication risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Bucket a human-likeness score: below `high_below` is HIGH risk,
    /// below `medium_below` is MEDIUM, everything else LOW.
    pub fn from_authenticity(score: f64, high_below: f64, medium_below: f64) -> Self {
        if score < high_below {
            Self::High
        } else if score < medium_below {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
