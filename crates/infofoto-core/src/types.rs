// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Infofoto report engine.

use serde::{Deserialize, Serialize};

/// Output resolution/compression policy applied to every photo of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityProfile {
    /// Full-HD box, upscaling allowed, medium compression.
    #[default]
    #[serde(rename = "atenea")]
    Standard,
    /// Large square box, never upscaled, high JPEG quality.
    #[serde(rename = "vector")]
    High,
}

/// Concrete numbers behind a [`QualityProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSettings {
    pub max_width: u32,
    pub max_height: u32,
    pub allow_upscale: bool,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

pub const STANDARD_PROFILE: ProfileSettings = ProfileSettings {
    max_width: 1920,
    max_height: 1080,
    allow_upscale: true,
    jpeg_quality: 85,
};

pub const HIGH_PROFILE: ProfileSettings = ProfileSettings {
    max_width: 2560,
    max_height: 2560,
    allow_upscale: false,
    jpeg_quality: 95,
};

impl QualityProfile {
    pub fn settings(&self) -> ProfileSettings {
        match self {
            Self::Standard => STANDARD_PROFILE,
            Self::High => HIGH_PROFILE,
        }
    }

    /// Wire name used by the upload form and manifests.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Standard => "atenea",
            Self::High => "vector",
        }
    }

    /// Parse a wire name. Unknown values fall back to the standard profile,
    /// matching how the upload form treats an unset selector.
    pub fn from_wire_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "vector" | "high" => Self::High,
            _ => Self::Standard,
        }
    }

    /// Whether the diligence code leads the case code in code lines.
    pub fn diligence_first(&self) -> bool {
        matches!(self, Self::High)
    }
}

/// Case identifiers and routing info for one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    /// Case code ("NAT").
    pub case_code: String,
    /// Diligence code ("Dil.").
    pub diligence_code: String,
    /// Up to two personnel codes ("TIP").
    pub personnel_codes: Vec<String>,
    /// Destination court.
    pub court: String,
    /// Destination locality.
    pub locality: String,
    pub quality_profile: QualityProfile,
}

impl ReportMetadata {
    /// Personnel codes that are actually filled in, at most two.
    pub fn personnel(&self) -> Vec<&str> {
        self.personnel_codes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .take(2)
            .collect()
    }

    /// The closing attestation is only written when both routing fields are set.
    pub fn has_destination(&self) -> bool {
        !self.court.trim().is_empty() && !self.locality.trim().is_empty()
    }

    /// Case and diligence fragments in profile order, e.g.
    /// `["NAT 123/24", "Dil. 456"]`. Empty codes are left out.
    pub fn code_fragments(&self) -> Vec<String> {
        let case = self.case_code.trim();
        let dil = self.diligence_code.trim();
        let nat = (!case.is_empty()).then(|| format!("NAT {case}"));
        let dil = (!dil.is_empty()).then(|| format!("Dil. {dil}"));

        let ordered = if self.quality_profile.diligence_first() {
            [dil, nat]
        } else {
            [nat, dil]
        };
        ordered.into_iter().flatten().collect()
    }
}

/// One photograph as handed over by the upload collaborator.
#[derive(Debug, Clone, Default)]
pub struct PhotoInput {
    /// Encoded image bytes (JPEG, PNG, ...).
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

impl PhotoInput {
    pub fn new(bytes: Vec<u8>, caption: Option<String>) -> Self {
        Self { bytes, caption }
    }
}

/// Photo orientation as used by the pairing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// `height > width`.
    Vertical,
    /// `height <= width`; squares land here.
    Horizontal,
}

impl Orientation {
    pub fn classify(width: u32, height: u32) -> Self {
        if height > width {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// A decoded, fitted photo ready for composition. Immutable once built.
#[derive(Debug, Clone)]
pub struct PhotoItem {
    /// Re-encoded JPEG bytes at the profile's resolution.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub caption: Option<String>,
    /// 0-based position in the upload order.
    pub source_position: usize,
}

impl PhotoItem {
    pub fn orientation(&self) -> Orientation {
        Orientation::classify(self.width, self.height)
    }

    /// Caption with surrounding whitespace removed; `None` when blank.
    pub fn caption_text(&self) -> Option<&str> {
        self.caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A photo that was dropped from the report, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPhoto {
    /// 0-based position in the upload order.
    pub position: usize,
    pub reason: String,
}

/// Build the download filename for a report, e.g.
/// `Informe_123_24_1760000000.docx`.
pub fn report_filename(case_code: &str, timestamp: i64) -> String {
    let trimmed = case_code.trim();
    let safe: String = if trimmed.is_empty() {
        "SENSE_NAT".to_owned()
    } else {
        trimmed
            .chars()
            .map(|c| match c {
                '/' | '\\' => '_',
                c if c.is_whitespace() => '_',
                c => c,
            })
            .collect()
    };
    format!("Informe_{safe}_{timestamp}.docx")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(profile: QualityProfile) -> ReportMetadata {
        ReportMetadata {
            case_code: "123/24".into(),
            diligence_code: "456".into(),
            quality_profile: profile,
            ..Default::default()
        }
    }

    #[test]
    fn square_counts_as_horizontal() {
        assert_eq!(Orientation::classify(100, 100), Orientation::Horizontal);
        assert_eq!(Orientation::classify(100, 101), Orientation::Vertical);
        assert_eq!(Orientation::classify(1600, 1200), Orientation::Horizontal);
    }

    #[test]
    fn code_fragments_follow_profile_order() {
        assert_eq!(
            metadata(QualityProfile::Standard).code_fragments(),
            vec!["NAT 123/24", "Dil. 456"]
        );
        assert_eq!(
            metadata(QualityProfile::High).code_fragments(),
            vec!["Dil. 456", "NAT 123/24"]
        );
    }

    #[test]
    fn code_fragments_skip_empty_codes() {
        let meta = ReportMetadata {
            diligence_code: "  ".into(),
            case_code: "9".into(),
            ..Default::default()
        };
        assert_eq!(meta.code_fragments(), vec!["NAT 9"]);
    }

    #[test]
    fn destination_requires_both_fields() {
        let mut meta = ReportMetadata {
            court: "Jutjat de Guàrdia".into(),
            ..Default::default()
        };
        assert!(!meta.has_destination());
        meta.locality = "Granollers".into();
        assert!(meta.has_destination());
    }

    #[test]
    fn personnel_is_capped_at_two() {
        let meta = ReportMetadata {
            personnel_codes: vec!["1".into(), "".into(), "2".into(), "3".into()],
            ..Default::default()
        };
        assert_eq!(meta.personnel(), vec!["1", "2"]);
    }

    #[test]
    fn profile_wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&QualityProfile::High).unwrap();
        assert_eq!(json, "\"vector\"");
        let parsed: QualityProfile = serde_json::from_str("\"atenea\"").unwrap();
        assert_eq!(parsed, QualityProfile::Standard);
        assert_eq!(QualityProfile::from_wire_name("VECTOR"), QualityProfile::High);
        assert_eq!(QualityProfile::from_wire_name("other"), QualityProfile::Standard);
    }

    #[test]
    fn filename_replaces_separators() {
        assert_eq!(report_filename("123/24", 42), "Informe_123_24_42.docx");
        assert_eq!(report_filename("", 42), "Informe_SENSE_NAT_42.docx");
        assert_eq!(report_filename("a b\\c", 7), "Informe_a_b_c_7.docx");
    }

    #[test]
    fn blank_caption_is_none() {
        let item = PhotoItem {
            jpeg: Vec::new(),
            width: 1,
            height: 1,
            caption: Some("   ".into()),
            source_position: 0,
        };
        assert_eq!(item.caption_text(), None);
    }
}
