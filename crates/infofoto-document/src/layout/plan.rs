// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Whole-document plan: page entries, cover text and the page count that the
// closing attestation prints as a literal number.

use chrono::{DateTime, FixedOffset};
use infofoto_core::config::EngineConfig;
use infofoto_core::error::{InfofotoError, Result};
use infofoto_core::types::{PhotoItem, QualityProfile, ReportMetadata};

use super::planner::{BoxHeights, PagePlanEntry, plan_pages};

/// Everything the composer needs besides the photos themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub entries: Vec<PagePlanEntry>,
    /// Cover lines under the title, in print order.
    pub cover_lines: Vec<String>,
    pub closing_required: bool,
    /// Cover + content pages + closing page.
    pub total_page_count: usize,
    pub photo_count: usize,
    pub issued_at: DateTime<FixedOffset>,
}

impl DocumentPlan {
    /// Plan a report over the photos that survived decoding.
    pub fn build(
        photos: &[PhotoItem],
        metadata: &ReportMetadata,
        config: &EngineConfig,
        issued_at: DateTime<FixedOffset>,
    ) -> Result<Self> {
        if photos.is_empty() {
            return Err(InfofotoError::EmptyInput);
        }
        let boxes = BoxHeights::for_usable_height(config.usable_height_cm());
        let entries = plan_pages(photos, boxes);
        let closing_required = metadata.has_destination();
        let total_page_count = 1 + entries.len() + usize::from(closing_required);

        Ok(Self {
            cover_lines: cover_lines(metadata, config, issued_at),
            entries,
            closing_required,
            total_page_count,
            photo_count: photos.len(),
            issued_at,
        })
    }
}

/// Cover lines: case/diligence codes, unit lines, issue date, personnel codes
/// and, for the high profile only, the destination.
fn cover_lines(
    metadata: &ReportMetadata,
    config: &EngineConfig,
    issued_at: DateTime<FixedOffset>,
) -> Vec<String> {
    let mut lines = Vec::new();

    let codes = metadata.code_fragments();
    if !codes.is_empty() {
        lines.push(codes.join(" - "));
    }
    lines.extend(config.labels.unit_lines.iter().cloned());
    lines.push(format!(
        "Data d\u{2019}emissió de l\u{2019}informe: {}",
        issued_at.format("%d/%m/%Y")
    ));

    let personnel = metadata.personnel();
    if !personnel.is_empty() {
        let label = if personnel.len() == 1 {
            "Núm. de TIP:"
        } else {
            "Núms. de TIP:"
        };
        lines.push(format!("{label} {}", personnel.join(" - ")));
    }

    if metadata.quality_profile == QualityProfile::High && metadata.has_destination() {
        lines.push(format!(
            "Tramesa a: {} de {}",
            metadata.court.trim(),
            metadata.locality.trim()
        ));
    }
    lines
}
