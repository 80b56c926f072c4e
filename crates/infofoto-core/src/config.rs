// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. Passed explicitly into the report generator; the
// engine itself keeps no process-wide state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InfofotoError, Result};

/// A4 page width in centimetres.
pub const PAGE_WIDTH_CM: f64 = 21.0;
/// A4 page height in centimetres.
pub const PAGE_HEIGHT_CM: f64 = 29.7;
/// Canonical uniform page margin.
pub const DEFAULT_MARGIN_CM: f64 = 2.5;

/// Fixed wording printed on the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    /// Cover title.
    pub title: String,
    /// Organizational unit lines on the cover, in order.
    pub unit_lines: Vec<String>,
    /// Suffix appended to the footer code label.
    pub footer_suffix: String,
    /// Label printed before each photo number.
    pub photo_label: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            title: "Informe Fotogràfic".into(),
            unit_lines: vec![
                "Àrea Regional de Trànsit Metropolitana Nord".into(),
                "Unitat d'Investigació d'Accidents de Trànsit".into(),
            ],
            footer_suffix: "ART MNORD".into(),
            photo_label: "Fotografia núm.".into(),
        }
    }
}

/// Settings for one deployment of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Uniform page margin in centimetres, applied to every section.
    pub margin_cm: f64,
    pub labels: ReportLabels,
    /// Logo shown on the cover and in content headers.
    pub logo_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            margin_cm: DEFAULT_MARGIN_CM,
            labels: ReportLabels::default(),
            logo_path: None,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> Result<()> {
        if !self.margin_cm.is_finite() || self.margin_cm < 0.0 {
            return Err(InfofotoError::Config(format!(
                "margin must be a non-negative number, got {}",
                self.margin_cm
            )));
        }
        if self.usable_width_cm() <= 0.0 || self.usable_height_cm() <= 6.0 {
            return Err(InfofotoError::Config(format!(
                "margin of {} cm leaves no usable page area",
                self.margin_cm
            )));
        }
        Ok(())
    }

    /// Width between the left and right margins.
    pub fn usable_width_cm(&self) -> f64 {
        PAGE_WIDTH_CM - 2.0 * self.margin_cm
    }

    /// Height between the top and bottom margins.
    pub fn usable_height_cm(&self) -> f64 {
        PAGE_HEIGHT_CM - 2.0 * self.margin_cm
    }
}
