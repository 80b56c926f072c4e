// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people filing the report.
//
// Every technical error is mapped to a plain message with a clear suggestion.
// Callers append the skipped-photo count when some uploads were dropped.

use crate::error::InfofotoError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying again may work (I/O hiccup, cancelled run).
    Transient,
    /// The user must change the input (add photos, fix a file).
    ActionRequired,
    /// Needs a fix on the deployment side.
    Permanent,
}

/// A human-readable error with message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying unchanged input makes sense.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `InfofotoError` into a `HumanError`.
pub fn humanize_error(err: &InfofotoError) -> HumanError {
    match err {
        InfofotoError::EmptyInput => HumanError {
            message: "The report has no usable photos.".into(),
            suggestion: "Upload at least one photo in JPEG or PNG format, then generate the report again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InfofotoError::UnreadablePhoto { position, .. } => HumanError {
            message: format!("Photo {} could not be read.", position + 1),
            suggestion: "The file may be damaged. Replace it or remove it from the list.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InfofotoError::ImageError(_) => HumanError {
            message: "There's a problem with one of the images.".into(),
            suggestion: "Try saving the photo as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InfofotoError::Composition { section, .. } => HumanError {
            message: "The report could not be generated.".into(),
            suggestion: format!("Something went wrong while building the {section}. Try again; if it keeps failing, contact support."),
            retriable: true,
            severity: Severity::Permanent,
        },

        InfofotoError::Cancelled => HumanError {
            message: "Report generation was cancelled.".into(),
            suggestion: "Start the generation again when you are ready.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InfofotoError::Config(detail) => HumanError {
            message: "The report engine is misconfigured.".into(),
            suggestion: format!("Ask an administrator to check the configuration. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        InfofotoError::Io(_) => HumanError {
            message: "A file could not be read or saved.".into(),
            suggestion: "Check there is free disk space and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InfofotoError::Serialization(_) => HumanError {
            message: "The report details could not be read.".into(),
            suggestion: "Check the report form was filled in correctly and submit it again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Note appended to a success or failure message when photos were dropped.
pub fn skipped_photos_note(skipped: usize) -> Option<String> {
    match skipped {
        0 => None,
        1 => Some("1 photo could not be read and was left out.".into()),
        n => Some(format!("{n} photos could not be read and were left out.")),
    }
}
