// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Infofoto.

use thiserror::Error;

/// Top-level error type for all Infofoto operations.
#[derive(Debug, Error)]
pub enum InfofotoError {
    // -- Input errors --
    #[error("no photos to compose: every input was missing or unreadable")]
    EmptyInput,

    #[error("photo #{position} is unreadable: {reason}")]
    UnreadablePhoto { position: usize, reason: String },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Composition --
    #[error("composition failed in {section}: {detail}")]
    Composition { section: String, detail: String },

    #[error("report generation cancelled")]
    Cancelled,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InfofotoError {
    /// Build a `Composition` error tagged with the section that failed.
    pub fn composition(section: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Composition {
            section: section.into(),
            detail: detail.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InfofotoError>;
