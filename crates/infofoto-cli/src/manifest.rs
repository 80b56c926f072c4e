// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report manifest: the on-disk stand-in for the upload form.
//
// Photo paths are resolved against the manifest's own directory. A caption
// given on the photo entry wins over the loose `captions` map. A photo file
// that cannot be read is passed on empty so the engine skips it in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use infofoto_core::error::Result;
use infofoto_core::types::{PhotoInput, ReportMetadata};
use infofoto_document::{CaptionMatcher, ReportRequest};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub metadata: ReportMetadata,
    pub photos: Vec<ManifestPhoto>,
    /// Captions keyed by file name, stem or 1-based position.
    #[serde(default)]
    pub captions: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestPhoto {
    pub path: PathBuf,
    #[serde(default)]
    pub caption: Option<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Read every photo into memory, in manifest order. Unreadable files keep
    /// their slot with no bytes.
    pub fn into_request(self, base_dir: &Path) -> Result<ReportRequest> {
        let matcher = CaptionMatcher::new(self.captions);
        let mut photos = Vec::with_capacity(self.photos.len());

        for (position, entry) in self.photos.into_iter().enumerate() {
            let full = base_dir.join(&entry.path);
            let bytes = std::fs::read(&full).unwrap_or_else(|err| {
                warn!(
                    position,
                    path = %full.display(),
                    %err,
                    "Photo file unreadable; skipping it"
                );
                Vec::new()
            });
            let name = entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let caption = entry
                .caption
                .filter(|c| !c.trim().is_empty())
                .or_else(|| matcher.caption_for(&name, position));
            debug!(position, file = %name, has_caption = caption.is_some(), "Photo loaded");
            photos.push(PhotoInput::new(bytes, caption));
        }

        Ok(ReportRequest {
            photos,
            metadata: self.metadata,
        })
    }
}
