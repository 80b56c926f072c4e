// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report orchestrator — decodes and fits the uploaded photos, plans the
// pages, composes the DOCX and hands it to a sink.
//
// Unreadable photos are skipped and reported back; everything else that goes
// wrong aborts the whole report without emitting bytes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset, Local};
use infofoto_core::config::EngineConfig;
use infofoto_core::error::{InfofotoError, Result};
use infofoto_core::types::{
    PhotoInput, PhotoItem, ProfileSettings, ReportMetadata, SkippedPhoto, report_filename,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cancel::CancellationFlag;
use crate::docx::{DocxComposer, Logo};
use crate::image::prepare_photo;
use crate::layout::DocumentPlan;

/// Everything the upload collaborator hands over for one report.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    /// Photos in final order.
    pub photos: Vec<PhotoInput>,
    pub metadata: ReportMetadata,
}

/// A finished report.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub total_pages: usize,
    /// Photos that made it into the report.
    pub photo_count: usize,
    pub skipped: Vec<SkippedPhoto>,
}

/// What the caller reports back to the user after delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub filename: String,
    pub total_pages: usize,
    pub photo_count: usize,
    pub skipped: Vec<SkippedPhoto>,
}

impl ReportOutput {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            filename: self.filename.clone(),
            total_pages: self.total_pages,
            photo_count: self.photo_count,
            skipped: self.skipped.clone(),
        }
    }
}

// -- Sinks --------------------------------------------------------------------

/// Receives finished documents.
pub trait ReportSink {
    /// Store `bytes` and return the name they were stored under, which may
    /// differ from `filename` when the sink has to avoid a clash.
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<String>;
}

/// Highest `-N` suffix tried before giving up on a name.
const MAX_NAME_SUFFIX: u32 = 999;

static NEXT_PARTIAL: AtomicU64 = AtomicU64::new(0);

/// Writes reports into a directory. A file appears under its final name only
/// once it is completely written, and never replaces an existing report:
/// clashing names get a `-2`, `-3`, ... suffix before the extension.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Link the finished partial file under the first free name.
    fn publish(&self, partial: &Path, filename: &str) -> Result<String> {
        let (stem, ext) = match filename.rfind('.') {
            Some(dot) if dot > 0 => filename.split_at(dot),
            _ => (filename, ""),
        };
        for n in 1..=MAX_NAME_SUFFIX {
            let candidate = if n == 1 {
                filename.to_owned()
            } else {
                format!("{stem}-{n}{ext}")
            };
            // hard_link fails with AlreadyExists instead of overwriting.
            match std::fs::hard_link(partial, self.dir.join(&candidate)) {
                Ok(()) => return Ok(candidate),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(InfofotoError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("{filename}: no free name in {}", self.dir.display()),
        )))
    }
}

impl ReportSink for DirectorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let partial = self.dir.join(format!(
            ".{filename}.{}-{}.part",
            std::process::id(),
            NEXT_PARTIAL.fetch_add(1, Ordering::Relaxed)
        ));

        let delivered = std::fs::write(&partial, bytes)
            .map_err(InfofotoError::from)
            .and_then(|()| self.publish(&partial, filename));

        // The partial file never outlives the call, delivered or not.
        match std::fs::remove_file(&partial) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                warn!(path = %partial.display(), %err, "Could not remove partial report");
            }
            _ => {}
        }

        let delivered = delivered?;
        info!(path = %self.dir.join(&delivered).display(), "Report written");
        Ok(delivered)
    }
}

/// Keeps delivered reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub delivered: Vec<(String, Vec<u8>)>,
}

impl ReportSink for MemorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<String> {
        self.delivered.push((filename.to_owned(), bytes.to_vec()));
        Ok(filename.to_owned())
    }
}

// -- Photo preparation --------------------------------------------------------

/// Decode and fit every photo under `profile`, keeping upload order.
///
/// Unreadable photos are logged and returned in the skip list instead of
/// failing the batch. The cancellation flag is polled before each photo.
pub fn prepare_all(
    photos: &[PhotoInput],
    profile: &ProfileSettings,
    cancel: &CancellationFlag,
) -> Result<(Vec<PhotoItem>, Vec<SkippedPhoto>)> {
    let mut prepared = Vec::with_capacity(photos.len());
    let mut skipped = Vec::new();
    for (position, input) in photos.iter().enumerate() {
        cancel.check()?;
        match prepare_photo(input, position, profile) {
            Ok(item) => prepared.push(item),
            Err(InfofotoError::UnreadablePhoto { position, reason }) => {
                warn!(position, %reason, "Skipping unreadable photo");
                skipped.push(SkippedPhoto { position, reason });
            }
            Err(other) => return Err(other),
        }
    }
    debug!(prepared = prepared.len(), skipped = skipped.len(), "Photos prepared");
    Ok((prepared, skipped))
}

// -- Generator ----------------------------------------------------------------

/// Stateless between calls; safe to share across threads and run many
/// reports in parallel.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    config: EngineConfig,
    logo: Option<Logo>,
}

impl ReportGenerator {
    /// Build a generator, reading the logo named by the config if any.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let logo = match &config.logo_path {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|err| {
                    InfofotoError::Config(format!("cannot read logo {}: {err}", path.display()))
                })?;
                Some(Logo::from_bytes(&bytes)?)
            }
            None => None,
        };
        Self::with_logo(config, logo)
    }

    /// Build a generator with an already-decoded logo.
    pub fn with_logo(config: EngineConfig, logo: Option<Logo>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, logo })
    }

    /// Generate a report stamped with the current local time.
    pub fn generate(&self, request: ReportRequest, cancel: &CancellationFlag) -> Result<ReportOutput> {
        self.generate_at(request, Local::now().fixed_offset(), cancel)
    }

    /// Generate a report stamped with `issued_at`.
    #[instrument(skip_all, fields(photos = request.photos.len(), profile = request.metadata.quality_profile.wire_name()))]
    pub fn generate_at(
        &self,
        request: ReportRequest,
        issued_at: DateTime<FixedOffset>,
        cancel: &CancellationFlag,
    ) -> Result<ReportOutput> {
        let ReportRequest { photos, metadata } = request;
        if photos.is_empty() {
            return Err(InfofotoError::EmptyInput);
        }

        let (prepared, skipped) =
            prepare_all(&photos, &metadata.quality_profile.settings(), cancel)?;
        drop(photos);

        // Pairing and page count are computed over the survivors only.
        let plan = DocumentPlan::build(&prepared, &metadata, &self.config, issued_at)?;
        let bytes = DocxComposer::new(&self.config, self.logo.as_ref())
            .compose(&plan, &prepared, &metadata, cancel)?;

        let output = ReportOutput {
            bytes,
            filename: report_filename(&metadata.case_code, issued_at.timestamp()),
            total_pages: plan.total_page_count,
            photo_count: plan.photo_count,
            skipped,
        };
        info!(
            filename = %output.filename,
            pages = output.total_pages,
            skipped = output.skipped.len(),
            "Report generated"
        );
        Ok(output)
    }

    /// Generate a report and deliver it to `sink`. Nothing reaches the sink
    /// unless generation succeeded. The summary carries the name the sink
    /// actually stored the report under.
    pub fn generate_into(
        &self,
        request: ReportRequest,
        sink: &mut dyn ReportSink,
        cancel: &CancellationFlag,
    ) -> Result<ReportSummary> {
        let output = self.generate(request, cancel)?;
        let delivered = sink.deliver(&output.filename, &output.bytes)?;
        let mut summary = output.summary();
        summary.filename = delivered;
        Ok(summary)
    }
}
