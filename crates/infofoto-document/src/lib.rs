// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// infofoto-document — Report assembly for Infofoto.
//
// Fits uploaded photos to the quality profile, plans orientation-aware pages,
// renders captions and composes the finished DOCX package.

pub mod cancel;
pub mod caption_match;
pub mod docx;
pub mod image;
pub mod layout;
pub mod report;

// Re-export the primary entry points so callers can use
// `infofoto_document::ReportGenerator` etc.
pub use cancel::CancellationFlag;
pub use caption_match::CaptionMatcher;
pub use docx::{DocxComposer, Logo};
pub use image::{ImageProcessor, prepare_photo};
pub use layout::{DocumentPlan, PagePlanEntry, plan_pages};
pub use report::{
    DirectorySink, MemorySink, ReportGenerator, ReportOutput, ReportRequest, ReportSink,
    ReportSummary, prepare_all,
};
