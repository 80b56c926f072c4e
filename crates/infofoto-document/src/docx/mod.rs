// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX module — a small WordprocessingML writer built directly on the XML
// parts of the OOXML container, plus the report composer that drives it.

pub mod composer;
pub mod media;
pub mod model;
pub mod package;
pub mod parts;
pub mod section;
pub mod units;

pub use composer::{DocxComposer, Logo};
pub use model::FieldCode;
