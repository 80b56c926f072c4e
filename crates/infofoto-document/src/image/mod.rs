// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, box fitting and re-encoding of report photos.

pub mod fitter;

pub use fitter::{ImageProcessor, display_size_cm, fit_dimensions, prepare_photo};
