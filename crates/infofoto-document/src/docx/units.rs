// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Physical unit conversions used by WordprocessingML.

/// Twentieths of a point per centimetre (1440 per inch).
const TWIPS_PER_CM: f64 = 1440.0 / 2.54;

/// English Metric Units per centimetre (914400 per inch).
const EMU_PER_CM: f64 = 360_000.0;

/// Centimetres to twips, rounded to the nearest whole twip.
pub fn cm_to_twips(cm: f64) -> u32 {
    (cm * TWIPS_PER_CM).round().max(0.0) as u32
}

/// Centimetres to EMU, used by DrawingML extents.
pub fn cm_to_emu(cm: f64) -> u64 {
    (cm * EMU_PER_CM).round().max(0.0) as u64
}
