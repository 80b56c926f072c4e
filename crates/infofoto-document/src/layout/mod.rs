// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — caption sizing, orientation-driven pagination and the
// whole-document plan.

pub mod caption;
pub mod plan;
pub mod planner;

pub use caption::{CaptionStyle, caption_paragraph, select_font_size};
pub use plan::DocumentPlan;
pub use planner::{BoxHeights, Oriented, PagePlanEntry, PhotoSlot, plan_pages};
