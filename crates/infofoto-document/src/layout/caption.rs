// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caption renderer. Font size steps down for long captions so a photo and its
// caption stay on one page. The thresholds approximate the available space;
// no text measurement is done.

use crate::docx::model::{Alignment, Paragraph, Run, RunStyle};

/// Base caption size, also used for index-only labels.
pub const BASE_CAPTION_PT: u32 = 9;
const LONG_CAPTION_CHARS: usize = 600;
const VERY_LONG_CAPTION_CHARS: usize = 900;

/// Font size in points for a caption of this text.
///
/// Length is counted in characters, not bytes.
pub fn select_font_size(caption: &str) -> u32 {
    let len = caption.chars().count();
    if len > VERY_LONG_CAPTION_CHARS {
        7
    } else if len > LONG_CAPTION_CHARS {
        8
    } else {
        BASE_CAPTION_PT
    }
}

/// How a caption paragraph ends up being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionStyle {
    /// Centered bold label only.
    IndexOnly,
    /// Justified label plus caption text at the given size.
    WithText { size_pt: u32 },
}

impl CaptionStyle {
    pub fn for_caption(caption: Option<&str>) -> Self {
        match caption.map(str::trim).filter(|c| !c.is_empty()) {
            None => Self::IndexOnly,
            Some(text) => Self::WithText {
                size_pt: select_font_size(text),
            },
        }
    }
}

/// Build the caption paragraph shown under photo `display_index`.
pub fn caption_paragraph(label: &str, display_index: u32, caption: Option<&str>) -> Paragraph {
    let caption = caption.map(str::trim).filter(|c| !c.is_empty());
    match (CaptionStyle::for_caption(caption), caption) {
        (CaptionStyle::WithText { size_pt }, Some(text)) => {
            let size = size_pt as f32;
            let mut p = Paragraph::aligned(Alignment::Justify);
            p.keep_lines = true;
            p.tight = true;
            p.push(Run::text(
                format!("{label} {display_index}: "),
                RunStyle::sized(size).bold(),
            ));
            p.push(Run::text(text, RunStyle::sized(size)));
            p
        }
        _ => {
            let mut p = Paragraph::aligned(Alignment::Center);
            p.keep_lines = true;
            p.tight = true;
            p.push(Run::text(
                format!("{label} {display_index}"),
                RunStyle::sized(BASE_CAPTION_PT as f32).bold(),
            ));
            p
        }
    }
}
