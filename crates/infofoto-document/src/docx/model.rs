// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WordprocessingML object model — runs, fields, paragraphs and keep-together
// tables, each serialising itself to `w:` markup.

use super::section::SectionProperties;
use super::units::cm_to_emu;

/// Font used for every run the composer emits.
pub const REPORT_FONT: &str = "Arial";

/// Escape text for element content and double-quoted attribute values.
/// Apostrophes are left alone. Characters XML 1.0 cannot carry (C0 controls
/// other than tab, LF and CR, and U+FFFE/U+FFFF) become spaces.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(' '),
        }
    }
    out
}

/// `Char` production of XML 1.0.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Manual line breaks inside free text: LF, CR, CRLF and the vertical tab
/// Word uses for Shift+Enter.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r', '\u{B}']))
}

// -- Fields -------------------------------------------------------------------

/// Live field codes recalculated by the viewing application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCode {
    Page,
    NumPages,
}

impl FieldCode {
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Page => "PAGE",
            Self::NumPages => "NUMPAGES",
        }
    }
}

// -- Runs ---------------------------------------------------------------------

/// An inline picture referencing an image relationship of the owning part.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Relationship id inside the owning part, e.g. `rId7`.
    pub rel_id: String,
    /// `wp:docPr` id, unique within the part.
    pub drawing_id: u32,
    pub name: String,
    pub width_cm: f64,
    pub height_cm: f64,
}

/// What a run carries.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    StaticText(String),
    LiveField(FieldCode),
    Tab,
    Image(InlineImage),
}

/// Character formatting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub size_pt: Option<f32>,
}

impl RunStyle {
    pub fn sized(size_pt: f32) -> Self {
        Self {
            bold: false,
            size_pt: Some(size_pt),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:rPr>");
        out.push_str(&format!(
            r#"<w:rFonts w:ascii="{REPORT_FONT}" w:hAnsi="{REPORT_FONT}" w:cs="{REPORT_FONT}"/>"#
        ));
        if self.bold {
            out.push_str("<w:b/><w:bCs/>");
        }
        if let Some(size) = self.size_pt {
            // Sizes are stored in half-points.
            let half_points = (size * 2.0).round() as u32;
            out.push_str(&format!(
                r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#
            ));
        }
        out.push_str("</w:rPr>");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub content: RunContent,
    pub style: RunStyle,
}

impl Run {
    pub fn text(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            content: RunContent::StaticText(text.into()),
            style,
        }
    }

    pub fn field(code: FieldCode, style: RunStyle) -> Self {
        Self {
            content: RunContent::LiveField(code),
            style,
        }
    }

    pub fn tab() -> Self {
        Self {
            content: RunContent::Tab,
            style: RunStyle::default(),
        }
    }

    pub fn image(image: InlineImage) -> Self {
        Self {
            content: RunContent::Image(image),
            style: RunStyle::default(),
        }
    }

    fn write_xml(&self, out: &mut String) {
        match &self.content {
            RunContent::StaticText(text) => {
                self.open(out);
                for (n, line) in split_lines(text).enumerate() {
                    if n > 0 {
                        out.push_str("<w:br/>");
                    }
                    out.push_str(&format!(
                        r#"<w:t xml:space="preserve">{}</w:t>"#,
                        escape_xml(line)
                    ));
                }
                out.push_str("</w:r>");
            }
            RunContent::Tab => {
                self.open(out);
                out.push_str("<w:tab/></w:r>");
            }
            RunContent::LiveField(code) => {
                // begin / instruction / separate / cached result / end
                self.open(out);
                out.push_str(r#"<w:fldChar w:fldCharType="begin"/></w:r>"#);
                self.open(out);
                out.push_str(&format!(
                    r#"<w:instrText xml:space="preserve"> {} </w:instrText></w:r>"#,
                    code.instruction()
                ));
                self.open(out);
                out.push_str(r#"<w:fldChar w:fldCharType="separate"/></w:r>"#);
                self.open(out);
                out.push_str("<w:t>1</w:t></w:r>");
                self.open(out);
                out.push_str(r#"<w:fldChar w:fldCharType="end"/></w:r>"#);
            }
            RunContent::Image(image) => {
                out.push_str("<w:r>");
                write_inline_drawing(image, out);
                out.push_str("</w:r>");
            }
        }
    }

    fn open(&self, out: &mut String) {
        out.push_str("<w:r>");
        self.style.write_xml(out);
    }
}

fn write_inline_drawing(image: &InlineImage, out: &mut String) {
    let cx = cm_to_emu(image.width_cm);
    let cy = cm_to_emu(image.height_cm);
    let id = image.drawing_id;
    let name = escape_xml(&image.name);
    let rel = &image.rel_id;
    out.push_str(&format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="{name}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
            r#"</a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        ),
        cx = cx,
        cy = cy,
        id = id,
        name = name,
        rel = rel,
    ));
}

// -- Paragraphs ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,
    pub keep_next: bool,
    pub keep_lines: bool,
    /// Remove the default spacing before/after.
    pub tight: bool,
    /// Right-aligned tab stop position in twips.
    pub right_tab: Option<u32>,
    /// Font size of the paragraph mark itself, for near-invisible spacers.
    pub mark_size_pt: Option<f32>,
    pub runs: Vec<Run>,
    /// Set on the last paragraph of every section except the final one.
    pub section: Option<SectionProperties>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            alignment: Some(alignment),
            ..Self::default()
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn push(&mut self, run: Run) {
        self.runs.push(run);
    }

    pub fn write_xml(&self, out: &mut String) {
        out.push_str("<w:p>");
        let has_props = self.alignment.is_some()
            || self.keep_next
            || self.keep_lines
            || self.tight
            || self.right_tab.is_some()
            || self.mark_size_pt.is_some()
            || self.section.is_some();
        if has_props {
            out.push_str("<w:pPr>");
            if self.keep_next {
                out.push_str("<w:keepNext/>");
            }
            if self.keep_lines {
                out.push_str("<w:keepLines/>");
            }
            if let Some(pos) = self.right_tab {
                out.push_str(&format!(
                    r#"<w:tabs><w:tab w:val="right" w:pos="{pos}"/></w:tabs>"#
                ));
            }
            if self.tight {
                out.push_str(r#"<w:spacing w:before="0" w:after="0"/>"#);
            }
            if let Some(alignment) = self.alignment {
                out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.keyword()));
            }
            if let Some(size) = self.mark_size_pt {
                let half_points = (size * 2.0).round() as u32;
                out.push_str(&format!(
                    r#"<w:rPr><w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/></w:rPr>"#
                ));
            }
            if let Some(section) = &self.section {
                section.write_xml(out);
            }
            out.push_str("</w:pPr>");
        }
        for run in &self.runs {
            run.write_xml(out);
        }
        out.push_str("</w:p>");
    }
}

// -- Keep-together block ------------------------------------------------------

/// Single-cell table whose only row may not break across pages. Used to hold
/// a photo and its caption as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepTogether {
    pub width_twips: u32,
    pub paragraphs: Vec<Paragraph>,
}

impl KeepTogether {
    pub fn write_xml(&self, out: &mut String) {
        let w = self.width_twips;
        out.push_str("<w:tbl><w:tblPr>");
        out.push_str(&format!(r#"<w:tblW w:w="{w}" w:type="dxa"/>"#));
        out.push_str(r#"<w:jc w:val="center"/>"#);
        out.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
        out.push_str(
            r#"<w:tblCellMar><w:left w:w="0" w:type="dxa"/><w:right w:w="0" w:type="dxa"/></w:tblCellMar>"#,
        );
        out.push_str(r#"<w:tblLook w:val="0000"/></w:tblPr>"#);
        out.push_str(&format!(r#"<w:tblGrid><w:gridCol w:w="{w}"/></w:tblGrid>"#));
        out.push_str("<w:tr><w:trPr><w:cantSplit/></w:trPr><w:tc>");
        out.push_str(&format!(r#"<w:tcPr><w:tcW w:w="{w}" w:type="dxa"/></w:tcPr>"#));
        if self.paragraphs.is_empty() {
            // A cell must end with a paragraph.
            Paragraph::new().write_xml(out);
        }
        for paragraph in &self.paragraphs {
            paragraph.write_xml(out);
        }
        out.push_str("</w:tc></w:tr></w:tbl>");
    }
}

/// A top-level body element.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    KeepTogether(KeepTogether),
}

impl Block {
    pub fn write_xml(&self, out: &mut String) {
        match self {
            Self::Paragraph(p) => p.write_xml(out),
            Self::KeepTogether(t) => t.write_xml(out),
        }
    }
}
