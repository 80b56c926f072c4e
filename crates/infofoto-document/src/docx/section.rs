// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Section properties (`w:sectPr`). Word does not carry geometry from one
// section to the next, so every section restates page size and margins.

use infofoto_core::config::{PAGE_HEIGHT_CM, PAGE_WIDTH_CM};

use super::units::cm_to_twips;

/// Distance of header and footer from the page edge, in twips (1.25 cm).
const HEADER_FOOTER_DISTANCE: u32 = 709;

/// Page size and uniform margin in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl PageGeometry {
    /// A4 portrait with the given uniform margin.
    pub fn a4(margin_cm: f64) -> Self {
        Self {
            width: cm_to_twips(PAGE_WIDTH_CM),
            height: cm_to_twips(PAGE_HEIGHT_CM),
            margin: cm_to_twips(margin_cm),
        }
    }

    /// Width between the margins; also the right tab stop of footers.
    pub fn text_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Center,
}

/// Everything `w:sectPr` needs for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperties {
    pub geometry: PageGeometry,
    /// Relationship id of the default header part.
    pub header_rel: String,
    /// Relationship id of the default footer part.
    pub footer_rel: String,
    pub vertical_align: Option<VerticalAlign>,
}

impl SectionProperties {
    pub fn write_xml(&self, out: &mut String) {
        let g = &self.geometry;
        out.push_str("<w:sectPr>");
        out.push_str(&format!(
            r#"<w:headerReference w:type="default" r:id="{}"/>"#,
            self.header_rel
        ));
        out.push_str(&format!(
            r#"<w:footerReference w:type="default" r:id="{}"/>"#,
            self.footer_rel
        ));
        out.push_str(r#"<w:type w:val="nextPage"/>"#);
        out.push_str(&format!(
            r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
            g.width, g.height
        ));
        out.push_str(&format!(
            r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="{d}" w:footer="{d}" w:gutter="0"/>"#,
            m = g.margin,
            d = HEADER_FOOTER_DISTANCE,
        ));
        out.push_str(r#"<w:cols w:space="708"/>"#);
        match self.vertical_align {
            Some(VerticalAlign::Top) => out.push_str(r#"<w:vAlign w:val="top"/>"#),
            Some(VerticalAlign::Center) => out.push_str(r#"<w:vAlign w:val="center"/>"#),
            None => {}
        }
        out.push_str("</w:sectPr>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_restates_geometry() {
        let props = SectionProperties {
            geometry: PageGeometry::a4(2.5),
            header_rel: "rId3".into(),
            footer_rel: "rId5".into(),
            vertical_align: Some(VerticalAlign::Top),
        };
        let mut out = String::new();
        props.write_xml(&mut out);
        assert!(out.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(out.contains(r#"w:top="1417" w:right="1417" w:bottom="1417" w:left="1417""#));
        assert!(out.contains(r#"<w:vAlign w:val="top"/>"#));
        // Schema order: references, type, size, margins, columns, alignment.
        let header = out.find("headerReference").unwrap();
        let size = out.find("pgSz").unwrap();
        let valign = out.find("vAlign").unwrap();
        assert!(header < size && size < valign);
    }

    #[test]
    fn text_width_subtracts_both_margins() {
        assert_eq!(PageGeometry::a4(2.5).text_width(), 11906 - 2 * 1417);
    }
}
