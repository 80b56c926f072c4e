// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed and templated package parts: styles, settings, document properties,
// headers and footers.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use super::model::{Alignment, FieldCode, Paragraph, Run, RunStyle, escape_xml};
use super::package::XML_DECLARATION;

/// Namespace declarations shared by the document, header and footer roots.
pub const WML_NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
);

const FOOTER_LABEL_PT: f32 = 10.0;

pub fn styles_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial" w:eastAsia="Arial"/>"#,
            r#"<w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="ca-ES"/>"#,
            r#"</w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr><w:spacing w:after="120" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
            r#"</w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
            r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/>"#,
            r#"<w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar>"#,
            r#"<w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/>"#,
            r#"<w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/>"#,
            r#"</w:tblCellMar></w:tblPr></w:style>"#,
            r#"</w:styles>"#,
        ),
        decl = XML_DECLARATION
    )
}

pub fn settings_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:defaultTabStop w:val="708"/>"#,
            r#"<w:characterSpacingControl w:val="doNotCompress"/>"#,
            r#"<w:compat><w:compatSetting w:name="compatibilityMode" "#,
            r#"w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#,
            r#"</w:settings>"#,
        ),
        decl = XML_DECLARATION
    )
}

/// `docProps/core.xml`.
pub fn core_properties_xml(title: &str, subject: &str, issued_at: DateTime<FixedOffset>) -> String {
    let stamp = issued_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties "#,
            r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:title>{title}</dc:title><dc:subject>{subject}</dc:subject>"#,
            r#"<dc:creator>Infofoto</dc:creator>"#,
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
            r#"</cp:coreProperties>"#,
        ),
        decl = XML_DECLARATION,
        title = escape_xml(title),
        subject = escape_xml(subject),
        stamp = stamp,
    )
}

/// `docProps/app.xml`; the page count is the planned one.
pub fn app_properties_xml(pages: usize) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            r#"<Application>Infofoto</Application><Pages>{pages}</Pages>"#,
            r#"</Properties>"#,
        ),
        decl = XML_DECLARATION,
        pages = pages,
    )
}

/// Wrap paragraphs in a `w:hdr` root.
pub fn header_xml(paragraphs: &[Paragraph]) -> String {
    part_xml("w:hdr", paragraphs)
}

/// Wrap paragraphs in a `w:ftr` root.
pub fn footer_xml(paragraphs: &[Paragraph]) -> String {
    part_xml("w:ftr", paragraphs)
}

fn part_xml(root: &str, paragraphs: &[Paragraph]) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str(&format!("<{root} {WML_NAMESPACES}>"));
    if paragraphs.is_empty() {
        Paragraph::new().write_xml(&mut out);
    }
    for p in paragraphs {
        p.write_xml(&mut out);
    }
    out.push_str(&format!("</{root}>"));
    out
}

/// Left side of every footer: code fragments joined by `" - "`, then the
/// organizational suffix.
pub fn footer_label(code_fragments: &[String], suffix: &str) -> String {
    let codes = code_fragments.join(" - ");
    match (codes.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_owned(),
        (false, true) => codes,
        (false, false) => format!("{codes} {suffix}"),
    }
}

/// Footer paragraph: bold label on the left; when `numbered`, a right-tabbed
/// "Pàgina {PAGE} de {NUMPAGES}" built from live fields.
pub fn footer_paragraph(label: &str, text_width_twips: u32, numbered: bool) -> Paragraph {
    let mut p = Paragraph::aligned(Alignment::Left);
    p.tight = true;
    p.push(Run::text(label, RunStyle::sized(FOOTER_LABEL_PT).bold()));
    if numbered {
        p.right_tab = Some(text_width_twips);
        let plain = RunStyle::default();
        p.push(Run::tab());
        p.push(Run::text("Pàgina ", plain));
        p.push(Run::field(FieldCode::Page, plain));
        p.push(Run::text(" de ", plain));
        p.push(Run::field(FieldCode::NumPages, plain));
    }
    p
}
