// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report composer — turns a `DocumentPlan` into a DOCX package.
//
// Sections are emitted strictly in order: cover, one section per page plan
// entry, then the optional closing attestation. Each section carries its own
// `w:sectPr` with the full page geometry.

use infofoto_core::config::EngineConfig;
use infofoto_core::error::{InfofotoError, Result};
use infofoto_core::types::{PhotoItem, QualityProfile, ReportMetadata};
use tracing::{debug, info, instrument};

use super::media::{MediaKind, MediaStore};
use super::model::{Alignment, Block, InlineImage, KeepTogether, Paragraph, Run, RunStyle};
use super::package::{
    CT_APP, CT_CORE, CT_DOCUMENT, CT_FOOTER, CT_HEADER, CT_SETTINGS, CT_STYLES, PackageWriter,
    RelKind, Relationships, XML_DECLARATION,
};
use super::parts::{self, WML_NAMESPACES};
use super::section::{PageGeometry, SectionProperties, VerticalAlign};
use crate::cancel::CancellationFlag;
use crate::image::{ImageProcessor, display_size_cm};
use crate::layout::caption::caption_paragraph;
use crate::layout::plan::DocumentPlan;
use crate::layout::planner::{PagePlanEntry, PhotoSlot};

const TITLE_PT: f32 = 33.0;
const COVER_LINE_PT: f32 = 21.0;
const ATTESTATION_PT: f32 = 14.0;

const COVER_LOGO_MAX_W_CM: f64 = 12.0;
const COVER_LOGO_MAX_H_CM: f64 = 5.0;
/// 3.2 inches.
const HEADER_LOGO_MAX_W_CM: f64 = 8.128;
const HEADER_LOGO_MAX_H_CM: f64 = 1.8;

const CERTIFYING_PHRASE: &str = "Consti i Certifico";

/// Decoded logo, re-encoded as PNG for embedding.
#[derive(Debug, Clone)]
pub struct Logo {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl Logo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = ImageProcessor::from_bytes(bytes)
            .map_err(|err| InfofotoError::Config(format!("logo: {err}")))?;
        Ok(Self {
            png: image.to_png_bytes()?,
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The bold lead-in and the sentence of the closing attestation.
pub fn attestation_text(plan: &DocumentPlan, metadata: &ReportMetadata) -> (String, String) {
    let time = plan.issued_at.format("%H:%M");
    let date = plan.issued_at.format("%d/%m/%Y");
    let court = metadata.court.trim();
    let locality = metadata.locality.trim();
    match metadata.quality_profile {
        QualityProfile::High => (
            "Diligència de Tramesa d'Informe Fotogràfic:".to_owned(),
            format!(
                " Que a les {time} del dia {date}, es finalitza aquest Informe fotogràfic amb \
                 número de diligències {dil}, que consta de {photos} fotografies i {pages} \
                 pàgines, i es tramet al {court} de la localitat de {locality}.",
                dil = metadata.diligence_code.trim(),
                photos = plan.photo_count,
                pages = plan.total_page_count,
            ),
        ),
        QualityProfile::Standard => (
            "Diligència d'Informe Fotogràfic:".to_owned(),
            format!(
                " Que a les {time} del dia {date}, es finalitza aquest Informe fotogràfic que \
                 consta de {photos} fotografies i {pages} pàgines, i es tramet al {court} de la \
                 localitat de {locality}.",
                photos = plan.photo_count,
                pages = plan.total_page_count,
            ),
        ),
    }
}

/// Body content in document order, with section breaks folded into the last
/// paragraph of each section.
#[derive(Default)]
struct Body {
    blocks: Vec<Block>,
}

impl Body {
    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn paragraph(&mut self, p: Paragraph) {
        self.blocks.push(Block::Paragraph(p));
    }

    /// Close a non-final section. The `w:sectPr` rides on the last paragraph;
    /// after a table a near-invisible spacer paragraph carries it instead.
    fn close_section(&mut self, props: SectionProperties) {
        if let Some(Block::Paragraph(last)) = self.blocks.last_mut() {
            if last.section.is_none() {
                last.section = Some(props);
                return;
            }
        }
        let mut spacer = Paragraph::new();
        spacer.tight = true;
        spacer.mark_size_pt = Some(1.0);
        spacer.section = Some(props);
        self.blocks.push(Block::Paragraph(spacer));
    }

    fn to_document_xml(&self, final_section: &SectionProperties) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str(&format!("<w:document {WML_NAMESPACES}><w:body>"));
        for block in &self.blocks {
            block.write_xml(&mut out);
        }
        final_section.write_xml(&mut out);
        out.push_str("</w:body></w:document>");
        out
    }
}

/// Per-call mutable state. Nothing survives between `compose` calls.
struct Composition {
    media: MediaStore,
    rels: Relationships,
    body: Body,
    next_drawing_id: u32,
}

impl Composition {
    fn inline_image(
        &mut self,
        bytes: &[u8],
        kind: MediaKind,
        name: String,
        (width_cm, height_cm): (f64, f64),
    ) -> Run {
        let target = self.media.add(bytes, kind);
        let rel_id = self.rels.add(RelKind::Image, target);
        let drawing_id = self.next_drawing_id;
        self.next_drawing_id += 1;
        Run::image(InlineImage {
            rel_id,
            drawing_id,
            name,
            width_cm,
            height_cm,
        })
    }
}

/// Relationship ids of the header/footer variants, in the document part.
struct HeaderFooterRels {
    cover_header: String,
    logo_header: String,
    numbered_footer: String,
    plain_footer: Option<String>,
}

/// Builds a report package from a plan. Holds only borrowed configuration.
pub struct DocxComposer<'a> {
    config: &'a EngineConfig,
    logo: Option<&'a Logo>,
}

impl<'a> DocxComposer<'a> {
    pub fn new(config: &'a EngineConfig, logo: Option<&'a Logo>) -> Self {
        Self { config, logo }
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::a4(self.config.margin_cm)
    }

    /// Serialise the report.
    ///
    /// `photos` must be the list the plan was built from. The cancellation
    /// flag is polled before each content section.
    #[instrument(skip_all, fields(pages = plan.total_page_count, photos = photos.len()))]
    pub fn compose(
        &self,
        plan: &DocumentPlan,
        photos: &[PhotoItem],
        metadata: &ReportMetadata,
        cancel: &CancellationFlag,
    ) -> Result<Vec<u8>> {
        let geometry = self.geometry();
        let mut state = Composition {
            media: MediaStore::new(),
            rels: Relationships::new(),
            body: Body::default(),
            next_drawing_id: 1,
        };

        state.rels.add(RelKind::Styles, "styles.xml");
        state.rels.add(RelKind::Settings, "settings.xml");
        let hf = HeaderFooterRels {
            cover_header: state.rels.add(RelKind::Header, "header1.xml"),
            logo_header: state.rels.add(RelKind::Header, "header2.xml"),
            numbered_footer: state.rels.add(RelKind::Footer, "footer1.xml"),
            plain_footer: plan
                .closing_required
                .then(|| state.rels.add(RelKind::Footer, "footer2.xml")),
        };

        // -- Cover ------------------------------------------------------------
        self.write_cover(&mut state, plan);
        let mut current = SectionProperties {
            geometry,
            header_rel: hf.cover_header.clone(),
            footer_rel: hf.numbered_footer.clone(),
            vertical_align: None,
        };

        // -- Content ----------------------------------------------------------
        for (page, entry) in plan.entries.iter().enumerate() {
            cancel.check()?;
            state.body.close_section(current);
            self.write_content_page(&mut state, entry, photos)
                .map_err(|err| match err {
                    InfofotoError::Composition { detail, .. } => {
                        InfofotoError::composition(format!("content section {}", page + 1), detail)
                    }
                    other => other,
                })?;
            current = SectionProperties {
                geometry,
                header_rel: hf.logo_header.clone(),
                footer_rel: hf.numbered_footer.clone(),
                vertical_align: Some(VerticalAlign::Top),
            };
        }

        // -- Closing ----------------------------------------------------------
        if let Some(plain_footer) = &hf.plain_footer {
            cancel.check()?;
            state.body.close_section(current);
            self.write_closing(&mut state, plan, metadata);
            current = SectionProperties {
                geometry,
                header_rel: hf.logo_header.clone(),
                footer_rel: plain_footer.clone(),
                vertical_align: Some(VerticalAlign::Top),
            };
        }

        let document_xml = state.body.to_document_xml(&current);
        let bytes = self.package(state, document_xml, plan, metadata, &hf)?;
        info!(bytes = bytes.len(), "Report composed");
        Ok(bytes)
    }

    fn write_cover(&self, state: &mut Composition, plan: &DocumentPlan) {
        let body_width = self.config.usable_width_cm();
        state.body.paragraph(Paragraph::new());
        state.body.paragraph(Paragraph::new());

        if let Some(logo) = self.logo {
            let size = display_size_cm(
                logo.width,
                logo.height,
                COVER_LOGO_MAX_W_CM.min(body_width),
                COVER_LOGO_MAX_H_CM,
            );
            let run = state.inline_image(&logo.png, MediaKind::Png, "logo".into(), size);
            state
                .body
                .paragraph(Paragraph::aligned(Alignment::Center).with_run(run));
        }

        state.body.paragraph(
            Paragraph::aligned(Alignment::Center).with_run(Run::text(
                &self.config.labels.title,
                RunStyle::sized(TITLE_PT),
            )),
        );
        for line in &plan.cover_lines {
            state.body.paragraph(Paragraph::new());
            state.body.paragraph(
                Paragraph::aligned(Alignment::Center)
                    .with_run(Run::text(line, RunStyle::sized(COVER_LINE_PT))),
            );
        }
        debug!(lines = plan.cover_lines.len(), "Cover written");
    }

    fn write_content_page(
        &self,
        state: &mut Composition,
        entry: &PagePlanEntry,
        photos: &[PhotoItem],
    ) -> Result<()> {
        for (n, slot) in entry.slots().iter().enumerate() {
            if n > 0 {
                state.body.paragraph(Paragraph::new());
            }
            let photo = photos.get(slot.photo).ok_or_else(|| {
                InfofotoError::composition(
                    "content section",
                    format!("plan references photo {} of {}", slot.photo, photos.len()),
                )
            })?;
            let block = self.photo_block(state, slot, photo);
            state.body.push(Block::KeepTogether(block));
        }
        Ok(())
    }

    /// Image directly above its caption, in a row that may not split.
    fn photo_block(&self, state: &mut Composition, slot: &PhotoSlot, photo: &PhotoItem) -> KeepTogether {
        let geometry = self.geometry();
        let size = display_size_cm(
            photo.width,
            photo.height,
            self.config.usable_width_cm(),
            slot.max_height_cm,
        );
        let run = state.inline_image(
            &photo.jpeg,
            MediaKind::Jpeg,
            format!("foto-{}", slot.display_index),
            size,
        );
        let mut image_paragraph = Paragraph::aligned(Alignment::Center).with_run(run);
        image_paragraph.tight = true;
        image_paragraph.keep_next = true;

        let caption = caption_paragraph(
            &self.config.labels.photo_label,
            slot.display_index,
            photo.caption_text(),
        );
        KeepTogether {
            width_twips: geometry.text_width(),
            paragraphs: vec![image_paragraph, caption],
        }
    }

    fn write_closing(&self, state: &mut Composition, plan: &DocumentPlan, metadata: &ReportMetadata) {
        let (lead, sentence) = attestation_text(plan, metadata);
        state.body.paragraph(Paragraph::new());
        state.body.paragraph(Paragraph::new());
        state.body.paragraph(
            Paragraph::aligned(Alignment::Justify)
                .with_run(Run::text(lead, RunStyle::sized(ATTESTATION_PT).bold()))
                .with_run(Run::text(sentence, RunStyle::sized(ATTESTATION_PT))),
        );
        state.body.paragraph(
            Paragraph::new().with_run(Run::text(
                CERTIFYING_PHRASE,
                RunStyle::sized(ATTESTATION_PT).bold(),
            )),
        );
    }

    fn package(
        &self,
        state: Composition,
        document_xml: String,
        plan: &DocumentPlan,
        metadata: &ReportMetadata,
        hf: &HeaderFooterRels,
    ) -> Result<Vec<u8>> {
        let geometry = self.geometry();
        let Composition {
            mut media,
            rels,
            next_drawing_id,
            ..
        } = state;

        // Header with logo gets its own relationship part.
        let mut header_rels = Relationships::new();
        let header_paragraph = match self.logo {
            Some(logo) => {
                let target = media.add(&logo.png, MediaKind::Png);
                let rel_id = header_rels.add(RelKind::Image, target);
                let (width_cm, height_cm) = display_size_cm(
                    logo.width,
                    logo.height,
                    HEADER_LOGO_MAX_W_CM,
                    HEADER_LOGO_MAX_H_CM,
                );
                let mut p = Paragraph::aligned(Alignment::Left).with_run(Run::image(InlineImage {
                    rel_id,
                    // `wp:docPr` ids must stay unique across the body and headers.
                    drawing_id: next_drawing_id,
                    name: "logo".into(),
                    width_cm,
                    height_cm,
                }));
                p.tight = true;
                p
            }
            None => Paragraph::new(),
        };

        let label = parts::footer_label(
            &metadata.code_fragments(),
            &self.config.labels.footer_suffix,
        );

        let mut pkg = PackageWriter::new();
        pkg.add_raw("_rels/.rels", package_rels().to_xml().into_bytes());
        pkg.add_xml(
            "docProps/core.xml",
            CT_CORE,
            parts::core_properties_xml(
                &self.config.labels.title,
                metadata.case_code.trim(),
                plan.issued_at,
            ),
        );
        pkg.add_xml(
            "docProps/app.xml",
            CT_APP,
            parts::app_properties_xml(plan.total_page_count),
        );
        pkg.add_xml("word/document.xml", CT_DOCUMENT, document_xml);
        pkg.add_raw("word/_rels/document.xml.rels", rels.to_xml().into_bytes());
        pkg.add_xml("word/styles.xml", CT_STYLES, parts::styles_xml());
        pkg.add_xml("word/settings.xml", CT_SETTINGS, parts::settings_xml());
        pkg.add_xml("word/header1.xml", CT_HEADER, parts::header_xml(&[]));
        pkg.add_xml(
            "word/header2.xml",
            CT_HEADER,
            parts::header_xml(&[header_paragraph]),
        );
        if !header_rels.is_empty() {
            pkg.add_raw("word/_rels/header2.xml.rels", header_rels.to_xml().into_bytes());
        }
        pkg.add_xml(
            "word/footer1.xml",
            CT_FOOTER,
            parts::footer_xml(&[parts::footer_paragraph(&label, geometry.text_width(), true)]),
        );
        if hf.plain_footer.is_some() {
            pkg.add_xml(
                "word/footer2.xml",
                CT_FOOTER,
                parts::footer_xml(&[parts::footer_paragraph(&label, geometry.text_width(), false)]),
            );
        }
        debug!(media = media.len(), "Embedding media");
        for part in media.into_parts() {
            pkg.add_raw(format!("word/{}", part.target), part.bytes);
        }
        pkg.finish()
    }
}

fn package_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(RelKind::OfficeDocument, "word/document.xml");
    rels.add(RelKind::CoreProperties, "docProps/core.xml");
    rels.add(RelKind::ExtendedProperties, "docProps/app.xml");
    rels
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::{Cursor, Read};

    fn issued() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7200)
            .unwrap()
            .with_ymd_and_hms(2026, 6, 1, 18, 45, 0)
            .unwrap()
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 200, 30])));
        ImageProcessor::from_dynamic(img).to_jpeg_bytes(80).unwrap()
    }

    fn photo(width: u32, height: u32, caption: Option<&str>) -> PhotoItem {
        PhotoItem {
            jpeg: jpeg(width, height),
            width,
            height,
            caption: caption.map(str::to_owned),
            source_position: 0,
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        Some(out)
    }

    fn compose(
        photos: &[PhotoItem],
        metadata: &ReportMetadata,
        logo: Option<&Logo>,
    ) -> (DocumentPlan, Vec<u8>) {
        let config = EngineConfig::default();
        let plan = DocumentPlan::build(photos, metadata, &config, issued()).unwrap();
        let bytes = DocxComposer::new(&config, logo)
            .compose(&plan, photos, metadata, &CancellationFlag::new())
            .unwrap();
        (plan, bytes)
    }

    fn with_destination(profile: QualityProfile) -> ReportMetadata {
        ReportMetadata {
            case_code: "123/26".into(),
            diligence_code: "987".into(),
            court: "Jutjat de Primera Instància 3".into(),
            locality: "Sabadell".into(),
            quality_profile: profile,
            ..Default::default()
        }
    }

    #[test]
    fn one_section_per_page_plus_cover() {
        let photos = vec![
            photo(64, 48, None),
            photo(64, 48, Some("Detall")),
            photo(64, 48, None),
        ];
        let (plan, bytes) = compose(&photos, &ReportMetadata::default(), None);
        let doc = read_part(&bytes, "word/document.xml").unwrap();
        // cover + 2 content sections, no closing
        assert_eq!(doc.matches("<w:sectPr>").count(), 1 + plan.entries.len());
        assert_eq!(doc.matches(r#"<w:pgSz w:w="11906" w:h="16838"/>"#).count(), 3);
        assert_eq!(doc.matches("<w:cantSplit/>").count(), 3);
        assert!(doc.contains("Fotografia núm. 1"));
        assert!(doc.contains("Fotografia núm. 2: "));
        assert!(doc.contains("Fotografia núm. 3"));
        assert!(!doc.contains("Consti i Certifico"));
        assert!(read_part(&bytes, "word/footer2.xml").is_none());
    }

    #[test]
    fn closing_section_embeds_literal_page_count() {
        let photos = vec![photo(48, 64, None), photo(64, 48, None)];
        let meta = with_destination(QualityProfile::Standard);
        let (plan, bytes) = compose(&photos, &meta, None);
        assert_eq!(plan.total_page_count, 4);

        let doc = read_part(&bytes, "word/document.xml").unwrap();
        assert_eq!(doc.matches("<w:sectPr>").count(), 4);
        assert!(doc.contains("Diligència d'Informe Fotogràfic:"));
        assert!(doc.contains("consta de 2 fotografies i 4 pàgines"));
        assert!(doc.contains("Que a les 18:45 del dia 01/06/2026"));
        assert!(doc.contains("Consti i Certifico"));

        let plain = read_part(&bytes, "word/footer2.xml").unwrap();
        assert!(!plain.contains("fldChar"));
        assert!(plain.contains("NAT 123/26 - Dil. 987 ART MNORD"));
    }

    #[test]
    fn high_profile_leads_with_diligence() {
        let photos = vec![photo(64, 48, None)];
        let meta = with_destination(QualityProfile::High);
        let (_, bytes) = compose(&photos, &meta, None);
        let doc = read_part(&bytes, "word/document.xml").unwrap();
        assert!(doc.contains("Diligència de Tramesa d'Informe Fotogràfic:"));
        assert!(doc.contains("número de diligències 987"));
        assert!(doc.contains("Tramesa a: Jutjat de Primera Instància 3 de Sabadell"));
        let footer = read_part(&bytes, "word/footer1.xml").unwrap();
        assert!(footer.contains("Dil. 987 - NAT 123/26 ART MNORD"));
    }

    #[test]
    fn footer_page_numbers_are_live_fields() {
        let (_, bytes) = compose(&[photo(64, 48, None)], &ReportMetadata::default(), None);
        let footer = read_part(&bytes, "word/footer1.xml").unwrap();
        assert!(footer.contains(" PAGE </w:instrText>"));
        assert!(footer.contains(" NUMPAGES </w:instrText>"));
        assert!(footer.contains(r#"<w:tab w:val="right""#));
    }

    #[test]
    fn logo_is_stored_once_and_header_has_rels() {
        let logo_png = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            40,
            10,
            Rgb([0, 0, 0]),
        )))
        .to_png_bytes()
        .unwrap();
        let logo = Logo::from_bytes(&logo_png).unwrap();
        let photos = vec![photo(64, 48, None), photo(48, 64, None)];
        let (_, bytes) = compose(&photos, &ReportMetadata::default(), Some(&logo));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let media: Vec<String> = archive
            .file_names()
            .filter(|n| n.starts_with("word/media/"))
            .map(str::to_owned)
            .collect();
        assert_eq!(media.iter().filter(|n| n.ends_with(".png")).count(), 1);
        assert_eq!(media.iter().filter(|n| n.ends_with(".jpeg")).count(), 2);
        assert!(archive.by_name("word/_rels/header2.xml.rels").is_ok());

        let header = read_part(&bytes, "word/header2.xml").unwrap();
        assert!(header.contains("<w:drawing>"));
        let doc = read_part(&bytes, "word/document.xml").unwrap();
        let mut ids: Vec<&str> = doc
            .split(r#"<wp:docPr id=""#)
            .chain(header.split(r#"<wp:docPr id=""#))
            .filter_map(|chunk| chunk.split('"').next().filter(|id| id.parse::<u32>().is_ok()))
            .collect();
        // cover logo, two photos, header logo
        assert_eq!(ids.len(), 4);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        let cover_header = read_part(&bytes, "word/header1.xml").unwrap();
        assert!(!cover_header.contains("<w:drawing>"));
    }

    #[test]
    fn cancelled_compose_emits_nothing() {
        let config = EngineConfig::default();
        let photos = vec![photo(64, 48, None)];
        let meta = ReportMetadata::default();
        let plan = DocumentPlan::build(&photos, &meta, &config, issued()).unwrap();
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let result = DocxComposer::new(&config, None).compose(&plan, &photos, &meta, &cancel);
        assert!(matches!(result, Err(InfofotoError::Cancelled)));
    }

    #[test]
    fn plan_mismatch_names_the_section() {
        let config = EngineConfig::default();
        let photos = vec![photo(64, 48, None), photo(64, 48, None)];
        let meta = ReportMetadata::default();
        let plan = DocumentPlan::build(&photos, &meta, &config, issued()).unwrap();
        let err = DocxComposer::new(&config, None)
            .compose(&plan, &photos[..1], &meta, &CancellationFlag::new())
            .unwrap_err();
        match err {
            InfofotoError::Composition { section, .. } => assert_eq!(section, "content section 1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn attestation_sentence_standard() {
        let photos = vec![photo(64, 48, None)];
        let meta = with_destination(QualityProfile::Standard);
        let plan = DocumentPlan::build(&photos, &meta, &EngineConfig::default(), issued()).unwrap();
        let (lead, sentence) = attestation_text(&plan, &meta);
        assert_eq!(lead, "Diligència d'Informe Fotogràfic:");
        assert_eq!(
            sentence,
            " Que a les 18:45 del dia 01/06/2026, es finalitza aquest Informe fotogràfic que \
             consta de 1 fotografies i 3 pàgines, i es tramet al Jutjat de Primera Instància 3 \
             de la localitat de Sabadell."
        );
    }
}
