// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OPC packaging — relationship parts, the content-type manifest and the ZIP
// container itself.

use std::io::{Cursor, Write};

use infofoto_core::error::{InfofotoError, Result};
use tracing::debug;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use super::model::escape_xml;

pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub const CT_SETTINGS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
pub const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
pub const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Relationship types used by the report package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelKind {
    OfficeDocument,
    CoreProperties,
    ExtendedProperties,
    Styles,
    Settings,
    Header,
    Footer,
    Image,
}

impl RelKind {
    pub fn uri(&self) -> &'static str {
        match self {
            Self::OfficeDocument => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument"
            }
            Self::CoreProperties => {
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
            }
            Self::ExtendedProperties => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties"
            }
            Self::Styles => "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
            Self::Settings => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings"
            }
            Self::Header => "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header",
            Self::Footer => "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer",
            Self::Image => "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Relationship {
    id: String,
    kind: RelKind,
    target: String,
}

/// The relationship set of one part, handing out `rIdN` ids in order.
#[derive(Debug, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its id. Adding the same kind and target
    /// twice returns the existing id.
    pub fn add(&mut self, kind: RelKind, target: impl Into<String>) -> String {
        let target = target.into();
        if let Some(existing) = self
            .entries
            .iter()
            .find(|r| r.kind == kind && r.target == target)
        {
            return existing.id.clone();
        }
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            kind,
            target,
        });
        id
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.entries {
            out.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel.id,
                rel.kind.uri(),
                escape_xml(&rel.target)
            ));
        }
        out.push_str("</Relationships>");
        out
    }
}

struct PackagePart {
    path: String,
    bytes: Vec<u8>,
    /// Explicit content type; parts without one resolve by extension.
    content_type: Option<&'static str>,
}

/// Collects parts and writes them out as an OPC ZIP archive.
#[derive(Default)]
pub struct PackageWriter {
    parts: Vec<PackagePart>,
}

impl PackageWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an XML part with an explicit content-type override.
    pub fn add_xml(&mut self, path: impl Into<String>, content_type: &'static str, xml: String) {
        self.parts.push(PackagePart {
            path: path.into(),
            bytes: xml.into_bytes(),
            content_type: Some(content_type),
        });
    }

    /// Add a part typed by its extension (`.rels`, `.jpeg`, `.png`).
    pub fn add_raw(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.parts.push(PackagePart {
            path: path.into(),
            bytes,
            content_type: None,
        });
    }

    fn content_types_xml(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        out.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);
        out.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        for part in &self.parts {
            if let Some(ct) = part.content_type {
                out.push_str(&format!(
                    r#"<Override PartName="/{}" ContentType="{}"/>"#,
                    part.path, ct
                ));
            }
        }
        out.push_str("</Types>");
        out
    }

    /// Serialise the archive. The manifest goes first.
    pub fn finish(self) -> Result<Vec<u8>> {
        let manifest = self.content_types_xml();
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        // Media is already compressed.
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        write_entry(&mut zip, "[Content_Types].xml", manifest.as_bytes(), deflated)?;
        for part in &self.parts {
            let options = if part.path.starts_with("word/media/") {
                stored
            } else {
                deflated
            };
            write_entry(&mut zip, &part.path, &part.bytes, options)?;
        }

        let cursor = zip
            .finish()
            .map_err(|err| InfofotoError::composition("package", err))?;
        let bytes = cursor.into_inner();
        debug!(parts = self.parts.len() + 1, bytes = bytes.len(), "Package written");
        Ok(bytes)
    }
}

fn write_entry(
    zip: &mut zip::ZipWriter<Cursor<Vec<u8>>>,
    path: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|err| InfofotoError::composition("package", format!("{path}: {err}")))?;
    zip.write_all(bytes)
        .map_err(|err| InfofotoError::composition("package", format!("{path}: {err}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn relationship_ids_are_sequential_and_deduplicated() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(RelKind::Styles, "styles.xml"), "rId1");
        assert_eq!(rels.add(RelKind::Image, "media/a.png"), "rId2");
        assert_eq!(rels.add(RelKind::Image, "media/a.png"), "rId2");
        assert_eq!(rels.add(RelKind::Image, "media/b.png"), "rId3");
        let xml = rels.to_xml();
        assert!(xml.contains(r#"Id="rId3""#));
        assert!(xml.contains("relationships/image"));
    }

    #[test]
    fn archive_lists_overrides_and_reads_back() {
        let mut pkg = PackageWriter::new();
        pkg.add_xml("word/document.xml", CT_DOCUMENT, "<w:document/>".into());
        pkg.add_raw("word/media/image-x.png", vec![1, 2, 3]);
        let bytes = pkg.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut manifest = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert!(manifest.contains(r#"PartName="/word/document.xml""#));
        assert!(!manifest.contains("image-x.png"));

        let mut media = Vec::new();
        archive
            .by_name("word/media/image-x.png")
            .unwrap()
            .read_to_end(&mut media)
            .unwrap();
        assert_eq!(media, vec![1, 2, 3]);
    }
}
