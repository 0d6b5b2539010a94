//! PPTX writer
//!
//! Assembles the full package: static parts, the rendered slide, and any
//! fetched media, in a ZIP laid out the way presentation readers expect.
//! XML parts are deflated; media bytes go in stored, they are already
//! compressed.

use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};

use deck_model::Deck;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{ExportError, Result};
use crate::media::{fetch_slide_media, ImageFetcher, MediaPart};
use crate::package::{
    create_presentation_content_types, create_presentation_rels, create_root_rels,
    create_slide_layout_rels, create_slide_master_rels, presentation_xml, relationship_types,
    slide_layout_xml, slide_master_xml, theme_xml, Relationships,
};
use crate::slide_xml::render_slide_xml;
use crate::transform::SlideSpace;

/// Low-level package writer over any seekable sink.
pub struct PptxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> PptxWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    pub fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn write_binary(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

/// Export the deck's first slide as a complete `.pptx` byte buffer.
pub async fn export_deck<F: ImageFetcher>(deck: &Deck, fetcher: &F) -> Result<Vec<u8>> {
    let slide = deck.slides.first().ok_or(ExportError::EmptyDeck)?;

    let media = fetch_slide_media(slide, fetcher).await;

    let space = SlideSpace::new(deck.width, deck.height);
    let mut slide_rels = Relationships::new();
    let mut image_rel_ids: HashMap<String, String> = HashMap::new();
    for part in &media {
        let rel_id = slide_rels.add(
            relationship_types::IMAGE,
            &format!("../media/{}", part.file_name),
        );
        image_rel_ids.insert(part.shape_id.clone(), rel_id);
    }

    let slide_xml = render_slide_xml(slide, &space, &image_rel_ids);

    let buffer = write_package(&slide_xml, &slide_rels, &media)?;
    tracing::info!(
        shapes = slide.shapes.len(),
        media = media.len(),
        bytes = buffer.len(),
        "exported deck"
    );
    Ok(buffer)
}

fn write_package(
    slide_xml: &str,
    slide_rels: &Relationships,
    media: &[MediaPart],
) -> Result<Vec<u8>> {
    let mut writer = PptxWriter::new(Cursor::new(Vec::new()));

    writer.write_file("[Content_Types].xml", &create_presentation_content_types().to_xml())?;
    writer.write_file("_rels/.rels", &create_root_rels().to_xml())?;
    writer.write_file("ppt/presentation.xml", &presentation_xml())?;
    writer.write_file(
        "ppt/_rels/presentation.xml.rels",
        &create_presentation_rels().to_xml(),
    )?;
    writer.write_file("ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
    writer.write_file(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &create_slide_master_rels().to_xml(),
    )?;
    writer.write_file("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
    writer.write_file(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &create_slide_layout_rels().to_xml(),
    )?;
    writer.write_file("ppt/theme/theme1.xml", &theme_xml())?;
    writer.write_file("ppt/slides/slide1.xml", slide_xml)?;
    if !slide_rels.is_empty() {
        writer.write_file("ppt/slides/_rels/slide1.xml.rels", &slide_rels.to_xml())?;
    }
    for part in media {
        writer.write_binary(&format!("ppt/media/{}", part.file_name), &part.bytes)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
