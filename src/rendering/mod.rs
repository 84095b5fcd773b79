//! Rendering pipeline
//!
//! `render` lays a record out with a template into a [`Composition`]
//! (positioned nodes plus a display list). The rasterizer turns a composition
//! into a [`Bitmap`] at any scale factor.

pub mod embed;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use std::fmt;

use sha2::{Digest, Sha256};
use tiny_skia::Pixmap;

use crate::record::PosterRecord;
use crate::template::{TemplateDescriptor, TemplateId};
use crate::{Canvas, Error, Result};

pub use layout::{ElementType, LayoutNode, Rect};
pub use paint::{PaintCommand, Rgba};

/// A record laid out by one template on the canonical canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub canvas: Canvas,
    pub template: TemplateId,
    pub nodes: Vec<LayoutNode>,
    pub commands: Vec<PaintCommand>,
}

impl Composition {
    pub fn nodes_of(&self, elem_type: ElementType) -> impl Iterator<Item = &LayoutNode> + '_ {
        self.nodes.iter().filter(move |n| n.elem_type == elem_type)
    }

    /// First node of the given type, if the template rendered one.
    pub fn find(&self, elem_type: ElementType) -> Option<&LayoutNode> {
        self.nodes_of(elem_type).next()
    }

    /// Texts of the numbered point cards, in card order.
    pub fn point_texts(&self) -> Vec<String> {
        let mut cards: Vec<(usize, String)> = self
            .nodes
            .iter()
            .filter_map(|n| match n.elem_type {
                ElementType::PointCard { index } => Some((index, n.text())),
                _ => None,
            })
            .collect();
        cards.sort_by_key(|(index, _)| *index);
        cards.into_iter().map(|(_, text)| text).collect()
    }

    /// Sources of every embedded image the display list references.
    pub fn image_sources(&self) -> Vec<&str> {
        let mut sources = Vec::new();
        for command in &self.commands {
            if let PaintCommand::Image { source, .. } = command {
                if !sources.contains(&source.as_str()) {
                    sources.push(source.as_str());
                }
            }
        }
        sources
    }
}

/// Lays `record` out with `template` on the canonical canvas.
///
/// Pure and deterministic: identical inputs give identical compositions.
pub fn render(record: &PosterRecord, template: &TemplateDescriptor) -> Result<Composition> {
    let canvas = Canvas::CANONICAL;
    let (nodes, commands) = layout::compose(record, &template.style, canvas)?;
    Ok(Composition {
        canvas,
        template: template.id,
        nodes,
        commands,
    })
}

/// Captured pixels, premultiplied RGBA
#[derive(Clone)]
pub struct Bitmap {
    pixmap: Pixmap,
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Bitmap {
    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Serializes the bitmap as PNG; an empty result is an encoding failure.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let png = self
            .pixmap
            .encode_png()
            .map_err(|e| Error::EncodingFailed(e.to_string()))?;
        if png.is_empty() {
            return Err(Error::EncodingFailed("PNG encoder produced no data".into()));
        }
        Ok(png)
    }

    /// SHA-256 of the raw pixel data, hex encoded.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.pixmap.data()))
    }

    /// Straight-alpha colour at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Splits the pixels into 8-bit RGB samples and an alpha plane. The
    /// alpha plane is `None` when every pixel is opaque.
    pub fn rgb_alpha(&self) -> (Vec<u8>, Option<Vec<u8>>) {
        let count = (self.width() * self.height()) as usize;
        let mut rgb = Vec::with_capacity(count * 3);
        let mut alpha = Vec::with_capacity(count);
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
            alpha.push(c.alpha());
        }
        let opaque = alpha.iter().all(|a| *a == u8::MAX);
        (rgb, if opaque { None } else { Some(alpha) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn render_is_deterministic() {
        let record = PosterRecord::seed();
        for id in TemplateId::ALL {
            let a = render(&record, id.descriptor()).unwrap();
            let b = render(&record, id.descriptor()).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.canvas, Canvas::CANONICAL);
            assert_eq!(a.template, id);
        }
    }

    #[test]
    fn render_does_not_touch_the_record() {
        let record = PosterRecord::seed().with(Field::Speaker, Some(""));
        let before = record.clone();
        render(&record, TemplateId::Template1.descriptor()).unwrap();
        assert_eq!(record, before);
    }

    #[test]
    fn image_sources_are_listed_once() {
        let uri = embed::png_data_uri(1, 1, [1, 2, 3, 255]);
        let record = PosterRecord::seed().with(Field::Image, Some(&uri));
        let composition = render(&record, TemplateId::Template4.descriptor()).unwrap();
        assert_eq!(composition.image_sources(), vec![uri.as_str()]);
        assert!(composition.find(ElementType::HeroImage).is_some());

        let text_first = render(&record, TemplateId::Template1.descriptor()).unwrap();
        assert!(text_first.image_sources().is_empty());
    }

    #[tokio::test]
    async fn bitmap_has_scaled_size_and_opaque_pixels() {
        let composition = render(&PosterRecord::seed(), TemplateId::Template2.descriptor()).unwrap();
        let images = embed::load(&composition).await;
        let bitmap = raster::rasterize(&composition, 0.25, &images).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (200, 300));
        let (rgb, alpha) = bitmap.rgb_alpha();
        assert_eq!(rgb.len(), 200 * 300 * 3);
        assert!(alpha.is_none());
        assert_eq!(bitmap.fingerprint().len(), 64);
        let png = bitmap.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
