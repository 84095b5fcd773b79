//! One-page PDF with the captured bitmap as its only content

use chrono::{Datelike, NaiveDate};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::rendering::Bitmap;
use crate::{Error, PageSize, Result};

use super::placement::{letterbox, PagePlacement};

const PRODUCER: &str = concat!("postercraft ", env!("CARGO_PKG_VERSION"));
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Metadata recorded in the document information dictionary
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo<'a> {
    pub title: Option<&'a str>,
    pub date: NaiveDate,
}

/// Writes `bitmap` letterboxed onto a single `page`.
///
/// The pixels are embedded losslessly (Flate-compressed RGB, plus a soft
/// mask when the bitmap has transparency).
pub fn write_document(bitmap: &Bitmap, page: PageSize, info: &DocumentInfo<'_>) -> Result<(Vec<u8>, PagePlacement)> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let image_id = Ref::new(5);
    let mask_id = Ref::new(6);
    let info_id = Ref::new(7);

    let (width, height) = (bitmap.width(), bitmap.height());
    let placement = letterbox(width as f32, height as f32, page.width, page.height);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page_writer = pdf.page(page_id);
    page_writer.media_box(Rect::new(0.0, 0.0, page.width, page.height));
    page_writer.parent(page_tree_id);
    page_writer.contents(content_id);
    page_writer.resources().x_objects().pair(IMAGE_NAME, image_id);
    page_writer.finish();

    let (rgb, alpha) = bitmap.rgb_alpha();
    let samples = compress_to_vec_zlib(&rgb, 6);
    let mut image = pdf.image_xobject(image_id, &samples);
    image.filter(Filter::FlateDecode);
    image.width(width as i32);
    image.height(height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    if alpha.is_some() {
        image.s_mask(mask_id);
    }
    image.finish();

    if let Some(alpha) = alpha {
        let samples = compress_to_vec_zlib(&alpha, 6);
        let mut mask = pdf.image_xobject(mask_id, &samples);
        mask.filter(Filter::FlateDecode);
        mask.width(width as i32);
        mask.height(height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask.finish();
    }

    // PDF user space has its origin at the bottom-left corner.
    let bottom = page.height - placement.y - placement.height;
    let mut content = Content::new();
    content.save_state();
    content.transform([placement.width, 0.0, 0.0, placement.height, placement.x, bottom]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    let mut meta = pdf.document_info(info_id);
    if let Some(title) = info.title {
        meta.title(TextStr(title));
    }
    meta.producer(TextStr(PRODUCER));
    meta.creation_date(
        Date::new(info.date.year().clamp(0, u16::MAX as i32) as u16)
            .month(info.date.month() as u8)
            .day(info.date.day() as u8),
    );
    meta.finish();

    let bytes = pdf.finish();
    if bytes.is_empty() {
        return Err(Error::EncodingFailed("PDF writer produced no data".into()));
    }
    Ok((bytes, placement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::{Color, Pixmap};

    fn bitmap(color: Color) -> Bitmap {
        let mut pixmap = Pixmap::new(20, 30).unwrap();
        pixmap.fill(color);
        Bitmap::from_pixmap(pixmap)
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn writes_a_single_page_document() {
        let info = DocumentInfo {
            title: Some("Public Invitation"),
            date: NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
        };
        let (bytes, placement) = write_document(&bitmap(Color::WHITE), PageSize::a4(), &info).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"/Im1"));
        assert!(contains(&bytes, b"Public Invitation"));
        assert!(contains(&bytes, b"D:20251104"));
        assert!(!contains(&bytes, b"/SMask"));
        assert!((placement.width / placement.height - 20.0 / 30.0).abs() < 1e-4);
    }

    #[test]
    fn transparent_pixels_get_a_soft_mask() {
        let info = DocumentInfo {
            title: None,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        let (bytes, _) = write_document(&bitmap(Color::TRANSPARENT), PageSize::a4(), &info).unwrap();
        assert!(contains(&bytes, b"/SMask"));
        assert!(contains(&bytes, b"/DeviceGray"));
    }
}
