//! Decoding of embedded `data:` URI images

use std::collections::HashMap;

use base64::Engine as Base64Engine;
use log::{debug, warn};
use tiny_skia::{IntSize, Pixmap};

use crate::{Error, Result};

use super::Composition;

/// Decodes a base64 `data:` URI into a premultiplied pixmap.
pub fn decode_data_uri(uri: &str) -> Result<Pixmap> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::RenderError("image source is not a data URI".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::RenderError("data URI has no payload".into()))?;
    if !meta.ends_with(";base64") {
        return Err(Error::RenderError(format!(
            "unsupported data URI encoding: {}",
            meta
        )));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::RenderError(format!("invalid base64 image data: {}", e)))?;
    let decoded = ::image::load_from_memory(&bytes)
        .map_err(|e| Error::RenderError(format!("undecodable image: {}", e)))?
        .into_rgba8();
    let (width, height) = decoded.dimensions();
    let mut data = decoded.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u32;
        for c in &mut px[..3] {
            *c = ((*c as u32 * a + 127) / 255) as u8;
        }
    }
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| Error::RenderError("image has no pixels".into()))?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| Error::RenderError("image buffer size mismatch".into()))
}

/// Embedded images of one composition, keyed by their source URI
#[derive(Default)]
pub struct DecodedImages {
    images: HashMap<String, Pixmap>,
}

impl DecodedImages {
    pub fn get(&self, source: &str) -> Option<&Pixmap> {
        self.images.get(source)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Decodes every image `composition` references, yielding to the scheduler
/// after each one. Sources that fail to decode are left out; the rasterizer
/// paints their placeholder instead.
pub async fn load(composition: &Composition) -> DecodedImages {
    let mut decoded = DecodedImages::default();
    for source in composition.image_sources() {
        if decoded.images.contains_key(source) {
            continue;
        }
        match decode_data_uri(source) {
            Ok(pixmap) => {
                debug!("decoded embedded image {}x{}", pixmap.width(), pixmap.height());
                decoded.images.insert(source.to_string(), pixmap);
            }
            Err(e) => warn!("embedded image replaced by its placeholder: {}", e),
        }
        tokio::task::yield_now().await;
    }
    decoded
}

#[cfg(test)]
pub(crate) fn png_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
    let mut pixmap = Pixmap::new(width, height).unwrap();
    pixmap.fill(tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    let png = pixmap.encode_png().unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}
