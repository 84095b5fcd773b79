//! Aspect-preserving placement of a capture on a document page

/// Where the image lands on the page, in page units from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Fits a `width` × `height` image inside the page without cropping or
/// stretching.
///
/// An image relatively wider than the page spans the page width and is
/// centred vertically; otherwise it spans the page height and is centred
/// horizontally.
pub fn letterbox(width: f32, height: f32, page_width: f32, page_height: f32) -> PagePlacement {
    let image_ratio = width / height;
    let page_ratio = page_width / page_height;
    if image_ratio > page_ratio {
        let h = page_width / image_ratio;
        PagePlacement {
            x: 0.0,
            y: (page_height - h) / 2.0,
            width: page_width,
            height: h,
        }
    } else {
        let w = page_height * image_ratio;
        PagePlacement {
            x: (page_width - w) / 2.0,
            y: 0.0,
            width: w,
            height: page_height,
        }
    }
}
