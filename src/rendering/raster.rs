//! Display list to pixels
//!
//! The rasterizer replays a [`Composition`]'s paint commands onto a tiny-skia
//! pixmap. Every command is expressed in canvas pixels; a uniform scale
//! transform maps them to the capture resolution, and glyphs are rasterized
//! directly at the scaled size so text stays sharp.

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, LineCap, LineJoin, LinearGradient, Paint, Path,
    PathBuilder, Pattern, Pixmap, PixmapPaint, Point, SpreadMode, Stroke, Transform,
};

use crate::{Error, Result};

use super::embed::DecodedImages;
use super::layout::Rect;
use super::paint::{Brush, PaintCommand, Rgba, Shape};
use super::text::{fonts, FontBook, Weight};
use super::{Bitmap, Composition};

/// Cubic approximation constant for quarter circles
const KAPPA: f32 = 0.552_284_8;

/// Paints `composition` at `scale` times its canvas size.
pub fn rasterize(composition: &Composition, scale: f32, images: &DecodedImages) -> Result<Bitmap> {
    let (width, height) = composition.canvas.scaled(scale);
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        Error::RenderError(format!("cannot allocate a {}x{} bitmap", width, height))
    })?;
    let mut painter = Painter {
        pixmap: &mut pixmap,
        book: fonts()?,
        scale,
        transform: Transform::from_scale(scale, scale),
        images,
    };
    for command in &composition.commands {
        painter.paint(command);
    }
    log::debug!(
        "rasterized {} commands into {}x{}",
        composition.commands.len(),
        width,
        height
    );
    Ok(Bitmap::from_pixmap(pixmap))
}

fn color(c: Rgba) -> Color {
    Color::from_rgba8(c.0, c.1, c.2, c.3)
}

fn paint_for(brush: &Brush) -> Option<Paint<'static>> {
    let mut paint = Paint {
        anti_alias: true,
        ..Default::default()
    };
    match brush {
        Brush::Solid(c) => paint.set_color_rgba8(c.0, c.1, c.2, c.3),
        Brush::Linear { start, end, stops } => {
            let stops = stops
                .iter()
                .map(|(pos, c)| GradientStop::new(*pos, color(*c)))
                .collect();
            paint.shader = LinearGradient::new(
                Point::from_xy(start.0, start.1),
                Point::from_xy(end.0, end.1),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )?;
        }
    }
    Some(paint)
}

fn rect_path(rect: &Rect) -> Option<Path> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height).map(PathBuilder::from_rect)
}

fn rounded_rect_path(rect: &Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    if r == 0.0 {
        return rect_path(rect);
    }
    let (l, t, rt, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}

fn shape_path(shape: &Shape) -> Option<Path> {
    match shape {
        Shape::Rect(rect) => rect_path(rect),
        Shape::RoundedRect { rect, radius } => rounded_rect_path(rect, *radius),
        Shape::Circle { cx, cy, r } => PathBuilder::from_circle(*cx, *cy, *r),
        Shape::Path { points, closed } => {
            let (first, rest) = points.split_first()?;
            let mut pb = PathBuilder::new();
            pb.move_to(first.0, first.1);
            for (x, y) in rest {
                pb.line_to(*x, *y);
            }
            if *closed {
                pb.close();
            }
            pb.finish()
        }
    }
}

struct Painter<'p> {
    pixmap: &'p mut Pixmap,
    book: &'static FontBook,
    scale: f32,
    transform: Transform,
    images: &'p DecodedImages,
}

impl Painter<'_> {
    fn paint(&mut self, command: &PaintCommand) {
        match command {
            PaintCommand::Fill { shape, brush } => {
                if let (Some(path), Some(paint)) = (shape_path(shape), paint_for(brush)) {
                    self.pixmap
                        .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
                }
            }
            PaintCommand::Stroke {
                shape,
                color: c,
                width,
            } => {
                if let (Some(path), Some(paint)) = (shape_path(shape), paint_for(&Brush::Solid(*c))) {
                    let stroke = Stroke {
                        width: *width,
                        line_cap: LineCap::Round,
                        line_join: LineJoin::Round,
                        ..Default::default()
                    };
                    self.pixmap
                        .stroke_path(&path, &paint, &stroke, self.transform, None);
                }
            }
            PaintCommand::Text {
                x,
                y,
                text,
                px,
                weight,
                color: c,
            } => self.text(*x, *y, text, *px, *weight, *c),
            PaintCommand::Image {
                rect,
                source,
                fallback,
            } => match self.images.get(source) {
                Some(image) => self.image(rect, image),
                None => {
                    for command in fallback {
                        self.paint(command);
                    }
                }
            },
        }
    }

    /// Draws one line of text with its baseline at canvas `y`.
    fn text(&mut self, x: f32, y: f32, text: &str, px: f32, weight: Weight, c: Rgba) {
        let face = self.book.face(weight);
        let size = px * self.scale;
        let baseline = y * self.scale;
        let mut pen = x * self.scale;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                pen += face.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }
            let (metrics, coverage) = face.rasterize(ch, size);
            if let Some(glyph) = glyph_pixmap(metrics.width as u32, metrics.height as u32, &coverage, c) {
                let gx = (pen + metrics.xmin as f32).round() as i32;
                let gy = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i32;
                self.pixmap.draw_pixmap(
                    gx,
                    gy,
                    glyph.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
            pen += metrics.advance_width;
            prev = Some(ch);
        }
    }

    /// Scales `image` to cover `rect`, cropping the overflow.
    fn image(&mut self, rect: &Rect, image: &Pixmap) {
        let dest = Rect::new(
            rect.x * self.scale,
            rect.y * self.scale,
            rect.width * self.scale,
            rect.height * self.scale,
        );
        let (iw, ih) = (image.width() as f32, image.height() as f32);
        let s = (dest.width / iw).max(dest.height / ih);
        let tx = dest.x + (dest.width - iw * s) / 2.0;
        let ty = dest.y + (dest.height - ih * s) / 2.0;
        let paint = Paint {
            shader: Pattern::new(
                image.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                1.0,
                Transform::from_row(s, 0.0, 0.0, s, tx, ty),
            ),
            anti_alias: true,
            ..Default::default()
        };
        if let Some(area) = tiny_skia::Rect::from_xywh(dest.x, dest.y, dest.width, dest.height) {
            self.pixmap
                .fill_rect(area, &paint, Transform::identity(), None);
        }
    }
}

/// Colours a coverage mask into a premultiplied glyph pixmap.
fn glyph_pixmap(width: u32, height: u32, coverage: &[u8], c: Rgba) -> Option<Pixmap> {
    let mut glyph = Pixmap::new(width, height)?;
    for (px, cov) in glyph.data_mut().chunks_exact_mut(4).zip(coverage) {
        let a = (c.3 as u32 * *cov as u32 + 127) / 255;
        px[0] = ((c.0 as u32 * a + 127) / 255) as u8;
        px[1] = ((c.1 as u32 * a + 127) / 255) as u8;
        px[2] = ((c.2 as u32 * a + 127) / 255) as u8;
        px[3] = a as u8;
    }
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_falls_back_to_plain_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let a = rounded_rect_path(&rect, 0.0).unwrap();
        let b = rect_path(&rect).unwrap();
        assert_eq!(a.bounds(), b.bounds());
        let rounded = rounded_rect_path(&rect, 50.0).unwrap();
        assert_eq!(rounded.bounds().width(), 10.0);
    }

    #[test]
    fn degenerate_shapes_produce_no_path() {
        assert!(rect_path(&Rect::new(0.0, 0.0, 0.0, 5.0)).is_none());
        assert!(shape_path(&Shape::Path {
            points: Vec::new(),
            closed: true
        })
        .is_none());
    }

    #[test]
    fn glyph_pixmap_is_premultiplied() {
        let glyph = glyph_pixmap(2, 1, &[255, 128], Rgba(200, 100, 0, 255)).unwrap();
        let data = glyph.data();
        assert_eq!(&data[..4], &[200, 100, 0, 255]);
        assert_eq!(data[7], 128);
        assert!(data[4] <= data[7]);
    }
}
