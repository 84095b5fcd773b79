//! Display-list commands produced by layout and consumed by the rasterizer
use super::layout::Rect;
use super::text::Weight;

/// Straight (non-premultiplied) RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba(self.0, self.1, self.2, a)
    }

    /// Same colour at `opacity` (0..=1) of its current alpha.
    pub fn alpha(self, opacity: f32) -> Self {
        let a = (self.3 as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Rgba(self.0, self.1, self.2, a)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    RoundedRect { rect: Rect, radius: f32 },
    Circle { cx: f32, cy: f32, r: f32 },
    /// Polyline through the points, closed into a polygon when `closed`
    Path { points: Vec<(f32, f32)>, closed: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Rgba),
    Linear {
        start: (f32, f32),
        end: (f32, f32),
        stops: Vec<(f32, Rgba)>,
    },
}

/// Style-level fill that becomes a [`Brush`] once the target box is known
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    /// Left to right
    Horizontal(Rgba, Rgba),
    /// Left to right through a middle colour
    Horizontal3(Rgba, Rgba, Rgba),
    /// Top-left to bottom-right
    Diagonal(Rgba, Rgba),
    /// Bottom to top
    Rising(Rgba, Rgba),
}

impl Fill {
    pub fn brush(&self, rect: Rect) -> Brush {
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        match *self {
            Fill::Solid(c) => Brush::Solid(c),
            Fill::Horizontal(a, z) => Brush::Linear {
                start: (l, t),
                end: (r, t),
                stops: vec![(0.0, a), (1.0, z)],
            },
            Fill::Horizontal3(a, m, z) => Brush::Linear {
                start: (l, t),
                end: (r, t),
                stops: vec![(0.0, a), (0.5, m), (1.0, z)],
            },
            Fill::Diagonal(a, z) => Brush::Linear {
                start: (l, t),
                end: (r, b),
                stops: vec![(0.0, a), (1.0, z)],
            },
            Fill::Rising(a, z) => Brush::Linear {
                start: (l, b),
                end: (l, t),
                stops: vec![(0.0, a), (1.0, z)],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Fill {
        shape: Shape,
        brush: Brush,
    },
    Stroke {
        shape: Shape,
        color: Rgba,
        width: f32,
    },
    /// One laid-out line; `y` is the baseline
    Text {
        x: f32,
        y: f32,
        text: String,
        px: f32,
        weight: Weight,
        color: Rgba,
    },
    /// Embedded picture scaled to cover `rect` (cropped, never stretched).
    /// `fallback` is painted instead when the source cannot be decoded.
    Image {
        rect: Rect,
        source: String,
        fallback: Vec<PaintCommand>,
    },
}

impl PaintCommand {
    pub fn fill(shape: Shape, brush: Brush) -> Self {
        PaintCommand::Fill { shape, brush }
    }

    pub fn solid(shape: Shape, color: Rgba) -> Self {
        PaintCommand::Fill {
            shape,
            brush: Brush::Solid(color),
        }
    }
}

/// Small vector pictograms drawn inside info cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Calendar,
    Clock,
    Pin,
    Mic,
    Mail,
    Check,
    Target,
    Leaf,
    Qr,
}

impl Icon {
    /// Expands the icon into primitive commands fitted into `rect`.
    pub fn commands(&self, rect: Rect, color: Rgba) -> Vec<PaintCommand> {
        let s = rect.width.min(rect.height);
        let (x, y) = (rect.x + (rect.width - s) / 2.0, rect.y + (rect.height - s) / 2.0);
        let cx = x + s / 2.0;
        let cy = y + s / 2.0;
        let line = (s / 12.0).max(1.0);
        let at = |fx: f32, fy: f32| (x + fx * s, y + fy * s);
        match self {
            Icon::Calendar => vec![
                PaintCommand::Stroke {
                    shape: Shape::RoundedRect {
                        rect: Rect::new(x + s * 0.1, y + s * 0.2, s * 0.8, s * 0.7),
                        radius: s * 0.08,
                    },
                    color,
                    width: line,
                },
                PaintCommand::solid(Shape::Rect(Rect::new(x + s * 0.1, y + s * 0.2, s * 0.8, s * 0.18)), color),
                PaintCommand::solid(Shape::Rect(Rect::new(x + s * 0.28, y + s * 0.08, line, s * 0.2)), color),
                PaintCommand::solid(Shape::Rect(Rect::new(x + s * 0.68, y + s * 0.08, line, s * 0.2)), color),
            ],
            Icon::Clock => vec![
                PaintCommand::Stroke {
                    shape: Shape::Circle { cx, cy, r: s * 0.4 },
                    color,
                    width: line,
                },
                PaintCommand::Stroke {
                    shape: Shape::Path {
                        points: vec![at(0.5, 0.25), at(0.5, 0.5), at(0.68, 0.62)],
                        closed: false,
                    },
                    color,
                    width: line,
                },
            ],
            Icon::Pin => vec![
                PaintCommand::solid(
                    Shape::Path {
                        points: vec![at(0.22, 0.42), at(0.5, 0.95), at(0.78, 0.42)],
                        closed: true,
                    },
                    color,
                ),
                PaintCommand::solid(Shape::Circle { cx, cy: y + s * 0.38, r: s * 0.3 }, color),
            ],
            Icon::Mic => vec![
                PaintCommand::solid(
                    Shape::RoundedRect {
                        rect: Rect::new(x + s * 0.36, y + s * 0.08, s * 0.28, s * 0.52),
                        radius: s * 0.14,
                    },
                    color,
                ),
                PaintCommand::Stroke {
                    shape: Shape::Path {
                        points: vec![at(0.22, 0.45), at(0.28, 0.66), at(0.5, 0.74), at(0.72, 0.66), at(0.78, 0.45)],
                        closed: false,
                    },
                    color,
                    width: line,
                },
                PaintCommand::solid(Shape::Rect(Rect::new(cx - line / 2.0, y + s * 0.74, line, s * 0.16)), color),
            ],
            Icon::Mail => vec![
                PaintCommand::Stroke {
                    shape: Shape::Rect(Rect::new(x + s * 0.1, y + s * 0.22, s * 0.8, s * 0.56)),
                    color,
                    width: line,
                },
                PaintCommand::Stroke {
                    shape: Shape::Path {
                        points: vec![at(0.1, 0.22), at(0.5, 0.55), at(0.9, 0.22)],
                        closed: false,
                    },
                    color,
                    width: line,
                },
            ],
            Icon::Check => vec![
                PaintCommand::Stroke {
                    shape: Shape::Circle { cx, cy, r: s * 0.42 },
                    color,
                    width: line,
                },
                PaintCommand::Stroke {
                    shape: Shape::Path {
                        points: vec![at(0.3, 0.52), at(0.45, 0.66), at(0.72, 0.38)],
                        closed: false,
                    },
                    color,
                    width: line * 1.4,
                },
            ],
            Icon::Target => vec![
                PaintCommand::Stroke {
                    shape: Shape::Circle { cx, cy, r: s * 0.45 },
                    color,
                    width: line,
                },
                PaintCommand::Stroke {
                    shape: Shape::Circle { cx, cy, r: s * 0.28 },
                    color,
                    width: line,
                },
                PaintCommand::solid(Shape::Circle { cx, cy, r: s * 0.1 }, color),
            ],
            Icon::Leaf => vec![
                PaintCommand::solid(
                    Shape::Path {
                        points: vec![at(0.5, 0.08), at(0.78, 0.42), at(0.5, 0.76), at(0.22, 0.42)],
                        closed: true,
                    },
                    color,
                ),
                PaintCommand::solid(Shape::Rect(Rect::new(cx - line / 2.0, y + s * 0.6, line, s * 0.32)), color),
            ],
            Icon::Qr => qr_commands(x, y, s, color),
        }
    }
}

/// Decorative QR-like tile: three finder squares and a fixed module pattern.
fn qr_commands(x: f32, y: f32, s: f32, color: Rgba) -> Vec<PaintCommand> {
    const MODULES: usize = 9;
    const PATTERN: [u16; MODULES] = [
        0b000010000,
        0b000101000,
        0b000011000,
        0b101100101,
        0b010011010,
        0b110101001,
        0b000010110,
        0b000101011,
        0b000110101,
    ];
    let m = s / MODULES as f32;
    let mut out = Vec::new();
    for (fx, fy) in [(0.0, 0.0), (6.0, 0.0), (0.0, 6.0)] {
        out.push(PaintCommand::Stroke {
            shape: Shape::Rect(Rect::new(x + fx * m + m * 0.5, y + fy * m + m * 0.5, m * 2.0, m * 2.0)),
            color,
            width: m,
        });
    }
    for (row, bits) in PATTERN.iter().enumerate() {
        for col in 0..MODULES {
            let in_finder = (row < 3 && col < 3) || (row < 3 && col >= 6) || (row >= 6 && col < 3);
            if !in_finder && bits & (1 << (MODULES - 1 - col)) != 0 {
                out.push(PaintCommand::solid(
                    Shape::Rect(Rect::new(x + col as f32 * m, y + row as f32 * m, m, m)),
                    color,
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_command_debug() {
        let cmd = PaintCommand::solid(Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)), Rgba(255, 0, 0, 255));
        match cmd {
            PaintCommand::Fill {
                shape: Shape::Rect(r),
                ..
            } => assert_eq!(r.width, 10.0),
            _ => panic!("unexpected"),
        }
    }

    #[test]
    fn alpha_scales_existing_alpha() {
        assert_eq!(Rgba::WHITE.alpha(0.5), Rgba(255, 255, 255, 128));
        assert_eq!(Rgba(1, 2, 3, 100).alpha(2.0), Rgba(1, 2, 3, 100));
    }

    #[test]
    fn icons_stay_inside_their_box() {
        let rect = Rect::new(10.0, 20.0, 40.0, 40.0);
        for icon in [Icon::Calendar, Icon::Clock, Icon::Pin, Icon::Mic, Icon::Mail, Icon::Check, Icon::Qr] {
            let cmds = icon.commands(rect, Rgba::WHITE);
            assert!(!cmds.is_empty(), "{:?}", icon);
            for cmd in cmds {
                if let PaintCommand::Fill { shape: Shape::Rect(r), .. } = cmd {
                    assert!(r.x >= rect.x - 0.01 && r.right() <= rect.right() + 0.01, "{:?}", icon);
                }
            }
        }
    }

    #[test]
    fn diagonal_fill_spans_the_box() {
        let rect = Rect::new(0.0, 0.0, 800.0, 1200.0);
        match Fill::Diagonal(Rgba::WHITE, Rgba::TRANSPARENT).brush(rect) {
            Brush::Linear { start, end, stops } => {
                assert_eq!(start, (0.0, 0.0));
                assert_eq!(end, (800.0, 1200.0));
                assert_eq!(stops.len(), 2);
            }
            other => panic!("unexpected brush {:?}", other),
        }
    }
}
