//! The generic poster layout engine
//!
//! One engine serves every template. It walks the template's declarative
//! [`TemplateStyle`] from top to bottom, resolves each record field through
//! the template's field-visibility table and emits positioned [`LayoutNode`]s
//! together with the display list the rasterizer paints.
//!
//! The canvas never grows. Before a section is laid out, the height every
//! later section needs at minimum is held back: field cards and the first row
//! of key points at full size, text blocks at one line. Text blocks then take
//! what is left and are clipped line by line (the last kept line ends with an
//! ellipsis), so overflow shortens text and never removes a field card.

use std::borrow::Cow;

use log::{debug, warn};

use crate::record::{Field, PosterRecord};
use crate::template::{CardLook, DetailGrid, Header, Section, TemplateStyle};
use crate::{Canvas, Result};

use super::paint::{Fill, Icon, PaintCommand, Rgba, Shape};
use super::text::{fonts, FontBook, Weight};

const PAD: f32 = 48.0;
const GAP: f32 = 24.0;
const CARD_GAP: f32 = 16.0;
const LINE_HEIGHT: f32 = 1.3;
const RADIUS: f32 = 16.0;
const BADGE_HEIGHT: f32 = 36.0;
const INFO_CARD_HEIGHT: f32 = 88.0;
const STACKED_CARD_HEIGHT: f32 = 136.0;
const POINT_CARD_HEIGHT: f32 = 80.0;
const POINT_COLUMNS: usize = 2;
const POINTS_HEADING: &str = "Key Points";

/// Axis-aligned box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn inset(&self, d: f32) -> Rect {
        Rect::new(self.x + d, self.y + d, self.width - 2.0 * d, self.height - 2.0 * d)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }
}

/// What a laid-out block shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Header,
    Footer,
    Badge,
    Title,
    Subtitle,
    Description,
    Speaker,
    Date,
    Time,
    Location,
    Contact,
    AdditionalInfo,
    HeroImage,
    ImagePlaceholder,
    PointCard { index: usize },
    QrCode,
}

impl From<Field> for ElementType {
    fn from(field: Field) -> Self {
        match field {
            Field::Title => ElementType::Title,
            Field::Subtitle => ElementType::Subtitle,
            Field::Description => ElementType::Description,
            Field::Date => ElementType::Date,
            Field::Time => ElementType::Time,
            Field::Location => ElementType::Location,
            Field::Speaker => ElementType::Speaker,
            Field::ContactEmail => ElementType::Contact,
            Field::AdditionalInfo => ElementType::AdditionalInfo,
            Field::Image => ElementType::HeroImage,
        }
    }
}

/// A positioned block together with the text lines it displays.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub rect: Rect,
    pub elem_type: ElementType,
    /// Fixed caption shown with the value (card labels, panel headings)
    pub label: Option<String>,
    pub lines: Vec<String>,
}

impl LayoutNode {
    /// The displayed value with line breaks folded back into spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    px: f32,
    weight: Weight,
    color: Rgba,
    align: Align,
}

impl TextStyle {
    fn new(px: f32, weight: Weight, color: Rgba) -> Self {
        Self {
            px,
            weight,
            color,
            align: Align::Start,
        }
    }

    fn centered(self) -> Self {
        Self {
            align: Align::Center,
            ..self
        }
    }

    fn line_height(&self) -> f32 {
        (self.px * LINE_HEIGHT).round()
    }
}

/// A run of lines stacked with others; `elem` of `None` records no node.
struct Piece {
    elem: Option<ElementType>,
    style: TextStyle,
    lines: Vec<String>,
}

fn stack_height(pieces: &[Piece], gap: f32) -> f32 {
    let lines: f32 = pieces
        .iter()
        .map(|p| p.lines.len() as f32 * p.style.line_height())
        .sum();
    lines + gap * pieces.len().saturating_sub(1) as f32
}

fn icon_for(field: Field) -> Icon {
    match field {
        Field::Speaker => Icon::Mic,
        Field::Date => Icon::Calendar,
        Field::Time => Icon::Clock,
        Field::Location => Icon::Pin,
        Field::ContactEmail => Icon::Mail,
        _ => Icon::Check,
    }
}

/// Height of `rows` card rows separated by [`CARD_GAP`].
fn rows_height(rows: f32, card_height: f32) -> f32 {
    if rows == 0.0 {
        0.0
    } else {
        rows * card_height + (rows - 1.0) * CARD_GAP
    }
}

/// Panel chrome (padding and heading) and body style of the additional
/// information panel.
fn additional_info_styles(style: &TemplateStyle) -> (f32, TextStyle) {
    let head = TextStyle::new(22.0, Weight::Bold, style.palette.title);
    let body = TextStyle::new(18.0, Weight::Regular, style.palette.text);
    (2.0 * 24.0 + head.line_height() + 8.0, body)
}

fn points_heading_style(style: &TemplateStyle) -> TextStyle {
    TextStyle::new(26.0, Weight::Bold, style.palette.title)
}

/// Lays `record` out with `style` on `canvas`.
pub fn compose(
    record: &PosterRecord,
    style: &TemplateStyle,
    canvas: Canvas,
) -> Result<(Vec<LayoutNode>, Vec<PaintCommand>)> {
    let book = fonts()?;
    let mut composer = Composer::new(book, style, record, canvas);
    composer.backdrop();
    composer.header();
    let reserved = composer.reservations();
    for (section, reserve) in style.sections.iter().zip(reserved) {
        composer.text_limit = composer.limit - reserve;
        composer.section(*section);
    }
    composer.footer();
    debug!(
        "composed {} nodes and {} paint commands",
        composer.nodes.len(),
        composer.commands.len()
    );
    Ok((composer.nodes, composer.commands))
}

struct Composer<'a> {
    book: &'static FontBook,
    style: &'a TemplateStyle,
    record: &'a PosterRecord,
    canvas: Rect,
    /// Top of the next body block
    y: f32,
    /// Lowest y a body block may reach
    limit: f32,
    /// Lowest y clippable text may reach while later sections keep their room
    text_limit: f32,
    nodes: Vec<LayoutNode>,
    commands: Vec<PaintCommand>,
}

impl<'a> Composer<'a> {
    fn new(book: &'static FontBook, style: &'a TemplateStyle, record: &'a PosterRecord, canvas: Canvas) -> Self {
        let canvas = Rect::new(0.0, 0.0, canvas.width as f32, canvas.height as f32);
        let limit = match style.footer {
            Some(footer) => canvas.height - footer.height - GAP,
            None => canvas.height - PAD,
        };
        Self {
            book,
            style,
            record,
            canvas,
            y: PAD,
            limit,
            text_limit: limit,
            nodes: Vec::new(),
            commands: Vec::new(),
        }
    }

    fn content_width(&self) -> f32 {
        self.canvas.width - 2.0 * PAD
    }

    fn resolve(&self, field: Field) -> Option<Cow<'a, str>> {
        self.style.fields.rule(field).resolve(self.record.get(field))
    }

    fn label(&self, field: Field) -> &'static str {
        let labels = &self.style.labels;
        match field {
            Field::Speaker => labels.speaker,
            Field::Date => labels.date,
            Field::Time => labels.time,
            Field::Location => labels.location,
            Field::ContactEmail => labels.contact,
            _ => "",
        }
    }

    fn set(&self, text: &str, style: TextStyle, width: f32, max_lines: usize, what: &str) -> Vec<String> {
        let lines = self.book.wrap(text, style.px, style.weight, width);
        let (lines, clipped) = self.book.clip_lines(lines, max_lines, style.px, style.weight, width);
        if clipped {
            warn!("{} clipped to {} line(s) to fit the canvas", what, max_lines);
        }
        lines
    }

    /// Lines of `style` that still fit above the limit next to `chrome`
    /// pixels of padding.
    fn room(&self, style: TextStyle, chrome: f32) -> usize {
        ((self.text_limit - self.y - chrome) / style.line_height()).floor().max(0.0) as usize
    }

    /// Wrapped line count of `text`, capped at `max_lines`, without clipping.
    fn line_count(&self, text: &str, style: TextStyle, width: f32, max_lines: usize) -> usize {
        self.book
            .wrap(text, style.px, style.weight, width)
            .len()
            .min(max_lines)
    }

    /// For each section, the height that the sections after it need at
    /// minimum, gaps included.
    fn reservations(&self) -> Vec<f32> {
        let needs: Vec<f32> = self
            .style
            .sections
            .iter()
            .map(|s| self.min_height(*s))
            .map(|h| if h > 0.0 { h + GAP } else { 0.0 })
            .collect();
        (0..needs.len()).map(|i| needs[i + 1..].iter().sum()).collect()
    }

    /// Smallest height `section` renders at for the current record; zero when
    /// it renders nothing.
    fn min_height(&self, section: Section) -> f32 {
        let palette = self.style.palette;
        match section {
            Section::Heading => {
                let (chrome, inset) = self.heading_frame();
                let width = self.content_width() - 2.0 * inset;
                let title = TextStyle::new(56.0, Weight::Bold, palette.title);
                let subtitle = TextStyle::new(28.0, Weight::Regular, palette.primary);
                let mut pieces = 0;
                let mut lines = 0.0;
                if let Some(text) = self.resolve(Field::Title) {
                    pieces += 1;
                    lines += self.line_count(&text, title, width, 2) as f32 * title.line_height();
                }
                if let Some(text) = self.resolve(Field::Subtitle) {
                    pieces += 1;
                    lines += self.line_count(&text, subtitle, width, 3) as f32 * subtitle.line_height();
                }
                let gaps = 12.0 * (pieces as f32 - 1.0).max(0.0);
                chrome + self.badge_height() + lines + gaps
            }
            Section::Description { boxed } => match self.resolve(Field::Description) {
                Some(_) => {
                    let pad = if boxed { 24.0 } else { 0.0 };
                    2.0 * pad + TextStyle::new(20.0, Weight::Regular, palette.text).line_height()
                }
                None => 0.0,
            },
            Section::AdditionalInfo { .. } => match self.resolve(Field::AdditionalInfo) {
                Some(_) => {
                    let (chrome, body) = additional_info_styles(self.style);
                    chrome + body.line_height()
                }
                None => 0.0,
            },
            Section::Details => {
                let height = self.detail_card_height();
                let rows = self.detail_rows().len() as f32;
                rows_height(rows, height)
            }
            Section::Points => {
                if self.style.fields.points.is_hidden() || self.record.points().is_empty() {
                    0.0
                } else {
                    points_heading_style(self.style).line_height() + 12.0 + POINT_CARD_HEIGHT
                }
            }
            Section::ContactCard => self.contact_height(&[Field::ContactEmail]),
            Section::SpeakerContact => self.contact_height(&[Field::Speaker, Field::ContactEmail]),
        }
    }

    fn contact_height(&self, fields: &[Field]) -> f32 {
        if self.present(fields).is_empty() {
            0.0
        } else {
            INFO_CARD_HEIGHT
        }
    }

    /// Resolved values of `fields`, skipping the ones that render nothing.
    fn present(&self, fields: &[Field]) -> Vec<(Field, Cow<'a, str>)> {
        fields
            .iter()
            .filter_map(|f| self.resolve(*f).map(|v| (*f, v)))
            .collect()
    }

    fn draw(&mut self, lines: &[String], style: TextStyle, x: f32, top: f32, width: f32) -> f32 {
        let lh = style.line_height();
        let baseline = (lh - style.px) / 2.0 + self.book.ascent(style.px, style.weight);
        for (i, line) in lines.iter().enumerate() {
            let lx = match style.align {
                Align::Start => x,
                Align::Center => x + (width - self.book.measure(line, style.px, style.weight)) / 2.0,
            };
            self.commands.push(PaintCommand::Text {
                x: lx,
                y: top + i as f32 * lh + baseline,
                text: line.clone(),
                px: style.px,
                weight: style.weight,
                color: style.color,
            });
        }
        lines.len() as f32 * lh
    }

    fn draw_stack(&mut self, pieces: Vec<Piece>, x: f32, top: f32, width: f32, gap: f32) -> f32 {
        let mut y = top;
        for piece in pieces {
            let h = self.draw(&piece.lines, piece.style, x, y, width);
            if let Some(elem) = piece.elem {
                self.node(Rect::new(x, y, width, h), elem, None, piece.lines);
            }
            y += h + gap;
        }
        (y - gap - top).max(0.0)
    }

    fn node(&mut self, rect: Rect, elem_type: ElementType, label: Option<&str>, lines: Vec<String>) {
        self.nodes.push(LayoutNode {
            rect,
            elem_type,
            label: label.map(str::to_string),
            lines,
        });
    }

    fn card(&mut self, rect: Rect, color: Rgba, radius: f32) {
        let shadow = Rect::new(rect.x, rect.y + 4.0, rect.width, rect.height);
        self.commands.push(PaintCommand::solid(
            Shape::RoundedRect { rect: shadow, radius },
            Rgba(0, 0, 0, 18),
        ));
        self.commands
            .push(PaintCommand::solid(Shape::RoundedRect { rect, radius }, color));
    }

    fn advance(&mut self, height: f32) {
        self.y += height + GAP;
    }

    fn title_pieces(&self, title: TextStyle, subtitle: TextStyle, width: f32, max_title: usize, max_subtitle: usize) -> Vec<Piece> {
        let mut pieces = Vec::new();
        if let Some(text) = self.resolve(Field::Title) {
            pieces.push(Piece {
                elem: Some(ElementType::Title),
                style: title,
                lines: self.set(&text, title, width, max_title, "title"),
            });
        }
        if let Some(text) = self.resolve(Field::Subtitle) {
            pieces.push(Piece {
                elem: Some(ElementType::Subtitle),
                style: subtitle,
                lines: self.set(&text, subtitle, width, max_subtitle, "subtitle"),
            });
        }
        pieces
    }

    fn backdrop(&mut self) {
        let full = self.canvas;
        self.commands
            .push(PaintCommand::fill(Shape::Rect(full), self.style.backdrop.brush(full)));
        for d in self.style.decorations {
            self.commands.push(PaintCommand::solid(
                Shape::Circle {
                    cx: d.cx,
                    cy: d.cy,
                    r: d.r,
                },
                d.color,
            ));
        }
    }

    fn logo(&mut self, rect: Rect) {
        let r = rect.width / 2.0;
        self.commands.push(PaintCommand::solid(
            Shape::Circle {
                cx: rect.x + r,
                cy: rect.y + r,
                r,
            },
            Rgba::WHITE,
        ));
        let glyph = rect.inset(rect.width * 0.22);
        self.commands
            .extend(Icon::Leaf.commands(glyph, self.style.palette.primary));
    }

    fn badge(&mut self, text: &str, center_x: f32, top: f32) {
        let style = TextStyle::new(16.0, Weight::Bold, Rgba::WHITE).centered();
        let width = self.book.measure(text, style.px, style.weight) + 40.0;
        let rect = Rect::new(center_x - width / 2.0, top, width, BADGE_HEIGHT);
        self.commands.push(PaintCommand::solid(
            Shape::RoundedRect {
                rect,
                radius: BADGE_HEIGHT / 2.0,
            },
            self.style.palette.accent,
        ));
        let lines = vec![text.to_string()];
        let text_top = top + (BADGE_HEIGHT - style.line_height()) / 2.0;
        self.draw(&lines, style, rect.x, text_top, rect.width);
        self.node(rect, ElementType::Badge, None, lines);
    }

    fn header(&mut self) {
        match self.style.header {
            Header::OrgBar { height, lines } => self.org_bar(height, lines),
            Header::TitleBanner { fill } => self.title_banner(fill),
            Header::Wash { height, fill, lines } => self.wash(height, fill, lines),
            Header::Hero { height } => self.hero(height),
        }
    }

    fn org_bar(&mut self, height: f32, lines: [&str; 2]) {
        let bar = Rect::new(0.0, 0.0, self.canvas.width, height);
        self.commands
            .push(PaintCommand::solid(Shape::Rect(bar), self.style.palette.primary));
        let logo = Rect::new(PAD, (height - 64.0) / 2.0, 64.0, 64.0);
        self.logo(logo);

        let x = logo.right() + 20.0;
        let width = self.canvas.width - x - PAD;
        let strong = TextStyle::new(18.0, Weight::Bold, Rgba::WHITE);
        let soft = TextStyle::new(15.0, Weight::Regular, Rgba::WHITE.alpha(0.85));
        let pieces = vec![
            Piece {
                elem: None,
                style: strong,
                lines: self.set(lines[0], strong, width, 1, "header"),
            },
            Piece {
                elem: None,
                style: soft,
                lines: self.set(lines[1], soft, width, 1, "header"),
            },
        ];
        let shown: Vec<String> = pieces.iter().flat_map(|p| p.lines.clone()).collect();
        let top = (height - stack_height(&pieces, 2.0)) / 2.0;
        self.draw_stack(pieces, x, top, width, 2.0);
        self.node(bar, ElementType::Header, None, shown);
        self.y = height + 40.0;
    }

    fn title_banner(&mut self, fill: Fill) {
        let logo_size = 72.0;
        let width = self.content_width() - logo_size - GAP;
        let title = TextStyle::new(52.0, Weight::Bold, Rgba::WHITE);
        let subtitle = TextStyle::new(26.0, Weight::Regular, Rgba::WHITE.alpha(0.9));
        let pieces = self.title_pieces(title, subtitle, width, 2, 3);
        let inner = stack_height(&pieces, 12.0).max(logo_size);
        let banner = Rect::new(0.0, 0.0, self.canvas.width, inner + 2.0 * PAD);

        self.commands
            .push(PaintCommand::fill(Shape::Rect(banner), fill.brush(banner)));
        self.logo(Rect::new(self.canvas.width - PAD - logo_size, PAD, logo_size, logo_size));
        self.draw_stack(pieces, PAD, PAD, width, 12.0);
        self.node(banner, ElementType::Header, None, Vec::new());
        self.y = banner.bottom() + 40.0;
    }

    fn wash(&mut self, height: f32, fill: Fill, lines: [&str; 2]) {
        let rect = Rect::new(0.0, 0.0, self.canvas.width, height);
        self.commands
            .push(PaintCommand::fill(Shape::Rect(rect), fill.brush(rect)));
        self.logo(Rect::new(self.canvas.width / 2.0 - 28.0, 28.0, 56.0, 56.0));

        let width = self.content_width();
        let strong = TextStyle::new(18.0, Weight::Bold, Rgba::WHITE).centered();
        let soft = TextStyle::new(15.0, Weight::Regular, Rgba::WHITE.alpha(0.85)).centered();
        let pieces = vec![
            Piece {
                elem: None,
                style: strong,
                lines: self.set(lines[0], strong, width, 1, "header"),
            },
            Piece {
                elem: None,
                style: soft,
                lines: self.set(lines[1], soft, width, 1, "header"),
            },
        ];
        let shown: Vec<String> = pieces.iter().flat_map(|p| p.lines.clone()).collect();
        self.draw_stack(pieces, PAD, 96.0, width, 2.0);
        self.node(rect, ElementType::Header, None, shown);
        // The title card floats over the lower part of the wash.
        self.y = 176.0;
    }

    fn image_placeholder(&self, rect: Rect) -> Vec<PaintCommand> {
        let palette = self.style.palette;
        let mut commands = vec![PaintCommand::fill(
            Shape::Rect(rect),
            Fill::Diagonal(palette.accent, palette.primary).brush(rect),
        )];
        let glyph = 120.0;
        let at = Rect::new(
            rect.x + (rect.width - glyph) / 2.0,
            rect.y + (rect.height - glyph) / 2.0 - 40.0,
            glyph,
            glyph,
        );
        commands.extend(Icon::Target.commands(at, Rgba::WHITE.alpha(0.6)));
        commands
    }

    fn hero(&mut self, height: f32) {
        let rect = Rect::new(0.0, 0.0, self.canvas.width, height);
        let placeholder = self.image_placeholder(rect);
        match self.resolve(Field::Image).filter(|src| !src.is_empty()) {
            Some(source) => {
                self.commands.push(PaintCommand::Image {
                    rect,
                    source: source.into_owned(),
                    fallback: placeholder,
                });
                self.node(rect, ElementType::HeroImage, None, Vec::new());
            }
            None => {
                self.commands.extend(placeholder);
                self.node(rect, ElementType::ImagePlaceholder, None, Vec::new());
            }
        }

        let scrim = Rect::new(0.0, height * 0.4, self.canvas.width, height * 0.6);
        self.commands.push(PaintCommand::fill(
            Shape::Rect(scrim),
            Fill::Rising(Rgba(0, 0, 0, 170), Rgba::TRANSPARENT).brush(scrim),
        ));

        let width = self.content_width();
        let title = TextStyle::new(48.0, Weight::Bold, Rgba::WHITE);
        let subtitle = TextStyle::new(24.0, Weight::Regular, Rgba::WHITE.alpha(0.9));
        let pieces = self.title_pieces(title, subtitle, width, 2, 2);
        let top = height - 40.0 - stack_height(&pieces, 10.0);
        self.draw_stack(pieces, PAD, top, width, 10.0);
        self.y = height + 32.0;
    }

    fn section(&mut self, section: Section) {
        match section {
            Section::Heading => self.heading(),
            Section::Description { boxed } => self.description(boxed),
            Section::AdditionalInfo { heading } => self.additional_info(heading),
            Section::Details => self.details(),
            Section::Points => self.points(),
            Section::ContactCard => self.contact_row(&[Field::ContactEmail]),
            Section::SpeakerContact => self.contact_row(&[Field::Speaker, Field::ContactEmail]),
        }
    }

    fn heading(&mut self) {
        let carded = matches!(self.style.header, Header::Wash { .. });
        let (chrome, inset) = self.heading_frame();
        let x = PAD + inset;
        let width = self.content_width() - 2.0 * inset;
        let palette = self.style.palette;
        let title = TextStyle::new(56.0, Weight::Bold, palette.title).centered();
        let subtitle = TextStyle::new(28.0, Weight::Regular, palette.primary).centered();
        let pieces = self.title_pieces(title, subtitle, width, 2, 3);
        let badge = self.badge_height();
        let height = chrome + badge + stack_height(&pieces, 12.0);

        let top = self.y;
        if carded {
            self.card(Rect::new(PAD, top, self.content_width(), height), palette.surface, 24.0);
        }
        let mut y = top + chrome / 2.0;
        if let Some(text) = self.style.badge {
            self.badge(text, self.canvas.width / 2.0, y);
            y += badge;
        }
        self.draw_stack(pieces, x, y, width, 12.0);
        self.advance(height);
    }

    /// Vertical chrome and horizontal inset of the heading block; headings
    /// under a wash sit on a card.
    fn heading_frame(&self) -> (f32, f32) {
        if matches!(self.style.header, Header::Wash { .. }) {
            (64.0, 40.0)
        } else {
            (0.0, 0.0)
        }
    }

    fn badge_height(&self) -> f32 {
        if self.style.badge.is_some() {
            BADGE_HEIGHT + 20.0
        } else {
            0.0
        }
    }

    fn description(&mut self, boxed: bool) {
        let Some(text) = self.resolve(Field::Description) else {
            return;
        };
        let palette = self.style.palette;
        let mut style = TextStyle::new(20.0, Weight::Regular, palette.text);
        if !boxed {
            style = style.centered();
        }
        let pad = if boxed { 24.0 } else { 0.0 };
        let max_lines = self.room(style, 2.0 * pad).min(6);
        if max_lines == 0 {
            warn!("description dropped: no room left on the canvas");
            return;
        }
        let width = self.content_width() - 2.0 * pad;
        let lines = self.set(&text, style, width, max_lines, "description");
        let block = Rect::new(PAD, self.y, self.content_width(), lines.len() as f32 * style.line_height() + 2.0 * pad);
        if boxed {
            self.card(block, palette.surface, RADIUS);
            self.commands.push(PaintCommand::solid(
                Shape::Rect(Rect::new(block.x, block.y + RADIUS, 4.0, block.height - 2.0 * RADIUS)),
                palette.accent,
            ));
        }
        self.draw(&lines, style, PAD + pad, self.y + pad, width);
        self.node(block, ElementType::Description, None, lines);
        self.advance(block.height);
    }

    fn additional_info(&mut self, heading: &str) {
        let Some(text) = self.resolve(Field::AdditionalInfo) else {
            return;
        };
        let palette = self.style.palette;
        let head = TextStyle::new(22.0, Weight::Bold, palette.title);
        let (chrome, body) = additional_info_styles(self.style);
        let pad = 24.0;
        let max_lines = self.room(body, chrome).min(8);
        if max_lines == 0 {
            warn!("additional information dropped: no room left on the canvas");
            return;
        }
        let width = self.content_width() - 2.0 * pad;
        let head_lines = self.set(heading, head, width, 1, "additional information heading");
        let lines = self.set(&text, body, width, max_lines, "additional information");
        let panel = Rect::new(PAD, self.y, self.content_width(), chrome + lines.len() as f32 * body.line_height());

        self.commands.push(PaintCommand::solid(
            Shape::RoundedRect {
                rect: panel,
                radius: RADIUS,
            },
            palette.secondary,
        ));
        self.draw(&head_lines, head, PAD + pad, self.y + pad, width);
        self.draw(&lines, body, PAD + pad, self.y + pad + head.line_height() + 8.0, width);
        self.node(panel, ElementType::AdditionalInfo, Some(heading), lines);
        self.advance(panel.height);
    }

    fn detail_rows(&self) -> Vec<(usize, Vec<(Field, Cow<'a, str>)>)> {
        match self.style.details {
            DetailGrid::Flow { columns, fields } => {
                let columns = columns.max(1);
                let present = self.present(fields);
                present.chunks(columns).map(|row| (columns, row.to_vec())).collect()
            }
            DetailGrid::Rows(rows) => rows
                .iter()
                .map(|row| self.present(row))
                .filter(|row| !row.is_empty())
                .map(|row| (row.len(), row))
                .collect(),
        }
    }

    fn detail_card_height(&self) -> f32 {
        match self.style.card {
            CardLook::Row => INFO_CARD_HEIGHT,
            CardLook::Stacked => STACKED_CARD_HEIGHT,
        }
    }

    fn details(&mut self) {
        let rows = self.detail_rows();
        self.card_rows(rows, self.style.card, self.detail_card_height());
    }

    fn contact_row(&mut self, fields: &[Field]) {
        let row = self.present(fields);
        if row.is_empty() {
            return;
        }
        self.card_rows(vec![(row.len(), row)], CardLook::Row, INFO_CARD_HEIGHT);
    }

    fn card_rows(&mut self, rows: Vec<(usize, Vec<(Field, Cow<'a, str>)>)>, look: CardLook, height: f32) {
        if rows.is_empty() {
            return;
        }
        for (columns, row) in rows {
            if self.y + height > self.limit {
                warn!("detail row dropped: no room left on the canvas");
                break;
            }
            let width = (self.content_width() - CARD_GAP * (columns - 1) as f32) / columns as f32;
            for (i, (field, value)) in row.iter().enumerate() {
                let rect = Rect::new(PAD + i as f32 * (width + CARD_GAP), self.y, width, height);
                self.info_card(rect, *field, value, look);
            }
            self.y += height + CARD_GAP;
        }
        self.y += GAP - CARD_GAP;
    }

    fn info_card(&mut self, rect: Rect, field: Field, value: &str, look: CardLook) {
        let palette = self.style.palette;
        let label = self.label(field);
        self.card(rect, palette.surface, RADIUS);

        let (badge, text_x, text_width, label_style, value_style, top, max_lines) = match look {
            CardLook::Row => {
                let badge = Rect::new(rect.x + 20.0, rect.y + (rect.height - 48.0) / 2.0, 48.0, 48.0);
                let x = badge.right() + 16.0;
                let label_style = TextStyle::new(14.0, Weight::Regular, palette.muted);
                let value_style = TextStyle::new(18.0, Weight::Bold, palette.text);
                let top = rect.y + (rect.height - label_style.line_height() - 4.0 - value_style.line_height()) / 2.0;
                (badge, x, rect.right() - 20.0 - x, label_style, value_style, top, 1)
            }
            CardLook::Stacked => {
                let badge = Rect::new(rect.x + (rect.width - 48.0) / 2.0, rect.y + 16.0, 48.0, 48.0);
                let label_style = TextStyle::new(14.0, Weight::Regular, palette.muted).centered();
                let value_style = TextStyle::new(16.0, Weight::Bold, palette.text).centered();
                (badge, rect.x + 12.0, rect.width - 24.0, label_style, value_style, rect.y + 72.0, 2)
            }
        };

        let r = badge.width / 2.0;
        self.commands.push(PaintCommand::solid(
            Shape::Circle {
                cx: badge.x + r,
                cy: badge.y + r,
                r,
            },
            palette.secondary,
        ));
        self.commands
            .extend(icon_for(field).commands(badge.inset(12.0), palette.primary));

        let label_lines = self.set(label, label_style, text_width, 1, "card label");
        let value_lines = self.set(value, value_style, text_width, max_lines, label);
        let h = self.draw(&label_lines, label_style, text_x, top, text_width);
        self.draw(&value_lines, value_style, text_x, top + h + 4.0, text_width);
        self.node(rect, ElementType::from(field), Some(label), value_lines);
    }

    fn points(&mut self) {
        let rule = self.style.fields.points;
        let points = self.record.points();
        if rule.is_hidden() || points.is_empty() {
            return;
        }
        let palette = self.style.palette;
        let head = points_heading_style(self.style);
        if self.y + head.line_height() + 12.0 + POINT_CARD_HEIGHT > self.limit {
            warn!("key points dropped: no room left on the canvas");
            return;
        }
        let heading = vec![POINTS_HEADING.to_string()];
        let h = self.draw(&heading, head, PAD, self.y, self.content_width());
        self.y += h + 12.0;

        let number = TextStyle::new(18.0, Weight::Bold, Rgba::WHITE).centered();
        let body = TextStyle::new(17.0, Weight::Regular, palette.text);
        let width = (self.content_width() - CARD_GAP * (POINT_COLUMNS - 1) as f32) / POINT_COLUMNS as f32;
        for (row, chunk) in points.chunks(POINT_COLUMNS).enumerate() {
            // The first row has its room held back; later rows share what
            // the text blocks may use.
            let limit = if row == 0 { self.limit } else { self.text_limit };
            if self.y + POINT_CARD_HEIGHT > limit {
                warn!(
                    "{} key point(s) dropped: no room left on the canvas",
                    points.len() - row * POINT_COLUMNS
                );
                break;
            }
            for (col, point) in chunk.iter().enumerate() {
                let index = row * POINT_COLUMNS + col;
                let rect = Rect::new(PAD + col as f32 * (width + CARD_GAP), self.y, width, POINT_CARD_HEIGHT);
                self.card(rect, palette.surface.alpha(0.95), RADIUS);

                let cx = rect.x + 36.0;
                let cy = rect.y + rect.height / 2.0;
                self.commands.push(PaintCommand::solid(
                    Shape::Circle { cx, cy, r: 20.0 },
                    palette.accent,
                ));
                let ordinal = vec![(index + 1).to_string()];
                self.draw(&ordinal, number, cx - 20.0, cy - number.line_height() / 2.0, 40.0);

                let text = rule.resolve(Some(point.as_str())).unwrap_or_default();
                let x = cx + 36.0;
                let text_width = rect.right() - 16.0 - x;
                let lines = self.set(&text, body, text_width, 2, "key point");
                let top = cy - lines.len() as f32 * body.line_height() / 2.0;
                self.draw(&lines, body, x, top, text_width);
                self.node(rect, ElementType::PointCard { index }, Some(&ordinal[0]), lines);
            }
            self.y += POINT_CARD_HEIGHT + CARD_GAP;
        }
        self.y += GAP - CARD_GAP;
    }

    fn footer(&mut self) {
        let Some(footer) = self.style.footer else {
            return;
        };
        let rect = Rect::new(0.0, self.canvas.height - footer.height, self.canvas.width, footer.height);
        self.commands
            .push(PaintCommand::fill(Shape::Rect(rect), footer.fill.brush(rect)));

        let mut width = self.content_width();
        if let Some(caption) = footer.qr {
            let size = 88.0;
            let tile = Rect::new(
                self.canvas.width - PAD - size,
                rect.y + (rect.height - size - 20.0) / 2.0,
                size,
                size,
            );
            self.commands.push(PaintCommand::solid(
                Shape::RoundedRect { rect: tile, radius: 8.0 },
                Rgba::WHITE,
            ));
            self.commands
                .extend(Icon::Qr.commands(tile.inset(8.0), self.style.palette.primary));
            let style = TextStyle::new(12.0, Weight::Regular, Rgba::WHITE).centered();
            let lines = self.set(caption, style, size + 32.0, 1, "QR caption");
            self.draw(&lines, style, tile.x - 16.0, tile.bottom() + 4.0, size + 32.0);
            self.node(tile, ElementType::QrCode, Some(caption), Vec::new());
            width -= size + GAP;
        }

        let mut strong = TextStyle::new(20.0, Weight::Bold, Rgba::WHITE);
        let mut soft = TextStyle::new(16.0, Weight::Regular, Rgba::WHITE.alpha(0.9));
        if footer.centered {
            strong = strong.centered();
            soft = soft.centered();
        }
        let mut pieces = Vec::new();
        for (i, line) in footer.caption.iter().enumerate() {
            let style = if i == 0 { strong } else { soft };
            pieces.push(Piece {
                elem: None,
                style,
                lines: self.set(line, style, width, 1, "footer caption"),
            });
        }
        let caption: Vec<String> = pieces.iter().flat_map(|p| p.lines.clone()).collect();
        if footer.contact {
            if let Some(email) = self.resolve(Field::ContactEmail) {
                pieces.push(Piece {
                    elem: Some(ElementType::Contact),
                    style: soft,
                    lines: self.set(&email, soft, width, 1, "contact"),
                });
            }
        }
        let top = rect.y + (rect.height - stack_height(&pieces, 6.0)) / 2.0;
        self.draw_stack(pieces, PAD, top, width, 6.0);
        self.node(rect, ElementType::Footer, None, caption);
    }
}
