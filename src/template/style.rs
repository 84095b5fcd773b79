//! Declarative template descriptions
//!
//! A [`TemplateStyle`] is pure data: colours, which header arrangement to
//! use, which body sections appear in which order and how each record field
//! is treated. The generic layout engine in [`crate::rendering::layout`]
//! interprets it.

use std::borrow::Cow;

use crate::record::Field;
use crate::rendering::paint::{Fill, Rgba};

/// How a template treats one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Never rendered by this template.
    Hidden,
    /// Always rendered; absent or empty values show the placeholder.
    Always(&'static str),
    /// Absent values omit the block; empty values show the placeholder.
    WhenPresent(&'static str),
}

impl FieldRule {
    /// Text to render for `value`, or `None` when the block is omitted.
    pub fn resolve<'a>(&self, value: Option<&'a str>) -> Option<Cow<'a, str>> {
        match (*self, value) {
            (FieldRule::Hidden, _) => None,
            (FieldRule::WhenPresent(_), None) => None,
            (FieldRule::Always(p), None) => Some(Cow::Borrowed(p)),
            (FieldRule::Always(p) | FieldRule::WhenPresent(p), Some("")) => Some(Cow::Borrowed(p)),
            (_, Some(v)) => Some(Cow::Borrowed(v)),
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, FieldRule::Hidden)
    }
}

/// Per-field visibility table of one template
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    pub title: FieldRule,
    pub subtitle: FieldRule,
    pub description: FieldRule,
    pub date: FieldRule,
    pub time: FieldRule,
    pub location: FieldRule,
    pub speaker: FieldRule,
    pub contact_email: FieldRule,
    pub additional_info: FieldRule,
    /// The placeholder is drawn as a decorative glyph, not as text.
    pub image: FieldRule,
    /// Applies to the list as a whole (`WhenPresent` omits empty lists too)
    /// and supplies the placeholder for empty entries.
    pub points: FieldRule,
}

impl FieldTable {
    pub fn rule(&self, field: Field) -> FieldRule {
        match field {
            Field::Title => self.title,
            Field::Subtitle => self.subtitle,
            Field::Description => self.description,
            Field::Date => self.date,
            Field::Time => self.time,
            Field::Location => self.location,
            Field::Speaker => self.speaker,
            Field::ContactEmail => self.contact_email,
            Field::AdditionalInfo => self.additional_info,
            Field::Image => self.image,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub primary: Rgba,
    pub accent: Rgba,
    pub background: Rgba,
    pub surface: Rgba,
    pub title: Rgba,
    pub text: Rgba,
    pub muted: Rgba,
    pub secondary: Rgba,
}

/// Top-of-poster arrangement; it also decides where the title goes.
#[derive(Debug, Clone, Copy)]
pub enum Header {
    /// Organisation strip with a round logo; title flows in the body.
    OrgBar { height: f32, lines: [&'static str; 2] },
    /// Coloured banner carrying title, subtitle and logo.
    TitleBanner { fill: Fill },
    /// Gradient wash behind a floating title card.
    Wash {
        height: f32,
        fill: Fill,
        lines: [&'static str; 2],
    },
    /// Full-bleed image with title and subtitle overlaid at its bottom.
    Hero { height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Badge, title and subtitle (body-placed headers only)
    Heading,
    Description { boxed: bool },
    AdditionalInfo { heading: &'static str },
    Details,
    Points,
    ContactCard,
    SpeakerContact,
}

/// Arrangement of the speaker/date/time/location cards
#[derive(Debug, Clone, Copy)]
pub enum DetailGrid {
    /// Present fields flow left to right into `columns` columns.
    Flow {
        columns: usize,
        fields: &'static [Field],
    },
    /// Fixed rows; a row whose fields are all omitted disappears.
    Rows(&'static [&'static [Field]]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLook {
    /// Icon at the start, label above value
    Row,
    /// Centered icon, label and value stacked
    Stacked,
}

#[derive(Debug, Clone, Copy)]
pub struct Footer {
    pub height: f32,
    pub fill: Fill,
    pub caption: &'static [&'static str],
    /// Shows the contact e-mail under the caption (or alone)
    pub contact: bool,
    /// Caption of the QR placeholder tile, when the footer has one
    pub qr: Option<&'static str>,
    pub centered: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub speaker: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub contact: &'static str,
}

/// Translucent background circle
#[derive(Debug, Clone, Copy)]
pub struct Decoration {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateStyle {
    pub palette: Palette,
    pub backdrop: Fill,
    pub header: Header,
    pub badge: Option<&'static str>,
    pub sections: &'static [Section],
    pub details: DetailGrid,
    pub card: CardLook,
    pub footer: Option<Footer>,
    pub labels: Labels,
    pub fields: FieldTable,
    pub decorations: &'static [Decoration],
}

impl TemplateStyle {
    /// Whether editing `field` can change this template's output; used to
    /// show only the relevant form inputs.
    pub fn surfaces(&self, field: Field) -> bool {
        !self.fields.rule(field).is_hidden()
    }

    pub fn surfaces_points(&self) -> bool {
        !self.fields.points.is_hidden() && self.sections.contains(&Section::Points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_distinct() {
        let rule = FieldRule::WhenPresent("Speaker TBA");
        assert_eq!(rule.resolve(None), None);
        assert_eq!(rule.resolve(Some("")).as_deref(), Some("Speaker TBA"));
        assert_eq!(rule.resolve(Some("Dr. X")).as_deref(), Some("Dr. X"));
    }

    #[test]
    fn always_substitutes_for_absent_and_empty() {
        let rule = FieldRule::Always("Public Invitation");
        assert_eq!(rule.resolve(None).as_deref(), Some("Public Invitation"));
        assert_eq!(rule.resolve(Some("")).as_deref(), Some("Public Invitation"));
        assert_eq!(rule.resolve(Some("Gala")).as_deref(), Some("Gala"));
    }

    #[test]
    fn hidden_never_renders() {
        assert_eq!(FieldRule::Hidden.resolve(Some("x")), None);
        assert_eq!(FieldRule::Hidden.resolve(None), None);
    }
}
