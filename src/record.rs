//! The poster data record
//!
//! Every field is optional at the data-model level. Whether an empty or
//! missing value shows a placeholder, an empty block, or nothing at all is
//! decided per template (see [`crate::template::FieldRule`]).

use serde::{Deserialize, Serialize};

/// Structured poster content, serialized with the camelCase keys the form
/// layer uses (`contactEmail`, `additionalInfo`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosterRecord {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    /// Embedded image as a `data:` URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ordered key points; empty strings are pending entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<String>>,
}

/// The single-valued text fields of a [`PosterRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Subtitle,
    Description,
    Date,
    Time,
    Location,
    Speaker,
    ContactEmail,
    AdditionalInfo,
    Image,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Title,
        Field::Subtitle,
        Field::Description,
        Field::Date,
        Field::Time,
        Field::Location,
        Field::Speaker,
        Field::ContactEmail,
        Field::AdditionalInfo,
        Field::Image,
    ];

    /// Key used in the serialized record.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::Description => "description",
            Field::Date => "date",
            Field::Time => "time",
            Field::Location => "location",
            Field::Speaker => "speaker",
            Field::ContactEmail => "contactEmail",
            Field::AdditionalInfo => "additionalInfo",
            Field::Image => "image",
        }
    }
}

impl PosterRecord {
    /// The record a new session starts from.
    pub fn seed() -> Self {
        Self {
            title: Some("Public Invitation".into()),
            subtitle: Some("Green Secondary Technologies for Removing Heavy Metals from Water".into()),
            description: Some("Towards sustainable solutions for the Kingdom's water sources".into()),
            date: Some("Tuesday, 4 November".into()),
            time: Some("11:00 AM".into()),
            location: Some("Microsoft Teams".into()),
            speaker: Some("Dr. Ahmed Al-Nuwaihi".into()),
            contact_email: Some("ICR@mewa.gov.sa".into()),
            additional_info: Some(
                "• Support the Vision 2030 targets for environmental sustainability and resource protection\n\
                 • Highlight the role of green secondary technologies in removing heavy metals from water sources"
                    .into(),
            ),
            image: None,
            points: None,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Title => &self.title,
            Field::Subtitle => &self.subtitle,
            Field::Description => &self.description,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Location => &self.location,
            Field::Speaker => &self.speaker,
            Field::ContactEmail => &self.contact_email,
            Field::AdditionalInfo => &self.additional_info,
            Field::Image => &self.image,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Subtitle => &mut self.subtitle,
            Field::Description => &mut self.description,
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
            Field::Location => &mut self.location,
            Field::Speaker => &mut self.speaker,
            Field::ContactEmail => &mut self.contact_email,
            Field::AdditionalInfo => &mut self.additional_info,
            Field::Image => &mut self.image,
        }
    }

    /// A copy of this record with one field replaced (`None` clears it).
    pub fn with(&self, field: Field, value: Option<&str>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(field) = value.map(str::to_string);
        next
    }

    /// Points as a slice; absent and empty lists look the same here.
    pub fn points(&self) -> &[String] {
        self.points.as_deref().unwrap_or(&[])
    }

    /// A copy with an empty point appended for the user to fill in.
    pub fn with_point_added(&self) -> Self {
        let mut points = self.points().to_vec();
        points.push(String::new());
        self.with_points(points)
    }

    /// A copy with point `index` replaced. Out-of-range indices leave the
    /// list unchanged.
    pub fn with_point(&self, index: usize, value: &str) -> Self {
        let mut points = self.points().to_vec();
        if let Some(slot) = points.get_mut(index) {
            *slot = value.to_string();
        }
        self.with_points(points)
    }

    /// A copy with point `index` removed, keeping the order of the rest.
    pub fn with_point_removed(&self, index: usize) -> Self {
        let points = self
            .points()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, p)| p.clone())
            .collect();
        self.with_points(points)
    }

    pub fn with_points(&self, points: Vec<String>) -> Self {
        Self {
            points: Some(points),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_replaces_a_single_field() {
        let base = PosterRecord::seed();
        let next = base.with(Field::Speaker, None);
        assert_eq!(next.speaker, None);
        assert_eq!(next.title, base.title);
        // The original is untouched.
        assert!(base.speaker.is_some());

        let blank = base.with(Field::Speaker, Some(""));
        assert_eq!(blank.get(Field::Speaker), Some(""));
    }

    #[test]
    fn point_edits_preserve_order() {
        let rec = PosterRecord::default()
            .with_points(vec!["a".into(), "b".into(), "c".into()]);
        let rec = rec.with_point_added();
        assert_eq!(rec.points(), ["a", "b", "c", ""]);

        let rec = rec.with_point(3, "d").with_point_removed(1);
        assert_eq!(rec.points(), ["a", "c", "d"]);

        let untouched = rec.with_point(10, "x");
        assert_eq!(untouched.points(), rec.points());
    }

    #[test]
    fn serde_uses_camel_case_and_skips_absent_optionals() {
        let rec = PosterRecord {
            title: Some("T".into()),
            contact_email: Some("a@b.c".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["contactEmail"], "a@b.c");
        assert!(json.get("speaker").is_none());
        assert!(json.get("points").is_none());

        let back: PosterRecord =
            serde_json::from_str(r#"{"title":"T","points":["x",""]}"#).unwrap();
        assert_eq!(back.points(), ["x", ""]);
        assert_eq!(back.subtitle, None);
    }

    #[test]
    fn field_keys_match_serialized_names() {
        let rec = PosterRecord::seed().with(Field::Image, Some("data:image/png;base64,AA=="));
        let json = serde_json::to_value(&rec).unwrap();
        for field in Field::ALL {
            assert_eq!(
                json.get(field.key()).and_then(|v| v.as_str()),
                rec.get(field),
                "field {:?}",
                field
            );
        }
    }
}
