//! Template catalog
//!
//! The set of templates is fixed at compile time. Each [`TemplateDescriptor`]
//! pairs an identifier and a bilingual display name with the declarative
//! [`TemplateStyle`] the layout engine renders from.

mod catalog;
pub mod style;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use style::{
    CardLook, Decoration, DetailGrid, FieldRule, FieldTable, Footer, Header, Labels, Palette,
    Section, TemplateStyle,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Template1,
    Template2,
    Template3,
    Template4,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Template1,
        TemplateId::Template2,
        TemplateId::Template3,
        TemplateId::Template4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Template1 => "template1",
            TemplateId::Template2 => "template2",
            TemplateId::Template3 => "template3",
            TemplateId::Template4 => "template4",
        }
    }

    pub fn descriptor(&self) -> &'static TemplateDescriptor {
        let index = TemplateId::ALL.iter().position(|id| id == self).unwrap_or(0);
        &REGISTRY[index]
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownTemplate(s.to_string()))
    }
}

/// Static description of one template variant
#[derive(Debug)]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub name: &'static str,
    pub name_ar: &'static str,
    pub style: TemplateStyle,
}

static REGISTRY: [TemplateDescriptor; 4] = [
    TemplateDescriptor {
        id: TemplateId::Template1,
        name: "Modern Event Poster",
        name_ar: "قالب الفعالية الحديث",
        style: catalog::MODERN_EVENT,
    },
    TemplateDescriptor {
        id: TemplateId::Template2,
        name: "Gradient Professional",
        name_ar: "قالب احترافي متدرج",
        style: catalog::GRADIENT_PROFESSIONAL,
    },
    TemplateDescriptor {
        id: TemplateId::Template3,
        name: "Elegant Invitation",
        name_ar: "قالب الدعوة الأنيق",
        style: catalog::ELEGANT_INVITATION,
    },
    TemplateDescriptor {
        id: TemplateId::Template4,
        name: "Creative Visual",
        name_ar: "قالب مرئي إبداعي",
        style: catalog::CREATIVE_VISUAL,
    },
];

/// All templates in display order.
pub fn registry() -> &'static [TemplateDescriptor] {
    &REGISTRY
}

/// Look up a template by its string identifier.
pub fn find(id: &str) -> Result<&'static TemplateDescriptor> {
    id.parse::<TemplateId>().map(|id| id.descriptor())
}
