//! The four shipped template styles

use crate::record::Field;
use crate::rendering::paint::{Fill, Rgba};

use super::style::{
    CardLook, Decoration, DetailGrid, FieldRule, FieldTable, Footer, Header, Labels, Palette,
    Section, TemplateStyle,
};

const PRIMARY: Rgba = Rgba::rgb(30, 123, 79);
const ACCENT: Rgba = Rgba::rgb(200, 150, 46);
const POSTER_BG: Rgba = Rgba::rgb(244, 241, 232);
const POSTER_TITLE: Rgba = Rgba::rgb(20, 83, 45);
const POSTER_TEXT: Rgba = Rgba::rgb(31, 41, 55);
const MUTED: Rgba = Rgba::rgb(107, 114, 128);
const SECONDARY: Rgba = Rgba::rgb(230, 239, 233);

const PALETTE: Palette = Palette {
    primary: PRIMARY,
    accent: ACCENT,
    background: POSTER_BG,
    surface: Rgba::WHITE,
    title: POSTER_TITLE,
    text: POSTER_TEXT,
    muted: MUTED,
    secondary: SECONDARY,
};

const ORG_LINES: [&str; 2] = [
    "General Administration of Corporate Communication and Media",
    "Internal Communication Department",
];

const MINISTRY: &str = "Ministry of Environment, Water & Agriculture";

const DATE_PLACEHOLDER: &str = "Tuesday, 4 November";
const TIME_PLACEHOLDER: &str = "11:00 AM";
const LOCATION_PLACEHOLDER: &str = "Microsoft Teams";

pub(super) const MODERN_EVENT: TemplateStyle = TemplateStyle {
    palette: PALETTE,
    backdrop: Fill::Solid(POSTER_BG),
    header: Header::OrgBar {
        height: 112.0,
        lines: ORG_LINES,
    },
    badge: Some("Majarra Platform"),
    sections: &[
        Section::Heading,
        Section::Description { boxed: false },
        Section::AdditionalInfo {
            heading: "Seminar Objectives",
        },
        Section::Details,
    ],
    details: DetailGrid::Flow {
        columns: 2,
        fields: &[Field::Speaker, Field::Date, Field::Time, Field::Location],
    },
    card: CardLook::Row,
    footer: Some(Footer {
        height: 128.0,
        fill: Fill::Solid(PRIMARY),
        caption: &["We welcome your participation"],
        contact: true,
        qr: Some("QR Code"),
        centered: false,
    }),
    labels: Labels {
        speaker: "Speaker",
        date: "Date",
        time: "Time",
        location: "Platform",
        contact: "Contact",
    },
    fields: FieldTable {
        title: FieldRule::Always("Public Invitation"),
        subtitle: FieldRule::Always("Seminar or event title"),
        description: FieldRule::Always("Event or seminar description"),
        date: FieldRule::Always(DATE_PLACEHOLDER),
        time: FieldRule::Always(TIME_PLACEHOLDER),
        location: FieldRule::Always(LOCATION_PLACEHOLDER),
        speaker: FieldRule::WhenPresent("Speaker to be announced"),
        contact_email: FieldRule::WhenPresent("contact@example.org"),
        additional_info: FieldRule::WhenPresent("Objectives to be announced"),
        image: FieldRule::Hidden,
        points: FieldRule::Hidden,
    },
    decorations: &[
        Decoration {
            cx: 0.0,
            cy: 224.0,
            r: 64.0,
            color: ACCENT.with_alpha(26),
        },
        Decoration {
            cx: 800.0,
            cy: 960.0,
            r: 80.0,
            color: PRIMARY.with_alpha(26),
        },
    ],
};

pub(super) const GRADIENT_PROFESSIONAL: TemplateStyle = TemplateStyle {
    palette: PALETTE,
    backdrop: Fill::Diagonal(POSTER_BG, SECONDARY),
    header: Header::TitleBanner {
        fill: Fill::Horizontal(PRIMARY, ACCENT),
    },
    badge: None,
    sections: &[
        Section::Description { boxed: true },
        Section::Details,
        Section::AdditionalInfo {
            heading: "Additional Information",
        },
        Section::ContactCard,
    ],
    details: DetailGrid::Rows(&[
        &[Field::Speaker],
        &[Field::Date, Field::Time],
        &[Field::Location],
    ]),
    card: CardLook::Row,
    footer: Some(Footer {
        height: 88.0,
        fill: Fill::Solid(POSTER_TEXT),
        caption: &[MINISTRY],
        contact: false,
        qr: None,
        centered: true,
    }),
    labels: Labels {
        speaker: "Keynote Speaker",
        date: "Date",
        time: "Time",
        location: "Platform / Venue",
        contact: "Contact & Inquiries",
    },
    fields: FieldTable {
        title: FieldRule::Always("Public Invitation"),
        subtitle: FieldRule::Always("Event title"),
        description: FieldRule::Always("Event description and main content of the seminar"),
        date: FieldRule::Always(DATE_PLACEHOLDER),
        time: FieldRule::Always(TIME_PLACEHOLDER),
        location: FieldRule::Always(LOCATION_PLACEHOLDER),
        speaker: FieldRule::WhenPresent("Keynote speaker to be announced"),
        contact_email: FieldRule::WhenPresent("contact@example.org"),
        additional_info: FieldRule::WhenPresent("Details to follow"),
        image: FieldRule::Hidden,
        points: FieldRule::Hidden,
    },
    decorations: &[],
};

pub(super) const ELEGANT_INVITATION: TemplateStyle = TemplateStyle {
    palette: PALETTE,
    backdrop: Fill::Solid(Rgba::WHITE),
    header: Header::Wash {
        height: 384.0,
        fill: Fill::Diagonal(PRIMARY.with_alpha(230), ACCENT.with_alpha(230)),
        lines: [MINISTRY, "Corporate Communication"],
    },
    badge: Some("Special Invitation"),
    sections: &[
        Section::Heading,
        Section::Description { boxed: true },
        Section::Details,
        Section::AdditionalInfo {
            heading: "Further Details",
        },
    ],
    details: DetailGrid::Flow {
        columns: 2,
        fields: &[Field::Speaker, Field::Date, Field::Time, Field::Location],
    },
    card: CardLook::Row,
    footer: Some(Footer {
        height: 160.0,
        fill: Fill::Horizontal3(PRIMARY, ACCENT, PRIMARY),
        caption: &[],
        contact: true,
        qr: Some("Scan to register"),
        centered: false,
    }),
    labels: Labels {
        speaker: "Speaker",
        date: "Date",
        time: "Time",
        location: "Platform / Venue",
        contact: "Contact",
    },
    fields: FieldTable {
        title: FieldRule::Always("Public Invitation"),
        subtitle: FieldRule::Always("Event or seminar title"),
        description: FieldRule::Always("Event description and main content"),
        date: FieldRule::Always(DATE_PLACEHOLDER),
        time: FieldRule::Always(TIME_PLACEHOLDER),
        location: FieldRule::Always(LOCATION_PLACEHOLDER),
        speaker: FieldRule::WhenPresent("Speaker to be announced"),
        contact_email: FieldRule::WhenPresent("contact@example.org"),
        additional_info: FieldRule::WhenPresent("Details to follow"),
        image: FieldRule::Hidden,
        points: FieldRule::Hidden,
    },
    decorations: &[
        Decoration {
            cx: 0.0,
            cy: 400.0,
            r: 128.0,
            color: PRIMARY.with_alpha(13),
        },
        Decoration {
            cx: 800.0,
            cy: 800.0,
            r: 160.0,
            color: ACCENT.with_alpha(13),
        },
    ],
};

pub(super) const CREATIVE_VISUAL: TemplateStyle = TemplateStyle {
    palette: Palette {
        title: Rgba::WHITE,
        ..PALETTE
    },
    backdrop: Fill::Diagonal(PRIMARY, PRIMARY.with_alpha(204)),
    header: Header::Hero { height: 400.0 },
    badge: None,
    sections: &[
        Section::Description { boxed: true },
        Section::Points,
        Section::Details,
        Section::SpeakerContact,
    ],
    details: DetailGrid::Flow {
        columns: 3,
        fields: &[Field::Date, Field::Time, Field::Location],
    },
    card: CardLook::Stacked,
    footer: None,
    labels: Labels {
        speaker: "Speaker",
        date: "Date",
        time: "Time",
        location: "Venue",
        contact: "Contact",
    },
    fields: FieldTable {
        title: FieldRule::Always("Event Title"),
        subtitle: FieldRule::Always("Event subtitle"),
        description: FieldRule::WhenPresent("Describe the event"),
        date: FieldRule::Always(DATE_PLACEHOLDER),
        time: FieldRule::Always(TIME_PLACEHOLDER),
        location: FieldRule::Always(LOCATION_PLACEHOLDER),
        speaker: FieldRule::WhenPresent("Speaker to be announced"),
        contact_email: FieldRule::WhenPresent("contact@example.org"),
        additional_info: FieldRule::Hidden,
        image: FieldRule::Always(""),
        points: FieldRule::WhenPresent("New point"),
    },
    decorations: &[],
};
