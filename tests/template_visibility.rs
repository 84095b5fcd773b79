use postercraft::rendering::ElementType;
use postercraft::{render, Field, PosterRecord, TemplateId};

fn speaker_text(record: &PosterRecord, id: TemplateId) -> Option<String> {
    let composition = render(record, id.descriptor()).expect("render");
    composition.find(ElementType::Speaker).map(|n| n.text())
}

#[test]
fn absent_speaker_hides_the_row_everywhere() {
    let record = PosterRecord::seed().with(Field::Speaker, None);
    for id in TemplateId::ALL {
        assert_eq!(speaker_text(&record, id), None, "{}", id);
    }
}

#[test]
fn empty_speaker_shows_the_placeholder() {
    let record = PosterRecord::seed().with(Field::Speaker, Some(""));
    assert_eq!(
        speaker_text(&record, TemplateId::Template1).as_deref(),
        Some("Speaker to be announced")
    );
    assert_eq!(
        speaker_text(&record, TemplateId::Template2).as_deref(),
        Some("Keynote speaker to be announced")
    );
}

#[test]
fn present_speaker_is_rendered_verbatim() {
    let record = PosterRecord::seed().with(Field::Speaker, Some("Dr. Sara"));
    for id in TemplateId::ALL {
        assert_eq!(speaker_text(&record, id).as_deref(), Some("Dr. Sara"), "{}", id);
    }
}

#[test]
fn points_render_in_order_and_follow_edits() {
    let record = PosterRecord::seed().with_points(vec!["a".into(), "b".into(), "c".into()]);
    let composition = render(&record, TemplateId::Template4.descriptor()).unwrap();
    assert_eq!(composition.point_texts(), ["a", "b", "c"]);

    let removed = record.with_point_removed(1);
    let composition = render(&removed, TemplateId::Template4.descriptor()).unwrap();
    assert_eq!(composition.point_texts(), ["a", "c"]);

    let added = removed.with_point_added();
    let composition = render(&added, TemplateId::Template4.descriptor()).unwrap();
    assert_eq!(composition.point_texts(), ["a", "c", "New point"]);
}

#[test]
fn points_are_ignored_by_text_only_templates() {
    let record = PosterRecord::seed().with_points(vec!["a".into()]);
    for id in [TemplateId::Template1, TemplateId::Template2, TemplateId::Template3] {
        let composition = render(&record, id.descriptor()).unwrap();
        assert!(composition.point_texts().is_empty(), "{}", id);
    }
}

#[test]
fn missing_image_leaves_a_placeholder() {
    let composition = render(&PosterRecord::seed(), TemplateId::Template4.descriptor()).unwrap();
    assert!(composition.find(ElementType::ImagePlaceholder).is_some());
    assert!(composition.find(ElementType::HeroImage).is_none());

    let composition = render(&PosterRecord::seed(), TemplateId::Template1.descriptor()).unwrap();
    assert!(composition.find(ElementType::ImagePlaceholder).is_none());
}

#[test]
fn additional_info_only_where_the_template_shows_it() {
    let record = PosterRecord::seed();
    for id in TemplateId::ALL {
        let composition = render(&record, id.descriptor()).unwrap();
        let shown = composition.find(ElementType::AdditionalInfo).is_some();
        assert_eq!(shown, id != TemplateId::Template4, "{}", id);
    }
}

#[test]
fn placeholders_fill_empty_date_time_and_location() {
    let record = PosterRecord::seed()
        .with(Field::Date, Some(""))
        .with(Field::Time, None)
        .with(Field::Location, Some(""));
    let composition = render(&record, TemplateId::Template1.descriptor()).unwrap();
    let text = |t| composition.find(t).map(|n| n.text());
    assert_eq!(text(ElementType::Date).as_deref(), Some("Tuesday, 4 November"));
    assert_eq!(text(ElementType::Time).as_deref(), Some("11:00 AM"));
    assert_eq!(text(ElementType::Location).as_deref(), Some("Microsoft Teams"));
}

#[test]
fn empty_contact_email_shows_the_placeholder() {
    let record = PosterRecord::seed().with(Field::ContactEmail, Some(""));
    for id in TemplateId::ALL {
        let composition = render(&record, id.descriptor()).unwrap();
        let contact = composition.find(ElementType::Contact).map(|n| n.text());
        assert_eq!(contact.as_deref(), Some("contact@example.org"), "{}", id);
    }

    let record = PosterRecord::seed().with(Field::ContactEmail, None);
    for id in TemplateId::ALL {
        let composition = render(&record, id.descriptor()).unwrap();
        assert!(composition.find(ElementType::Contact).is_none(), "{}", id);
    }
}

#[test]
fn placeholders_survive_long_text() {
    let long = "A long paragraph that keeps going. ".repeat(60);
    let emptied = [
        Field::Speaker,
        Field::Date,
        Field::Time,
        Field::Location,
        Field::ContactEmail,
    ];
    let mut record = PosterRecord::seed()
        .with(Field::Description, Some(&long))
        .with(Field::AdditionalInfo, Some(&long))
        .with_points((1..=8).map(|i| format!("Point number {} with some words", i)).collect());
    for field in emptied {
        record = record.with(field, Some(""));
    }

    for id in TemplateId::ALL {
        let descriptor = id.descriptor();
        let composition = render(&record, descriptor).unwrap();
        for field in emptied {
            if !descriptor.style.surfaces(field) {
                continue;
            }
            let expected = descriptor.style.fields.rule(field).resolve(Some("")).unwrap();
            let shown = composition.find(ElementType::from(field)).map(|n| n.text());
            assert_eq!(shown.as_deref(), Some(expected.as_ref()), "{} {:?}", id, field);
        }
        if descriptor.style.surfaces_points() {
            assert!(!composition.point_texts().is_empty(), "{}", id);
        }
    }
}
