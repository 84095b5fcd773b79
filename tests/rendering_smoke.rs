use postercraft::rendering::ElementType;
use postercraft::{Canvas, LayoutHost, PosterRecord, TemplateId};

#[tokio::test]
async fn preview_is_a_scaled_copy_of_the_capture_target() {
    let mut host = LayoutHost::new("poster-preview", 0.5);
    for id in TemplateId::ALL {
        host.mount(&PosterRecord::seed(), id.descriptor()).unwrap();
        let offscreen = host.offscreen().unwrap();
        let onscreen = host.onscreen().unwrap();

        assert_eq!(offscreen.id.as_deref(), Some("poster-preview"));
        assert_eq!(onscreen.id, None);
        assert_eq!(offscreen.box_size(), Canvas::CANONICAL);
        assert_eq!(onscreen.box_size(), Canvas::CANONICAL);
        assert_eq!(onscreen.visual_size(), (400, 600));

        let preview = onscreen.snapshot().await.unwrap();
        assert_eq!((preview.width(), preview.height()), (400, 600));
    }
}

#[test]
fn oversized_text_never_grows_the_canvas() {
    let long = "word ".repeat(2000);
    let record = PosterRecord {
        title: Some(long.clone()),
        subtitle: Some(long.clone()),
        description: Some(long.clone()),
        additional_info: Some(long),
        ..PosterRecord::seed()
    };
    let canvas = postercraft::rendering::Rect::new(0.0, 0.0, 800.0, 1200.0);
    for id in TemplateId::ALL {
        let composition = postercraft::render(&record, id.descriptor()).unwrap();
        assert_eq!(composition.canvas, Canvas::CANONICAL);
        for node in &composition.nodes {
            assert!(canvas.contains(&node.rect), "{} {:?} escapes the canvas", id, node.elem_type);
        }
        let title = composition.find(ElementType::Title).unwrap();
        assert!(title.text().ends_with('…'), "{}", id);
    }
}

#[test]
fn empty_record_still_renders() {
    for id in TemplateId::ALL {
        let composition = postercraft::render(&PosterRecord::default(), id.descriptor()).unwrap();
        assert!(composition.find(ElementType::Title).is_some(), "{}", id);
    }
}
