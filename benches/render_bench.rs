use criterion::{black_box, criterion_group, criterion_main, Criterion};

use postercraft::rendering::embed::DecodedImages;
use postercraft::rendering::raster::rasterize;
use postercraft::{render, PosterRecord, TemplateId};

fn bench_compose(c: &mut Criterion) {
    let record = PosterRecord::seed();
    for id in TemplateId::ALL {
        c.bench_function(&format!("compose_{}", id), |b| {
            b.iter(|| render(black_box(&record), id.descriptor()).unwrap())
        });
    }
}

fn bench_capture(c: &mut Criterion) {
    let composition = render(&PosterRecord::seed(), TemplateId::Template1.descriptor()).unwrap();
    let images = DecodedImages::default();

    let mut group = c.benchmark_group("capture");
    group.sample_size(10);
    for scale in [1.0f32, 3.0] {
        group.bench_function(format!("template1_x{}", scale), |b| {
            b.iter(|| rasterize(black_box(&composition), scale, &images).unwrap())
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let composition = render(&PosterRecord::seed(), TemplateId::Template2.descriptor()).unwrap();
    let bitmap = rasterize(&composition, 2.0, &DecodedImages::default()).unwrap();

    let mut group = c.benchmark_group("encode");
    group.sample_size(10);
    group.bench_function("png", |b| b.iter(|| bitmap.encode_png().unwrap()));
    group.bench_function("pdf", |b| {
        let info = postercraft::export::DocumentInfo {
            title: Some("Bench"),
            date: chrono::NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
        };
        b.iter(|| {
            postercraft::export::write_document(&bitmap, postercraft::PageSize::a4(), &info).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_compose, bench_capture, bench_encode);
criterion_main!(benches);
