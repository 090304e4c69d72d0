//! Benchmarks for sampling and the per-frame particle step.
//!
//! Run with: `cargo bench`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pixel_mosaic::{
    sample, Bitmap, Canvas, CanvasSize, ParticleField, PortraitConfig, Surface, Theme, Vec2, Vec4,
};

/// Counts draws without rasterizing, so only the physics is measured.
struct NullSurface {
    discs: usize,
}

impl Surface for NullSurface {
    fn fade(&mut self, _color: Vec4) {}

    fn fill_disc(&mut self, _center: Vec2, _radius: f32, _color: Vec4) {
        self.discs += 1;
    }
}

fn gradient(width: u32, height: u32) -> Bitmap {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) % 256) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Bitmap::from_rgba(width, height, data).unwrap()
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    let config = PortraitConfig::default();
    let canvas = CanvasSize::new(1280.0, 720.0);

    for size in [256u32, 1024, 2048] {
        let bitmap = gradient(size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bitmap, |b, bitmap| {
            b.iter(|| black_box(sample(bitmap, canvas, &config).unwrap()))
        });
    }

    group.finish();
}

fn bench_field_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_step");
    let canvas = CanvasSize::new(1280.0, 720.0);
    let pointer = Vec2::new(640.0, 360.0);
    let dt = Duration::from_millis(16);

    for step in [5u32, 3, 2] {
        let config = PortraitConfig::default().with_sampling_step(step);
        let seeds = sample(&gradient(1024, 1024), canvas, &config).unwrap();
        let count = seeds.len();
        let mut field = ParticleField::new(seeds, Theme::Night);
        let mut surface = NullSurface { discs: 0 };

        group.bench_function(BenchmarkId::new("particles", count), |b| {
            b.iter(|| {
                field.step(black_box(pointer), &config, dt, &mut surface);
            })
        });
    }

    group.finish();
}

fn bench_canvas_frame(c: &mut Criterion) {
    let config = PortraitConfig::default();
    let seeds = sample(&gradient(512, 512), CanvasSize::new(640.0, 480.0), &config).unwrap();
    let mut field = ParticleField::new(seeds, Theme::Night);
    let mut canvas = Canvas::new(640, 480);

    c.bench_function("canvas_frame_640x480", |b| {
        b.iter(|| {
            canvas.fade(Theme::Night.fade());
            field.step(Vec2::new(320.0, 240.0), &config, Duration::from_millis(16), &mut canvas);
        })
    });
}

criterion_group!(benches, bench_sample, bench_field_step, bench_canvas_frame);
criterion_main!(benches);
