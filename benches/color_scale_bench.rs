use criterion::{black_box, criterion_group, criterion_main, Criterion};
use viso_qa::color::scale::{ColorList, ColorScale, ColorScaleProps};
use viso_qa::color::Color;

fn plddt_scale() -> ColorScale {
    ColorScale::discrete(ColorScaleProps {
        domain: [0.0, 100.0],
        list: ColorList::Offsets(vec![
            (Color(0xff7d45), 0.5),
            (Color(0xffdb13), 0.7),
            (Color(0x65cbf3), 0.9),
            (Color(0x0053d6), 1.0),
        ]),
        ..Default::default()
    })
}

fn single_color_benchmark(c: &mut Criterion) {
    let continuous = ColorScale::continuous(ColorScaleProps::default());
    c.bench_function("uniform_continuous_color", |b| {
        b.iter(|| black_box(continuous.color(black_box(0.37))))
    });

    let discrete = plddt_scale();
    c.bench_function("offset_discrete_color", |b| {
        b.iter(|| black_box(discrete.color(black_box(73.2))))
    });
}

fn buffer_fill_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalized_buffer_fill");
    let scale = plddt_scale();

    for count in [100, 1_000, 10_000] {
        let scores: Vec<f64> =
            (0..count).map(|i| (i % 101) as f64).collect();
        let mut buffer = vec![0.0f32; count * 3];

        group.bench_function(format!("{count}_residues"), |b| {
            b.iter(|| {
                for (i, &score) in scores.iter().enumerate() {
                    scale.normalized_color_to_array(score, &mut buffer, i * 3);
                }
                black_box(&buffer);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, single_color_benchmark, buffer_fill_benchmark);
criterion_main!(benches);
