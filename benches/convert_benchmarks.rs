//! Benchmarks for pipeline execution and option merging

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use submarin_converter::merge::merge;
use submarin_converter::{
    convert_fn, convert_fn_with_option, Converter, ConverterOptions, Plugin, StepRef,
};
use tokio::runtime::Runtime;

fn create_converter() -> Converter {
    Converter::new(
        [
            (
                "double",
                Plugin::new(vec![convert_fn(|text| Ok(format!("{text}{text}")))]),
            ),
            (
                "suffix",
                Plugin::new(vec![convert_fn_with_option(|text, option| {
                    Ok(format!(
                        "{}{}",
                        text,
                        option["suffix"].as_str().unwrap_or_default()
                    ))
                })])
                .with_default_option(json!({ "suffix": "" })),
            ),
            (
                "fallback",
                Plugin::new(vec![
                    convert_fn(|_| Err("first attempt fails".into())),
                    convert_fn(|text| Ok(text.to_uppercase())),
                ]),
            ),
        ],
        ConverterOptions::default(),
    )
    .expect("Failed to create converter")
}

fn pipeline(length: usize) -> Vec<StepRef> {
    (0..length)
        .map(|i| match i % 3 {
            0 => StepRef::with_option("suffix", json!({ "suffix": "x" })),
            1 => StepRef::from("fallback"),
            _ => StepRef::from("suffix"),
        })
        .collect()
}

fn bench_pipeline_length(c: &mut Criterion) {
    let runtime = Runtime::new().expect("Failed to create runtime");
    let converter = create_converter();
    let mut group = c.benchmark_group("pipeline_length");

    for length in [1, 10, 100] {
        let steps = pipeline(length);
        group.bench_with_input(BenchmarkId::from_parameter(length), &steps, |b, steps| {
            b.to_async(&runtime).iter(|| async {
                let output = converter
                    .convert("benchmark", steps.iter().cloned())
                    .await
                    .expect("convert failed");
                black_box(output);
            });
        });
    }

    group.finish();
}

fn bench_double_growth(c: &mut Criterion) {
    let runtime = Runtime::new().expect("Failed to create runtime");
    let converter = create_converter();

    c.bench_function("double_x10", |b| {
        b.to_async(&runtime).iter(|| async {
            let output = converter
                .convert("ab", std::iter::repeat("double").take(10))
                .await
                .expect("convert failed");
            black_box(output.text.len());
        });
    });
}

fn nested_option(depth: usize, width: usize) -> Value {
    let mut value = json!({ "leaf": depth, "tags": ["a", "b", "c"] });
    for level in 0..depth {
        let mut map = serde_json::Map::new();
        for key in 0..width {
            map.insert(format!("k{level}_{key}"), value.clone());
        }
        value = Value::Object(map);
    }
    value
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for depth in [1, 3, 5] {
        let base = nested_option(depth, 3);
        let overlay = nested_option(depth, 2);
        group.bench_with_input(
            BenchmarkId::new("nested", depth),
            &(base, overlay),
            |b, (base, overlay)| {
                b.iter(|| black_box(merge(black_box(base), black_box(overlay))));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pipeline_length,
    bench_double_growth,
    bench_merge
);
criterion_main!(benches);
