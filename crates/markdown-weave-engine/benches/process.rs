use criterion::{Criterion, criterion_group, criterion_main};
use markdown_weave_engine::{MarkdownProcessor, TraceCompiler};
mod common;

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);

    let text = MarkdownProcessor::rich_text(80).expect("rich text processor");
    group.bench_function("rich_text", |b| {
        b.iter(|| {
            let output = text.process(std::hint::black_box(&content));
            std::hint::black_box(output);
        });
    });

    let blocks = MarkdownProcessor::blocks().expect("block processor");
    group.bench_function("blocks", |b| {
        b.iter(|| {
            let output = blocks.process(std::hint::black_box(&content));
            std::hint::black_box(output);
        });
    });

    let trace = text
        .with_compiler(TraceCompiler::new)
        .expect("trace processor");
    group.bench_function("trace", |b| {
        b.iter(|| {
            let output = trace.process(std::hint::black_box(&content));
            std::hint::black_box(output);
        });
    });

    group.finish();
}

fn bench_backtracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("backtracking");
    group.sample_size(10);

    let content = common::generate_unmatched_openers(200);
    let processor = MarkdownProcessor::rich_text(80).expect("rich text processor");
    group.bench_function("unmatched_openers", |b| {
        b.iter(|| {
            let output = processor.process(std::hint::black_box(&content));
            std::hint::black_box(output);
        });
    });

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.sample_size(10);

    group.bench_function("rich_text", |b| {
        b.iter(|| std::hint::black_box(MarkdownProcessor::rich_text(80)));
    });

    group.finish();
}

criterion_group!(benches, bench_process, bench_backtracking, bench_assembly);
criterion_main!(benches);
