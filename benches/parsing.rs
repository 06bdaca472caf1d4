
use config_generator::generate_config;
use criterion::{Criterion, criterion_group, criterion_main};
use tinyconf::{CommentFilter, ConfigDocument, LineParser};

fn parsing_benchmarks(c: &mut Criterion) {
    // Generate configs of different sizes
    let small = generate_config(50);
    let medium = generate_config(300);
    let large = generate_config(1_000);
    let xlarge = generate_config(10_000);

    let mut group = c.benchmark_group("parsing");

    for (name, input) in [
        ("small_50_lines", &small),
        ("medium_300_lines", &medium),
        ("large_1000_lines", &large),
        ("xlarge_10000_lines", &xlarge),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| ConfigDocument::from_text(input).to_store())
        });
    }

    group.finish();
}

fn line_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("line");

    group.bench_function("parse_bare_pair", |b| {
        b.iter(|| LineParser::parse_line("  key with space = some value  "))
    });

    group.bench_function("parse_quoted_pair", |b| {
        b.iter(|| LineParser::parse_line("url = \"http://host/?q=1#frag\""))
    });

    group.bench_function("filter_comments", |b| {
        b.iter(|| {
            let mut filter = CommentFilter::new();
            filter.filter("value = 'a;b' /* inline */ # trailing")
        })
    });

    group.finish();
}

fn perf_benchmark(c: &mut Criterion) {
    // 1 million lines - generated once, benchmarked separately
    let perf = generate_config(1_000_000);

    let mut group = c.benchmark_group("perf");
    group.sample_size(10); // Fewer samples for very large configs

    group.bench_function("perf_1M_lines", |b| {
        b.iter(|| ConfigDocument::from_text(&perf).to_store())
    });

    group.finish();
}

criterion_group!(benches, parsing_benchmarks, line_benchmarks, perf_benchmark);
criterion_main!(benches);
