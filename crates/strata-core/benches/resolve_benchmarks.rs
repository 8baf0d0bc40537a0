use criterion::{Criterion, black_box, criterion_group, criterion_main};
use strata_core::{Config, ConfigOption, EnvironmentSource};

const LAYERS: usize = 32;

/// `LAYERS` merged configs; only the bottom one defines `target`.
fn deep_chain() -> Config {
    let bottom = Config::named("bottom");
    bottom.add_source(EnvironmentSource::from_vars("", [("TARGET", "found")]));
    bottom.add_option(ConfigOption::new("target")).unwrap();

    (0..LAYERS).fold(bottom, |merged, index| {
        let layer = Config::named(format!("layer{index}"));
        layer
            .add_option(ConfigOption::with_default(format!("filler{index}"), index as i64))
            .unwrap();
        &merged + &layer
    })
}

fn deep_chain_benchmark(c: &mut Criterion) {
    c.bench_function("Config::value (deep chain)", |b| {
        let config = deep_chain();
        b.iter(|| config.value(black_box("target")).unwrap())
    });
}

fn flattened_benchmark(c: &mut Criterion) {
    c.bench_function("Config::value (flattened)", |b| {
        let config = deep_chain();
        config.flatten();
        b.iter(|| config.value(black_box("target")).unwrap())
    });
}

fn cache_benchmark(c: &mut Criterion) {
    c.bench_function("Config::cache (deep chain)", |b| {
        let config = deep_chain();
        b.iter(|| config.cache().unwrap())
    });
}

criterion_group!(
    benches,
    deep_chain_benchmark,
    flattened_benchmark,
    cache_benchmark
);
criterion_main!(benches);
