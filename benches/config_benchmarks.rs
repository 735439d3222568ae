use criterion::{criterion_group, criterion_main, Criterion};
use settings_patcher::config::{load_config_from_str, loader::default_config_content};
use settings_patcher::Config;
use std::hint::black_box;

fn bench_config_creation(c: &mut Criterion) {
    c.bench_function("config_default", |b| b.iter(Config::default));
}

fn bench_config_loading(c: &mut Criterion) {
    c.bench_function("config_from_default_file", |b| {
        b.iter(|| load_config_from_str(black_box(default_config_content())))
    });

    let toml_str = toml::to_string(&Config::default()).unwrap();
    c.bench_function("config_from_toml", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(&toml_str)))
    });
}

fn bench_config_validation(c: &mut Criterion) {
    let config = Config::default();
    c.bench_function("config_validate", |b| b.iter(|| black_box(&config).validate()));
}

criterion_group!(
    benches,
    bench_config_creation,
    bench_config_loading,
    bench_config_validation
);
criterion_main!(benches);
