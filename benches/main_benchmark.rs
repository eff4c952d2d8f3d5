use adept::cli;
use adept::index::{GroupIndex, MasterIndex};
use adept::options::help;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const MOCK_MASTER_INDEX: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<metadata>
  <androidx.activity/>
  <androidx.appcompat/>
  <androidx.core/>
  <androidx.core.uwb/>
  <com.google.android.material/>
</metadata>
"#;

const MOCK_GROUP_INDEX: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<com.google.android.material>
  <material versions="1.0.0-alpha1,1.0.0-alpha3,1.0.0-beta01,1.0.0-rc01,1.0.0,1.1.0,1.2.0,1.3.0,1.4.0"/>
</com.google.android.material>
"#;

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn bench_parse_args(c: &mut Criterion) {
    let raw = args(&[
        "-r",
        "custom.repo",
        "-d",
        "libs",
        "com.google.android.material:1.4.0",
        "-f",
        "-i",
        "idx.xml",
        "androidx.core:1.6.0",
    ]);

    c.bench_function("parse_all", |b| {
        b.iter(|| {
            let mut table = cli::option_table();
            let mut tokens = raw.clone();
            table.parse_all(black_box(&mut tokens)).unwrap();
            tokens
        })
    });
}

fn bench_render_help(c: &mut Criterion) {
    let table = cli::option_table();

    c.bench_function("render_option_help", |b| {
        let repo = table.get(cli::REPO).unwrap();
        b.iter(|| help::render(black_box(repo), 0, 25, black_box(60)))
    });

    c.bench_function("help_text", |b| {
        b.iter(|| cli::help_text(black_box(&table), black_box(100)))
    });
}

fn bench_index_parse(c: &mut Criterion) {
    c.bench_function("parse_master_index", |b| {
        b.iter(|| MasterIndex::parse(black_box(MOCK_MASTER_INDEX)))
    });

    c.bench_function("parse_group_index", |b| {
        b.iter(|| GroupIndex::parse(black_box(MOCK_GROUP_INDEX)))
    });

    let index = MasterIndex::parse(MOCK_MASTER_INDEX).unwrap();
    c.bench_function("locate_package", |b| {
        b.iter(|| index.locate(black_box("androidx.core.core-ktx")).unwrap())
    });
}

criterion_group!(benches, bench_parse_args, bench_render_help, bench_index_parse);
criterion_main!(benches);
