use bibfolio::{check, Database};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_bibliography(n_entries: usize) -> String {
    let mut bib = String::with_capacity(n_entries * 250);

    bib.push_str(
        r#"@string{wrr = "Water Resources Research"}
@string{jclim = "Journal of Climate"}

"#,
    );

    for i in 0..n_entries {
        let journal = if i % 2 == 0 { "wrr" } else { "jclim" };
        let entry = format!(
            r#"@article{{paper{i},
    author = "Author {i} and Doss-Gollin, James",
    title = "Flood Risk Paper Number {i}",
    journaltitle = {journal},
    date = "{}-03-01",
    volume = {},
    pages = "{}--{}",
    doi = "10.1029/2023WR{i:06}"
}}

"#,
            2000 + (i % 25),
            i % 60,
            i * 10,
            i * 10 + 9
        );
        bib.push_str(&entry);
    }

    bib
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for size in [10, 100, 1000].iter() {
        let input = generate_bibliography(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| {
                let db = Database::parse(black_box(input)).unwrap();
                black_box(db);
            });
        });
    }

    group.finish();
}

fn bench_fixture_files(c: &mut Criterion) {
    let papers = include_str!("../tests/fixtures/papers.bib");
    let library = include_str!("../tests/fixtures/library.bib");

    c.bench_function("parse_papers", |b| {
        b.iter(|| {
            let db = Database::parse(black_box(papers)).unwrap();
            black_box(db);
        });
    });

    c.bench_function("parse_library", |b| {
        b.iter(|| {
            let db = Database::parse(black_box(library)).unwrap();
            black_box(db);
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let input = generate_bibliography(1000);
    let db = Database::parse(&input).unwrap();

    c.bench_function("find_by_key", |b| {
        b.iter(|| {
            let entry = db.find_by_key(black_box("paper500"));
            black_box(entry);
        });
    });

    c.bench_function("find_by_field", |b| {
        b.iter(|| {
            let entries = db.find_by_field(black_box("author"), black_box("Author 500"));
            black_box(entries);
        });
    });
}

fn bench_checking(c: &mut Criterion) {
    let input = generate_bibliography(1000);
    let db = Database::parse(&input).unwrap();

    c.bench_function("check_database", |b| {
        b.iter(|| {
            let report = check::check_database(black_box(&db));
            black_box(report);
        });
    });
}

fn bench_writing(c: &mut Criterion) {
    let input = generate_bibliography(1000);
    let db = Database::parse(&input).unwrap();

    c.bench_function("to_string", |b| {
        b.iter(|| {
            let output = bibfolio::to_string(black_box(&db)).unwrap();
            black_box(output);
        });
    });
}

criterion_group!(
    benches,
    bench_parsing,
    bench_fixture_files,
    bench_queries,
    bench_checking,
    bench_writing
);
criterion_main!(benches);
