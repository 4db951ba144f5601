use contingency::expected::compute_expected;
use contingency::fisher::{fisher_exact_test, Alternative};
use contingency::statistic::{chi_square_statistic, p_value};
use contingency::tabulate::from_records;
use contingency::{CategoricalAssociationTester, ContingencyTable};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hashbrown::HashMap;
use std::fs::File;
use std::io::BufReader;

pub fn contingency_benchmarks(c: &mut Criterion) {
    let file = File::open("resources/smile_weather.csv").expect("Something went wrong reading the file");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));
    let records: Vec<HashMap<String, String>> = reader.deserialize().map(|r| r.unwrap()).collect();

    c.bench_function("tabulate records", |b| {
        b.iter(|| from_records(black_box(&records), black_box(&["mood", "weather"])))
    });

    let rows: Vec<Vec<i64>> = (0..20)
        .map(|i| (0..30).map(|j| ((i * 31 + j * 17) % 23 + 5) as i64).collect())
        .collect();
    let wide = ContingencyTable::from_rows(rows).unwrap();
    let expected = compute_expected(&wide).unwrap();
    c.bench_function("chi square 20x30", |b| {
        b.iter(|| {
            let (stat, df) = chi_square_statistic(black_box(&wide), black_box(&expected), false).unwrap();
            p_value(stat, df).unwrap()
        })
    });

    let large = ContingencyTable::from_rows(vec![vec![3700, 3300], vec![2500, 5000]]).unwrap();
    c.bench_function("fisher exact 2x2", |b| {
        b.iter(|| fisher_exact_test(black_box(&large), Alternative::TwoSided))
    });

    let table = ContingencyTable::from_rows(vec![vec![37, 33], vec![25, 50]]).unwrap();
    let tester = CategoricalAssociationTester::default();
    c.bench_function("full report 2x2", |b| b.iter(|| tester.test(black_box(&table))));

    let simulated = CategoricalAssociationTester::default()
        .set_simulate_p_value(true)
        .set_replicates(200);
    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);
    group.bench_function("simulated p-value 2x2", |b| b.iter(|| simulated.test(black_box(&table))));
    let crowded = ContingencyTable::from_counts(vec!["a", "b"], vec![2_000_000, 2_100_000]).unwrap();
    group.bench_function("simulated p-value one-way n=4.1e6", |b| {
        b.iter(|| simulated.test(black_box(&crowded)))
    });
    group.finish();
}

criterion_group!(benches, contingency_benchmarks);
criterion_main!(benches);
