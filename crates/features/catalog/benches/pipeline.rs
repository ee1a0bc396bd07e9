use campus_catalog::pipeline::run;
use campus_catalog::query::{PageLimits, compile};
use campus_catalog::UniversityQueryParams;
use campus_kernel::domain::University;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const COUNTRIES: [&str; 6] = ["USA", "UK", "Germany", "Japan", "Canada", "Brazil"];

fn records(count: usize) -> Vec<University> {
    (0..count)
        .map(|i| University {
            id: format!("u{i}"),
            university_name: format!("University {i}"),
            country: COUNTRIES[i % COUNTRIES.len()].to_owned(),
            location: format!("City {}", i % 97),
            tuition_fee: ((i * 7_919) % 70_000) as f64,
            ranking: i64::try_from(i % 1_000).unwrap_or_default() + 1,
            established_year: 1_000 + i32::try_from(i % 1_000).unwrap_or_default(),
        })
        .collect()
}

fn pipeline_benchmark(c: &mut Criterion) {
    let data = records(10_000);

    let plain = UniversityQueryParams { page: Some("3".to_owned()), ..Default::default() };
    let ranked = UniversityQueryParams {
        affordability: Some("budget,moderate".to_owned()),
        institution_age: Some("historic,ancient".to_owned()),
        value_for_money: Some("true".to_owned()),
        ..Default::default()
    };
    let sorted = UniversityQueryParams {
        sort_by: Some("universityName".to_owned()),
        sort_order: Some("desc".to_owned()),
        ..Default::default()
    };

    let mut group = c.benchmark_group("pipeline");
    for (name, params) in [("page_only", plain), ("post_filters_value", ranked), ("sort_by_name", sorted)] {
        let query = compile(&params, PageLimits::default()).unwrap_or_else(|e| panic!("{e}"));
        group.bench_function(name, |b| {
            b.iter(|| run(black_box(data.clone()), black_box(&query), 2024));
        });
    }
    group.finish();
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
