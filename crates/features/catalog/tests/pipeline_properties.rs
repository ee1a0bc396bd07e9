use campus_catalog::filter::DocumentFilter;
use campus_catalog::pipeline::run;
use campus_catalog::query::{CompiledQuery, PageRequest, SortKey, SortOrder, SortSpec};
use campus_kernel::domain::University;
use proptest::prelude::*;

fn university() -> impl Strategy<Value = University> {
    (0u32..10_000, 0.0f64..80_000.0, 1i64..400, 1000i32..2024).prop_map(
        |(n, tuition_fee, ranking, established_year)| University {
            id: format!("u{n}"),
            university_name: format!("University {n}"),
            country: "USA".to_owned(),
            location: "Somewhere".to_owned(),
            tuition_fee,
            ranking,
            established_year,
        },
    )
}

/// Records with unique ids in generation order.
fn universities(max: usize) -> impl Strategy<Value = Vec<University>> {
    prop::collection::vec(university(), 0..max).prop_map(|mut records| {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = format!("u{i}");
        }
        records
    })
}

fn query(page: usize, limit: usize, sort: Option<SortSpec>, value_ranking: bool) -> CompiledQuery {
    CompiledQuery {
        filter: DocumentFilter::default(),
        post_filters: Vec::new(),
        value_ranking,
        sort,
        page: PageRequest { page, limit },
    }
}

proptest! {
    #[test]
    fn pages_partition_the_result(records in universities(120), limit in 1usize..30) {
        let total = records.len();
        let pages = total.div_ceil(limit);

        let mut seen = 0;
        for page in 1..=pages + 1 {
            let result = run(records.clone(), &query(page, limit, None, false), 2024);
            prop_assert_eq!(result.pagination.total, total);
            prop_assert_eq!(result.pagination.total_pages, pages);
            prop_assert!(result.data.len() <= limit);
            seen += result.data.len();
        }
        prop_assert_eq!(seen, total);
    }

    #[test]
    fn ranking_sort_is_ordered_and_stable(records in universities(60)) {
        let sort = SortSpec { key: SortKey::Ranking, order: SortOrder::Asc };
        let result = run(records.clone(), &query(1, 1000, Some(sort), false), 2024);

        for pair in result.data.windows(2) {
            prop_assert!(pair[0].ranking <= pair[1].ranking);
            if pair[0].ranking == pair[1].ranking {
                let position = |id: &str| records.iter().position(|u| u.id == id);
                prop_assert!(position(&pair[0].id) <= position(&pair[1].id));
            }
        }
    }

    #[test]
    fn value_ranking_is_descending(records in universities(60)) {
        let result = run(records, &query(1, 1000, None, true), 2024);
        let scores: Vec<f64> = result.data.iter().map(|u| u.value_score.unwrap_or(f64::INFINITY)).collect();
        for pair in scores.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }
}
