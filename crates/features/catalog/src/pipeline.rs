//! Post-fetch processing of a compiled query.
//!
//! Order: post filters, value ranking, explicit sort, page window. Both sorts are
//! stable, so ties keep the order of the previous step.

use crate::query::CompiledQuery;
use campus_derive::api_model;
use campus_kernel::domain::University;

/// A university as returned by the search endpoint.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct UniversityView {
    #[serde(rename = "_id")]
    pub id: String,
    pub university_name: String,
    pub country: String,
    pub location: String,
    pub tuition_fee: f64,
    pub ranking: i64,
    pub established_year: i32,
    /// Present when `valueForMoney=true`. `null` for free tuition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
}

impl UniversityView {
    #[must_use]
    pub fn new(university: University, value_score: Option<f64>) -> Self {
        let University {
            id,
            university_name,
            country,
            location,
            tuition_fee,
            ranking,
            established_year,
        } = university;
        Self {
            id,
            university_name,
            country,
            location,
            tuition_fee,
            ranking,
            established_year,
            value_score,
        }
    }
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Matches before paging.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FiltersSummary {
    /// Any store predicate, derived filter or value ranking was requested.
    pub applied: bool,
    /// Same as `pagination.total`.
    pub count: usize,
}

/// Response of `GET /api/universities`.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct UniversityPage {
    pub data: Vec<UniversityView>,
    pub pagination: Pagination,
    pub filters: FiltersSummary,
}

impl UniversityPage {
    /// Page with no records, shown when a fetch fails.
    #[must_use]
    pub const fn empty(page: usize, limit: usize) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination { total: 0, page, limit, total_pages: 0 },
            filters: FiltersSummary { applied: false, count: 0 },
        }
    }
}

/// Runs the post-fetch steps over records that already passed the store filter.
#[must_use]
pub fn run(records: Vec<University>, query: &CompiledQuery, current_year: i32) -> UniversityPage {
    let mut records: Vec<University> = records
        .into_iter()
        .filter(|u| query.post_filters.iter().all(|f| f.matches(u, current_year)))
        .collect();

    if query.value_ranking {
        records.sort_by_cached_key(|u| std::cmp::Reverse(OrderedScore(u.value_score())));
    }

    if let Some(sort) = query.sort {
        records.sort_by(|a, b| sort.order.apply(sort.key.compare(a, b)));
    }

    let total = records.len();
    let limit = query.page.limit.max(1);
    let data = records
        .into_iter()
        .skip(query.page.offset())
        .take(limit)
        .map(|u| {
            let score = query.value_ranking.then(|| u.value_score());
            UniversityView::new(u, score)
        })
        .collect();

    UniversityPage {
        data,
        pagination: Pagination {
            total,
            page: query.page.page,
            limit,
            total_pages: total.div_ceil(limit),
        },
        filters: FiltersSummary { applied: query.filters_applied(), count: total },
    }
}

/// Total order over scores for sort keys.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedScore(f64);

impl Eq for OrderedScore {}

impl PartialOrd for OrderedScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PostFilter;
    use crate::query::{PageLimits, PageRequest, SortKey, SortOrder, SortSpec, compile};
    use campus_kernel::domain::AffordabilityTier;

    fn uni(id: &str, tuition: f64, ranking: i64, year: i32) -> University {
        University {
            id: id.to_owned(),
            university_name: format!("Uni {id}"),
            country: "USA".to_owned(),
            location: "Boston".to_owned(),
            tuition_fee: tuition,
            ranking,
            established_year: year,
        }
    }

    fn query() -> CompiledQuery {
        compile(&Default::default(), PageLimits::default()).unwrap()
    }

    fn ids(page: &UniversityPage) -> Vec<&str> {
        page.data.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn pagination_windows() {
        let records: Vec<_> = (1..=105).map(|i| uni(&i.to_string(), 1.0, i, 1900)).collect();
        let mut q = query();
        q.page = PageRequest { page: 6, limit: 20 };

        let page = run(records.clone(), &q, 2024);
        assert_eq!(page.pagination.total, 105);
        assert_eq!(page.pagination.total_pages, 6);
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.data[0].id, "101");

        q.page.page = 7;
        let page = run(records, &q, 2024);
        assert!(page.data.is_empty());
        assert_eq!(page.filters.count, 105);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page = run(Vec::new(), &query(), 2024);
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.filters.applied);
    }

    #[test]
    fn post_filters_and_across_kinds() {
        let records = vec![
            uni("cheap-old", 5_000.0, 10, 1700),
            uni("cheap-new", 5_000.0, 10, 2010),
            uni("pricey-old", 60_000.0, 10, 1700),
        ];
        let mut q = query();
        q.post_filters = vec![
            PostFilter::Affordability(AffordabilityTier::Budget.into()),
            PostFilter::InstitutionAge("ancient,historic".into()),
        ];

        let page = run(records, &q, 2024);
        assert_eq!(ids(&page), ["cheap-old"]);
        assert!(page.filters.applied);
        assert_eq!(page.filters.count, 1);
    }

    #[test]
    fn value_ranking_sorts_descending_and_reports_scores() {
        let records = vec![
            uni("a", 50_000.0, 10, 1900),
            uni("b", 20_000.0, 50, 2000),
            uni("unranked", 1_000.0, 0, 2000),
        ];
        let mut q = query();
        q.value_ranking = true;

        let page = run(records, &q, 2024);
        assert_eq!(ids(&page), ["b", "a", "unranked"]);
        assert_eq!(page.data[0].value_score, Some(47.5));
        assert_eq!(page.data[2].value_score, Some(0.0));
    }

    #[test]
    fn explicit_sort_replaces_value_order() {
        let records = vec![uni("a", 50_000.0, 10, 1900), uni("b", 20_000.0, 50, 2000)];
        let mut q = query();
        q.value_ranking = true;
        q.sort = Some(SortSpec { key: SortKey::Ranking, order: SortOrder::Asc });

        let page = run(records, &q, 2024);
        assert_eq!(ids(&page), ["a", "b"]);
        assert!(page.data.iter().all(|u| u.value_score.is_some()));
    }

    #[test]
    fn sorting_is_stable() {
        let records = vec![
            uni("first", 3.0, 7, 1900),
            uni("other", 1.0, 2, 1900),
            uni("second", 2.0, 7, 1900),
        ];
        let mut q = query();
        q.sort = Some(SortSpec { key: SortKey::Ranking, order: SortOrder::Asc });
        assert_eq!(ids(&run(records.clone(), &q, 2024)), ["other", "first", "second"]);

        q.sort = Some(SortSpec { key: SortKey::Ranking, order: SortOrder::Desc });
        assert_eq!(ids(&run(records, &q, 2024)), ["first", "second", "other"]);
    }

    #[test]
    fn value_score_omitted_without_value_ranking() {
        let mut q = query();
        q.sort = Some(SortSpec { key: SortKey::ValueScore, order: SortOrder::Desc });

        let page = run(vec![uni("a", 10_000.0, 500, 1900), uni("b", 10_000.0, 100, 1900)], &q, 2024);
        assert_eq!(ids(&page), ["b", "a"]);

        let json = serde_json::to_value(&page).unwrap();
        assert!(json["data"][0].get("valueScore").is_none());
        assert_eq!(json["data"][0]["_id"], "b");
        assert_eq!(json["pagination"]["totalPages"], 1);
    }

    #[test]
    fn free_tuition_score_serializes_as_null() {
        let mut q = query();
        q.value_ranking = true;

        let page = run(vec![uni("free", 0.0, 10, 1900), uni("paid", 10_000.0, 10, 1900)], &q, 2024);
        assert_eq!(ids(&page), ["free", "paid"]);

        let json = serde_json::to_value(&page).unwrap();
        assert!(json["data"][0]["valueScore"].is_null());
        assert_eq!(json["data"][1]["valueScore"], 99.0);
    }
}
