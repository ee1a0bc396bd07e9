//! Query-parameter compiler.
//!
//! Turns the flat, all-optional parameter bag of the search endpoint into a
//! [`CompiledQuery`]: a store-level [`DocumentFilter`], derived-value post filters,
//! the sort request and the page window.
//!
//! Precedence is fixed: `topTier` replaces any `minRanking`/`maxRanking` range and a
//! known `region` replaces `countries`. Malformed numbers are treated as absent.

use crate::error::CatalogError;
use crate::filter::{DocumentFilter, PostFilter, Range};
use campus_derive::api_model;
use campus_kernel::domain::config::CatalogConfig;
use campus_kernel::domain::{AffordabilitySet, AgeCategorySet, RegionalGroup, University};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Query parameters of `GET /api/universities`. Every value is optional and kept raw.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query, rename_all = "camelCase"))]
pub struct UniversityQueryParams {
    /// Comma-separated country names.
    pub countries: Option<String>,
    /// Case-insensitive substring of the location.
    pub location: Option<String>,
    /// Case-insensitive substring of the university name.
    pub search: Option<String>,
    pub min_tuition: Option<String>,
    pub max_tuition: Option<String>,
    pub min_ranking: Option<String>,
    pub max_ranking: Option<String>,
    /// Keeps rankings up to N, replacing `minRanking`/`maxRanking`.
    pub top_tier: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    /// Regional group key such as `europe`; replaces `countries`.
    pub region: Option<String>,
    /// Comma-separated tiers: budget, moderate, premium, luxury.
    pub affordability: Option<String>,
    /// Comma-separated categories: modern, established, historic, ancient.
    pub institution_age: Option<String>,
    /// `true` ranks results by value score.
    pub value_for_money: Option<String>,
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl UniversityQueryParams {
    /// Builds the bag from raw query pairs. A repeated parameter keeps its first value.
    ///
    /// # Errors
    /// [`CatalogError::Validation`] when the pairs cannot form the bag.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, CatalogError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut first = serde_json::Map::new();
        for (key, value) in pairs {
            first.entry(key.into()).or_insert_with(|| serde_json::Value::String(value.into()));
        }
        serde_json::from_value(serde_json::Value::Object(first))
            .map_err(|err| CatalogError::validation(format!("Malformed query parameters: {err}")))
    }
}

/// Fields results can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    UniversityName,
    Country,
    Location,
    TuitionFee,
    Ranking,
    EstablishedYear,
    ValueScore,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::UniversityName,
        Self::Country,
        Self::Location,
        Self::TuitionFee,
        Self::Ranking,
        Self::EstablishedYear,
        Self::ValueScore,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UniversityName => "universityName",
            Self::Country => "country",
            Self::Location => "location",
            Self::TuitionFee => "tuitionFee",
            Self::Ranking => "ranking",
            Self::EstablishedYear => "establishedYear",
            Self::ValueScore => "valueScore",
        }
    }

    /// Ascending comparison of two records on this field.
    #[must_use]
    pub fn compare(self, a: &University, b: &University) -> Ordering {
        match self {
            Self::UniversityName => a.university_name.cmp(&b.university_name),
            Self::Country => a.country.cmp(&b.country),
            Self::Location => a.location.cmp(&b.location),
            Self::TuitionFee => a.tuition_fee.total_cmp(&b.tuition_fee),
            Self::Ranking => a.ranking.cmp(&b.ranking),
            Self::EstablishedYear => a.established_year.cmp(&b.established_year),
            Self::ValueScore => a.value_score().total_cmp(&b.value_score()),
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw).ok_or_else(|| {
            let allowed = Self::ALL.map(Self::as_str).join(", ");
            CatalogError::validation(format!("Unknown sortBy '{raw}', expected one of: {allowed}"))
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` in any case is descending; anything else is ascending.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") { Self::Desc } else { Self::Asc }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Paging settings of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

impl From<&CatalogConfig> for PageLimits {
    fn from(config: &CatalogConfig) -> Self {
        let max_limit = config.max_limit.max(1);
        Self { default_limit: config.default_limit.clamp(1, max_limit), max_limit }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub filter: DocumentFilter,
    /// Applied in order after the fetch; all must hold.
    pub post_filters: Vec<PostFilter>,
    /// Rank by value score before any explicit sort.
    pub value_ranking: bool,
    pub sort: Option<SortSpec>,
    pub page: PageRequest,
}

impl CompiledQuery {
    /// `true` when any store predicate or derived-value filter was requested.
    #[must_use]
    pub fn filters_applied(&self) -> bool {
        !self.filter.is_empty() || !self.post_filters.is_empty() || self.value_ranking
    }
}

/// Compiles raw parameters.
///
/// # Errors
///
/// [`CatalogError::Validation`] for a `sortBy` outside [`SortKey`]. Every other
/// malformed value is ignored.
pub fn compile(
    params: &UniversityQueryParams,
    limits: PageLimits,
) -> Result<CompiledQuery, CatalogError> {
    let mut filter = DocumentFilter {
        countries: non_empty(params.countries.as_deref()).and_then(split_list),
        location: non_empty(params.location.as_deref()).map(str::to_owned),
        name: non_empty(params.search.as_deref()).map(str::to_owned),
        tuition: Range {
            min: parse_number(params.min_tuition.as_deref()),
            max: parse_number(params.max_tuition.as_deref()),
        },
        ranking: Range {
            min: parse_number(params.min_ranking.as_deref()),
            max: parse_number(params.max_ranking.as_deref()),
        },
        established: Range {
            min: parse_number(params.min_year.as_deref()),
            max: parse_number(params.max_year.as_deref()),
        },
        ids: None,
    };

    if let Some(top) = parse_number::<i64>(params.top_tier.as_deref()) {
        if !filter.ranking.is_unbounded() {
            debug!(?filter.ranking, top, "topTier replaces the ranking range");
        }
        filter.ranking = Range { min: None, max: Some(top) };
    }

    if let Some(group) = non_empty(params.region.as_deref()).and_then(RegionalGroup::from_key) {
        if filter.countries.is_some() {
            debug!(region = group.key(), "Region replaces the countries filter");
        }
        filter.countries = Some(group.countries().iter().map(|c| (*c).to_owned()).collect());
    }

    let mut post_filters = Vec::new();
    if let Some(list) = non_empty(params.affordability.as_deref()) {
        post_filters.push(PostFilter::Affordability(AffordabilitySet::from(list)));
    }
    if let Some(list) = non_empty(params.institution_age.as_deref()) {
        post_filters.push(PostFilter::InstitutionAge(AgeCategorySet::from(list)));
    }

    let value_ranking = params.value_for_money.as_deref().map(str::trim) == Some("true");

    let sort = non_empty(params.sort_by.as_deref())
        .map(SortKey::from_str)
        .transpose()?
        .map(|key| SortSpec {
            key,
            order: params.sort_order.as_deref().map(SortOrder::parse).unwrap_or_default(),
        });

    let page = PageRequest {
        page: parse_positive(params.page.as_deref()).unwrap_or(1),
        limit: parse_positive(params.limit.as_deref())
            .unwrap_or(limits.default_limit)
            .min(limits.max_limit),
    };

    let query = CompiledQuery { filter, post_filters, value_ranking, sort, page };
    debug!(
        predicates = query.filter.predicate_count(),
        post_filters = query.post_filters.len(),
        value_ranking,
        sort = ?query.sort,
        page = query.page.page,
        limit = query.page.limit,
        "Compiled catalog query"
    );
    Ok(query)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Trimmed comma-separated names; `None` when nothing is left.
fn split_list(raw: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Numbers the compiler accepts from query strings.
trait QueryNumber: FromStr {
    fn usable(&self) -> bool {
        true
    }
}

impl QueryNumber for i32 {}
impl QueryNumber for i64 {}
impl QueryNumber for usize {}
impl QueryNumber for f64 {
    fn usable(&self) -> bool {
        self.is_finite()
    }
}

/// Strict parse of a trimmed value. Partial input like `12abc` is unparsable.
fn parse_number<T: QueryNumber>(raw: Option<&str>) -> Option<T> {
    non_empty(raw).and_then(|value| value.parse::<T>().ok()).filter(T::usable)
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    parse_number::<usize>(raw).filter(|n| *n >= 1)
}
