//! Predicates produced by the query compiler.
//!
//! [`DocumentFilter`] holds everything a store can evaluate on stored fields.
//! [`PostFilter`] holds predicates on derived values, applied after the fetch.

use campus_kernel::domain::{AffordabilitySet, AgeCategorySet, University};

/// Inclusive bounds; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Store-level predicate. Every populated field must hold (AND).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentFilter {
    /// `country` is one of these names.
    pub countries: Option<Vec<String>>,
    /// Case-insensitive substring of `location`.
    pub location: Option<String>,
    /// Case-insensitive substring of `universityName`.
    pub name: Option<String>,
    pub tuition: Range<f64>,
    pub ranking: Range<i64>,
    pub established: Range<i32>,
    /// Record keys. Only set by the comparison lookup.
    pub ids: Option<Vec<String>>,
}

impl DocumentFilter {
    /// `true` when no predicate is set and every record matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_none()
            && self.location.is_none()
            && self.name.is_none()
            && self.tuition.is_unbounded()
            && self.ranking.is_unbounded()
            && self.established.is_unbounded()
            && self.ids.is_none()
    }

    #[must_use]
    pub fn by_ids(ids: Vec<String>) -> Self {
        Self { ids: Some(ids), ..Self::default() }
    }

    /// Evaluates the filter in memory with the same semantics the database applies.
    #[must_use]
    pub fn matches(&self, university: &University) -> bool {
        self.countries.as_ref().is_none_or(|set| set.iter().any(|c| *c == university.country))
            && self.location.as_deref().is_none_or(|needle| contains_ci(&university.location, needle))
            && self.name.as_deref().is_none_or(|needle| contains_ci(&university.university_name, needle))
            && self.tuition.contains(university.tuition_fee)
            && self.ranking.contains(university.ranking)
            && self.established.contains(university.established_year)
            && self.ids.as_ref().is_none_or(|ids| ids.iter().any(|id| *id == university.id))
    }

    /// Number of populated predicates, for logs.
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        [
            self.countries.is_some(),
            self.location.is_some(),
            self.name.is_some(),
            !self.tuition.is_unbounded(),
            !self.ranking.is_unbounded(),
            !self.established.is_unbounded(),
            self.ids.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Predicate on a value derived from stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Tier of `tuitionFee` is in the set.
    Affordability(AffordabilitySet),
    /// Age category relative to the current year is in the set.
    InstitutionAge(AgeCategorySet),
}

impl PostFilter {
    #[must_use]
    pub fn matches(&self, university: &University, current_year: i32) -> bool {
        match self {
            Self::Affordability(set) => set.includes(university.affordability()),
            Self::InstitutionAge(set) => set.includes(university.age_category(current_year)),
        }
    }
}
