//! Translation of a [`DocumentFilter`] into a SurrealQL `WHERE` clause.
//!
//! Values never enter the query text; each predicate references a named parameter.

use crate::filter::{DocumentFilter, Range};

/// A value bound to a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Text(String),
    List(Vec<String>),
    Float(f64),
    Int(i64),
}

/// `WHERE` clause plus its parameters, in predicate order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub predicates: Vec<String>,
    pub params: Vec<(&'static str, Bound)>,
}

impl WhereClause {
    /// Renders ` WHERE a AND b`, or nothing for an empty filter.
    #[must_use]
    pub fn render(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates.join(" AND "))
        }
    }

    fn push(&mut self, predicate: impl Into<String>, name: &'static str, value: Bound) {
        self.predicates.push(predicate.into());
        self.params.push((name, value));
    }

    fn range<T: PartialOrd + Copy>(
        &mut self,
        field: &str,
        range: &Range<T>,
        names: (&'static str, &'static str),
        bound: fn(T) -> Bound,
    ) {
        if let Some(min) = range.min {
            self.push(format!("{field} >= ${}", names.0), names.0, bound(min));
        }
        if let Some(max) = range.max {
            self.push(format!("{field} <= ${}", names.1), names.1, bound(max));
        }
    }
}

#[must_use]
pub fn where_clause(filter: &DocumentFilter) -> WhereClause {
    let mut clause = WhereClause::default();

    if let Some(ids) = &filter.ids {
        clause.push("record::id(id) INSIDE $ids", "ids", Bound::List(ids.clone()));
    }
    if let Some(countries) = &filter.countries {
        clause.push("country INSIDE $countries", "countries", Bound::List(countries.clone()));
    }
    if let Some(location) = &filter.location {
        clause.push(
            "string::contains(string::lowercase(location), $location)",
            "location",
            Bound::Text(location.to_lowercase()),
        );
    }
    if let Some(name) = &filter.name {
        clause.push(
            "string::contains(string::lowercase(universityName), $name)",
            "name",
            Bound::Text(name.to_lowercase()),
        );
    }

    clause.range("tuitionFee", &filter.tuition, ("min_tuition", "max_tuition"), Bound::Float);
    clause.range("ranking", &filter.ranking, ("min_ranking", "max_ranking"), Bound::Int);
    clause.range("establishedYear", &filter.established, ("min_year", "max_year"), |year| {
        Bound::Int(i64::from(year))
    });

    clause
}

/// Table names are interpolated, so only plain identifiers are accepted.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
