//! Pairwise comparison of two universities.

use campus_derive::api_model;
use campus_kernel::domain::University;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const BETTER_RANKING: &str = "Better world ranking";
pub const MORE_AFFORDABLE: &str = "More affordable";
pub const BETTER_VALUE: &str = "Better value for money";
pub const LONGER_HISTORY: &str = "Longer history";
pub const NO_ADVANTAGES: &str = "No advantages";
pub const SAME_COST: &str = "Same cost";

/// Which side a metric favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    First,
    Second,
    Equal,
}

impl Verdict {
    /// `Less` means the first side wins.
    const fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::First,
            Ordering::Greater => Self::Second,
            Ordering::Equal => Self::Equal,
        }
    }
}

/// One side of the comparison with its derived values.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct UniversityDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub university_name: String,
    pub location: String,
    pub country: String,
    pub ranking: i64,
    pub tuition_fee: f64,
    /// Display label of the affordability tier, e.g. `Premium`.
    pub affordability: String,
    pub established_year: i32,
    pub age: i32,
    /// Display label of the age category, e.g. `Historic`.
    pub age_category: String,
    /// Rounded to two decimals. `null` for free tuition.
    pub value_score: f64,
}

impl UniversityDetail {
    fn new(university: &University, current_year: i32) -> Self {
        Self {
            id: university.id.clone(),
            university_name: university.university_name.clone(),
            location: university.location.clone(),
            country: university.country.clone(),
            ranking: university.ranking,
            tuition_fee: university.tuition_fee,
            affordability: university.affordability().label().to_owned(),
            established_year: university.established_year,
            age: university.age(current_year),
            age_category: university.age_category(current_year).label().to_owned(),
            value_score: round2(university.value_score()),
        }
    }
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Verdicts {
    /// Lower ranking wins.
    pub ranking: Verdict,
    /// Lower tuition wins.
    pub tuition: Verdict,
    /// Older institution wins.
    pub age: Verdict,
    /// Higher rounded value score wins.
    pub value: Verdict,
}

#[api_model]
#[derive(Clone, PartialEq)]
pub struct ComparisonSide {
    pub university: UniversityDetail,
    /// Metrics this side wins, or a single `No advantages` entry.
    pub advantages: Vec<String>,
}

#[api_model]
#[derive(Clone, PartialEq)]
pub struct CostDifference {
    /// Absolute tuition difference.
    pub amount: f64,
    /// `<name> is cheaper` or `Same cost`.
    pub summary: String,
}

/// Response of `GET /api/universities/compare`.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct Comparison {
    pub first: ComparisonSide,
    pub second: ComparisonSide,
    pub verdicts: Verdicts,
    pub cost_difference: CostDifference,
}

/// Compares exactly two records; any other count yields `None`.
#[must_use]
pub fn compare(universities: &[University], current_year: i32) -> Option<Comparison> {
    let [a, b] = universities else {
        return None;
    };

    let first = UniversityDetail::new(a, current_year);
    let second = UniversityDetail::new(b, current_year);

    let verdicts = Verdicts {
        ranking: Verdict::from_ordering(first.ranking.cmp(&second.ranking)),
        tuition: Verdict::from_ordering(first.tuition_fee.total_cmp(&second.tuition_fee)),
        age: Verdict::from_ordering(second.age.cmp(&first.age)),
        value: Verdict::from_ordering(second.value_score.total_cmp(&first.value_score)),
    };

    let cost_difference = CostDifference {
        amount: (a.tuition_fee - b.tuition_fee).abs(),
        summary: match verdicts.tuition {
            Verdict::First => format!("{} is cheaper", a.university_name),
            Verdict::Second => format!("{} is cheaper", b.university_name),
            Verdict::Equal => SAME_COST.to_owned(),
        },
    };

    Some(Comparison {
        first: ComparisonSide { advantages: advantages(&verdicts, Verdict::First), university: first },
        second: ComparisonSide {
            advantages: advantages(&verdicts, Verdict::Second),
            university: second,
        },
        verdicts,
        cost_difference,
    })
}

fn advantages(verdicts: &Verdicts, side: Verdict) -> Vec<String> {
    let won: Vec<String> = [
        (verdicts.ranking, BETTER_RANKING),
        (verdicts.tuition, MORE_AFFORDABLE),
        (verdicts.value, BETTER_VALUE),
        (verdicts.age, LONGER_HISTORY),
    ]
    .into_iter()
    .filter(|(verdict, _)| *verdict == side)
    .map(|(_, label)| label.to_owned())
    .collect();

    if won.is_empty() { vec![NO_ADVANTAGES.to_owned()] } else { won }
}

fn round2(value: f64) -> f64 {
    if value.is_finite() { (value * 100.0).round() / 100.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uni(name: &str, tuition: f64, ranking: i64, year: i32) -> University {
        University {
            id: name.to_lowercase(),
            university_name: name.to_owned(),
            country: "USA".to_owned(),
            location: "Somewhere".to_owned(),
            tuition_fee: tuition,
            ranking,
            established_year: year,
        }
    }

    #[test]
    fn requires_exactly_two() {
        assert!(compare(&[], 2024).is_none());
        assert!(compare(&[uni("A", 1.0, 1, 1900)], 2024).is_none());
        let three = [uni("A", 1.0, 1, 1900), uni("B", 1.0, 1, 1900), uni("C", 1.0, 1, 1900)];
        assert!(compare(&three, 2024).is_none());
    }

    #[test]
    fn reference_scenario() {
        let a = uni("A", 50_000.0, 10, 1900);
        let b = uni("B", 20_000.0, 50, 2000);
        let result = compare(&[a, b], 2024).unwrap();

        assert_eq!(
            result.verdicts,
            Verdicts {
                ranking: Verdict::First,
                tuition: Verdict::Second,
                age: Verdict::First,
                value: Verdict::Second,
            }
        );
        assert_eq!(result.first.university.age, 124);
        assert_eq!(result.second.university.age, 24);
        assert!((result.first.university.value_score - 19.8).abs() < 1e-9);
        assert!((result.second.university.value_score - 47.5).abs() < 1e-9);
        assert_eq!(result.first.advantages, [BETTER_RANKING, LONGER_HISTORY]);
        assert_eq!(result.second.advantages, [MORE_AFFORDABLE, BETTER_VALUE]);
        assert!((result.cost_difference.amount - 30_000.0).abs() < f64::EPSILON);
        assert_eq!(result.cost_difference.summary, "B is cheaper");
        assert_eq!(result.first.university.affordability, "Luxury");
        assert_eq!(result.second.university.age_category, "Modern");
    }

    #[test]
    fn identical_records_have_no_advantages() {
        let result = compare(&[uni("A", 9_000.0, 5, 1950), uni("B", 9_000.0, 5, 1950)], 2024).unwrap();
        assert_eq!(result.first.advantages, [NO_ADVANTAGES]);
        assert_eq!(result.second.advantages, [NO_ADVANTAGES]);
        assert_eq!(result.cost_difference.summary, SAME_COST);
        assert_eq!(result.verdicts.value, Verdict::Equal);
    }

    #[test]
    fn value_is_compared_after_rounding() {
        // Both scores round to 0.00.
        let a = uni("A", 3_000_000.0, 999, 1900);
        let b = uni("B", 3_000_100.0, 999, 1900);
        let result = compare(&[a, b], 2024).unwrap();
        assert_eq!(result.verdicts.value, Verdict::Equal);
        assert_eq!(result.verdicts.tuition, Verdict::First);
    }

    #[test]
    fn serializes_camel_case() {
        let result = compare(&[uni("A", 1.0, 1, 1900), uni("B", 2.0, 2, 1901)], 2024).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["verdicts"]["ranking"], "first");
        assert_eq!(json["first"]["university"]["_id"], "a");
        assert_eq!(json["first"]["university"]["ageCategory"], "Historic");
        assert!(json["costDifference"]["summary"].is_string());
    }
}
