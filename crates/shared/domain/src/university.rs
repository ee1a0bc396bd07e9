use crate::constants::RANKING_CEILING;
use crate::tiers::{AffordabilityTier, AgeCategory};
use serde::{Deserialize, Serialize};

/// A university record as stored in the catalog collection.
///
/// Records are read-only here; every query works on a fresh copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    /// Opaque record key, stable across requests.
    #[serde(rename = "_id")]
    pub id: String,
    pub university_name: String,
    pub country: String,
    pub location: String,
    /// Annual cost in a single currency unit.
    pub tuition_fee: f64,
    /// Lower is better. Zero or negative means unranked.
    pub ranking: i64,
    pub established_year: i32,
}

impl University {
    #[must_use]
    pub fn affordability(&self) -> AffordabilityTier {
        AffordabilityTier::of(self.tuition_fee)
    }

    #[must_use]
    pub const fn age(&self, current_year: i32) -> i32 {
        institution_age(self.established_year, current_year)
    }

    #[must_use]
    pub const fn age_category(&self, current_year: i32) -> AgeCategory {
        AgeCategory::of(self.age(current_year))
    }

    #[must_use]
    pub fn value_score(&self) -> f64 {
        value_score(self.ranking, self.tuition_fee)
    }
}

/// Years since founding. Not validated: a future founding year gives a negative age.
#[must_use]
pub const fn institution_age(established_year: i32, current_year: i32) -> i32 {
    current_year.saturating_sub(established_year)
}

/// Ranking points per thousand of tuition: `(1000 - ranking) / (tuition / 1000)`.
///
/// Unranked records (ranking `<= 0`) score `0`. Free tuition with a positive numerator
/// scores `+inf`; the `0 / 0` case scores `0`.
#[must_use]
pub fn value_score(ranking: i64, tuition_fee: f64) -> f64 {
    if ranking <= 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let score = (RANKING_CEILING - ranking) as f64 / (tuition_fee / 1000.0);
    if score.is_nan() { 0.0 } else { score }
}
