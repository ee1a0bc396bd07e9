//! Buckets derived from stored fields.
//!
//! Both classifications use half-open intervals with an inclusive lower bound.
//! The set types hold a requested list of buckets; an empty set matches nothing.

use crate::constants::{
    ANCIENT, ANCIENT_AGE, BUDGET, ESTABLISHED, ESTABLISHED_AGE, HISTORIC, HISTORIC_AGE, LUXURY,
    LUXURY_TUITION, MODERATE, MODERATE_TUITION, MODERN, PREMIUM, PREMIUM_TUITION,
};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffordabilityTier {
    Budget,
    Moderate,
    Premium,
    Luxury,
}

impl AffordabilityTier {
    pub const ALL: [Self; 4] = [Self::Budget, Self::Moderate, Self::Premium, Self::Luxury];

    /// Classifies an annual tuition fee. `NaN` lands in [`Self::Luxury`].
    #[must_use]
    pub fn of(tuition_fee: f64) -> Self {
        if tuition_fee < MODERATE_TUITION {
            Self::Budget
        } else if tuition_fee < PREMIUM_TUITION {
            Self::Moderate
        } else if tuition_fee < LUXURY_TUITION {
            Self::Premium
        } else {
            Self::Luxury
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => BUDGET,
            Self::Moderate => MODERATE,
            Self::Premium => PREMIUM,
            Self::Luxury => LUXURY,
        }
    }

    /// Display label, e.g. `Budget`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Moderate => "Moderate",
            Self::Premium => "Premium",
            Self::Luxury => "Luxury",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == raw)
    }

    const fn flag(self) -> AffordabilitySet {
        match self {
            Self::Budget => AffordabilitySet::BUDGET,
            Self::Moderate => AffordabilitySet::MODERATE,
            Self::Premium => AffordabilitySet::PREMIUM,
            Self::Luxury => AffordabilitySet::LUXURY,
        }
    }
}

impl fmt::Display for AffordabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeCategory {
    Modern,
    Established,
    Historic,
    Ancient,
}

impl AgeCategory {
    pub const ALL: [Self; 4] = [Self::Modern, Self::Established, Self::Historic, Self::Ancient];

    /// Classifies an age in years. Negative ages (founding year in the future) are modern.
    #[must_use]
    pub const fn of(age: i32) -> Self {
        if age < ESTABLISHED_AGE {
            Self::Modern
        } else if age < HISTORIC_AGE {
            Self::Established
        } else if age < ANCIENT_AGE {
            Self::Historic
        } else {
            Self::Ancient
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modern => MODERN,
            Self::Established => ESTABLISHED,
            Self::Historic => HISTORIC,
            Self::Ancient => ANCIENT,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Established => "Established",
            Self::Historic => "Historic",
            Self::Ancient => "Ancient",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == raw)
    }

    const fn flag(self) -> AgeCategorySet {
        match self {
            Self::Modern => AgeCategorySet::MODERN,
            Self::Established => AgeCategorySet::ESTABLISHED,
            Self::Historic => AgeCategorySet::HISTORIC,
            Self::Ancient => AgeCategorySet::ANCIENT,
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AffordabilitySet: u8 {
        const BUDGET = 1 << 0;
        const MODERATE = 1 << 1;
        const PREMIUM = 1 << 2;
        const LUXURY = 1 << 3;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AgeCategorySet: u8 {
        const MODERN = 1 << 0;
        const ESTABLISHED = 1 << 1;
        const HISTORIC = 1 << 2;
        const ANCIENT = 1 << 3;
    }
}

impl AffordabilitySet {
    #[must_use]
    pub const fn includes(self, tier: AffordabilityTier) -> bool {
        self.contains(tier.flag())
    }

    /// Tier names in canonical order.
    pub fn tiers(self) -> impl Iterator<Item = AffordabilityTier> {
        AffordabilityTier::ALL.into_iter().filter(move |tier| self.includes(*tier))
    }
}

impl AgeCategorySet {
    #[must_use]
    pub const fn includes(self, category: AgeCategory) -> bool {
        self.contains(category.flag())
    }

    pub fn categories(self) -> impl Iterator<Item = AgeCategory> {
        AgeCategory::ALL.into_iter().filter(move |category| self.includes(*category))
    }
}

/// Comma-separated names; unknown names are dropped.
impl From<&str> for AffordabilitySet {
    fn from(list: &str) -> Self {
        list.split(',').filter_map(AffordabilityTier::parse).map(AffordabilityTier::flag).collect()
    }
}

impl From<&str> for AgeCategorySet {
    fn from(list: &str) -> Self {
        list.split(',').filter_map(AgeCategory::parse).map(AgeCategory::flag).collect()
    }
}

impl From<AffordabilityTier> for AffordabilitySet {
    fn from(tier: AffordabilityTier) -> Self {
        tier.flag()
    }
}

impl From<AgeCategory> for AgeCategorySet {
    fn from(category: AgeCategory) -> Self {
        category.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuition_boundaries_are_exact() {
        let cases = [
            (0.0, AffordabilityTier::Budget),
            (9_999.0, AffordabilityTier::Budget),
            (10_000.0, AffordabilityTier::Moderate),
            (24_999.0, AffordabilityTier::Moderate),
            (25_000.0, AffordabilityTier::Premium),
            (49_999.0, AffordabilityTier::Premium),
            (50_000.0, AffordabilityTier::Luxury),
        ];
        for (fee, tier) in cases {
            assert_eq!(AffordabilityTier::of(fee), tier, "tuition {fee}");
        }
    }

    #[test]
    fn age_boundaries_are_exact() {
        assert_eq!(AgeCategory::of(-3), AgeCategory::Modern);
        assert_eq!(AgeCategory::of(49), AgeCategory::Modern);
        assert_eq!(AgeCategory::of(50), AgeCategory::Established);
        assert_eq!(AgeCategory::of(99), AgeCategory::Established);
        assert_eq!(AgeCategory::of(100), AgeCategory::Historic);
        assert_eq!(AgeCategory::of(199), AgeCategory::Historic);
        assert_eq!(AgeCategory::of(200), AgeCategory::Ancient);
    }

    #[test]
    fn lists_parse_into_sets() {
        let set = AffordabilitySet::from("luxury,budget,gold");
        assert_eq!(set, AffordabilitySet::BUDGET | AffordabilitySet::LUXURY);
        assert_eq!(set.tiers().collect::<Vec<_>>(), [AffordabilityTier::Budget, AffordabilityTier::Luxury]);

        let set = AgeCategorySet::from("historic,ancient");
        assert!(set.includes(AgeCategory::Ancient));
        assert!(!set.includes(AgeCategory::Modern));
    }

    #[test]
    fn names_match_exactly() {
        assert_eq!(AffordabilityTier::parse("budget"), Some(AffordabilityTier::Budget));
        assert_eq!(AffordabilityTier::parse("Budget"), None);
        assert_eq!(AgeCategory::parse(" modern"), None);
        assert_eq!(AffordabilitySet::from("budget, premium"), AffordabilitySet::BUDGET);
        assert!(AgeCategorySet::from("HISTORIC").is_empty());
    }

    #[test]
    fn unknown_names_yield_empty_set() {
        assert!(AffordabilitySet::from("cheap,pricey").is_empty());
        assert!(AgeCategorySet::from("").is_empty());
    }

    #[test]
    fn tiers_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&AffordabilityTier::Premium).unwrap(), "\"premium\"");
        assert_eq!(AgeCategory::Historic.to_string(), "historic");
        assert_eq!(AgeCategory::Historic.label(), "Historic");
    }
}
