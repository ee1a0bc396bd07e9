use serde::{Deserialize, Serialize};

/// Named country groups offered as a shortcut for the country filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionalGroup {
    NorthAmerica,
    Europe,
    AsiaPacific,
    MiddleEast,
    LatinAmerica,
    Africa,
}

impl RegionalGroup {
    pub const ALL: [Self; 6] = [
        Self::NorthAmerica,
        Self::Europe,
        Self::AsiaPacific,
        Self::MiddleEast,
        Self::LatinAmerica,
        Self::Africa,
    ];

    /// Wire key, e.g. `north-america`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NorthAmerica => "north-america",
            Self::Europe => "europe",
            Self::AsiaPacific => "asia-pacific",
            Self::MiddleEast => "middle-east",
            Self::LatinAmerica => "latin-america",
            Self::Africa => "africa",
        }
    }

    /// Exact key lookup; unknown keys, including other casings, return `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }

    /// Member countries in display order.
    #[must_use]
    pub const fn countries(self) -> &'static [&'static str] {
        match self {
            Self::NorthAmerica => &["USA", "Canada", "Mexico"],
            Self::Europe => &[
                "UK",
                "Germany",
                "France",
                "Spain",
                "Italy",
                "Netherlands",
                "Sweden",
                "Switzerland",
                "Ireland",
                "Belgium",
                "Austria",
                "Denmark",
                "Norway",
                "Finland",
                "Poland",
            ],
            Self::AsiaPacific => &[
                "Australia",
                "New Zealand",
                "Japan",
                "South Korea",
                "Singapore",
                "China",
                "Hong Kong",
                "Taiwan",
                "Malaysia",
                "Thailand",
            ],
            Self::MiddleEast => &["UAE", "Saudi Arabia", "Qatar", "Israel", "Turkey"],
            Self::LatinAmerica => &["Brazil", "Argentina", "Chile", "Colombia"],
            Self::Africa => &["South Africa", "Egypt", "Kenya", "Nigeria"],
        }
    }

    #[must_use]
    pub fn contains(self, country: &str) -> bool {
        self.countries().contains(&country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for group in RegionalGroup::ALL {
            assert_eq!(RegionalGroup::from_key(group.key()), Some(group));
        }
        assert_eq!(RegionalGroup::from_key("Europe"), None);
        assert_eq!(RegionalGroup::from_key(" europe"), None);
        assert_eq!(RegionalGroup::from_key("antarctica"), None);
    }

    #[test]
    fn membership_is_exact() {
        assert!(RegionalGroup::Europe.contains("UK"));
        assert!(!RegionalGroup::Europe.contains("uk"));
        assert!(RegionalGroup::AsiaPacific.contains("Hong Kong"));
        assert_eq!(RegionalGroup::NorthAmerica.countries().len(), 3);
    }
}
