/// Default table holding university documents.
pub const UNIVERSITIES: &str = "universities";

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const CATALOG_TAG: &str = "Catalog";

// Affordability tiers (annual tuition, inclusive lower bound)
pub const BUDGET: &str = "budget";
pub const MODERATE: &str = "moderate";
pub const PREMIUM: &str = "premium";
pub const LUXURY: &str = "luxury";

pub const MODERATE_TUITION: f64 = 10_000.0;
pub const PREMIUM_TUITION: f64 = 25_000.0;
pub const LUXURY_TUITION: f64 = 50_000.0;

// Institution age categories (years since founding, inclusive lower bound)
pub const MODERN: &str = "modern";
pub const ESTABLISHED: &str = "established";
pub const HISTORIC: &str = "historic";
pub const ANCIENT: &str = "ancient";

pub const ESTABLISHED_AGE: i32 = 50;
pub const HISTORIC_AGE: i32 = 100;
pub const ANCIENT_AGE: i32 = 200;

/// Rankings are scored against this ceiling; see [`crate::value_score`].
pub const RANKING_CEILING: i64 = 1000;
