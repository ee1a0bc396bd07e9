//! # Domain Models
//!
//! Pure types shared by every crate: the university record, the values derived from it
//! (affordability tier, institution age category, value score), regional country groups,
//! configuration and the feature slice registry.
//!
//! Dependencies stay at `serde` and `bitflags`. No I/O and no clocks: callers pass the
//! current year in.

pub mod config;
pub mod constants;
pub mod region;
pub mod registry;
pub mod tiers;
pub mod university;

pub use region::RegionalGroup;
pub use tiers::{AffordabilitySet, AffordabilityTier, AgeCategory, AgeCategorySet};
pub use university::{University, institution_age, value_score};
