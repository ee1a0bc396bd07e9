//! Facade crate for Campus features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `campus` with the desired feature flags (`server`/`client`).
//! - Call [`init`] (server) to register feature slices, after applying [`migrations`].

pub use campus_domain as domain;
pub use campus_kernel as kernel;

#[cfg(feature = "server")]
use campus_database::{Database, Migration};
#[cfg(feature = "server")]
use campus_domain::config::ApiConfig;
#[cfg(feature = "server")]
use campus_kernel::server::ApiState;
#[cfg(feature = "server")]
use utoipa_axum::router::OpenApiRouter;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use campus_kernel::server::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use campus_catalog as catalog;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "catalog",
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "client")]
        "client",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema scripts of every enabled slice, in application order.
#[cfg(feature = "server")]
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::catalog::MIGRATIONS.to_vec()
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub async fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Catalog
    slices.push(features::catalog::init(config, database).await?);

    Ok(slices)
}

/// System routes plus the routes of every enabled slice.
#[cfg(feature = "server")]
pub fn router() -> OpenApiRouter<ApiState> {
    server::router::system_router().merge(features::catalog::router())
}
