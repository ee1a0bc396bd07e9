//! Kernel utilities shared across slices: layered config loading, record-key checks and,
//! with the `server` feature, the Axum state, health endpoint and system router.
//!
//! ```rust,ignore
//! use campus_kernel::config::load_config;
//! use campus_kernel::domain::config::ApiConfig;
//!
//! let config: ApiConfig = load_config(Some("server"))?;
//! ```

pub mod config;
pub mod security;
#[cfg(feature = "server")]
pub mod server;

pub use campus_domain as domain;
