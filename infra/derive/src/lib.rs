#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`campus_error`] turns an enum into a `thiserror` error with context support.
//! * [`campus_slice`] wraps a feature state struct into an `Arc` handle registered in the kernel.
//! * [`api_model`] / [`api_handler`] keep DTOs and Axum handlers consistent with the `OpenAPI` document.
//! * [`main`] boots the Tokio runtime profile from `campus-runtime`.
//!
//! Examples are `ignore`d because they need the consuming crates to compile.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro that replaces `async fn main` with a runtime bootstrap.
///
/// Accepts one optional profile: `high_performance`, `memory_efficient` or `default`.
/// The function must be `async` and return a `Result`.
///
/// ```rust,ignore
/// #[campus_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Defines a request/response DTO.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives `utoipa::ToSchema`
/// under the consumer's `server` feature, and applies `rename_all = "camelCase"` plus
/// `deny_unknown_fields` unless told otherwise.
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct Pagination {
///     pub total: usize,
///     pub total_pages: usize,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an Axum handler with `utoipa::path` when the consumer's `server` feature is on.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum with named-field variants into a workspace error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when not already derived.
/// * `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to results of every
///   wrapped source error.
/// * `From<Source>` for each variant holding a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * A private `format_context` helper for the `#[error(...)]` strings.
///
/// Variants with a source must also carry `context: Option<Cow<'static, str>>`.
/// Tuple and unit variants are rejected.
///
/// ```rust,ignore
/// #[campus_error]
/// pub enum StoreError {
///     #[error("SurrealDB error{}: {source}", format_context(.context))]
///     Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn campus_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Turns a struct into a feature slice handle.
///
/// `struct Catalog { .. }` becomes `CatalogInner { .. }` plus a cloneable `Catalog`
/// wrapping `Arc<CatalogInner>`, with `Deref` to the inner state and a
/// `FeatureSlice` impl for registration in the API state.
///
/// ```rust,ignore
/// #[campus_derive::campus_slice]
/// pub struct Catalog {
///     pub collection: String,
/// }
///
/// let slice = Catalog::new(CatalogInner { collection: "universities".to_owned() });
/// ```
#[proc_macro_attribute]
pub fn campus_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
