use std::borrow::Cow;

#[campus_derive::campus_error]
pub enum CatalogError {
    /// Rejected request parameters. Maps to `400`.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Maps to `404`.
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Record id error{}: {source}", format_context(.context))]
    RecordId {
        source: campus_kernel::security::record::RecordGuardError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Seed file error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed JSON{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: campus_database::DatabaseError, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("API state error{}: {source}", format_context(.context))]
    State {
        source: campus_kernel::server::ApiStateError,
        context: Option<Cow<'static, str>>,
    },

    #[cfg(feature = "client")]
    #[error("HTTP error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CatalogError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    /// Short machine-readable kind used in error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::RecordId { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            _ => "internal",
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::CatalogError;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use campus_derive::api_model;

    /// Error body returned by catalog endpoints.
    #[api_model]
    pub struct ErrorBody {
        /// `validation`, `not_found` or `internal`.
        pub error: String,
        pub message: String,
    }

    impl CatalogError {
        #[must_use]
        pub const fn status(&self) -> StatusCode {
            match self {
                Self::Validation { .. } | Self::RecordId { .. } => StatusCode::BAD_REQUEST,
                Self::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for CatalogError {
        fn into_response(self) -> Response {
            let status = self.status();
            let message = if status.is_server_error() {
                tracing::error!(error = %self, "Catalog request failed");
                "Internal server error".to_owned()
            } else {
                self.to_string()
            };

            (status, Json(ErrorBody { error: self.kind().to_owned(), message })).into_response()
        }
    }
}

#[cfg(feature = "server")]
pub use response::ErrorBody;
