use campus_derive::campus_error;
use std::borrow::Cow;

#[campus_error]
pub enum SeedError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed seed{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn campus_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/campus_error_pass.rs");
}

#[test]
fn source_errors_convert_without_context() {
    let err: SeedError = std::io::Error::other("disk").into();
    assert!(matches!(err, SeedError::Io { context: None, .. }));
    assert_eq!(err.to_string(), "IO error: disk");
}

#[test]
fn context_is_attached_to_foreign_results() {
    let result: Result<serde_json::Value, _> = serde_json::from_str("{");
    let err = result.context("data/universities.json").unwrap_err();

    assert!(matches!(err, SeedError::Json { .. }));
    assert!(err.to_string().starts_with("Malformed seed (data/universities.json): "));
}

#[test]
fn context_replaces_on_own_results() {
    let result: Result<(), SeedError> = Err("unexpected".into());
    let err = result.context("import").unwrap_err();

    assert_eq!(err.to_string(), "Internal error (import): unexpected");
}

#[test]
fn strings_become_internal_errors() {
    let err = SeedError::from(format!("{} records rejected", 3));
    assert!(matches!(err, SeedError::Internal { .. }));
    assert_eq!(err.to_string(), "Internal error: 3 records rejected");
}
