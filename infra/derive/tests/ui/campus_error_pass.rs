use campus_derive::campus_error;
use std::borrow::Cow;

#[campus_error]
pub enum LoadError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Validation error: {message}")]
    Validation { message: Cow<'static, str> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, LoadError> {
    Ok(raw.parse::<u32>().context("reading limit")?)
}

fn main() {
    let _ = parse("12");
    let _: LoadError = "boom".into();
    let _: LoadError = String::from("boom").into();
}
