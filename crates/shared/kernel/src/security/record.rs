use std::borrow::Cow;

#[campus_derive::campus_error]
pub enum RecordGuardError {
    #[error("Record id validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Checks client-supplied record ids before they reach a store.
#[derive(Debug)]
pub struct RecordGuard;

impl RecordGuard {
    /// Returns the bare key of `id` after checking its table.
    ///
    /// Accepts `key` or `table:key`. A different table prefix or an empty key is rejected,
    /// so ids from other tables cannot be smuggled into a lookup.
    ///
    /// # Errors
    ///
    /// [`RecordGuardError::Validation`] for a foreign table or an empty key.
    pub fn key<I, T>(id: I, expected_table: T) -> Result<String, RecordGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id = id.as_ref().trim();
        let table = expected_table.as_ref();

        let key = match id.split_once(':') {
            Some((prefix, key)) if prefix == table => key,
            Some((prefix, _)) => {
                return Err(RecordGuardError::Validation {
                    message: format!("Expected '{table}', got '{prefix}'").into(),
                    context: Some("Record table mismatch".into()),
                });
            }
            None => id,
        };

        if key.is_empty() {
            return Err(RecordGuardError::Validation {
                message: "Record key is empty".into(),
                context: Some(id.to_owned().into()),
            });
        }

        Ok(key.to_owned())
    }
}
