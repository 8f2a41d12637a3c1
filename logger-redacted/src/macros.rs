// Logging macros

/// Log at info level with user-typed text redacted first.
///
/// Arguments: a `&PiiRedactor`, the text to redact, the message literal, then
/// any `tracing` fields. The redacted text is recorded as the `text` field.
///
/// ```rust
/// use logger_redacted::{redacted_info, PiiRedactor};
///
/// let redactor = PiiRedactor::default();
/// redacted_info!(redactor, "call +1-555-1001", "Search submitted", session = 7);
/// ```
#[macro_export]
macro_rules! redacted_info {
    ($redactor:expr, $text:expr, $message:literal $(, $($field:tt)+)?) => {
        tracing::info!($($($field)+,)? text = %$redactor.redact($text), $message)
    };
}

#[macro_export]
macro_rules! redacted_debug {
    ($redactor:expr, $text:expr, $message:literal $(, $($field:tt)+)?) => {
        tracing::debug!($($($field)+,)? text = %$redactor.redact($text), $message)
    };
}
