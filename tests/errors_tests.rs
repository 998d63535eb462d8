use std::error::Error;
use tldr::errors::BotError;

#[test]
fn test_bot_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = BotError::CodecError("row 1 has 2 fields, expected 3".to_string());
    assert_error(&error);
}

#[test]
fn test_bot_error_display() {
    let error = BotError::FetchError("GET http://test.io returned 404 Not Found".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to fetch web page: GET http://test.io returned 404 Not Found"
    );

    let error = BotError::SummarizerError("Model unavailable".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to generate summary: Model unavailable"
    );

    let error = BotError::ConfigError("TELEGRAM_TOKEN must be set".to_string());
    assert_eq!(
        format!("{error}"),
        "Invalid configuration: TELEGRAM_TOKEN must be set"
    );

    let error = BotError::Timeout("summarizer after 60s".to_string());
    assert_eq!(format!("{error}"), "Timed out: summarizer after 60s");
}

#[test]
fn test_only_fetch_errors_are_fetch_failures() {
    assert!(BotError::FetchError("refused".to_string()).is_fetch_failure());
    assert!(!BotError::Timeout("summarizer".to_string()).is_fetch_failure());
    assert!(!BotError::StoreError("locked".to_string()).is_fetch_failure());
}

#[test]
fn test_bot_error_from_conversions() {
    let store_err: BotError = sqlx::Error::RowNotFound.into();
    match store_err {
        BotError::StoreError(msg) => assert!(msg.contains("no rows returned")),
        other => panic!("Unexpected error type: {other:?}"),
    }

    // These only need to compile: the source errors are awkward to construct.
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> BotError {
        BotError::from(err)
    }

    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_telegram_conversion(err: teloxide::RequestError) -> BotError {
        BotError::from(err)
    }
}
