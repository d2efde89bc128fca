use super::*;
use pretty_assertions::assert_eq;

#[test]
fn plain_error_basics() {
    let err = PlainError::new("test error", StatusCode::InvalidArguments);
    assert_eq!(err.status_code(), StatusCode::InvalidArguments);
    assert_eq!(err.to_string(), "test error");
    assert!(!err.is_retryable());
}

#[test]
fn plain_error_retryable() {
    let err = PlainError::new("network error", StatusCode::NetworkError);
    assert!(err.is_retryable());
}

#[test]
fn output_msg_hides_internal_details() {
    let err = PlainError::new("sensitive details", StatusCode::Internal);
    assert_eq!(err.output_msg(), "Internal error: 1001");
}

#[test]
fn output_msg_shows_user_errors() {
    let err = PlainError::new("Invalid parameter: foo", StatusCode::InvalidArguments);
    assert_eq!(err.output_msg(), "Invalid parameter: foo");
}

#[test]
fn boxed_error_preserves_source_chain() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let wrapped = boxed(io_err, StatusCode::NotFound);

    assert_eq!(wrapped.status_code(), StatusCode::NotFound);
    assert!(std::error::Error::source(&wrapped).is_some());
}
