use super::*;
use pretty_assertions::assert_eq;

#[test]
fn retryable_classification() {
    assert!(StatusCode::NetworkError.is_retryable());
    assert!(StatusCode::Timeout.is_retryable());
    assert!(!StatusCode::InvalidArguments.is_retryable());
    assert!(!StatusCode::Internal.is_retryable());
}

#[test]
fn category_classification() {
    assert_eq!(StatusCode::InvalidConfig.category(), StatusCategory::Config);
    assert_eq!(StatusCode::HookBlocked.category(), StatusCategory::Orchestration);
}
