use super::*;
use pretty_assertions::assert_eq;

#[test]
fn now_iso_parses_as_rfc3339() {
    let ts = now_iso();
    assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
}

#[test]
fn random_id_has_requested_length() {
    assert_eq!(random_id(12).len(), 12);
}

#[test]
fn random_id_is_lowercase_alphanumeric() {
    let id = random_id(32);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
}

#[test]
fn approx_token_count_is_deterministic() {
    let text = "a".repeat(17);
    assert_eq!(approx_token_count(&text), approx_token_count(&text));
    assert_eq!(approx_token_count(&text), 5); // ceil(17/4)
}

#[test]
fn approx_token_count_empty_is_zero() {
    assert_eq!(approx_token_count(""), 0);
}

#[test]
fn now_millis_is_a_plausible_unix_timestamp() {
    // Any time after 2024-01-01T00:00:00Z.
    assert!(now_millis() > 1_700_000_000_000);
}
