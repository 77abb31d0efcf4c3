use scribeway::infrastructure::observability::{
    REQUEST_ID_HEADER, RequestId, TracingConfig, mask_secret,
};

#[test]
fn given_request_id_header_constant_when_accessed_then_returns_correct_value() {
    assert_eq!(REQUEST_ID_HEADER, "x-request-id");
}

#[test]
fn given_request_id_when_cloned_then_equals_original() {
    let original = RequestId("abc".to_string());
    let cloned = original.clone();
    assert_eq!(original.0, cloned.0);
}

#[test]
fn given_long_credential_when_masking_then_keeps_only_edges() {
    assert_eq!(mask_secret("abcd1234567890wxyz"), "abcd****wxyz");
}

#[test]
fn given_short_credential_when_masking_then_hides_everything() {
    assert_eq!(mask_secret("secret"), "******");
}

#[test]
fn given_blank_credential_when_masking_then_reports_empty() {
    assert_eq!(mask_secret("   "), "[EMPTY]");
}

#[test]
fn given_level_when_configuring_tracing_then_filter_starts_with_it() {
    let config = TracingConfig::default().with_level("warn");
    assert!(config.default_filter.starts_with("warn,"));
    assert!(config.default_filter.contains("scribeway=debug"));
}
