//! Secret material must never surface through formatting or errors.

use chronokey_core::{
    decode_secret, decode_secret_with, generate_issued, validate, OtpConfig, OtpError,
    SecretEncoding, SharedSecret,
};

const KEY: &[u8] = b"correct horse battery staple";

#[test]
fn debug_and_display_hide_key_bytes() {
    let secret = SharedSecret::new(KEY).expect("secret");
    for rendered in [format!("{secret:?}"), format!("{secret}"), format!("{secret:#?}")] {
        assert_eq!(rendered, "SharedSecret(***)");
        assert!(!rendered.contains("horse"));
    }
}

#[test]
fn decode_errors_do_not_echo_input() {
    let bad = "c2VjcmV0LXNlY3JldC1zZWNyZXQ$$";
    let err = decode_secret(bad).expect_err("must fail");
    assert!(matches!(err, OtpError::MalformedSecret(_)));
    assert!(!err.to_string().contains(bad));
    assert!(!err.to_string().contains("c2VjcmV0"));

    let err = decode_secret_with("MZXW6YTBOI!!!!!!", SecretEncoding::Base32).expect_err("fail");
    assert!(!err.to_string().contains("MZXW6YTBOI"));
}

#[test]
fn format_errors_do_not_echo_presented_code() {
    let secret = SharedSecret::new(KEY).expect("secret");
    let err = validate(&secret, "98765x", 0, &OtpConfig::default()).expect_err("must fail");
    assert!(!err.to_string().contains("98765"));
    assert_eq!(
        err.to_string(),
        "invalid code format: expected exactly 6 decimal digits"
    );
}

#[test]
fn issued_code_is_masked_in_debug() {
    let secret = SharedSecret::new(b"12345678901234567890").expect("secret");
    let issued = generate_issued(&secret, 0, &OtpConfig::default()).expect("generate");
    let rendered = format!("{issued:?}");
    assert!(!rendered.contains("755224"), "{rendered}");
    assert!(rendered.contains("OtpCode(***)"), "{rendered}");
    assert_eq!(issued.code.as_str(), "755224");
}
