//! Timing side-channel check for `validate` (dudect-style Welch's t-test).
//!
//! Times matching vs. non-matching codes of the same length and asserts
//! |t| < 4.5. Statistical and sensitive to machine noise, so the timing
//! run itself is opt-in (`cargo test -- --ignored`).

use std::time::Instant;

use chronokey_core::{generate, validate, OtpConfig, SharedSecret};

const SAMPLES: usize = 10_000;

const T_THRESHOLD: f64 = 4.5;

#[inline(never)]
fn black_box_validate(secret: &SharedSecret, code: &str, at: i64, config: &OtpConfig) -> bool {
    let result = validate(secret, code, at, config)
        .expect("validate should not error during timing test");
    std::hint::black_box(result)
}

/// `t = (mean_a - mean_b) / sqrt(var_a/n_a + var_b/n_b)`
#[allow(clippy::cast_precision_loss)]
fn welch_t_statistic(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 || b.len() < 2 {
        return f64::NAN;
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let mean_a: f64 = a.iter().sum::<f64>() / n_a;
    let mean_b: f64 = b.iter().sum::<f64>() / n_b;

    let var_a: f64 = a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>() / (n_a - 1.0);
    let var_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / (n_b - 1.0);

    let denominator = (var_a / n_a + var_b / n_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    (mean_a - mean_b) / denominator
}

#[test]
#[ignore = "statistical timing test; run with --ignored on a quiet machine"]
fn validate_constant_time_no_timing_leak() {
    let secret = SharedSecret::new(b"12345678901234567890").expect("secret");
    let config = OtpConfig::default();
    let at = 1_234_567_890;

    let valid_code = generate(&secret, at, &config).expect("generate");
    let invalid_code = if valid_code == "000000" { "111111" } else { "000000" };

    for _ in 0..100 {
        black_box_validate(&secret, valid_code.as_str(), at, &config);
        black_box_validate(&secret, invalid_code, at, &config);
    }

    let mut times_a = Vec::with_capacity(SAMPLES);
    let mut times_b = Vec::with_capacity(SAMPLES);

    for _ in 0..SAMPLES {
        let start = Instant::now();
        let _ = black_box_validate(&secret, valid_code.as_str(), at, &config);
        let elapsed_a = start.elapsed().as_nanos();

        let start = Instant::now();
        let _ = black_box_validate(&secret, invalid_code, at, &config);
        let elapsed_b = start.elapsed().as_nanos();

        #[allow(clippy::cast_precision_loss)]
        {
            times_a.push(elapsed_a as f64);
            times_b.push(elapsed_b as f64);
        }
    }

    let abs_t = welch_t_statistic(&times_a, &times_b).abs();
    eprintln!("timing side-channel: |t| = {abs_t:.2} (threshold {T_THRESHOLD}), {SAMPLES} samples");
    assert!(
        abs_t < T_THRESHOLD,
        "timing leak: |t| = {abs_t:.2} exceeds {T_THRESHOLD}"
    );
}

#[test]
fn welch_t_test_identical_distributions() {
    let a = vec![1.0; 100];
    let b = vec![1.0; 100];
    assert!(welch_t_statistic(&a, &b).abs() < 0.001);
}

#[test]
fn welch_t_test_different_distributions() {
    let a: Vec<f64> = (0..1000).map(|i| 100.0 + f64::from(i % 3)).collect();
    let b: Vec<f64> = (0..1000).map(|i| 200.0 + f64::from(i % 3)).collect();
    assert!(welch_t_statistic(&a, &b).abs() > 100.0);
}
