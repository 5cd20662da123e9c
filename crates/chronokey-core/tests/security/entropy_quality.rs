//! Entropy smoke tests for `generate_secret` (OS CSPRNG).
//!
//! Shannon entropy of uniform bytes approaches 8.0 bits/byte only for
//! large samples; small keys use relaxed thresholds that still catch
//! degenerate output (all-zero, repeated patterns).

use chronokey_core::generate_secret;

/// H = -Σ p(x) log2 p(x) over byte values, in bits per byte.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[usize::from(b)] = freq[usize::from(b)].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// 64-byte key: expected ~5.75 bits/byte, threshold 5.0.
#[test]
fn single_512_bit_secret_entropy() {
    let secret = generate_secret(512).expect("CSPRNG should succeed");
    let entropy = shannon_entropy(secret.expose());
    assert!(entropy > 5.0, "entropy too low: {entropy:.4} (expected > 5.0)");
}

/// 1024 concatenated 64-byte keys (64 KiB): expected ~7.997, threshold 7.99.
#[test]
fn many_secrets_pooled_entropy() {
    let mut pool = Vec::with_capacity(65_536);
    for _ in 0..1024 {
        let secret = generate_secret(512).expect("CSPRNG should succeed");
        pool.extend_from_slice(secret.expose());
    }
    let entropy = shannon_entropy(&pool);
    assert!(entropy > 7.99, "pooled entropy too low: {entropy:.4} (expected > 7.99)");
}

/// 160-bit keys never repeat.
#[test]
fn consecutive_secrets_are_distinct() {
    let a = generate_secret(160).expect("CSPRNG should succeed");
    let b = generate_secret(160).expect("CSPRNG should succeed");
    assert_ne!(a.expose(), b.expose(), "CSPRNG produced identical keys");
}

#[test]
fn entropy_of_constant_data_is_zero() {
    assert!(shannon_entropy(&[0u8; 64]).abs() < f64::EPSILON);
}
