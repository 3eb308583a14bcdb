//! Probability helpers shared by the orkit crates.
//!
//! Poisson point, cumulative and survival probabilities are computed by the
//! incremental ratio `p(k) = p(k - 1) * λ / k`, so no factorial is ever formed
//! and large counts do not overflow. Rates large enough for `e^(-λ)` to
//! underflow switch to log space.

use statrs::function::factorial::ln_factorial;

/// Rates at or above this value evaluate the PMF in log space.
const LOG_SPACE_RATE: f64 = 600.0;

/// Upper bound on tail terms summed by [`poisson_sf`] past the requested count.
const MAX_TAIL_TERMS: u32 = 10_000;

fn assert_rate(lambda: f64) {
    assert!(
        lambda.is_finite() && lambda >= 0.0,
        "poisson rate must be finite and non-negative, got {lambda}"
    );
}

/// Poisson point probability `λ^k e^(-λ) / k!`.
///
/// `poisson_pmf(λ, 0)` is exactly `e^(-λ)`. A zero rate puts all mass on
/// `k = 0`.
///
/// # Panics
///
/// Panics if `lambda` is negative or not finite.
pub fn poisson_pmf(lambda: f64, k: u32) -> f64 {
    assert_rate(lambda);
    if lambda == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if lambda >= LOG_SPACE_RATE {
        let ln_p = f64::from(k) * lambda.ln() - lambda - ln_factorial(u64::from(k));
        return ln_p.exp();
    }
    let mut p = (-lambda).exp();
    for m in 1..=k {
        p *= lambda / f64::from(m);
        if p == 0.0 {
            break;
        }
    }
    p
}

/// Point probabilities `p(0), p(1), ..., p(k_max)` in one pass.
///
/// # Panics
///
/// Panics if `lambda` is negative or not finite.
pub fn poisson_pmfs(lambda: f64, k_max: u32) -> Vec<f64> {
    assert_rate(lambda);
    if lambda >= LOG_SPACE_RATE {
        return (0..=k_max).map(|k| poisson_pmf(lambda, k)).collect();
    }
    let mut out = Vec::with_capacity(k_max as usize + 1);
    let mut p = (-lambda).exp();
    out.push(p);
    for m in 1..=k_max {
        p *= lambda / f64::from(m);
        out.push(p);
    }
    out
}

/// Cumulative probability `P(N <= k)`, clamped to `[0, 1]`.
///
/// # Panics
///
/// Panics if `lambda` is negative or not finite.
pub fn poisson_cdf(lambda: f64, k: u32) -> f64 {
    poisson_pmfs(lambda, k).iter().sum::<f64>().min(1.0)
}

/// Survival probability `P(N >= k)`, clamped to `[0, 1]`.
///
/// Above the mean the tail is summed directly instead of subtracting the
/// CDF from one, which keeps small tails accurate.
///
/// # Panics
///
/// Panics if `lambda` is negative or not finite.
pub fn poisson_sf(lambda: f64, k: u32) -> f64 {
    assert_rate(lambda);
    if k == 0 {
        return 1.0;
    }
    if f64::from(k) <= lambda || lambda >= LOG_SPACE_RATE {
        return (1.0 - poisson_cdf(lambda, k - 1)).clamp(0.0, 1.0);
    }

    let mut term = poisson_pmf(lambda, k);
    let mut tail = 0.0;
    let mut m = k;
    while term > 0.0 && m - k < MAX_TAIL_TERMS {
        tail += term;
        if term < tail * f64::EPSILON {
            break;
        }
        m += 1;
        term *= lambda / f64::from(m);
    }
    tail.clamp(0.0, 1.0)
}

/// Expected value `Σ values[i] * probs[i]` of a discrete distribution.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn expectation(values: &[f64], probs: &[f64]) -> f64 {
    assert_eq!(
        values.len(),
        probs.len(),
        "expectation: values and probs must have equal length"
    );
    values.iter().zip(probs).map(|(v, p)| v * p).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use statrs::distribution::{Discrete, DiscreteCDF, Poisson};

    #[test]
    fn test_pmf_zero_is_exp() {
        for &lambda in &[0.1_f64, 1.0, 3.0, 12.5, 50.0] {
            assert_eq!(poisson_pmf(lambda, 0), (-lambda).exp());
        }
    }

    #[test]
    fn test_pmf_zero_rate() {
        assert_eq!(poisson_pmf(0.0, 0), 1.0);
        assert_eq!(poisson_pmf(0.0, 1), 0.0);
        assert_eq!(poisson_pmf(0.0, 7), 0.0);
    }

    #[test]
    fn test_pmf_known_values() {
        // λ = 3: e^-3 * 3^2 / 2 = 4.5 e^-3
        assert_relative_eq!(poisson_pmf(3.0, 2), 4.5 * (-3.0_f64).exp(), epsilon = 1e-15);
        // λ = 3: e^-3 * 27 / 6 = 4.5 e^-3 as well
        assert_relative_eq!(poisson_pmf(3.0, 3), 4.5 * (-3.0_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_pmf_matches_statrs() {
        for &lambda in &[0.5, 3.0, 10.0, 42.0] {
            let dist = Poisson::new(lambda).unwrap();
            for k in 0..60u32 {
                assert_relative_eq!(
                    poisson_pmf(lambda, k),
                    dist.pmf(u64::from(k)),
                    max_relative = 1e-9,
                    epsilon = 1e-300
                );
            }
        }
    }

    #[test]
    fn test_pmf_large_count_does_not_overflow() {
        let p = poisson_pmf(5.0, 200);
        assert!(p.is_finite());
        assert!(p >= 0.0);
        assert!(p < 1e-100);
    }

    #[test]
    fn test_pmf_log_space_rate() {
        let dist = Poisson::new(1000.0).unwrap();
        assert_relative_eq!(
            poisson_pmf(1000.0, 1000),
            dist.pmf(1000),
            max_relative = 1e-8
        );
        assert!(poisson_pmf(1000.0, 0) >= 0.0);
    }

    #[test]
    fn test_pmfs_matches_pointwise() {
        let all = poisson_pmfs(3.0, 10);
        assert_eq!(all.len(), 11);
        for (k, &p) in all.iter().enumerate() {
            assert_relative_eq!(p, poisson_pmf(3.0, k as u32), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_cdf_matches_statrs() {
        let dist = Poisson::new(3.0).unwrap();
        for k in 0..20u32 {
            assert_abs_diff_eq!(poisson_cdf(3.0, k), dist.cdf(u64::from(k)), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sf_complements_cdf() {
        for &lambda in &[0.7_f64, 3.0, 9.0] {
            for k in 1..25u32 {
                assert_abs_diff_eq!(
                    poisson_sf(lambda, k) + poisson_cdf(lambda, k - 1),
                    1.0,
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_sf_zero_is_one() {
        assert_eq!(poisson_sf(3.0, 0), 1.0);
        assert_eq!(poisson_sf(0.0, 0), 1.0);
    }

    #[test]
    fn test_sf_small_tail_is_accurate() {
        let dist = Poisson::new(2.0).unwrap();
        let expected = dist.sf(39); // P(N > 39) = P(N >= 40)
        assert_relative_eq!(poisson_sf(2.0, 40), expected, max_relative = 1e-4);
        assert!(poisson_sf(2.0, 40) > 0.0);
    }

    #[test]
    fn test_expectation() {
        assert_relative_eq!(
            expectation(&[0.0, 1.0, 2.0], &[0.25, 0.5, 0.25]),
            1.0,
            epsilon = 1e-15
        );
    }

    #[test]
    #[should_panic(expected = "poisson rate must be finite and non-negative")]
    fn test_negative_rate_panics() {
        poisson_pmf(-1.0, 0);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_expectation_length_mismatch_panics() {
        expectation(&[1.0], &[0.5, 0.5]);
    }
}
