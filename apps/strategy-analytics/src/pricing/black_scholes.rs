//! Black-Scholes-Merton pricer for a single European option leg.
//!
//! Prices and greeks are per share for one long option. Position sign,
//! quantity and multiplier are applied by the strategy metrics layer.
//!
//! Degenerate states (`tau <= 0`, `sigma <= 0`, non-positive spot/strike,
//! non-finite inputs) price at intrinsic value with zero greeks.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
// Financial formulas use standard notation where mul_add() obscures meaning
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use crate::options::{DAYS_PER_YEAR, Greeks, OptionType};

use super::normal::{norm_cdf, norm_pdf};

/// Black-Scholes d1 parameter.
#[must_use]
pub fn d1(s: f64, k: f64, r: f64, q: f64, sigma: f64, tau: f64) -> f64 {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * tau) / (sigma * tau.sqrt())
}

/// Black-Scholes d2 parameter.
#[must_use]
pub fn d2(s: f64, k: f64, r: f64, q: f64, sigma: f64, tau: f64) -> f64 {
    d1(s, k, r, q, sigma, tau) - sigma * tau.sqrt()
}

/// Whether the inputs admit the closed form (otherwise intrinsic fallback).
fn is_priceable(s: f64, k: f64, r: f64, q: f64, sigma: f64, tau: f64) -> bool {
    [s, k, r, q, sigma, tau].iter().all(|v| v.is_finite())
        && s > 0.0
        && k > 0.0
        && sigma > 0.0
        && tau > 0.0
}

/// Intrinsic value per share.
#[must_use]
pub fn intrinsic_value(option_type: OptionType, s: f64, k: f64) -> f64 {
    option_type.intrinsic_value(s, k)
}

/// Black-Scholes call price.
fn call_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, tau: f64) -> f64 {
    let d1_val = d1(s, k, r, q, sigma, tau);
    let d2_val = d1_val - sigma * tau.sqrt();
    s * (-q * tau).exp() * norm_cdf(d1_val) - k * (-r * tau).exp() * norm_cdf(d2_val)
}

/// Theoretical option value per share, never negative.
#[must_use]
pub fn price(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    q: f64,
    sigma: f64,
    tau: f64,
) -> f64 {
    if !is_priceable(s, k, r, q, sigma, tau) {
        return intrinsic_value(option_type, s.max(0.0), k);
    }

    let call = call_price(s, k, r, q, sigma, tau);
    let value = match option_type {
        OptionType::Call => call,
        // Put-call parity
        OptionType::Put => call - s * (-q * tau).exp() + k * (-r * tau).exp(),
    };
    value.max(0.0)
}

/// Per-share greeks for one long option.
///
/// Theta is per calendar day; vega and rho are per percentage point.
#[must_use]
pub fn greeks(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    q: f64,
    sigma: f64,
    tau: f64,
) -> Greeks {
    if !is_priceable(s, k, r, q, sigma, tau) {
        return Greeks::zero();
    }

    let sqrt_tau = tau.sqrt();
    let d1_val = d1(s, k, r, q, sigma, tau);
    let d2_val = d1_val - sigma * sqrt_tau;
    let div_discount = (-q * tau).exp();
    let rate_discount = (-r * tau).exp();
    let pdf_d1 = norm_pdf(d1_val);

    let gamma = div_discount * pdf_d1 / (s * sigma * sqrt_tau);
    let vega = s * div_discount * pdf_d1 * sqrt_tau / 100.0;
    let decay = -s * div_discount * pdf_d1 * sigma / (2.0 * sqrt_tau);

    let (delta, theta_annual, rho) = match option_type {
        OptionType::Call => (
            div_discount * norm_cdf(d1_val),
            decay - r * k * rate_discount * norm_cdf(d2_val)
                + q * s * div_discount * norm_cdf(d1_val),
            k * tau * rate_discount * norm_cdf(d2_val) / 100.0,
        ),
        OptionType::Put => (
            -div_discount * norm_cdf(-d1_val),
            decay + r * k * rate_discount * norm_cdf(-d2_val)
                - q * s * div_discount * norm_cdf(-d1_val),
            -k * tau * rate_discount * norm_cdf(-d2_val) / 100.0,
        ),
    };

    Greeks::new(delta, gamma, theta_annual / DAYS_PER_YEAR, vega, rho)
}

/// Unscaled vega (per unit of volatility), used by the IV solver.
#[must_use]
pub fn raw_vega(s: f64, k: f64, r: f64, q: f64, sigma: f64, tau: f64) -> f64 {
    if !is_priceable(s, k, r, q, sigma, tau) {
        return 0.0;
    }
    let d1_val = d1(s, k, r, q, sigma, tau);
    s * (-q * tau).exp() * norm_pdf(d1_val) * tau.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_call_atm() {
        // ATM call: S=100, K=100, T=1, r=0.05, q=0, sigma=0.20
        let px = price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0);
        // Expected ~ 10.45 (from Black-Scholes tables)
        assert!(approx_eq(px, 10.4506, 1e-3));
    }

    #[test]
    fn test_put_atm() {
        let px = price(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0);
        // Expected ~ 5.57 (from put-call parity)
        assert!(approx_eq(px, 5.5735, 1e-3));
    }

    #[test_case(OptionType::Call, 120.0, 100.0, 20.0 ; "itm call")]
    #[test_case(OptionType::Call, 80.0, 100.0, 0.0 ; "otm call")]
    #[test_case(OptionType::Put, 80.0, 100.0, 20.0 ; "itm put")]
    #[test_case(OptionType::Put, 120.0, 100.0, 0.0 ; "otm put")]
    fn test_expired_prices_at_intrinsic(option_type: OptionType, s: f64, k: f64, expected: f64) {
        assert_eq!(price(option_type, s, k, 0.05, 0.0, 0.3, 0.0), expected);
        assert_eq!(price(option_type, s, k, 0.05, 0.0, 0.3, -0.1), expected);
        assert_eq!(greeks(option_type, s, k, 0.05, 0.0, 0.3, 0.0), Greeks::zero());
    }

    #[test]
    fn test_zero_volatility_prices_at_intrinsic() {
        assert_eq!(price(OptionType::Call, 110.0, 100.0, 0.05, 0.0, 0.0, 1.0), 10.0);
        assert_eq!(greeks(OptionType::Put, 90.0, 100.0, 0.05, 0.0, -0.2, 1.0), Greeks::zero());
    }

    #[test]
    fn test_non_finite_inputs_do_not_produce_nan() {
        let px = price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, f64::NAN, 1.0);
        assert_eq!(px, 0.0);
        let g = greeks(OptionType::Call, 100.0, 100.0, f64::INFINITY, 0.0, 0.2, 1.0);
        assert_eq!(g, Greeks::zero());
    }

    #[test]
    fn test_converges_to_intrinsic_as_expiry_approaches() {
        let taus = [0.5, 0.1, 0.01, 0.001, 0.0001];
        let errors: Vec<f64> = taus
            .iter()
            .map(|&tau| {
                price(OptionType::Call, 105.0, 100.0, 0.03, 0.0, 0.25, tau)
                    - intrinsic_value(OptionType::Call, 105.0, 100.0)
            })
            .collect();

        for pair in errors.windows(2) {
            assert!(pair[1].abs() < pair[0].abs());
        }
        assert!(errors[errors.len() - 1].abs() < 1e-3);
    }

    #[test]
    fn test_greek_signs() {
        let call = greeks(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 0.5);
        let put = greeks(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.2, 0.5);

        assert!(call.delta > 0.0 && call.delta < 1.0);
        assert!(put.delta < 0.0 && put.delta > -1.0);
        assert!(call.gamma > 0.0 && approx_eq(call.gamma, put.gamma, 1e-12));
        assert!(call.vega > 0.0 && approx_eq(call.vega, put.vega, 1e-12));
        assert!(call.theta < 0.0);
        assert!(call.rho > 0.0 && put.rho < 0.0);
        // Delta parity with q = 0: call - put = 1
        assert!(approx_eq(call.delta - put.delta, 1.0, 1e-9));
    }

    #[test]
    fn test_delta_matches_finite_difference() {
        let (s, k, r, q, sigma, tau) = (100.0, 95.0, 0.04, 0.01, 0.3, 0.75);
        let h = 1e-3;
        let bumped = (price(OptionType::Call, s + h, k, r, q, sigma, tau)
            - price(OptionType::Call, s - h, k, r, q, sigma, tau))
            / (2.0 * h);
        let g = greeks(OptionType::Call, s, k, r, q, sigma, tau);
        assert!(approx_eq(g.delta, bumped, 1e-4));
    }

    #[test]
    fn test_raw_vega_is_vega_times_hundred() {
        let g = greeks(OptionType::Call, 100.0, 110.0, 0.03, 0.0, 0.25, 0.4);
        let raw = raw_vega(100.0, 110.0, 0.03, 0.0, 0.25, 0.4);
        assert!(approx_eq(raw, g.vega * 100.0, 1e-9));
    }

    proptest! {
        #[test]
        fn prop_put_call_parity(
            s in 10.0f64..500.0,
            k in 10.0f64..500.0,
            r in 0.0f64..0.10,
            q in 0.0f64..0.05,
            sigma in 0.05f64..1.5,
            tau in 0.01f64..3.0,
        ) {
            let call = price(OptionType::Call, s, k, r, q, sigma, tau);
            let put = price(OptionType::Put, s, k, r, q, sigma, tau);
            let forward_gap = s * (-q * tau).exp() - k * (-r * tau).exp();
            prop_assert!((call - put - forward_gap).abs() < 1e-4 * s.max(k));
        }

        #[test]
        fn prop_price_is_non_negative_and_above_discounted_intrinsic(
            s in 1.0f64..1000.0,
            k in 1.0f64..1000.0,
            sigma in 0.01f64..2.0,
            tau in 0.001f64..2.0,
        ) {
            let call = price(OptionType::Call, s, k, 0.02, 0.0, sigma, tau);
            let put = price(OptionType::Put, s, k, 0.02, 0.0, sigma, tau);
            prop_assert!(call >= 0.0 && put >= 0.0);
            prop_assert!(call <= s + 1e-9);
        }
    }
}
