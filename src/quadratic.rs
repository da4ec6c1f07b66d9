use crate::consts::{ DEGENERATE_EPSILON, QUADRIC_EPSILON };

/// Real roots of `a t^2 + b t + c = 0`, ordered so that `t0 <= t1`.
///
/// The equation is normalized by `a` first and solved in the reduced form
/// `t = -b/2 ± sqrt((b/2)^2 - c)`. Returns `None` when the equation is
/// degenerate (`a` is zero, e.g. a zero-length direction) or has no real
/// roots. A discriminant that is only negative by rounding noise is treated
/// as a tangent.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if !(a.abs() >= DEGENERATE_EPSILON) {
        return None;
    }

    let inv_a = 1.0 / a;
    let b = b * inv_a;
    let c = c * inv_a;

    let neg_half_b = -b * 0.5;
    let mut u2 = neg_half_b * neg_half_b - c;
    if !(u2 >= -QUADRIC_EPSILON * QUADRIC_EPSILON) {
        // Also rejects NaN coefficients.
        return None;
    }
    if u2 < 0.0 {
        u2 = 0.0;
    }

    let u = u2.sqrt();
    Some((neg_half_b - u, neg_half_b + u))
}

/// Like `solve_quadratic`, but falls back to the single root of `b t + c`
/// when `a` vanishes. Paraboloids need this for rays parallel to their axis.
pub fn solve_quadratic_or_linear(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < DEGENERATE_EPSILON {
        let t = -c / b;
        if t.is_finite() { Some((t, t)) } else { None }
    } else {
        solve_quadratic(a, b, c)
    }
}

/* Tests */

#[test]
fn unit_roots_are_ordered() {
    assert_eq!(solve_quadratic(1.0, 0.0, -1.0), Some((-1.0, 1.0)));
}

#[test]
fn negative_leading_coefficient_still_ordered() {
    let (t0, t1) = solve_quadratic(-2.0, 0.0, 8.0).unwrap();
    assert!(t0 <= t1);
    approx::assert_abs_diff_eq!(t0, -2.0, epsilon = 1e-12);
    approx::assert_abs_diff_eq!(t1, 2.0, epsilon = 1e-12);
}

#[test]
fn no_real_roots() {
    assert_eq!(solve_quadratic(1.0, 0.0, 1.0), None);
}

#[test]
fn degenerate_leading_coefficient() {
    assert_eq!(solve_quadratic(0.0, 2.0, 1.0), None);
    assert_eq!(solve_quadratic(f64::NAN, 2.0, 1.0), None);
}

#[test]
fn tangent_gives_double_root() {
    let (t0, t1) = solve_quadratic(1.0, -4.0, 4.0).unwrap();
    approx::assert_abs_diff_eq!(t0, 2.0);
    approx::assert_abs_diff_eq!(t1, 2.0);
}

#[test]
fn rounding_noise_is_clamped_to_tangent() {
    // (t - 1)^2 = -1e-12
    let (t0, t1) = solve_quadratic(1.0, -2.0, 1.0 + 1e-12).unwrap();
    approx::assert_abs_diff_eq!(t0, 1.0);
    approx::assert_abs_diff_eq!(t1, 1.0);
}

#[test]
fn linear_fallback_for_vanishing_leading_term() {
    assert_eq!(solve_quadratic_or_linear(0.0, 2.0, -4.0), Some((2.0, 2.0)));
    assert_eq!(solve_quadratic_or_linear(0.0, 0.0, 1.0), None);
    assert_eq!(solve_quadratic_or_linear(1.0, 0.0, -1.0), Some((-1.0, 1.0)));
}
