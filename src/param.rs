//! Quadrics trimmed to a height band and a sweep angle about Y.
//!
//! Hits report `uv = (phi / phi_max, height fraction within the band)`.

use serde::{ Serialize, Deserialize };

use crate::consts::{ PARABOLOID_K, TRIMMED_CONE_K, TWO_PI };
use crate::hit::Hit;
use crate::quadratic::{ solve_quadratic, solve_quadratic_or_linear };
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::unit::azimuth;

/// Trimming bounds for a parametric quadric.
///
/// `y_min` and `y_max` are fractions of the unit extent. The untrimmed
/// shape spans `-1..=1`, so they compare directly against the hit's `y`. `phi_max` is the swept angle in radians; `2pi`
/// keeps the whole surface of revolution.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimParams {
    pub y_min: f64,
    pub y_max: f64,
    pub phi_max: f64,
}

impl Default for TrimParams {
    fn default() -> TrimParams {
        TrimParams { y_min: -1.0, y_max: 1.0, phi_max: TWO_PI }
    }
}

impl TrimParams {
    pub fn new(y_min: f64, y_max: f64, phi_max: f64) -> TrimParams {
        TrimParams { y_min, y_max, phi_max }
    }

    fn keeps(&self, y: f64, phi: f64) -> bool {
        y >= self.y_min && y <= self.y_max && phi <= self.phi_max
    }

    fn uv(&self, y: f64, phi: f64) -> (f64, f64) {
        let height = self.y_max - self.y_min;
        let v = if height > 0.0 { (y - self.y_min) / height } else { 0.0 };
        (phi / self.phi_max, v)
    }
}

/// Nearest root ahead of the ray whose hit point `keep` accepts. A far root
/// behind the origin means the whole surface is behind the ray.
fn trimmed<K, N>(ray: &Ray4D, roots: Option<(f64, f64)>, keep: K, normal: N)
    -> Hit
where
    K: Fn(&Tuple4D, f64) -> Option<(f64, f64)>,
    N: Fn(&Tuple4D) -> Tuple4D,
{
    let (t0, t1) = match roots {
        Some(roots) => roots,
        None => return Hit::miss(),
    };
    if t1 <= 0.0 {
        return Hit::miss();
    }

    for &t in [t0, t1].iter() {
        if t <= 0.0 {
            continue;
        }

        let p = ray.position(t);
        if let Some(uv) = keep(&p, azimuth(&p)) {
            return Hit {
                t,
                normal: normal(&p).face_forward(&ray.direction),
                uv: Some(uv),
            };
        }
    }

    Hit::miss()
}

/// Keeps points within the height band and sweep of `trim`.
fn band(trim: &TrimParams) -> impl Fn(&Tuple4D, f64) -> Option<(f64, f64)> + '_ {
    move |p, phi| {
        if trim.keeps(p.y, phi) {
            Some(trim.uv(p.y, phi))
        } else {
            None
        }
    }
}

/// Unit sphere, trimmed.
pub fn ellipsoid(ray: &Ray4D, trim: &TrimParams) -> Hit {
    let ro = ray.origin.as_vector();
    let rd = ray.direction;

    let roots = solve_quadratic(rd.dot3(&rd), 2.0 * rd.dot3(&ro), ro.dot3(&ro) - 1.0);
    trimmed(ray, roots, band(trim), |p| p.as_vector() * 2.0)
}

/// Infinite unit cylinder about Y, trimmed.
pub fn cylinder(ray: &Ray4D, trim: &TrimParams) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z);
    let c = ro.x * ro.x + ro.z * ro.z - 1.0;

    trimmed(ray, solve_quadratic(a, b, c), band(trim),
        |p| Tuple4D::vector(2.0 * p.x, 0.0, 2.0 * p.z))
}

/// Cone with its apex at `y = 1` and radius 1 at `y = -1`, trimmed.
pub fn cone(ray: &Ray4D, trim: &TrimParams) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;
    let k = TRIMMED_CONE_K;
    let oy = ro.y - 1.0;

    let a = rd.x * rd.x + rd.z * rd.z - k * rd.y * rd.y;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z - k * rd.y * oy);
    let c = ro.x * ro.x + ro.z * ro.z - k * oy * oy;

    trimmed(ray, solve_quadratic(a, b, c), band(trim),
        |p| Tuple4D::vector(2.0 * p.x, 2.0 * (1.0 - p.y) * k, 2.0 * p.z))
}

/// Bowl with its bottom at `y = -1` opening to radius 1 at `y = 1`, trimmed.
pub fn paraboloid(ray: &Ray4D, trim: &TrimParams) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;
    let k = PARABOLOID_K;
    let oy = ro.y + 1.0;

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z) - k * rd.y;
    let c = ro.x * ro.x + ro.z * ro.z - k * oy;

    let roots = solve_quadratic_or_linear(a, b, c);

    trimmed(ray, roots, band(trim),
        |p| Tuple4D::vector(2.0 * p.x, -k, 2.0 * p.z))
}

/// `k(x^2 + z^2) - (k - 1)y^2 = 1`, trimmed. Radius 1 at `y = ±1`, waist
/// radius `1/sqrt(k)`. A negative `k` gives two sheets.
pub fn hyperboloid(ray: &Ray4D, k: f64, trim: &TrimParams) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;
    let j = k - 1.0;

    let a = k * (rd.x * rd.x + rd.z * rd.z) - j * rd.y * rd.y;
    let b = 2.0 * (k * (rd.x * ro.x + rd.z * ro.z) - j * rd.y * ro.y);
    let c = k * (ro.x * ro.x + ro.z * ro.z) - j * ro.y * ro.y - 1.0;

    trimmed(ray, solve_quadratic(a, b, c), band(trim),
        |p| Tuple4D::vector(2.0 * p.x * k, -2.0 * p.y * j, 2.0 * p.z * k))
}

/// Saddle `y = x^2 - z^2` kept inside the cube `|x|, |y|, |z| <= y_max`.
pub fn hyperbolic_paraboloid(ray: &Ray4D, trim: &TrimParams) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = rd.x * rd.x - rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x - rd.z * ro.z) - rd.y;
    let c = ro.x * ro.x - ro.z * ro.z - ro.y;

    let roots = solve_quadratic_or_linear(a, b, c);

    let extent = trim.y_max;
    let keep = |p: &Tuple4D, phi: f64| {
        let inside = p.x.abs() <= extent && p.y.abs() <= extent
            && p.z.abs() <= extent;
        if inside && phi <= trim.phi_max {
            let v = if extent > 0.0 { (p.y + extent) / (2.0 * extent) } else { 0.0 };
            Some((phi / trim.phi_max, v))
        } else {
            None
        }
    };

    trimmed(ray, roots, keep, |p| Tuple4D::vector(2.0 * p.x, -1.0, -2.0 * p.z))
}

/* Tests */

#[cfg(test)]
fn along_x() -> Ray4D {
    Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0))
}

#[test]
fn untrimmed_ellipsoid_matches_sphere() {
    let hit = ellipsoid(&along_x(), &TrimParams::default());

    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(-2.0, 0.0, 0.0));
}

#[test]
fn sweep_trim_falls_back_to_far_root() {
    // The near hit is at phi = pi, the far one at phi = 0.
    let trim = TrimParams::new(-1.0, 1.0, std::f64::consts::FRAC_PI_2);
    let hit = ellipsoid(&along_x(), &trim);

    approx::assert_abs_diff_eq!(hit.t, 6.0);
    assert_eq!(hit.normal, Tuple4D::vector(-2.0, 0.0, 0.0));
    let (u, _) = hit.uv.unwrap();
    approx::assert_abs_diff_eq!(u, 0.0);
}

#[test]
fn both_roots_trimmed_is_a_miss() {
    let trim = TrimParams::new(0.5, 1.0, TWO_PI);
    assert!(!ellipsoid(&along_x(), &trim).is_hit());
    assert!(!cylinder(&along_x(), &trim).is_hit());
}

#[test]
fn surface_behind_ray_is_a_miss() {
    let r = Ray4D::new(Tuple4D::point(5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    assert!(!cylinder(&r, &TrimParams::default()).is_hit());
}

#[test]
fn cylinder_band_uv() {
    let r = Ray4D::new(Tuple4D::point(-5.0, 0.5, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = cylinder(&r, &TrimParams::default());

    approx::assert_abs_diff_eq!(hit.t, 4.0);
    let (u, v) = hit.uv.unwrap();
    approx::assert_abs_diff_eq!(u, 0.5);
    approx::assert_abs_diff_eq!(v, 0.75);
}

#[test]
fn cone_radius_shrinks_toward_apex() {
    let base = Ray4D::new(Tuple4D::point(-5.0, -1.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    approx::assert_abs_diff_eq!(cone(&base, &TrimParams::default()).t, 4.0, epsilon = 1e-9);

    let mid = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    approx::assert_abs_diff_eq!(cone(&mid, &TrimParams::default()).t, 4.5, epsilon = 1e-9);
}

#[test]
fn paraboloid_bottom_and_rim() {
    let up = Ray4D::new(Tuple4D::point(0.0, -5.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0));
    let hit = paraboloid(&up, &TrimParams::default());
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal.normalize(), Tuple4D::vector(0.0, -1.0, 0.0));

    let rim = Ray4D::new(Tuple4D::point(-5.0, 1.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    approx::assert_abs_diff_eq!(paraboloid(&rim, &TrimParams::default()).t, 4.0, epsilon = 1e-9);
}

#[test]
fn hyperboloid_waist_depends_on_k() {
    let hit = hyperboloid(&along_x(), 4.0, &TrimParams::default());
    approx::assert_abs_diff_eq!(hit.t, 4.5, epsilon = 1e-9);

    // k = 1 degenerates to the unit cylinder.
    let hit = hyperboloid(&along_x(), 1.0, &TrimParams::default());
    approx::assert_abs_diff_eq!(hit.t, 4.0, epsilon = 1e-9);
}

#[test]
fn negative_k_gives_two_sheets() {
    assert!(!hyperboloid(&along_x(), -2.0, &TrimParams::default()).is_hit());

    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = hyperboloid(&down, -2.0, &TrimParams::default());
    // -(-3) y^2 = 1 at the vertex, so y = 1/sqrt(3).
    approx::assert_abs_diff_eq!(hit.t, 5.0 - 1.0 / 3f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn saddle_extent_uses_y_max() {
    let down = Ray4D::new(Tuple4D::point(0.9, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));

    assert!(hyperbolic_paraboloid(&down, &TrimParams::default()).is_hit());
    assert!(!hyperbolic_paraboloid(&down, &TrimParams::new(-0.5, 0.5, TWO_PI)).is_hit());
}
