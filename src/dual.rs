//! Entry/exit intersectors for closed solids, the leaves of CSG trees.
//!
//! Each routine gathers every boundary crossing of the ray (surface roots
//! that pass the shape's bounds, plus cap and wall crossings that land on
//! their faces) and reports the smallest as `near` and the largest as
//! `far`. A lone crossing fills both slots. Distances may be negative when
//! the solid surrounds the ray origin. Normals are outward gradients in the
//! unit frame, not normalized.

use crate::consts::{ PARABOLOID_K, QUADRIC_EPSILON };
use crate::hit::{ DualHit, Surface };
use crate::quadratic::{ solve_quadratic, solve_quadratic_or_linear };
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::unit::{ axis_vector, box_span, clamp_apex_ratio, offset_sphere_roots,
    polyhedron_span, within, ConeShape, HalfSpace, WEDGE_PLANES };

/// Running extremes of the crossings seen so far.
struct Crossings {
    near: Surface,
    far: Surface,
    count: usize,
}

impl Crossings {
    fn new() -> Crossings {
        Crossings {
            near: Surface::new(f64::INFINITY, Tuple4D::vector(0.0, 0.0, 0.0)),
            far: Surface::new(f64::NEG_INFINITY, Tuple4D::vector(0.0, 0.0, 0.0)),
            count: 0,
        }
    }

    fn push(&mut self, t: f64, normal: Tuple4D) {
        if !t.is_finite() {
            return;
        }

        if t < self.near.t {
            self.near = Surface::new(t, normal);
        }
        if t > self.far.t {
            self.far = Surface::new(t, normal);
        }
        self.count += 1;
    }

    /// Adds each root whose hit point `surface` accepts, with its normal.
    fn push_roots<F>(&mut self, ray: &Ray4D, roots: Option<(f64, f64)>, surface: F)
    where
        F: Fn(&Tuple4D) -> Option<Tuple4D>,
    {
        if let Some((t0, t1)) = roots {
            for &t in [t0, t1].iter() {
                if let Some(normal) = surface(&ray.position(t)) {
                    self.push(t, normal);
                }
            }
        }
    }

    /// Adds the crossing of the plane `p[axis] = value` if `face` accepts
    /// the crossing point. The outward normal is `sign` along `axis`.
    fn push_face<F>(&mut self, ray: &Ray4D, axis: usize, value: f64, sign: f64,
        face: F)
    where
        F: Fn(&Tuple4D) -> bool,
    {
        let t = (value - ray.origin[axis]) / ray.direction[axis];
        if t.is_finite() && face(&ray.position(t)) {
            self.push(t, axis_vector(axis, sign));
        }
    }

    fn finish(self) -> DualHit {
        if self.count == 0 {
            DualHit::miss()
        } else {
            DualHit::new(self.near, self.far)
        }
    }
}

fn radius_sq(p: &Tuple4D) -> f64 {
    p.x * p.x + p.z * p.z
}

/// The same ray with its origin moved up by `dy`.
fn raised(ray: &Ray4D, dy: f64) -> Ray4D {
    Ray4D::new(ray.origin + Tuple4D::vector(0.0, dy, 0.0), ray.direction)
}

/// Solid unit sphere.
pub fn sphere(ray: &Ray4D) -> DualHit {
    let ro = ray.origin.as_vector();
    let rd = ray.direction;

    let mut hits = Crossings::new();
    hits.push_roots(ray,
        solve_quadratic(rd.dot3(&rd), 2.0 * rd.dot3(&ro), ro.dot3(&ro) - 1.0),
        |p| Some(p.as_vector() * 2.0));
    hits.finish()
}

/// Solid cylinder of radius 1 for `|y| <= 1`.
pub fn cylinder(ray: &Ray4D) -> DualHit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z);
    let c = ro.x * ro.x + ro.z * ro.z - 1.0;

    let mut hits = Crossings::new();
    hits.push_roots(ray, solve_quadratic(a, b, c), |p| {
        if within(p.y, 1.0) {
            Some(Tuple4D::vector(2.0 * p.x, 0.0, 2.0 * p.z))
        } else {
            None
        }
    });

    let disk = |p: &Tuple4D| radius_sq(p) <= 1.0 + QUADRIC_EPSILON;
    hits.push_face(ray, 1, 1.0, 1.0, disk);
    hits.push_face(ray, 1, -1.0, -1.0, disk);
    hits.finish()
}

/// Solid cone frustum with apex ratio `k`: radius 1 at `y = -1`, `1 - k`
/// at `y = 1`.
pub fn cone(ray: &Ray4D, k: f64) -> DualHit {
    let shape = ConeShape::new(k);
    let (a, b, c) = shape.coefficients(ray);

    let mut hits = Crossings::new();
    hits.push_roots(ray, solve_quadratic(a, b, c), |p| {
        if within(p.y, 1.0) {
            Some(shape.normal(p))
        } else {
            None
        }
    });

    let top = shape.top_radius_sq();
    hits.push_face(ray, 1, 1.0, 1.0, |p| radius_sq(p) <= top + QUADRIC_EPSILON);
    hits.push_face(ray, 1, -1.0, -1.0, |p| radius_sq(p) <= 1.0 + QUADRIC_EPSILON);
    hits.finish()
}

/// The cone's profile extruded along Z over `|z| <= 1`: a trapezoidal
/// prism, `1 - k` wide at the top and 1 at the bottom.
pub fn conical_prism(ray: &Ray4D, k: f64) -> DualHit {
    let shape = ConeShape::new(k);
    let ro = ray.origin;
    let rd = ray.direction;
    let q = shape.k * 0.25;
    let oy = ro.y - shape.h;

    let a = shape.j * rd.x * rd.x - q * rd.y * rd.y;
    let b = 2.0 * (shape.j * rd.x * ro.x - q * rd.y * oy);
    let c = shape.j * ro.x * ro.x - q * oy * oy;

    let mut hits = Crossings::new();
    hits.push_roots(ray, solve_quadratic(a, b, c), |p| {
        if within(p.y, 1.0) && within(p.z, 1.0) {
            Some(Tuple4D::vector(shape.j * p.x, q * (shape.h - p.y), 0.0))
        } else {
            None
        }
    });

    let half_width = |y: f64| shape.k * 0.5 * (shape.h - y);
    hits.push_face(ray, 1, 1.0, 1.0,
        |p| within(p.x, half_width(1.0)) && within(p.z, 1.0));
    hits.push_face(ray, 1, -1.0, -1.0,
        |p| within(p.x, half_width(-1.0)) && within(p.z, 1.0));

    let wall = |p: &Tuple4D| within(p.y, 1.0) && within(p.x, half_width(p.y));
    hits.push_face(ray, 2, 1.0, 1.0, wall);
    hits.push_face(ray, 2, -1.0, -1.0, wall);
    hits.finish()
}

/// Solid paraboloid `x^2 + z^2 + k(y - 1) <= 0` closed at `y = -1`.
pub fn paraboloid(ray: &Ray4D) -> DualHit {
    let ro = ray.origin;
    let rd = ray.direction;
    let k = PARABOLOID_K;

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z) + k * rd.y;
    let c = ro.x * ro.x + ro.z * ro.z + k * (ro.y - 1.0);

    let mut hits = Crossings::new();
    hits.push_roots(ray, solve_quadratic_or_linear(a, b, c), |p| {
        if within(p.y, 1.0) {
            Some(Tuple4D::vector(2.0 * p.x, k, 2.0 * p.z))
        } else {
            None
        }
    });

    hits.push_face(ray, 1, -1.0, -1.0, |p| radius_sq(p) <= 1.0 + QUADRIC_EPSILON);
    hits.finish()
}

/// The paraboloid's profile `x^2 + k(y - 1) <= 0` extruded over `|z| <= 1`.
pub fn parabolic_prism(ray: &Ray4D) -> DualHit {
    let ro = ray.origin;
    let rd = ray.direction;
    let k = PARABOLOID_K;

    let a = rd.x * rd.x;
    let b = 2.0 * rd.x * ro.x + k * rd.y;
    let c = ro.x * ro.x + k * (ro.y - 1.0);

    let mut hits = Crossings::new();
    hits.push_roots(ray, solve_quadratic_or_linear(a, b, c), |p| {
        if within(p.y, 1.0) && within(p.z, 1.0) {
            Some(Tuple4D::vector(2.0 * p.x, k, 0.0))
        } else {
            None
        }
    });

    hits.push_face(ray, 1, -1.0, -1.0, |p| within(p.x, 1.0) && within(p.z, 1.0));

    let wall = |p: &Tuple4D| {
        p.y >= -1.0 - QUADRIC_EPSILON
            && p.x * p.x + k * (p.y - 1.0) <= QUADRIC_EPSILON
    };
    hits.push_face(ray, 2, 1.0, 1.0, wall);
    hits.push_face(ray, 2, -1.0, -1.0, wall);
    hits.finish()
}

/// Ratios above zero only; the upper range is left to the caller.
fn positive_ratio(k: f64) -> f64 {
    if k.is_nan() { 1.0 } else { k.max(crate::consts::APEX_RATIO_MIN) }
}

/// Upper half of the one-sheet hyperboloid `k(x^2 + z^2) - (k - 1)y^2 = 1`,
/// shifted to span `-0.5 <= y <= 0.5` and closed by a unit disk on top and
/// a disk of radius `1/sqrt(k)` at the waist.
pub fn hyperboloid_one_sheet(ray: &Ray4D, k: f64) -> DualHit {
    let k = positive_ratio(k);
    let j = k - 1.0;
    let ray = raised(ray, 0.5);
    let ro = ray.origin;
    let rd = ray.direction;

    let a = k * (rd.x * rd.x + rd.z * rd.z) - j * rd.y * rd.y;
    let b = 2.0 * (k * (rd.x * ro.x + rd.z * ro.z) - j * rd.y * ro.y);
    let c = k * (ro.x * ro.x + ro.z * ro.z) - j * ro.y * ro.y - 1.0;

    let mut hits = Crossings::new();
    hits.push_roots(&ray, solve_quadratic(a, b, c), |p| {
        if p.y >= -QUADRIC_EPSILON && p.y <= 1.0 + QUADRIC_EPSILON {
            Some(Tuple4D::vector(2.0 * p.x * k, -2.0 * p.y * j, 2.0 * p.z * k))
        } else {
            None
        }
    });

    hits.push_face(&ray, 1, 1.0, 1.0, |p| radius_sq(p) <= 1.0 + QUADRIC_EPSILON);
    hits.push_face(&ray, 1, 0.0, -1.0, |p| radius_sq(p) <= 1.0 / k + QUADRIC_EPSILON);
    hits.finish()
}

/// Upper sheet of `(k + 1)y^2 - k(x^2 + z^2) = 1`, shifted to span
/// `-0.5 <= y <= 0.5` and closed by a unit disk on top.
pub fn hyperboloid_two_sheets(ray: &Ray4D, k: f64) -> DualHit {
    let k = positive_ratio(k);
    let j = k + 1.0;
    let ray = raised(ray, 0.5);
    let ro = ray.origin;
    let rd = ray.direction;

    let a = k * (rd.x * rd.x + rd.z * rd.z) - j * rd.y * rd.y;
    let b = 2.0 * (k * (rd.x * ro.x + rd.z * ro.z) - j * rd.y * ro.y);
    let c = k * (ro.x * ro.x + ro.z * ro.z) - j * ro.y * ro.y + 1.0;

    let mut hits = Crossings::new();
    hits.push_roots(&ray, solve_quadratic(a, b, c), |p| {
        // The lower sheet lies entirely below y = 0.
        if p.y >= 0.0 && p.y <= 1.0 + QUADRIC_EPSILON {
            Some(Tuple4D::vector(2.0 * p.x * k, -2.0 * p.y * j, 2.0 * p.z * k))
        } else {
            None
        }
    });

    hits.push_face(&ray, 1, 1.0, 1.0, |p| radius_sq(p) <= 1.0 + QUADRIC_EPSILON);
    hits.finish()
}

/// `hyperboloid_one_sheet`'s profile extruded over `|z| <= 1`.
pub fn hyperbolic_prism_one_sheet(ray: &Ray4D, k: f64) -> DualHit {
    let k = positive_ratio(k);
    let j = k - 1.0;
    let ray = raised(ray, 0.5);
    let ro = ray.origin;
    let rd = ray.direction;

    let a = k * rd.x * rd.x - j * rd.y * rd.y;
    let b = 2.0 * (k * rd.x * ro.x - j * rd.y * ro.y);
    let c = k * ro.x * ro.x - j * ro.y * ro.y - 1.0;

    let mut hits = Crossings::new();
    hits.push_roots(&ray, solve_quadratic(a, b, c), |p| {
        let in_height = p.y >= -QUADRIC_EPSILON && p.y <= 1.0 + QUADRIC_EPSILON;
        if in_height && within(p.z, 1.0) {
            Some(Tuple4D::vector(2.0 * p.x * k, -2.0 * p.y * j, 0.0))
        } else {
            None
        }
    });

    hits.push_face(&ray, 1, 1.0, 1.0, |p| within(p.x, 1.0) && within(p.z, 1.0));
    hits.push_face(&ray, 1, 0.0, -1.0,
        |p| within(p.x, 1.0 / k.sqrt()) && within(p.z, 1.0));

    let wall = |p: &Tuple4D| {
        p.y >= -QUADRIC_EPSILON && p.y <= 1.0 + QUADRIC_EPSILON
            && k * p.x * p.x - j * p.y * p.y - 1.0 <= QUADRIC_EPSILON
    };
    hits.push_face(&ray, 2, 1.0, 1.0, wall);
    hits.push_face(&ray, 2, -1.0, -1.0, wall);
    hits.finish()
}

/// `hyperboloid_two_sheets`'s profile extruded over `|z| <= 1`.
pub fn hyperbolic_prism_two_sheets(ray: &Ray4D, k: f64) -> DualHit {
    let k = positive_ratio(k);
    let j = k + 1.0;
    let ray = raised(ray, 0.5);
    let ro = ray.origin;
    let rd = ray.direction;

    let a = k * rd.x * rd.x - j * rd.y * rd.y;
    let b = 2.0 * (k * rd.x * ro.x - j * rd.y * ro.y);
    let c = k * ro.x * ro.x - j * ro.y * ro.y + 1.0;

    let mut hits = Crossings::new();
    hits.push_roots(&ray, solve_quadratic(a, b, c), |p| {
        if p.y >= 0.0 && p.y <= 1.0 + QUADRIC_EPSILON && within(p.z, 1.0) {
            Some(Tuple4D::vector(2.0 * p.x * k, -2.0 * p.y * j, 0.0))
        } else {
            None
        }
    });

    hits.push_face(&ray, 1, 1.0, 1.0, |p| within(p.x, 1.0) && within(p.z, 1.0));

    let wall = |p: &Tuple4D| {
        p.y >= 0.0 && p.y <= 1.0 + QUADRIC_EPSILON
            && k * p.x * p.x - j * p.y * p.y + 1.0 <= QUADRIC_EPSILON
    };
    hits.push_face(&ray, 2, 1.0, 1.0, wall);
    hits.push_face(&ray, 2, -1.0, -1.0, wall);
    hits.finish()
}

/// The solid above the saddle `y = x^2 - z^2`, cut by the unit box.
pub fn hyperbolic_paraboloid(ray: &Ray4D) -> DualHit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = rd.x * rd.x - rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x - rd.z * ro.z) - rd.y;
    let c = ro.x * ro.x - ro.z * ro.z - ro.y;

    let mut hits = Crossings::new();
    hits.push_roots(ray, solve_quadratic_or_linear(a, b, c), |p| {
        if within(p.x, 1.0) && within(p.y, 1.0) && within(p.z, 1.0) {
            Some(Tuple4D::vector(2.0 * p.x, -1.0, -2.0 * p.z))
        } else {
            None
        }
    });

    let above_saddle = |p: &Tuple4D| p.x * p.x - p.z * p.z - p.y <= QUADRIC_EPSILON;
    for axis in 0..3 {
        for &side in [1.0, -1.0].iter() {
            hits.push_face(ray, axis, side, side, |p| {
                (0..3).all(|a| within(p[a], 1.0)) && above_saddle(p)
            });
        }
    }
    hits.finish()
}

/// Radius-1 cylinder for `|y| <= height` with hemispherical ends.
pub fn capsule(ray: &Ray4D, height: f64) -> DualHit {
    let h = height.max(0.0);
    let ro = ray.origin;
    let rd = ray.direction;

    let mut hits = Crossings::new();

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z);
    let c = ro.x * ro.x + ro.z * ro.z - 1.0;
    hits.push_roots(ray, solve_quadratic(a, b, c), |p| {
        if p.y.abs() <= h {
            Some(Tuple4D::vector(2.0 * p.x, 0.0, 2.0 * p.z))
        } else {
            None
        }
    });

    hits.push_roots(ray, offset_sphere_roots(ray, h), |p| {
        if p.y >= h {
            Some(Tuple4D::vector(2.0 * p.x, 2.0 * (p.y - h), 2.0 * p.z))
        } else {
            None
        }
    });
    hits.push_roots(ray, offset_sphere_roots(ray, -h), |p| {
        if p.y <= -h {
            Some(Tuple4D::vector(2.0 * p.x, 2.0 * (p.y + h), 2.0 * p.z))
        } else {
            None
        }
    });

    hits.finish()
}

/// Solid box `[-1, 1]^3`.
pub fn unit_box(ray: &Ray4D) -> DualHit {
    match box_span(ray) {
        Some(((t0, a0), (t1, a1))) if t0.is_finite() && t1.is_finite() => {
            let entry = axis_vector(a0, -ray.direction[a0].signum());
            let exit = axis_vector(a1, ray.direction[a1].signum());
            DualHit::new(Surface::new(t0, entry), Surface::new(t1, exit))
        },
        _ => DualHit::miss(),
    }
}

/// Intersection of half-spaces. Unbounded sides report a miss.
pub fn convex_polyhedron(ray: &Ray4D, planes: &[HalfSpace]) -> DualHit {
    match polyhedron_span(ray, planes) {
        Some(((t0, n0), (t1, n1))) if t0.is_finite() && t1.is_finite() => {
            DualHit::new(Surface::new(t0, n0), Surface::new(t1, n1))
        },
        _ => DualHit::miss(),
    }
}

pub fn triangular_wedge(ray: &Ray4D) -> DualHit {
    convex_polyhedron(ray, &WEDGE_PLANES)
}

/// Square frustum: half-width 1 at `y = -1` narrowing to `1 - k` at
/// `y = 1`, on both X and Z.
///
/// Each side satisfies `|x| <= (k/2)(h - y)`, which is a plane, so the
/// frustum is a six-plane polyhedron.
pub fn pyramid_frustum(ray: &Ray4D, k: f64) -> DualHit {
    convex_polyhedron(ray, &frustum_planes(k))
}

pub(crate) fn frustum_planes(k: f64) -> [HalfSpace; 6] {
    let k = clamp_apex_ratio(k);
    let h = 2.0 / k - 1.0;
    let s = k * 0.5;

    // x + s y <= s h, normalized.
    let len = (1.0 + s * s).sqrt();
    let side = |x: f64, z: f64| HalfSpace::new(
        Tuple4D::vector(x / len, s / len, z / len), s * h / len);

    [
        side(1.0, 0.0),
        side(-1.0, 0.0),
        side(0.0, 1.0),
        side(0.0, -1.0),
        HalfSpace::new(Tuple4D::vector(0.0, 1.0, 0.0), 1.0),
        HalfSpace::new(Tuple4D::vector(0.0, -1.0, 0.0), 1.0),
    ]
}

/* Tests */

#[cfg(test)]
fn toward_origin_from(x: f64, y: f64, z: f64) -> Ray4D {
    let o = Tuple4D::point(x, y, z);
    Ray4D::new(o, Tuple4D::origin() - o)
}

#[cfg(test)]
fn assert_entry_exit(hit: &DualHit, t0: f64, t1: f64) {
    approx::assert_abs_diff_eq!(hit.near.t, t0, epsilon = 1e-6);
    approx::assert_abs_diff_eq!(hit.far.t, t1, epsilon = 1e-6);
}

#[test]
fn sphere_entry_and_exit_normals_point_out() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = sphere(&r);

    assert_entry_exit(&hit, 4.0, 6.0);
    assert_eq!(hit.near.normal.normalize(), Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(hit.far.normal.normalize(), Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn origin_inside_gives_negative_entry() {
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 1.0, 0.0));

    assert_entry_exit(&sphere(&r), -1.0, 1.0);
    assert_entry_exit(&cylinder(&r), -1.0, 1.0);
    assert_entry_exit(&unit_box(&r), -1.0, 1.0);
}

#[test]
fn cylinder_keeps_both_caps() {
    let down = Ray4D::new(Tuple4D::point(0.2, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = cylinder(&down);

    assert_entry_exit(&hit, 4.0, 6.0);
    assert_eq!(hit.near.normal, Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(hit.far.normal, Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn cylinder_wall_then_cap() {
    // Enters through the side, leaves through the bottom.
    let r = Ray4D::new(Tuple4D::point(-2.0, 1.0, 0.0), Tuple4D::vector(1.0, -1.0, 0.0));
    let hit = cylinder(&r);

    assert_entry_exit(&hit, 1.0, 2.0);
    assert_eq!(hit.near.normal.normalize(), Tuple4D::vector(-1.0, 0.0, 0.0));
    assert_eq!(hit.far.normal, Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn tangent_crossing_fills_both_slots() {
    // Skims the wall along the top rim without entering.
    let r = Ray4D::new(Tuple4D::point(-5.0, 1.0, 1.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = cylinder(&r);

    assert!(hit.is_valid());
    assert_entry_exit(&hit, 5.0, 5.0);
}

#[test]
fn cone_caps_and_wall() {
    let down = Ray4D::new(Tuple4D::point(0.1, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    assert_entry_exit(&cone(&down, 0.5), 4.0, 6.0);

    // Outside the top cap (radius 0.5) but inside the base: wall then base.
    let down = Ray4D::new(Tuple4D::point(0.75, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = cone(&down, 0.5);
    // Half-width 0.25 (3 - y) reaches 0.75 at y = 0.
    assert_entry_exit(&hit, 5.0, 6.0);
    assert!(hit.near.normal.y > 0.0 && hit.near.normal.x > 0.0);
}

#[test]
fn conical_prism_is_bounded_in_z() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = conical_prism(&r, 0.5);

    assert_entry_exit(&hit, 4.0, 6.0);
    assert_eq!(hit.near.normal, Tuple4D::vector(0.0, 0.0, -1.0));

    let side = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.5), Tuple4D::vector(1.0, 0.0, 0.0));
    assert_entry_exit(&conical_prism(&side, 0.5), 4.25, 5.75);
}

#[test]
fn paraboloid_apex_to_base() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = paraboloid(&down);

    assert_entry_exit(&hit, 4.0, 6.0);
    assert_eq!(hit.far.normal, Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn parabolic_prism_front_wall() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = parabolic_prism(&r);

    assert_entry_exit(&hit, 4.0, 6.0);
    assert_eq!(hit.far.normal, Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn hyperboloid_one_sheet_spans_half_height() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    assert_entry_exit(&hyperboloid_one_sheet(&down, 2.0), 4.5, 5.5);

    // Waist radius is 1/sqrt(k) at y = -0.5 in the unit frame.
    let r = Ray4D::new(Tuple4D::point(-5.0, -0.4999, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = hyperboloid_one_sheet(&r, 4.0);
    approx::assert_abs_diff_eq!(hit.near.t, 4.5, epsilon = 1e-3);
}

#[test]
fn hyperboloid_two_sheets_vertex_and_cap() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = hyperboloid_two_sheets(&down, 2.0);

    // Vertex at y' = 1/sqrt(3), so y = 1/sqrt(3) - 0.5.
    assert_entry_exit(&hit, 4.5, 5.5 - 1.0 / 3f64.sqrt());
    assert_eq!(hit.near.normal, Tuple4D::vector(0.0, 1.0, 0.0));
    assert!(hit.far.normal.y < 0.0);
}

#[test]
fn hyperbolic_prisms_hit_from_front() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.3, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_entry_exit(&hyperbolic_prism_one_sheet(&r, 2.0), 4.0, 6.0);
    assert_entry_exit(&hyperbolic_prism_two_sheets(&r, 2.0), 4.0, 6.0);
}

#[test]
fn saddle_solid_from_above() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = hyperbolic_paraboloid(&down);

    assert_entry_exit(&hit, 4.0, 5.0);
    assert_eq!(hit.near.normal, Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(hit.far.normal.normalize(), Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn capsule_spans_both_hemispheres() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    assert_entry_exit(&capsule(&down, 1.0), 3.0, 7.0);

    let side = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    assert_entry_exit(&capsule(&side, 1.0), 4.0, 6.0);
}

#[test]
fn box_exit_normal_points_out() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = unit_box(&r);

    assert_entry_exit(&hit, 4.0, 6.0);
    assert_eq!(hit.near.normal, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(hit.far.normal, Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn wedge_and_frustum() {
    let r = toward_origin_from(0.0, 0.0, -5.0);
    assert_entry_exit(&triangular_wedge(&r), 0.8, 1.2);

    let r = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    // Half-width 0.75 at y = 0 for k = 0.5.
    let hit = pyramid_frustum(&r, 0.5);
    assert_entry_exit(&hit, 4.25, 5.75);
    assert!(hit.near.normal.x < 0.0 && hit.far.normal.x > 0.0);
}

#[test]
fn unbounded_polyhedron_is_a_miss() {
    let planes = [HalfSpace::new(Tuple4D::vector(0.0, 0.0, 1.0), 1.0)];
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(!convex_polyhedron(&r, &planes).is_valid());
}

#[test]
fn misses_report_sentinel_in_both_slots() {
    let r = Ray4D::new(Tuple4D::point(3.0, 3.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    for hit in [sphere(&r), cylinder(&r), cone(&r, 0.5), paraboloid(&r),
        capsule(&r, 0.5), unit_box(&r), pyramid_frustum(&r, 0.5)].iter() {
        assert!(!hit.is_valid());
        assert_eq!(hit.near.t, crate::consts::NO_HIT);
        assert_eq!(hit.far.t, crate::consts::NO_HIT);
    }
}
