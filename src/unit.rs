//! Single-hit intersectors for shapes in their canonical unit frame.
//!
//! Every function is pure: it takes a ray already moved into the shape's
//! local frame plus the shape's plain parameters, and returns the nearest
//! crossing ahead of the ray origin (or `Hit::miss()`). Returned normals are
//! local-frame gradients, not normalized, flipped to face the ray.

use serde::{ Serialize, Deserialize };

use crate::consts::{ CYLINDER_WALL_RADIUS_SQ, PARABOLOID_K, QUADRIC_EPSILON,
    TWO_PI };
use crate::hit::Hit;
use crate::matrix::Matrix4D;
use crate::quadratic::{ solve_quadratic, solve_quadratic_or_linear };
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

/// Half-space `normal . p <= offset`. Polyhedra are intersections of these.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfSpace {
    pub normal: Tuple4D,
    pub offset: f64,
}

impl HalfSpace {
    pub fn new(normal: Tuple4D, offset: f64) -> HalfSpace {
        HalfSpace { normal: normal.as_vector(), offset }
    }
}

const fn half_space(x: f64, y: f64, z: f64, offset: f64) -> HalfSpace {
    HalfSpace { normal: Tuple4D { x, y, z, w: 0.0 }, offset }
}

/// The right triangular prism spanning the unit box: `x >= -1`, `y >= -1`,
/// `|z| <= 1` and `x + y <= 0`.
pub const WEDGE_PLANES: [HalfSpace; 5] = [
    half_space(-1.0, 0.0, 0.0, 1.0),
    half_space(0.0, 0.0, 1.0, 1.0),
    half_space(0.0, 0.0, -1.0, 1.0),
    half_space(0.0, -1.0, 0.0, 1.0),
    half_space(std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2,
        0.0, 0.0),
];

/// Which hyperboloid of revolution about Y to intersect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sheets {
    /// `x^2 - y^2 + z^2 = r^2`, a waisted tube.
    One,

    /// `x^2 - y^2 + z^2 = -r^2`, two bowls facing away from each other.
    Two,
}

/// An infinite plane through `offset * normal`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneParams {
    pub normal: Tuple4D,
    pub offset: f64,

    /// A single-sided plane is invisible from behind (along its normal).
    pub double_sided: bool,
}

/// A triangle with counter-clockwise vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub a: Tuple4D,
    pub b: Tuple4D,
    pub c: Tuple4D,
    pub double_sided: bool,
}

/// A planar quad, split along `a`-`c` into two triangles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    pub a: Tuple4D,
    pub b: Tuple4D,
    pub c: Tuple4D,
    pub d: Tuple4D,
    pub double_sided: bool,
}

pub(crate) fn within(value: f64, limit: f64) -> bool {
    value.abs() <= limit + QUADRIC_EPSILON
}

/// Angle about the Y axis in `[0, 2pi)`.
pub(crate) fn azimuth(p: &Tuple4D) -> f64 {
    p.z.atan2(p.x).rem_euclid(TWO_PI)
}

/// Tries the nearer root first and falls back to the farther one. `surface`
/// validates a hit point against the shape's bounds and returns its normal
/// and optional texture coordinates.
fn nearest_root<F>(ray: &Ray4D, roots: Option<(f64, f64)>, surface: F) -> Hit
where
    F: Fn(&Tuple4D) -> Option<(Tuple4D, Option<(f64, f64)>)>,
{
    let (t0, t1) = match roots {
        Some(roots) => roots,
        None => return Hit::miss(),
    };

    for &t in [t0, t1].iter() {
        if t <= 0.0 {
            continue;
        }

        let p = ray.position(t);
        if let Some((normal, uv)) = surface(&p) {
            return Hit { t, normal: normal.face_forward(&ray.direction), uv };
        }
    }

    Hit::miss()
}

/// Horizontal disk cap at height `y`, accepted within `radius_sq`.
fn cap(ray: &Ray4D, y: f64, radius_sq: f64, normal: Tuple4D) -> Hit {
    let t = (y - ray.origin.y) / ray.direction.y;
    if !t.is_finite() || t <= 0.0 {
        return Hit::miss();
    }

    let p = ray.position(t);
    if p.x * p.x + p.z * p.z <= radius_sq + QUADRIC_EPSILON {
        Hit::new(t, normal.face_forward(&ray.direction))
    } else {
        Hit::miss()
    }
}

/// Apex ratio clamped away from a degenerate cone.
pub(crate) fn clamp_apex_ratio(k: f64) -> f64 {
    use crate::consts::{ APEX_RATIO_MIN, APEX_RATIO_MAX };

    if k.is_nan() {
        APEX_RATIO_MAX
    } else {
        k.max(APEX_RATIO_MIN).min(APEX_RATIO_MAX)
    }
}

/// Unit sphere at the origin. `uv` is longitude/latitude.
pub fn sphere(ray: &Ray4D) -> Hit {
    let ro = ray.origin.as_vector();
    let rd = ray.direction;

    let a = rd.dot3(&rd);
    let b = 2.0 * rd.dot3(&ro);
    let c = ro.dot3(&ro) - 1.0;

    nearest_root(ray, solve_quadratic(a, b, c), |p| {
        let u = azimuth(p) / TWO_PI;
        let v = 1.0 - p.y.max(-1.0).min(1.0).acos() / std::f64::consts::PI;
        Some((p.as_vector(), Some((u, v))))
    })
}

/// Open tube of radius 1 around Y for `|y| <= 1`.
///
/// The wall radius is slightly under 1 so that `capped_cylinder`'s caps
/// overhang it.
pub fn cylinder(ray: &Ray4D) -> Hit {
    cylinder_wall(ray, CYLINDER_WALL_RADIUS_SQ, 1.0)
}

fn cylinder_wall(ray: &Ray4D, radius_sq: f64, half_height: f64) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z);
    let c = ro.x * ro.x + ro.z * ro.z - radius_sq;

    nearest_root(ray, solve_quadratic(a, b, c), |p| {
        if !within(p.y, half_height) {
            return None;
        }

        let uv = (azimuth(p) / TWO_PI, (p.y + half_height) / (2.0 * half_height));
        Some((Tuple4D::vector(p.x, 0.0, p.z), Some(uv)))
    })
}

/// Closed cylinder: the unit tube plus disks at `y = 1` and `y = -1`.
pub fn capped_cylinder(ray: &Ray4D) -> Hit {
    cylinder(ray)
        .nearest(cap(ray, 1.0, 1.0, Tuple4D::vector(0.0, 1.0, 0.0)))
        .nearest(cap(ray, -1.0, 1.0, Tuple4D::vector(0.0, -1.0, 0.0)))
}

/// Coefficients of the unit cone `j(x^2 + z^2) = (k/4)(y - h)^2` with base
/// radius 1 at `y = -1` and top radius `1 - k` at `y = 1`.
pub(crate) struct ConeShape {
    pub k: f64,
    pub j: f64,
    pub h: f64,
}

impl ConeShape {
    pub fn new(k: f64) -> ConeShape {
        let k = clamp_apex_ratio(k);
        let j = 1.0 / k;
        ConeShape { k, j, h: j * 2.0 - 1.0 }
    }

    pub fn coefficients(&self, ray: &Ray4D) -> (f64, f64, f64) {
        let ro = ray.origin;
        let rd = ray.direction;
        let q = self.k * 0.25;
        let oy = ro.y - self.h;

        let a = self.j * (rd.x * rd.x + rd.z * rd.z) - q * rd.y * rd.y;
        let b = 2.0 * (self.j * (rd.x * ro.x + rd.z * ro.z) - q * rd.y * oy);
        let c = self.j * (ro.x * ro.x + ro.z * ro.z) - q * oy * oy;

        (a, b, c)
    }

    /// Outward gradient (up to a factor of 2).
    pub fn normal(&self, p: &Tuple4D) -> Tuple4D {
        Tuple4D::vector(self.j * p.x, self.k * 0.25 * (self.h - p.y), self.j * p.z)
    }

    pub fn top_radius_sq(&self) -> f64 {
        (1.0 - self.k) * (1.0 - self.k)
    }
}

/// Open cone frustum with apex ratio `k`, clamped to `[0.01, 1]`.
pub fn cone(ray: &Ray4D, k: f64) -> Hit {
    let shape = ConeShape::new(k);
    let (a, b, c) = shape.coefficients(ray);

    nearest_root(ray, solve_quadratic(a, b, c), |p| {
        if within(p.y, 1.0) {
            Some((shape.normal(p), None))
        } else {
            None
        }
    })
}

/// Cone frustum closed by its top disk (radius `1 - k`) and base disk.
pub fn capped_cone(ray: &Ray4D, k: f64) -> Hit {
    let shape = ConeShape::new(k);

    cone(ray, k)
        .nearest(cap(ray, 1.0, shape.top_radius_sq(), Tuple4D::vector(0.0, 1.0, 0.0)))
        .nearest(cap(ray, -1.0, 1.0, Tuple4D::vector(0.0, -1.0, 0.0)))
}

/// Paraboloid `x^2 + z^2 + k(y - 1) = 0` opening downward from its apex at
/// `y = 1` to radius 1 at `y = -1`.
pub fn paraboloid(ray: &Ray4D) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;
    let k = PARABOLOID_K;

    let a = rd.x * rd.x + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x + rd.z * ro.z) + k * rd.y;
    let c = ro.x * ro.x + ro.z * ro.z + k * (ro.y - 1.0);

    // Rays parallel to the axis make the equation linear.
    let roots = solve_quadratic_or_linear(a, b, c);

    nearest_root(ray, roots, |p| {
        if within(p.y, 1.0) {
            Some((Tuple4D::vector(2.0 * p.x, k, 2.0 * p.z), None))
        } else {
            None
        }
    })
}

/// The unit paraboloid closed by a disk at `y = -1`.
pub fn capped_paraboloid(ray: &Ray4D) -> Hit {
    paraboloid(ray).nearest(cap(ray, -1.0, 1.0, Tuple4D::vector(0.0, -1.0, 0.0)))
}

/// Hyperboloid about Y for `|y| <= 1`. `inner_radius` is the waist radius
/// of one sheet, or the gap to the vertices for two.
pub fn hyperboloid(ray: &Ray4D, inner_radius: f64, sheets: Sheets) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;
    let r2 = inner_radius * inner_radius;

    let a = rd.x * rd.x - rd.y * rd.y + rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x - rd.y * ro.y + rd.z * ro.z);
    let c = ro.x * ro.x - ro.y * ro.y + ro.z * ro.z + match sheets {
        Sheets::One => -r2,
        Sheets::Two => r2,
    };

    nearest_root(ray, solve_quadratic(a, b, c), |p| {
        if within(p.y, 1.0) {
            Some((Tuple4D::vector(p.x, -p.y, p.z), None))
        } else {
            None
        }
    })
}

/// Saddle `y = x^2 - z^2` over `|x|, |z| <= 1`.
pub fn hyperbolic_paraboloid(ray: &Ray4D) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = rd.x * rd.x - rd.z * rd.z;
    let b = 2.0 * (rd.x * ro.x - rd.z * ro.z) - rd.y;
    let c = ro.x * ro.x - ro.z * ro.z - ro.y;

    let roots = solve_quadratic_or_linear(a, b, c);

    nearest_root(ray, roots, |p| {
        if within(p.x, 1.0) && within(p.z, 1.0) {
            Some((Tuple4D::vector(2.0 * p.x, -1.0, -2.0 * p.z), None))
        } else {
            None
        }
    })
}

/// Roots of the unit sphere centred at `(0, cy, 0)`.
pub(crate) fn offset_sphere_roots(ray: &Ray4D, cy: f64) -> Option<(f64, f64)> {
    let ro = ray.origin.as_vector() - Tuple4D::vector(0.0, cy, 0.0);
    let rd = ray.direction;

    solve_quadratic(rd.dot3(&rd), 2.0 * rd.dot3(&ro), ro.dot3(&ro) - 1.0)
}

/// A radius-1 cylinder for `|y| <= height` capped by hemispheres centred at
/// `y = ±height`.
pub fn capsule(ray: &Ray4D, height: f64) -> Hit {
    let h = height.max(0.0);

    let top = nearest_root(ray, offset_sphere_roots(ray, h), |p| {
        if p.y >= h {
            Some((Tuple4D::vector(p.x, p.y - h, p.z), None))
        } else {
            None
        }
    });

    let bottom = nearest_root(ray, offset_sphere_roots(ray, -h), |p| {
        if p.y <= -h {
            Some((Tuple4D::vector(p.x, p.y + h, p.z), None))
        } else {
            None
        }
    });

    let body = if h > 0.0 {
        cylinder_wall(ray, 1.0, h)
    } else {
        Hit::miss()
    };

    top.nearest(bottom).nearest(body)
}

/// Entry and exit distances of one axis slab `|o + t d| <= 1`. A ray
/// parallel to the slab is either always or never inside it.
fn slab_axis(o: f64, d: f64) -> Option<(f64, f64)> {
    if d == 0.0 {
        if o.abs() <= 1.0 {
            Some((f64::NEG_INFINITY, f64::INFINITY))
        } else {
            None
        }
    } else {
        let near = (-1.0 - o) / d;
        let far = (1.0 - o) / d;
        Some((near.min(far), near.max(far)))
    }
}

/// Slab-method span of the unit box `[-1, 1]^3`: `(t0, entry axis)` and
/// `(t1, exit axis)`. `None` when the per-axis intervals don't overlap.
pub(crate) fn box_span(ray: &Ray4D) -> Option<((f64, usize), (f64, usize))> {
    let mut entry = (f64::NEG_INFINITY, 0);
    let mut exit = (f64::INFINITY, 0);

    for axis in 0..3 {
        let (near, far) = slab_axis(ray.origin[axis], ray.direction[axis])?;
        if near > entry.0 {
            entry = (near, axis);
        }
        if far < exit.0 {
            exit = (far, axis);
        }
    }

    if entry.0 > exit.0 {
        None
    } else {
        Some((entry, exit))
    }
}

/// Unit vector along `axis`, scaled by `sign`.
pub(crate) fn axis_vector(axis: usize, sign: f64) -> Tuple4D {
    let mut v = Tuple4D::vector(0.0, 0.0, 0.0);
    match axis {
        0 => v.x = sign,
        1 => v.y = sign,
        _ => v.z = sign,
    }
    v
}

/// Axis-aligned box `[-1, 1]^3`.
pub fn unit_box(ray: &Ray4D) -> Hit {
    let ((t0, a0), (t1, a1)) = match box_span(ray) {
        Some(span) => span,
        None => return Hit::miss(),
    };

    // Face normals oppose the ray along the hit axis, entering or exiting.
    let facing = |axis: usize| axis_vector(axis, -ray.direction[axis].signum());

    let mut hit = Hit::miss();
    if !hit.offer(t0, facing(a0), None) {
        hit.offer(t1, facing(a1), None);
    }
    hit
}

/// Entry and exit of a convex region bounded by `planes`, each as
/// `(t, plane normal)`. The entry is at negative infinity when no plane
/// faces the ray.
pub(crate) fn polyhedron_span(ray: &Ray4D, planes: &[HalfSpace])
    -> Option<((f64, Tuple4D), (f64, Tuple4D))> {
    let mut entry = (f64::NEG_INFINITY, Tuple4D::vector(0.0, 0.0, 0.0));
    let mut exit = (f64::INFINITY, Tuple4D::vector(0.0, 0.0, 0.0));

    for plane in planes {
        let denom = plane.normal.dot3(&ray.direction);
        let inside = plane.offset - plane.normal.dot3(&ray.origin);

        if denom == 0.0 {
            if inside < 0.0 {
                return None;
            }
            continue;
        }

        let t = inside / denom;
        if denom < 0.0 {
            if t > entry.0 {
                entry = (t, plane.normal);
            }
        } else if t < exit.0 {
            exit = (t, plane.normal);
        }
    }

    if entry.0 > exit.0 {
        None
    } else {
        Some((entry, exit))
    }
}

/// The intersection of a list of half-spaces.
pub fn convex_polyhedron(ray: &Ray4D, planes: &[HalfSpace]) -> Hit {
    let ((t0, n0), (t1, n1)) = match polyhedron_span(ray, planes) {
        Some(span) => span,
        None => return Hit::miss(),
    };

    let mut hit = Hit::miss();
    if !(t0.is_finite() && hit.offer(t0, n0.face_forward(&ray.direction), None)) {
        if t1.is_finite() {
            hit.offer(t1, n1.face_forward(&ray.direction), None);
        }
    }
    hit
}

/// The unit right triangular wedge, see `WEDGE_PLANES`.
pub fn triangular_wedge(ray: &Ray4D) -> Hit {
    convex_polyhedron(ray, &WEDGE_PLANES)
}

/// Region between the parallel planes `normal . p = ±radius`.
pub fn slab(ray: &Ray4D, normal: Tuple4D, radius: f64) -> Hit {
    let planes = [
        HalfSpace::new(normal, radius),
        HalfSpace::new(-normal, radius),
    ];
    convex_polyhedron(ray, &planes)
}

/// Crossing of the `z = 0` plane, as `(t, x, y)`.
fn xy_plane_crossing(ray: &Ray4D) -> Option<(f64, f64, f64)> {
    let t = -ray.origin.z / ray.direction.z;
    if !t.is_finite() || t <= 0.0 {
        return None;
    }

    let p = ray.position(t);
    Some((t, p.x, p.y))
}

/// Double-sided unit disk in the `z = 0` plane, facing `+z`.
pub fn disk(ray: &Ray4D) -> Hit {
    match xy_plane_crossing(ray) {
        Some((t, x, y)) if x * x + y * y <= 1.0 => {
            let normal = Tuple4D::vector(0.0, 0.0, 1.0).face_forward(&ray.direction);
            Hit::with_uv(t, normal, x * 0.5 + 0.5, -y * 0.5 + 0.5)
        },
        _ => Hit::miss(),
    }
}

/// Double-sided square `[-1, 1]^2` in the `z = 0` plane, facing `+z`.
pub fn rectangle(ray: &Ray4D) -> Hit {
    match xy_plane_crossing(ray) {
        Some((t, x, y)) if x.abs() <= 1.0 && y.abs() <= 1.0 => {
            let normal = Tuple4D::vector(0.0, 0.0, 1.0).face_forward(&ray.direction);
            Hit::with_uv(t, normal, x * 0.5 + 0.5, -y * 0.5 + 0.5)
        },
        _ => Hit::miss(),
    }
}

pub fn plane(ray: &Ray4D, params: &PlaneParams) -> Hit {
    let n = params.normal.as_vector();
    let denom = n.dot3(&ray.direction);
    if denom == 0.0 || (!params.double_sided && denom > 0.0) {
        return Hit::miss();
    }

    let to_plane = n * params.offset - ray.origin.as_vector();
    let t = to_plane.dot3(&n) / denom;

    let mut hit = Hit::miss();
    hit.offer(t, n.face_forward(&ray.direction), None);
    hit
}

/// Moller-Trumbore. `uv` holds the barycentric weights of `b` and `c`.
pub fn triangle(ray: &Ray4D, tri: &Triangle) -> Hit {
    let edge1 = tri.b - tri.a;
    let edge2 = tri.c - tri.a;
    let pvec = ray.direction.cross(&edge2);

    let det = edge1.dot3(&pvec);
    if det == 0.0 || (!tri.double_sided && det < 0.0) {
        return Hit::miss();
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - tri.a;
    let u = tvec.dot3(&pvec) * inv_det;
    if u < 0.0 || u > 1.0 {
        return Hit::miss();
    }

    let qvec = tvec.cross(&edge1);
    let v = ray.direction.dot3(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return Hit::miss();
    }

    let t = edge2.dot3(&qvec) * inv_det;
    let normal = edge1.cross(&edge2).face_forward(&ray.direction);

    let mut hit = Hit::miss();
    hit.offer(t, normal, Some((u, v)));
    hit
}

pub fn quad(ray: &Ray4D, q: &Quad) -> Hit {
    let first = Triangle { a: q.a, b: q.b, c: q.c, double_sided: q.double_sided };
    let second = Triangle { a: q.a, b: q.c, c: q.d, double_sided: q.double_sided };

    triangle(ray, &first).nearest(triangle(ray, &second))
}

/// General quadric `p^T Q p = 0` in homogeneous coordinates, kept inside
/// the `[-1, 1]^3` box.
pub fn quadric(ray: &Ray4D, q: &Matrix4D) -> Hit {
    let ro = ray.origin;
    let rd = ray.direction;

    let a = q.bilinear(&rd, &rd);
    let b = q.bilinear(&ro, &rd) + q.bilinear(&rd, &ro);
    let c = q.bilinear(&ro, &ro);

    let qt = q.transposition();
    nearest_root(ray, solve_quadratic(a, b, c), |p| {
        if within(p.x, 1.0) && within(p.y, 1.0) && within(p.z, 1.0) {
            Some(((*q * *p + qt * *p).as_vector(), None))
        } else {
            None
        }
    })
}

/* Tests */

#[cfg(test)]
fn toward_z(x: f64, y: f64) -> Ray4D {
    Ray4D::new(Tuple4D::point(x, y, -5.0), Tuple4D::vector(0.0, 0.0, 1.0))
}

#[test]
fn sphere_head_on() {
    let hit = sphere(&toward_z(0.0, 0.0));

    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal.normalize(), Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn sphere_from_inside_hits_far_wall() {
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = sphere(&r);

    approx::assert_abs_diff_eq!(hit.t, 1.0);
    assert!(hit.normal.dot3(&r.direction) <= 0.0);
}

#[test]
fn sphere_behind_and_missed() {
    let behind = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(!sphere(&behind).is_hit());
    assert!(!sphere(&toward_z(2.0, 0.0)).is_hit());
}

#[test]
fn zero_direction_is_a_miss() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 0.0));
    assert!(!sphere(&r).is_hit());
    assert!(!unit_box(&r).is_hit());
}

#[test]
fn box_head_on() {
    let hit = unit_box(&toward_z(0.0, 0.0));

    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn box_from_inside_exit_faces_ray() {
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = unit_box(&r);

    approx::assert_abs_diff_eq!(hit.t, 1.0);
    assert_eq!(hit.normal, Tuple4D::vector(-1.0, 0.0, 0.0));
}

#[test]
fn box_parallel_outside_slab_misses() {
    assert!(!unit_box(&toward_z(1.5, 0.0)).is_hit());
}

#[test]
fn cylinder_wall_uses_tolerance_radius() {
    let r = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = cylinder(&r);

    approx::assert_abs_diff_eq!(hit.t, 5.0 - CYLINDER_WALL_RADIUS_SQ.sqrt(), epsilon = 1e-9);
    assert_eq!(hit.normal.normalize(), Tuple4D::vector(-1.0, 0.0, 0.0));
}

#[test]
fn open_cylinder_is_hollow_along_axis() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    assert!(!cylinder(&down).is_hit());

    let hit = capped_cylinder(&down);
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn cylinder_above_height_falls_through_to_far_root() {
    // Enters through the top opening, leaves through the wall.
    let r = Ray4D::new(Tuple4D::point(-2.5, 3.5, 0.0),
        Tuple4D::vector(1.0, -1.0, 0.0));
    let hit = cylinder(&r);

    assert!(hit.is_hit());
    assert!(r.position(hit.t).x > 0.0);
    assert!(r.position(hit.t).y.abs() <= 1.0);
}

#[test]
fn cone_base_and_top_radii() {
    let k = 0.5;

    // Base radius 1 at y = -1.
    let r = Ray4D::new(Tuple4D::point(-5.0, -0.999, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = cone(&r, k);
    approx::assert_abs_diff_eq!(hit.t, 4.0, epsilon = 1e-3);

    // Top radius 1 - k at y = 1.
    let r = Ray4D::new(Tuple4D::point(-5.0, 1.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = cone(&r, k);
    approx::assert_abs_diff_eq!(hit.t, 4.5, epsilon = 1e-6);
}

#[test]
fn cone_apex_ratio_is_clamped() {
    let r = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(cone(&r, 0.0), cone(&r, 0.01));
    assert_eq!(cone(&r, 3.0), cone(&r, 1.0));
}

#[test]
fn capped_cone_top_disk() {
    let down = Ray4D::new(Tuple4D::point(0.1, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));

    assert!(!cone(&down, 0.5).is_hit());
    let hit = capped_cone(&down, 0.5);
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn paraboloid_apex_and_cap() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = paraboloid(&down);
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal.normalize(), Tuple4D::vector(0.0, 1.0, 0.0));

    let up = Ray4D::new(Tuple4D::point(0.0, -5.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0));
    let hit = capped_paraboloid(&up);
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn hyperboloid_waist_and_sheets() {
    let r = Ray4D::new(Tuple4D::point(-5.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = hyperboloid(&r, 0.5, Sheets::One);
    approx::assert_abs_diff_eq!(hit.t, 4.5);

    // The two-sheet variant has no surface in the y = 0 plane.
    assert!(!hyperboloid(&r, 0.5, Sheets::Two).is_hit());

    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = hyperboloid(&down, 0.5, Sheets::Two);
    approx::assert_abs_diff_eq!(hit.t, 4.5);
}

#[test]
fn saddle_at_origin() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = hyperbolic_paraboloid(&down);

    approx::assert_abs_diff_eq!(hit.t, 5.0);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn capsule_hits_hemisphere_then_body() {
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = capsule(&down, 1.0);
    approx::assert_abs_diff_eq!(hit.t, 3.0);

    let side = Ray4D::new(Tuple4D::point(-5.0, 0.5, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let hit = capsule(&side, 1.0);
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(-1.0, 0.0, 0.0));
}

#[test]
fn wedge_slanted_face() {
    // x + y <= 0: coming down the y axis at x = 0.5 meets the slope at y = -0.5.
    let down = Ray4D::new(Tuple4D::point(0.5, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = triangular_wedge(&down);

    approx::assert_abs_diff_eq!(hit.t, 5.5, epsilon = 1e-9);
    let n = hit.normal.normalize();
    approx::assert_abs_diff_eq!(n.x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(n.y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
}

#[test]
fn polyhedron_parallel_outside_plane_misses() {
    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(!triangular_wedge(&r).is_hit());
}

#[test]
fn slab_between_planes() {
    let r = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let hit = slab(&r, Tuple4D::vector(0.0, 1.0, 0.0), 0.5);

    approx::assert_abs_diff_eq!(hit.t, 4.5);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn disk_uv_and_radius() {
    let hit = disk(&toward_z(0.0, 0.0));
    approx::assert_abs_diff_eq!(hit.t, 5.0);
    assert_eq!(hit.uv, Some((0.5, 0.5)));
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 0.0, -1.0));

    assert!(!disk(&toward_z(0.8, 0.8)).is_hit());
    assert!(rectangle(&toward_z(0.8, 0.8)).is_hit());
    assert!(!rectangle(&toward_z(1.2, 0.0)).is_hit());
}

#[test]
fn single_sided_plane_culls_back() {
    let params = PlaneParams {
        normal: Tuple4D::vector(0.0, 1.0, 0.0),
        offset: 1.0,
        double_sided: false,
    };

    let from_above = Ray4D::new(Tuple4D::point(0.0, 3.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let from_below = Ray4D::new(Tuple4D::point(0.0, -3.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0));

    approx::assert_abs_diff_eq!(plane(&from_above, &params).t, 2.0);
    assert!(!plane(&from_below, &params).is_hit());

    let both = PlaneParams { double_sided: true, ..params };
    let hit = plane(&from_below, &both);
    approx::assert_abs_diff_eq!(hit.t, 4.0);
    assert_eq!(hit.normal, Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn triangle_barycentrics() {
    let tri = Triangle {
        a: Tuple4D::point(0.0, 1.0, 0.0),
        b: Tuple4D::point(-1.0, 0.0, 0.0),
        c: Tuple4D::point(1.0, 0.0, 0.0),
        double_sided: true,
    };

    let r = Ray4D::new(Tuple4D::point(0.0, 0.5, -2.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = triangle(&r, &tri);
    approx::assert_abs_diff_eq!(hit.t, 2.0);
    let (u, v) = hit.uv.unwrap();
    approx::assert_abs_diff_eq!(u, 0.25);
    approx::assert_abs_diff_eq!(v, 0.25);

    let miss = Ray4D::new(Tuple4D::point(1.0, 1.0, -2.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(!triangle(&miss, &tri).is_hit());
}

#[test]
fn quad_covers_both_halves() {
    let q = Quad {
        a: Tuple4D::point(-1.0, -1.0, 0.0),
        b: Tuple4D::point(1.0, -1.0, 0.0),
        c: Tuple4D::point(1.0, 1.0, 0.0),
        d: Tuple4D::point(-1.0, 1.0, 0.0),
        double_sided: true,
    };

    assert!(quad(&toward_z(0.5, -0.5), &q).is_hit());
    assert!(quad(&toward_z(-0.5, 0.5), &q).is_hit());
    assert!(!quad(&toward_z(1.5, 0.5), &q).is_hit());
}

#[test]
fn quadric_matrix_sphere_matches_unit_sphere() {
    let q = Matrix4D::from([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, -1.0,
    ]);

    let r = toward_z(0.3, -0.2);
    let expected = sphere(&r);
    let hit = quadric(&r, &q);

    approx::assert_abs_diff_eq!(hit.t, expected.t, epsilon = 1e-9);
    assert_eq!(hit.normal.normalize(), expected.normal.normalize());
}
