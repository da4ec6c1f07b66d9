use std::ops::{ Add, Sub, Neg, Mul, Index };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A homogeneous 3D point (`w = 1`) or direction vector (`w = 0`).
///
/// Equality is approximate, see `feq`.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 0.0 }
    }

    pub fn origin() -> Tuple4D {
        Tuple4D::point(0.0, 0.0, 0.0)
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    /// The same coordinates reinterpreted as a direction.
    pub fn as_vector(&self) -> Tuple4D {
        Tuple4D { w: 0.0, ..*self }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns a unit-length copy. A zero vector is returned unchanged.
    pub fn normalize(&self) -> Tuple4D {
        let mag = self.magnitude();
        if mag == 0.0 {
            return *self;
        }

        *self * (1.0 / mag)
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// Dot product over `x`, `y` and `z` only, ignoring `w`.
    pub fn dot3(&self, other: &Tuple4D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Tuple4D) -> Tuple4D {
        Tuple4D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 0.0
        }
    }

    /// Flips this normal so it faces against `direction`.
    pub fn face_forward(&self, direction: &Tuple4D) -> Tuple4D {
        if self.dot3(direction) > 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl Index<usize> for Tuple4D {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => &self.w,
        }
    }
}

impl From<[f64; 3]> for Tuple4D {
    fn from(v: [f64; 3]) -> Tuple4D {
        Tuple4D::point(v[0], v[1], v[2])
    }
}

impl From<Tuple4D> for [f64; 3] {
    fn from(t: Tuple4D) -> [f64; 3] {
        [t.x, t.y, t.z]
    }
}

impl Add for Tuple4D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w
        }
    }
}

impl Sub for Tuple4D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w
        }
    }
}

impl Neg for Tuple4D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w
        }
    }
}

/// Scalar right-multiplication, `t * s`.
impl Mul<f64> for Tuple4D {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w * s
        }
    }
}

/// Scalar left-multiplication, `s * t`.
impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        t * self
    }
}

/* Tests */

#[test]
fn sub_points_gives_vector() {
    let p1 = Tuple4D::point(3.0, 2.0, 1.0);
    let p2 = Tuple4D::point(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple4D::vector(-2.0, -4.0, -6.0));
}

#[test]
fn scalar_multiplication_commutes() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a * 3.5, Tuple4D::tuple(3.5, -7.0, 10.5, -14.0));
    assert_eq!(3.5 * a, a * 3.5);
}

#[test]
fn normalize_dirty() {
    let v = Tuple4D::vector(1.0, 2.0, 3.0);
    let e = Tuple4D::vector(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
}

#[test]
fn normalize_zero_vector_is_noop() {
    let v = Tuple4D::vector(0.0, 0.0, 0.0);
    assert_eq!(v.normalize(), v);
}

#[test]
fn dot3_ignores_w() {
    let p = Tuple4D::point(1.0, 2.0, 3.0);
    assert_eq!(p.dot3(&p), 14.0);
    assert_eq!(p.dot(&p), 15.0);
}

#[test]
fn cross_vectors() {
    let a = Tuple4D::vector(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Tuple4D::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple4D::vector(1.0, -2.0, 1.0));
}

#[test]
fn face_forward_flips_normals_pointing_along_ray() {
    let d = Tuple4D::vector(0.0, 0.0, 1.0);

    let away = Tuple4D::vector(0.0, 0.0, 1.0);
    let toward = Tuple4D::vector(0.0, 0.0, -1.0);

    assert_eq!(away.face_forward(&d), toward);
    assert_eq!(toward.face_forward(&d), toward);
}
