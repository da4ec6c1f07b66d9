use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::tuple::Tuple4D;

/// A 4x4 row-major matrix.
///
/// These matrices place shapes in the world: they transform points (`w = 1`)
/// and vectors (`w = 0`) between a shape's unit frame and its parent frame.
///
/// # Examples
///
/// ```
/// # use analytic_tracer::matrix::Matrix4D;
/// let m = Matrix4D::scaling(2.0, 2.0, 2.0);
/// assert_eq!(m.determinant(), 8.0);
/// assert_eq!(m.inverse(), Some(Matrix4D::scaling(0.5, 0.5, 0.5)));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(l, r)| feq(*l, *r))
    }
}

impl Matrix4D {
    /// Creates a new `Matrix4D`. All elements are initialized to `0.0`.
    pub fn new() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    pub fn identity() -> Matrix4D {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4D { data: buf }
    }

    /// Offsets a point by `x`, `y` and `z`. Vectors are unaffected.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Rotation about the X axis by `r` radians (left-handed).
    pub fn rotation_x(r: f64) -> Matrix4D {
        let (s, c) = r.sin_cos();
        Matrix4D::from([
            1.0, 0.0, 0.0, 0.0,
            0.0,   c,  -s, 0.0,
            0.0,   s,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about the Y axis by `r` radians.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let (s, c) = r.sin_cos();
        Matrix4D::from([
              c, 0.0,   s, 0.0,
            0.0, 1.0, 0.0, 0.0,
             -s, 0.0,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about the Z axis by `r` radians.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let (s, c) = r.sin_cos();
        Matrix4D::from([
              c,  -s, 0.0, 0.0,
              s,   c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Shears each axis in proportion to the other two. For example `xy`
    /// moves `x` in proportion to `y`.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        Matrix4D::from([
            1.0,  xy,  xz, 0.0,
             yx, 1.0,  yz, 0.0,
             zx,  zy, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Produces the transpose of a matrix, `A^T_{ij} = A_{ji}`.
    pub fn transposition(&self) -> Matrix4D {
        let mut buf = *self;

        for r in 0..4 {
            for c in (r+1)..4 {
                buf[(r, c)] = self[(c, r)];
                buf[(c, r)] = self[(r, c)];
            }
        }

        buf
    }

    /// Determinant of the 3x3 submatrix left after dropping `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        let mut sub = [0.0; 9];
        let mut count = 0;

        for r in (0..4).filter(|r| *r != row) {
            for c in (0..4).filter(|c| *c != col) {
                sub[count] = self[(r, c)];
                count += 1;
            }
        }

        sub[0] * (sub[4] * sub[8] - sub[5] * sub[7])
            - sub[1] * (sub[3] * sub[8] - sub[5] * sub[6])
            + sub[2] * (sub[3] * sub[7] - sub[4] * sub[6])
    }

    /// The minor at `row`, `col`, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
    }

    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }

    /// Calculates the inverse of a `Matrix4D`, if it exists.
    ///
    /// Returns `None` for singular (or numerically singular) matrices. The
    /// determinant is judged against the product of the row lengths, so a
    /// uniformly tiny scale still inverts.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        let rows: f64 = (0..4)
            .map(|r| (0..4).map(|c| self[(r, c)].powi(2)).sum::<f64>().sqrt())
            .product();

        if !det.is_finite() || rows == 0.0
            || det.abs() <= crate::consts::DEGENERATE_EPSILON * rows {
            return None;
        }

        let mut inv = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }

    /// Bilinear form `a^T M b` over all four components.
    pub fn bilinear(&self, a: &Tuple4D, b: &Tuple4D) -> f64 {
        a.dot(&(*self * *b))
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

/// Matrix product. Not commutative: `A * B` applies `B` first.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::new();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = (0..4).map(|k| self[(r, k)] * other[(k, c)]).sum();
            }
        }

        res
    }
}

/// Transforms a column `Tuple4D`.
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        let row = |r: usize| self[(r, 0)] * t.x
            + self[(r, 1)] * t.y
            + self[(r, 2)] * t.z
            + self[(r, 3)] * t.w;

        Tuple4D { x: row(0), y: row(1), z: row(2), w: row(3) }
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

/* Tests */

#[test]
fn transpose_swaps_rows_and_columns() {
    let m = Matrix4D::from([
        0.0, 9.0, 3.0, 0.0,
        9.0, 8.0, 0.0, 8.0,
        1.0, 8.0, 5.0, 3.0,
        0.0, 0.0, 5.0, 8.0,
    ]);

    let t = Matrix4D::from([
        0.0, 9.0, 1.0, 0.0,
        9.0, 8.0, 8.0, 0.0,
        3.0, 0.0, 5.0, 5.0,
        0.0, 8.0, 3.0, 8.0,
    ]);

    assert_eq!(m.transposition(), t);
    assert_eq!(Matrix4D::identity().transposition(), Matrix4D::identity());
}

#[test]
fn mat4_determinant() {
    let m = Matrix4D::from([
        -2.0, -8.0,  3.0,  5.0,
        -3.0,  1.0,  7.0,  3.0,
         1.0,  2.0, -9.0,  6.0,
        -6.0,  7.0,  7.0, -9.0,
    ]);

    assert_eq!(m.cofactor(0, 0), 690.0);
    assert_eq!(m.cofactor(0, 1), 447.0);
    assert_eq!(m.cofactor(0, 2), 210.0);
    assert_eq!(m.cofactor(0, 3), 51.0);
    assert_eq!(m.determinant(), -4071.0);
}

#[test]
fn singular_matrix_has_no_inverse() {
    let m = Matrix4D::from([
        -4.0,  2.0, -2.0, -3.0,
         9.0,  6.0,  2.0,  6.0,
         0.0, -5.0,  1.0, -5.0,
         0.0,  0.0,  0.0,  0.0,
    ]);

    assert_eq!(m.inverse(), None);
    assert_eq!(Matrix4D::scaling(1.0, 0.0, 1.0).inverse(), None);
}

#[test]
fn product_with_inverse_is_identity() {
    let a = Matrix4D::translation(1.0, -2.0, 3.0)
        * Matrix4D::rotation_y(0.7)
        * Matrix4D::scaling(2.0, 0.5, 3.0)
        * Matrix4D::shearing(0.2, 0.0, 0.0, 0.1, 0.0, 0.0);

    let inv = a.inverse().expect("affine transform should be invertible");
    assert_eq!(a * inv, Matrix4D::identity());
    assert_eq!(inv * a, Matrix4D::identity());
}

#[test]
fn translation_moves_points_not_vectors() {
    let m = Matrix4D::translation(5.0, -3.0, 2.0);

    assert_eq!(m * Tuple4D::point(-3.0, 4.0, 5.0), Tuple4D::point(2.0, 1.0, 7.0));
    assert_eq!(m * Tuple4D::vector(-3.0, 4.0, 5.0), Tuple4D::vector(-3.0, 4.0, 5.0));
}

#[test]
fn rotations_quarter_turn() {
    let half_pi = std::f64::consts::FRAC_PI_2;

    assert_eq!(
        Matrix4D::rotation_x(half_pi) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, 0.0, 1.0)
    );
    assert_eq!(
        Matrix4D::rotation_y(half_pi) * Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(1.0, 0.0, 0.0)
    );
    assert_eq!(
        Matrix4D::rotation_z(half_pi) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0)
    );
}

#[test]
fn shearing_x_in_proportion_to_y() {
    let m = Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(m * Tuple4D::point(2.0, 3.0, 4.0), Tuple4D::point(5.0, 3.0, 4.0));
}

#[test]
fn bilinear_form_of_identity_is_dot() {
    let a = Tuple4D::point(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(4.0, 5.0, 6.0);

    assert_eq!(Matrix4D::identity().bilinear(&a, &b), 32.0);
}

#[test]
fn tiny_uniform_scale_still_inverts() {
    let inv = Matrix4D::scaling(1e-5, 1e-5, 1e-5).inverse();

    assert_eq!(inv, Some(Matrix4D::scaling(1e5, 1e5, 1e5)));
}
