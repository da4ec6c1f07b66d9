use crate::error::KernelError;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

/// A shape's placement in its parent frame, with the matrices intersection
/// needs computed once up front.
///
/// `forward` maps the shape's unit frame into the parent frame. Rays go the
/// other way through `inverse`; normals come back through the transposed
/// inverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    forward: Matrix4D,
    inverse: Matrix4D,
    inverse_transpose: Matrix4D,
}

impl Default for Placement {
    fn default() -> Placement {
        Placement::identity()
    }
}

impl Placement {
    pub fn new(forward: Matrix4D) -> Result<Placement, KernelError> {
        let inverse = forward.inverse().ok_or_else(|| {
            KernelError::SingularTransform { determinant: forward.determinant() }
        })?;

        Ok(Placement {
            forward,
            inverse,
            inverse_transpose: inverse.transposition(),
        })
    }

    pub fn identity() -> Placement {
        Placement {
            forward: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
            inverse_transpose: Matrix4D::identity(),
        }
    }

    pub fn forward(&self) -> &Matrix4D {
        &self.forward
    }

    pub fn inverse(&self) -> &Matrix4D {
        &self.inverse
    }

    /// Moves a parent-frame ray into the unit frame. Distances along the ray
    /// are preserved since the direction is not renormalized.
    pub fn to_local(&self, ray: &Ray4D) -> Ray4D {
        ray.transform(&self.inverse)
    }

    pub fn point_to_world(&self, p: &Tuple4D) -> Tuple4D {
        self.forward * *p
    }

    /// Un-normalized; callers normalize once at the top of the tree.
    pub fn normal_to_world(&self, n: &Tuple4D) -> Tuple4D {
        let mut normal = self.inverse_transpose * *n;
        normal.w = 0.0;
        normal
    }
}

/* Tests */

#[test]
fn singular_transform_is_rejected() {
    let flat = Matrix4D::scaling(1.0, 0.0, 1.0);

    match Placement::new(flat) {
        Err(KernelError::SingularTransform { determinant }) => {
            approx::assert_abs_diff_eq!(determinant, 0.0)
        },
        other => panic!("expected a singular transform error, got {:?}", other),
    }
}

#[test]
fn local_hit_point_maps_back_to_world() {
    let placement = Placement::new(
        Matrix4D::translation(1.0, -2.0, 3.0)
            * Matrix4D::rotation_y(0.7)
            * Matrix4D::scaling(2.0, 0.5, 1.5)
    ).unwrap();

    let world = Ray4D::new(Tuple4D::point(-4.0, 1.0, 0.5), Tuple4D::vector(1.0, -0.5, 0.4));
    let local = placement.to_local(&world);

    for &t in [0.0, 1.5, 3.25].iter() {
        assert_eq!(placement.point_to_world(&local.position(t)), world.position(t));
    }
}

#[test]
fn normals_stay_perpendicular_under_scaling() {
    let placement = Placement::new(Matrix4D::scaling(1.0, 0.5, 1.0)).unwrap();
    // Unit sphere normal at 45 degrees, squashed into an ellipsoid.
    let n = placement.normal_to_world(&Tuple4D::vector(0.0, 1.0, 1.0));
    let tangent = *placement.forward() * Tuple4D::vector(0.0, 1.0, -1.0);

    approx::assert_abs_diff_eq!(n.dot(&tangent), 0.0, epsilon = 1e-12);
    assert_eq!(n.w, 0.0);
}

#[test]
fn tiny_parts_round_trip() {
    let placement = Placement::new(
        Matrix4D::translation(0.0, 0.0, 2e-5) * Matrix4D::scaling(1e-5, 1e-5, 1e-5)
    ).unwrap();

    let world = Ray4D::new(Tuple4D::point(0.0, 0.0, -1.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let local = placement.to_local(&world);

    // The unit sphere's near pole sits at world z = 1e-5.
    let t = (-1.0 - local.origin.z) / local.direction.z;
    approx::assert_relative_eq!(t, 1.0 + 1e-5, max_relative = 1e-12);
    approx::assert_abs_diff_eq!(placement.point_to_world(&local.position(t)).z, 1e-5, epsilon = 1e-14);
}
