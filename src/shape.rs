use crate::dual;
use crate::hit::{ DualHit, Hit, Tag };
use crate::matrix::Matrix4D;
use crate::param::{ self, TrimParams };
use crate::placement::Placement;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::unit::{ self, HalfSpace, PlaneParams, Quad, Sheets, Triangle };

/// Surfaces that report a single nearest hit.
///
/// Every kind lives in its canonical unit frame; see the matching function
/// in `unit` or `param` for the exact extent.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    /// Unit sphere at the origin.
    Sphere,

    /// Open tube of radius 1 for `|y| <= 1`.
    Cylinder,

    CappedCylinder,

    /// Open cone frustum with apex ratio `k`.
    Cone(f64),

    CappedCone(f64),

    /// Paraboloid bowl with its apex at `y = 1`, open at `y = -1`.
    Paraboloid,

    CappedParaboloid,

    /// Hyperboloid with the given inner radius.
    Hyperboloid(f64, Sheets),

    /// Saddle `y = x^2 - z^2` inside the unit box.
    HyperbolicParaboloid,

    /// Cylinder with hemispherical ends. The value is the half height of the
    /// straight part.
    Capsule(f64),

    /// The box `[-1, 1]^3`.
    Box,

    TriangularWedge,

    /// Intersection of half-spaces.
    ConvexPolyhedron(Vec<HalfSpace>),

    /// Region within `radius` of the plane through the origin with this
    /// normal.
    Slab(Tuple4D, f64),

    /// Unit disk in the `z = 0` plane.
    Disk,

    /// The square `[-1, 1]^2` in the `z = 0` plane.
    Rectangle,

    Plane(PlaneParams),
    Triangle(Triangle),
    Quad(Quad),

    /// General quadric `p^T Q p = 0` clipped to the unit box.
    Quadric(Matrix4D),

    // Trimmed surfaces, cut by height fraction and sweep angle.
    TrimmedSphere(TrimParams),
    TrimmedCylinder(TrimParams),
    TrimmedCone(TrimParams),
    TrimmedParaboloid(TrimParams),
    TrimmedHyperboloid(f64, TrimParams),
    TrimmedHyperbolicParaboloid(TrimParams),
}

/// Closed solids that report both entry and exit, the leaves of CSG trees.
#[derive(Debug, Clone, PartialEq)]
pub enum SolidType {
    Sphere,

    /// Cylinder of radius 1 for `|y| <= 1`, capped at both ends.
    Cylinder,

    /// Cone frustum with apex ratio `k`, capped at both ends.
    Cone(f64),

    /// The cone's profile extruded over `|z| <= 1`.
    ConicalPrism(f64),

    Paraboloid,
    ParabolicPrism,

    HyperboloidOneSheet(f64),
    HyperboloidTwoSheets(f64),
    HyperbolicPrismOneSheet(f64),
    HyperbolicPrismTwoSheets(f64),

    /// The region above the saddle `y = x^2 - z^2`, inside the unit box.
    HyperbolicParaboloid,

    Capsule(f64),
    Box,

    /// Square frustum with apex ratio `k`.
    PyramidFrustum(f64),

    TriangularWedge,
    ConvexPolyhedron(Vec<HalfSpace>),
}

/// A placed surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub placement: Placement,
    pub tag: Tag,
}

impl Shape {
    /// A shape of kind `ty` sitting in its unit frame, with a default tag.
    pub fn new(ty: ShapeType) -> Shape {
        Shape {
            ty,
            placement: Placement::identity(),
            tag: Tag::default(),
        }
    }

    pub fn sphere() -> Shape {
        Shape::new(ShapeType::Sphere)
    }

    pub fn with_placement(mut self, placement: Placement) -> Shape {
        self.placement = placement;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Shape {
        self.tag = tag;
        self
    }

    /// Nearest hit of a world-space ray. The normal is in world space,
    /// faces the ray, and is not normalized.
    pub fn intersect(&self, ray: &Ray4D) -> Hit {
        let local = self.placement.to_local(ray);
        let mut hit = self.local_intersect(&local);

        if hit.is_hit() {
            hit.normal = self.placement.normal_to_world(&hit.normal);
        }
        hit
    }

    /// Intersects a ray already in this shape's unit frame.
    pub fn local_intersect(&self, ray: &Ray4D) -> Hit {
        match self.ty {
            ShapeType::Sphere => unit::sphere(ray),
            ShapeType::Cylinder => unit::cylinder(ray),
            ShapeType::CappedCylinder => unit::capped_cylinder(ray),
            ShapeType::Cone(k) => unit::cone(ray, k),
            ShapeType::CappedCone(k) => unit::capped_cone(ray, k),
            ShapeType::Paraboloid => unit::paraboloid(ray),
            ShapeType::CappedParaboloid => unit::capped_paraboloid(ray),
            ShapeType::Hyperboloid(r, sheets) => unit::hyperboloid(ray, r, sheets),
            ShapeType::HyperbolicParaboloid => unit::hyperbolic_paraboloid(ray),
            ShapeType::Capsule(h) => unit::capsule(ray, h),
            ShapeType::Box => unit::unit_box(ray),
            ShapeType::TriangularWedge => unit::triangular_wedge(ray),
            ShapeType::ConvexPolyhedron(ref planes) => unit::convex_polyhedron(ray, planes),
            ShapeType::Slab(normal, radius) => unit::slab(ray, normal, radius),
            ShapeType::Disk => unit::disk(ray),
            ShapeType::Rectangle => unit::rectangle(ray),
            ShapeType::Plane(ref params) => unit::plane(ray, params),
            ShapeType::Triangle(ref tri) => unit::triangle(ray, tri),
            ShapeType::Quad(ref q) => unit::quad(ray, q),
            ShapeType::Quadric(ref q) => unit::quadric(ray, q),

            ShapeType::TrimmedSphere(ref trim) => param::ellipsoid(ray, trim),
            ShapeType::TrimmedCylinder(ref trim) => param::cylinder(ray, trim),
            ShapeType::TrimmedCone(ref trim) => param::cone(ray, trim),
            ShapeType::TrimmedParaboloid(ref trim) => param::paraboloid(ray, trim),
            ShapeType::TrimmedHyperboloid(k, ref trim) => param::hyperboloid(ray, k, trim),
            ShapeType::TrimmedHyperbolicParaboloid(ref trim)
                => param::hyperbolic_paraboloid(ray, trim),
        }
    }
}

/// A placed solid, usable as a CSG leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub ty: SolidType,
    pub placement: Placement,
    pub tag: Tag,
}

impl Solid {
    pub fn new(ty: SolidType) -> Solid {
        Solid {
            ty,
            placement: Placement::identity(),
            tag: Tag::default(),
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Solid {
        self.placement = placement;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Solid {
        self.tag = tag;
        self
    }

    /// Entry and exit of a parent-frame ray, tagged with this solid's tag.
    /// Normals point out of the solid, in the parent frame.
    pub fn dual_hit(&self, ray: &Ray4D) -> DualHit {
        let local = self.placement.to_local(ray);
        let mut hit = self.local_dual_hit(&local);

        if hit.is_valid() {
            hit.near.normal = self.placement.normal_to_world(&hit.near.normal);
            hit.far.normal = self.placement.normal_to_world(&hit.far.normal);
        }
        hit.tagged(self.tag)
    }

    pub fn local_dual_hit(&self, ray: &Ray4D) -> DualHit {
        match self.ty {
            SolidType::Sphere => dual::sphere(ray),
            SolidType::Cylinder => dual::cylinder(ray),
            SolidType::Cone(k) => dual::cone(ray, k),
            SolidType::ConicalPrism(k) => dual::conical_prism(ray, k),
            SolidType::Paraboloid => dual::paraboloid(ray),
            SolidType::ParabolicPrism => dual::parabolic_prism(ray),
            SolidType::HyperboloidOneSheet(k) => dual::hyperboloid_one_sheet(ray, k),
            SolidType::HyperboloidTwoSheets(k) => dual::hyperboloid_two_sheets(ray, k),
            SolidType::HyperbolicPrismOneSheet(k) => dual::hyperbolic_prism_one_sheet(ray, k),
            SolidType::HyperbolicPrismTwoSheets(k) => dual::hyperbolic_prism_two_sheets(ray, k),
            SolidType::HyperbolicParaboloid => dual::hyperbolic_paraboloid(ray),
            SolidType::Capsule(h) => dual::capsule(ray, h),
            SolidType::Box => dual::unit_box(ray),
            SolidType::PyramidFrustum(k) => dual::pyramid_frustum(ray, k),
            SolidType::TriangularWedge => dual::triangular_wedge(ray),
            SolidType::ConvexPolyhedron(ref planes) => dual::convex_polyhedron(ray, planes),
        }
    }
}

/* Tests */

#[test]
fn intersecting_scaled_sphere() {
    let s = Shape::sphere()
        .with_placement(Placement::new(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap());
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = s.intersect(&r);

    approx::assert_abs_diff_eq!(hit.t, 3.0, epsilon = 1e-9);
    assert_eq!(hit.normal.normalize(), Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn intersecting_translated_sphere_misses() {
    let s = Shape::sphere()
        .with_placement(Placement::new(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap());
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(!s.intersect(&r).is_hit());
}

#[test]
fn world_normal_on_rotated_box_faces_ray() {
    let s = Shape::new(ShapeType::Box).with_placement(
        Placement::new(Matrix4D::rotation_y(std::f64::consts::FRAC_PI_4)).unwrap());
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = s.intersect(&r);

    approx::assert_abs_diff_eq!(hit.t, 5.0 - 2f64.sqrt(), epsilon = 1e-9);
    assert!(hit.normal.dot3(&r.direction) < 0.0);
}

#[test]
fn trimmed_shapes_dispatch_to_parametric_intersectors() {
    let half = TrimParams::new(-1.0, 1.0, std::f64::consts::PI);
    let s = Shape::new(ShapeType::TrimmedSphere(half));

    // The upper half in z (phi in [0, pi]) is kept.
    let toward_back = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, -1.0));
    let toward_front = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    approx::assert_abs_diff_eq!(s.intersect(&toward_back).t, 4.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(s.intersect(&toward_front).t, 6.0, epsilon = 1e-9);
}

#[test]
fn solid_normals_point_out_in_parent_frame() {
    let s = Solid::new(SolidType::Cylinder)
        .with_placement(Placement::new(Matrix4D::rotation_x(std::f64::consts::FRAC_PI_2)).unwrap());
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = s.dual_hit(&r);

    approx::assert_abs_diff_eq!(hit.near.t, 4.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.far.t, 6.0, epsilon = 1e-9);
    assert_eq!(hit.near.normal.normalize(), Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(hit.far.normal.normalize(), Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn solid_tags_both_crossings() {
    let tag = Tag { object_id: 9, ..Default::default() };
    let s = Solid::new(SolidType::Box).with_tag(tag);
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = s.dual_hit(&r);

    assert_eq!(hit.near.tag, tag);
    assert_eq!(hit.far.tag, tag);
}
