use serde::Serialize;

use crate::csg::CsgNode;
use crate::hit::Tag;
use crate::ray::Ray4D;
use crate::shape::Shape;
use crate::tuple::Tuple4D;

/// Everything a ray can hit: single surfaces and CSG trees.
///
/// A world is built once and then only read, so it can be shared between
/// tracing threads behind an `Arc`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
    pub shapes: Vec<Shape>,
    pub solids: Vec<CsgNode>,
}

/// The nearest hit of a ray against a world.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct WorldHit {
    pub t: f64,
    pub point: Tuple4D,

    /// World space, normalized, facing the ray.
    pub normal: Tuple4D,

    pub uv: Option<(f64, f64)>,
    pub tag: Tag,
}

impl World {
    pub fn new(shapes: Vec<Shape>, solids: Vec<CsgNode>) -> World {
        World { shapes, solids }
    }

    pub fn empty() -> World {
        Default::default()
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn add_solid(&mut self, solid: CsgNode) {
        self.solids.push(solid);
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.solids.is_empty()
    }

    /// Intersects a ray against every shape and solid and keeps the nearest
    /// hit ahead of the ray origin.
    pub fn nearest_hit(&self, ray: &Ray4D) -> Option<WorldHit> {
        let mut best: Option<WorldHit> = None;
        let mut offer = |t: f64, normal: Tuple4D, uv, tag| {
            if best.map_or(true, |b| t < b.t) {
                best = Some(WorldHit {
                    t,
                    point: ray.position(t),
                    normal: normal.face_forward(&ray.direction).normalize(),
                    uv,
                    tag,
                });
            }
        };

        for shape in self.shapes.iter() {
            let hit = shape.intersect(ray);
            if hit.is_hit() {
                offer(hit.t, hit.normal, hit.uv, shape.tag);
            }
        }

        for solid in self.solids.iter() {
            if let Some(surface) = solid.dual_hit(ray).first_visible() {
                offer(surface.t, surface.normal, None, surface.tag);
            }
        }

        best
    }
}

/* Tests */

#[cfg(test)]
use crate::matrix::Matrix4D;
#[cfg(test)]
use crate::placement::Placement;
#[cfg(test)]
use crate::shape::{ ShapeType, Solid, SolidType };

#[cfg(test)]
fn tagged(id: usize) -> Tag {
    Tag { object_id: id, ..Default::default() }
}

#[test]
fn empty_world_never_hits() {
    let w = World::empty();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(w.is_empty());
    assert_eq!(w.nearest_hit(&r), None);
}

#[test]
fn nearest_of_shape_and_solid() {
    let mut w = World::empty();
    w.add_shape(Shape::sphere().with_tag(tagged(1)));
    w.add_solid(Solid::new(SolidType::Box)
        .with_placement(Placement::new(Matrix4D::translation(0.0, 0.0, -2.5)).unwrap())
        .with_tag(tagged(2))
        .into());

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = w.nearest_hit(&r).unwrap();

    approx::assert_abs_diff_eq!(hit.t, 1.5, epsilon = 1e-9);
    assert_eq!(hit.tag.object_id, 2);
    assert_eq!(hit.point, Tuple4D::point(0.0, 0.0, -3.5));
    assert_eq!(hit.normal, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn solid_around_origin_reports_its_exit() {
    let mut w = World::empty();
    w.add_solid(Solid::new(SolidType::Sphere).into());

    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 2.0, 0.0));
    let hit = w.nearest_hit(&r).unwrap();

    approx::assert_abs_diff_eq!(hit.t, 0.5, epsilon = 1e-9);
    // The exit normal points out of the sphere, so it is flipped to face
    // the ray.
    assert_eq!(hit.normal, Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn uv_survives_from_surface_hits() {
    let mut w = World::empty();
    w.add_shape(Shape::new(ShapeType::Disk));

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = w.nearest_hit(&r).unwrap();

    assert!(hit.uv.is_some());
}
