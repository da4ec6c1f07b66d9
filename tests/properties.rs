use analytic_tracer::consts::NO_HIT;
use analytic_tracer::matrix::Matrix4D;
use analytic_tracer::param::TrimParams;
use analytic_tracer::placement::Placement;
use analytic_tracer::ray::Ray4D;
use analytic_tracer::shape::{ Shape, ShapeType, Solid, SolidType };
use analytic_tracer::tuple::Tuple4D;
use analytic_tracer::unit::{ HalfSpace, PlaneParams, Quad, Sheets, Triangle };

fn aimed(from: (f64, f64, f64), at: (f64, f64, f64)) -> Ray4D {
    let o = Tuple4D::point(from.0, from.1, from.2);
    let target = Tuple4D::point(at.0, at.1, at.2);
    Ray4D::new(o, target - o)
}

fn from_front() -> Ray4D {
    aimed((0.0, 0.0, -5.0), (0.0, 0.0, 0.0))
}

fn from_side() -> Ray4D {
    aimed((-5.0, 0.0, 0.0), (0.0, 0.0, 0.0))
}

fn from_above() -> Ray4D {
    aimed((0.0, 5.0, 0.0), (0.0, 0.0, 0.0))
}

fn far_away() -> Ray4D {
    Ray4D::new(Tuple4D::point(5.0, 5.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0))
}

fn octahedron() -> Vec<HalfSpace> {
    let mut planes = Vec::new();
    for &x in [-1.0, 1.0].iter() {
        for &y in [-1.0, 1.0].iter() {
            for &z in [-1.0, 1.0].iter() {
                planes.push(HalfSpace::new(Tuple4D::vector(x, y, z), 1.0));
            }
        }
    }
    planes
}

fn surfaces() -> Vec<(ShapeType, Ray4D)> {
    let trim = TrimParams::default();
    let tri = Triangle {
        a: Tuple4D::point(-1.0, -1.0, 0.0),
        b: Tuple4D::point(1.0, -1.0, 0.0),
        c: Tuple4D::point(0.0, 1.0, 0.0),
        double_sided: true,
    };
    let quad = Quad {
        a: Tuple4D::point(-1.0, -1.0, 0.0),
        b: Tuple4D::point(1.0, -1.0, 0.0),
        c: Tuple4D::point(1.0, 1.0, 0.0),
        d: Tuple4D::point(-1.0, 1.0, 0.0),
        double_sided: true,
    };
    let floor = PlaneParams {
        normal: Tuple4D::vector(0.0, 1.0, 0.0),
        offset: 0.0,
        double_sided: false,
    };
    let unit_sphere = Matrix4D::from([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, -1.0,
    ]);

    vec![
        (ShapeType::Sphere, from_front()),
        (ShapeType::Cylinder, from_side()),
        (ShapeType::CappedCylinder, from_above()),
        (ShapeType::Cone(0.5), from_side()),
        (ShapeType::CappedCone(0.5), from_above()),
        (ShapeType::Paraboloid, from_side()),
        (ShapeType::CappedParaboloid, aimed((0.0, -5.0, 0.0), (0.0, 0.0, 0.0))),
        (ShapeType::Hyperboloid(0.5, Sheets::One), from_side()),
        (ShapeType::Hyperboloid(0.5, Sheets::Two), from_above()),
        (ShapeType::HyperbolicParaboloid, from_above()),
        (ShapeType::Capsule(1.0), from_above()),
        (ShapeType::Box, from_front()),
        (ShapeType::TriangularWedge, aimed((-5.0, -1.0 / 3.0, 0.0), (-1.0 / 3.0, -1.0 / 3.0, 0.0))),
        (ShapeType::ConvexPolyhedron(octahedron()), from_front()),
        (ShapeType::Slab(Tuple4D::vector(0.0, 1.0, 0.0), 0.5), from_above()),
        (ShapeType::Disk, from_front()),
        (ShapeType::Rectangle, from_front()),
        (ShapeType::Plane(floor), from_above()),
        (ShapeType::Triangle(tri), from_front()),
        (ShapeType::Quad(quad), from_front()),
        (ShapeType::Quadric(unit_sphere), from_front()),
        (ShapeType::TrimmedSphere(trim), from_side()),
        (ShapeType::TrimmedCylinder(trim), from_side()),
        (ShapeType::TrimmedCone(trim), from_side()),
        (ShapeType::TrimmedParaboloid(trim), from_side()),
        (ShapeType::TrimmedHyperboloid(2.0, trim), from_side()),
        (ShapeType::TrimmedHyperbolicParaboloid(trim), from_above()),
    ]
}

fn solids() -> Vec<(SolidType, Ray4D)> {
    let slightly_up = aimed((-5.0, 0.3, 0.0), (0.0, 0.3, 0.0));

    vec![
        (SolidType::Sphere, from_front()),
        (SolidType::Cylinder, from_side()),
        (SolidType::Cone(0.5), from_side()),
        (SolidType::ConicalPrism(0.5), from_front()),
        (SolidType::Paraboloid, from_side()),
        (SolidType::ParabolicPrism, from_side()),
        (SolidType::HyperboloidOneSheet(2.0), from_side()),
        (SolidType::HyperboloidTwoSheets(2.0), slightly_up),
        (SolidType::HyperbolicPrismOneSheet(2.0), from_side()),
        (SolidType::HyperbolicPrismTwoSheets(2.0), slightly_up),
        (SolidType::HyperbolicParaboloid, from_above()),
        (SolidType::Capsule(0.5), from_above()),
        (SolidType::Box, from_front()),
        (SolidType::PyramidFrustum(0.5), from_side()),
        (SolidType::TriangularWedge, aimed((-5.0, -1.0 / 3.0, 0.0), (-1.0 / 3.0, -1.0 / 3.0, 0.0))),
        (SolidType::ConvexPolyhedron(octahedron()), from_front()),
    ]
}

#[test]
fn every_surface_hit_faces_the_ray() {
    for (ty, ray) in surfaces() {
        let hit = Shape::new(ty.clone()).intersect(&ray);

        assert!(hit.is_hit(), "{:?} missed", ty);
        assert!(hit.t.is_finite() && hit.t > 0.0, "{:?} gave t = {}", ty, hit.t);
        assert!(hit.normal.dot3(&ray.direction) <= 0.0, "{:?} normal faces away", ty);
    }
}

#[test]
fn every_solid_reports_ordered_entry_and_exit() {
    for (ty, ray) in solids() {
        let hit = Solid::new(ty.clone()).dual_hit(&ray);

        assert!(hit.is_valid(), "{:?} missed", ty);
        assert!(hit.near.t.is_finite() && hit.near.t > 0.0, "{:?} entry {}", ty, hit.near.t);
        assert!(hit.far.t >= hit.near.t, "{:?} exits before entering", ty);
        assert!(hit.near.normal.dot3(&ray.direction) <= 0.0, "{:?} entry normal points in", ty);
        assert!(hit.far.normal.dot3(&ray.direction) >= 0.0, "{:?} exit normal points in", ty);
    }
}

#[test]
fn rays_past_every_shape_report_the_sentinel() {
    let ray = far_away();

    for (ty, _) in surfaces() {
        let hit = Shape::new(ty.clone()).intersect(&ray);
        assert_eq!(hit.t, NO_HIT, "{:?} should miss", ty);
    }

    for (ty, _) in solids() {
        let hit = Solid::new(ty.clone()).dual_hit(&ray);
        assert_eq!(hit.near.t, NO_HIT, "{:?} should miss", ty);
        assert_eq!(hit.far.t, NO_HIT, "{:?} should miss", ty);
    }
}

#[test]
fn local_hit_points_map_back_to_world() {
    let forward = Matrix4D::translation(0.5, -1.0, 2.0)
        * Matrix4D::rotation_z(0.3)
        * Matrix4D::scaling(1.5, 0.75, 2.0);
    let placement = Placement::new(forward).unwrap();
    let world_ray = aimed((-6.0, 1.0, -4.0), (0.5, -1.0, 2.0));

    for (ty, _) in solids() {
        let solid = Solid::new(ty.clone()).with_placement(placement);
        let hit = solid.dual_hit(&world_ray);
        if !hit.is_valid() {
            continue;
        }

        let local_ray = placement.to_local(&world_ray);
        for &t in [hit.near.t, hit.far.t].iter() {
            let back = placement.point_to_world(&local_ray.position(t));
            assert_eq!(back, world_ray.position(t), "{:?} at t = {}", ty, t);
        }
    }
}

#[test]
fn placed_sphere_hit_lies_on_its_surface() {
    let placement = Placement::new(
        Matrix4D::translation(1.0, 2.0, 3.0) * Matrix4D::scaling(2.0, 1.0, 0.5)
    ).unwrap();
    let ray = aimed((-4.0, 2.0, 3.0), (1.0, 2.0, 3.0));
    let hit = Shape::sphere().with_placement(placement).intersect(&ray);

    let local = *placement.inverse() * ray.position(hit.t);
    approx::assert_abs_diff_eq!(local.as_vector().magnitude(), 1.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.t, 0.6, epsilon = 1e-9);
}
