use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use log::{ debug, warn };
use serde::{ Serialize, Deserialize };

use crate::consts::{ APEX_RATIO_MAX, APEX_RATIO_MIN, TWO_PI };
use crate::csg::{ CsgNode, CsgOp };
use crate::error::{ Result, SceneError };
use crate::hit::Tag;
use crate::matrix::Matrix4D;
use crate::param::TrimParams;
use crate::placement::Placement;
use crate::ray::Ray4D;
use crate::shape::{ Shape, ShapeType, Solid, SolidType };
use crate::tuple::Tuple4D;
use crate::unit::{ HalfSpace, PlaneParams, Quad, Sheets, Triangle };
use crate::world::World;

/// Reads a scene description from a JSON file.
pub fn load_world(path: &Path) -> Result<World> {
    debug!("Loading scene from {}", path.display());
    parse_world(&fs::read_to_string(path)?)
}

pub fn parse_world(json: &str) -> Result<World> {
    let scene: SceneJson = serde_json::from_str(json)?;
    World::try_from(scene)
}

/// Reads a batch of rays from a JSON file.
pub fn load_rays(path: &Path) -> Result<Vec<Ray4D>> {
    debug!("Loading rays from {}", path.display());
    parse_rays(&fs::read_to_string(path)?)
}

pub fn parse_rays(json: &str) -> Result<Vec<Ray4D>> {
    let rays: Vec<RayJson> = serde_json::from_str(json)?;
    Ok(rays.into_iter().map(Ray4D::from).collect())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneJson {
    #[serde(default)]
    pub shapes: Vec<ShapeJson>,

    #[serde(default)]
    pub solids: Vec<NodeJson>,
}

impl TryFrom<SceneJson> for World {
    type Error = SceneError;

    fn try_from(scene: SceneJson) -> Result<World> {
        let shapes = scene.shapes.into_iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<_>>>()?;
        let solids = scene.solids.into_iter()
            .map(CsgNode::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!("Built world with {} shapes and {} solids", shapes.len(), solids.len());
        Ok(World::new(shapes, solids))
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct RayJson {
    pub origin: [f64; 3],
    pub direction: [f64; 3],
}

impl From<RayJson> for Ray4D {
    fn from(ray: RayJson) -> Ray4D {
        Ray4D::new(Tuple4D::from(ray.origin), Tuple4D::from(ray.direction).as_vector())
    }
}

/// One step of a placement, in the order matrices are multiplied.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformJson {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),

    /// `xy, xz, yx, yz, zx, zy`
    Shear([f64; 6]),

    /// Row-major.
    Matrix([f64; 16]),
}

impl From<&TransformJson> for Matrix4D {
    fn from(step: &TransformJson) -> Matrix4D {
        match *step {
            TransformJson::Translate([x, y, z]) => Matrix4D::translation(x, y, z),
            TransformJson::Scale([x, y, z]) => Matrix4D::scaling(x, y, z),
            TransformJson::RotateX(r) => Matrix4D::rotation_x(r),
            TransformJson::RotateY(r) => Matrix4D::rotation_y(r),
            TransformJson::RotateZ(r) => Matrix4D::rotation_z(r),
            TransformJson::Shear([xy, xz, yx, yz, zx, zy])
                => Matrix4D::shearing(xy, xz, yx, yz, zx, zy),
            TransformJson::Matrix(data) => Matrix4D::from(data),
        }
    }
}

/// Multiplies the steps left to right, so the last step applies first.
fn placement(steps: &[TransformJson]) -> Result<Placement> {
    let forward = steps.iter()
        .fold(Matrix4D::identity(), |m, step| m * Matrix4D::from(step));
    Ok(Placement::new(forward)?)
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct PlaneJson {
    pub normal: [f64; 3],

    #[serde(default)]
    pub offset: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Sphere,
    Cylinder,
    CappedCylinder,
    Cone { k: f64 },
    CappedCone { k: f64 },
    Paraboloid,
    CappedParaboloid,
    Hyperboloid {
        inner_radius: f64,
        #[serde(default = "one_sheet")]
        sheets: Sheets,
    },
    HyperbolicParaboloid,
    Capsule { height: f64 },
    Box,
    TriangularWedge,
    ConvexPolyhedron { planes: Vec<PlaneJson> },
    Slab { normal: [f64; 3], radius: f64 },
    Disk,
    Rectangle,
    Plane {
        normal: [f64; 3],
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        double_sided: bool,
    },
    Triangle {
        a: [f64; 3],
        b: [f64; 3],
        c: [f64; 3],
        #[serde(default)]
        double_sided: bool,
    },
    Quad {
        a: [f64; 3],
        b: [f64; 3],
        c: [f64; 3],
        d: [f64; 3],
        #[serde(default)]
        double_sided: bool,
    },
    Quadric { coefficients: [f64; 16] },
    TrimmedSphere {
        #[serde(default)]
        trim: TrimParams,
    },
    TrimmedCylinder {
        #[serde(default)]
        trim: TrimParams,
    },
    TrimmedCone {
        #[serde(default)]
        trim: TrimParams,
    },
    TrimmedParaboloid {
        #[serde(default)]
        trim: TrimParams,
    },
    TrimmedHyperboloid {
        k: f64,
        #[serde(default)]
        trim: TrimParams,
    },
    TrimmedHyperbolicParaboloid {
        #[serde(default)]
        trim: TrimParams,
    },
}

fn one_sheet() -> Sheets {
    Sheets::One
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeJson {
    #[serde(flatten)]
    pub kind: ShapeKind,

    #[serde(default)]
    pub transform: Vec<TransformJson>,

    #[serde(default)]
    pub tag: Tag,
}

impl TryFrom<ShapeJson> for Shape {
    type Error = SceneError;

    fn try_from(json: ShapeJson) -> Result<Shape> {
        let ty = match json.kind {
            ShapeKind::Sphere => ShapeType::Sphere,
            ShapeKind::Cylinder => ShapeType::Cylinder,
            ShapeKind::CappedCylinder => ShapeType::CappedCylinder,
            ShapeKind::Cone { k } => ShapeType::Cone(apex_ratio(k)?),
            ShapeKind::CappedCone { k } => ShapeType::CappedCone(apex_ratio(k)?),
            ShapeKind::Paraboloid => ShapeType::Paraboloid,
            ShapeKind::CappedParaboloid => ShapeType::CappedParaboloid,
            ShapeKind::Hyperboloid { inner_radius, sheets } => ShapeType::Hyperboloid(
                non_negative("inner_radius", inner_radius)?, sheets),
            ShapeKind::HyperbolicParaboloid => ShapeType::HyperbolicParaboloid,
            ShapeKind::Capsule { height } => ShapeType::Capsule(
                non_negative("height", height)?),
            ShapeKind::Box => ShapeType::Box,
            ShapeKind::TriangularWedge => ShapeType::TriangularWedge,
            ShapeKind::ConvexPolyhedron { planes } => ShapeType::ConvexPolyhedron(
                half_spaces(&planes)?),
            ShapeKind::Slab { normal, radius } => ShapeType::Slab(
                direction("normal", normal)?.normalize(), non_negative("radius", radius)?),
            ShapeKind::Disk => ShapeType::Disk,
            ShapeKind::Rectangle => ShapeType::Rectangle,
            ShapeKind::Plane { normal, offset, double_sided } => {
                ShapeType::Plane(PlaneParams {
                    normal: direction("normal", normal)?.normalize(),
                    offset: finite("offset", offset)?,
                    double_sided,
                })
            },
            ShapeKind::Triangle { a, b, c, double_sided } => {
                ShapeType::Triangle(Triangle {
                    a: a.into(),
                    b: b.into(),
                    c: c.into(),
                    double_sided,
                })
            },
            ShapeKind::Quad { a, b, c, d, double_sided } => {
                ShapeType::Quad(Quad {
                    a: a.into(),
                    b: b.into(),
                    c: c.into(),
                    d: d.into(),
                    double_sided,
                })
            },
            ShapeKind::Quadric { coefficients } => ShapeType::Quadric(
                Matrix4D::from(coefficients)),
            ShapeKind::TrimmedSphere { trim } => ShapeType::TrimmedSphere(trimming(trim)?),
            ShapeKind::TrimmedCylinder { trim } => ShapeType::TrimmedCylinder(trimming(trim)?),
            ShapeKind::TrimmedCone { trim } => ShapeType::TrimmedCone(trimming(trim)?),
            ShapeKind::TrimmedParaboloid { trim } => ShapeType::TrimmedParaboloid(trimming(trim)?),
            ShapeKind::TrimmedHyperboloid { k, trim } => ShapeType::TrimmedHyperboloid(
                nonzero("k", k)?, trimming(trim)?),
            ShapeKind::TrimmedHyperbolicParaboloid { trim }
                => ShapeType::TrimmedHyperbolicParaboloid(trimming(trim)?),
        };

        Ok(Shape::new(ty)
            .with_placement(placement(&json.transform)?)
            .with_tag(json.tag))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Union { left: Box<NodeJson>, right: Box<NodeJson> },
    Difference { left: Box<NodeJson>, right: Box<NodeJson> },
    Intersection { left: Box<NodeJson>, right: Box<NodeJson> },

    Sphere,
    Cylinder,
    Cone { k: f64 },
    ConicalPrism { k: f64 },
    Paraboloid,
    ParabolicPrism,
    HyperboloidOneSheet { k: f64 },
    HyperboloidTwoSheets { k: f64 },
    HyperbolicPrismOneSheet { k: f64 },
    HyperbolicPrismTwoSheets { k: f64 },
    HyperbolicParaboloid,
    Capsule { height: f64 },
    Box,
    PyramidFrustum { k: f64 },
    TriangularWedge,
    ConvexPolyhedron { planes: Vec<PlaneJson> },
}

/// A CSG tree node: an operation on two children, or a solid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeJson {
    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default)]
    pub transform: Vec<TransformJson>,

    /// Ignored on operation nodes, whose surfaces keep their solids' tags.
    #[serde(default)]
    pub tag: Tag,
}

impl TryFrom<NodeJson> for CsgNode {
    type Error = SceneError;

    fn try_from(json: NodeJson) -> Result<CsgNode> {
        let placement = placement(&json.transform)?;
        let tag = json.tag;

        let leaf = |ty: SolidType| -> Result<CsgNode> {
            Ok(Solid::new(ty).with_placement(placement).with_tag(tag).into())
        };
        let branch = |op: CsgOp, left: Box<NodeJson>, right: Box<NodeJson>| -> Result<CsgNode> {
            let node = CsgNode::op(op, CsgNode::try_from(*left)?, CsgNode::try_from(*right)?)
                .with_placement(placement);
            debug!("Built {:?} node over {} solids", op, node.leaf_count());
            Ok(node)
        };

        match json.kind {
            NodeKind::Union { left, right } => branch(CsgOp::Union, left, right),
            NodeKind::Difference { left, right } => branch(CsgOp::Difference, left, right),
            NodeKind::Intersection { left, right } => branch(CsgOp::Intersection, left, right),

            NodeKind::Sphere => leaf(SolidType::Sphere),
            NodeKind::Cylinder => leaf(SolidType::Cylinder),
            NodeKind::Cone { k } => leaf(SolidType::Cone(apex_ratio(k)?)),
            NodeKind::ConicalPrism { k } => leaf(SolidType::ConicalPrism(apex_ratio(k)?)),
            NodeKind::Paraboloid => leaf(SolidType::Paraboloid),
            NodeKind::ParabolicPrism => leaf(SolidType::ParabolicPrism),
            NodeKind::HyperboloidOneSheet { k }
                => leaf(SolidType::HyperboloidOneSheet(positive("k", k)?)),
            NodeKind::HyperboloidTwoSheets { k }
                => leaf(SolidType::HyperboloidTwoSheets(positive("k", k)?)),
            NodeKind::HyperbolicPrismOneSheet { k }
                => leaf(SolidType::HyperbolicPrismOneSheet(positive("k", k)?)),
            NodeKind::HyperbolicPrismTwoSheets { k }
                => leaf(SolidType::HyperbolicPrismTwoSheets(positive("k", k)?)),
            NodeKind::HyperbolicParaboloid => leaf(SolidType::HyperbolicParaboloid),
            NodeKind::Capsule { height }
                => leaf(SolidType::Capsule(non_negative("height", height)?)),
            NodeKind::Box => leaf(SolidType::Box),
            NodeKind::PyramidFrustum { k } => leaf(SolidType::PyramidFrustum(apex_ratio(k)?)),
            NodeKind::TriangularWedge => leaf(SolidType::TriangularWedge),
            NodeKind::ConvexPolyhedron { planes }
                => leaf(SolidType::ConvexPolyhedron(half_spaces(&planes)?)),
        }
    }
}

/* Parameter checks */

fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::InvalidParameter { name, value, reason: "must be finite" })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64> {
    if finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidParameter { name, value, reason: "must be positive" })
    }
}

fn nonzero(name: &'static str, value: f64) -> Result<f64> {
    if finite(name, value)? != 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidParameter { name, value, reason: "must not be zero" })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if finite(name, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidParameter { name, value, reason: "must not be negative" })
    }
}

/// Out-of-range ratios are accepted; the intersectors clamp them.
fn apex_ratio(k: f64) -> Result<f64> {
    let k = finite("k", k)?;
    if k < APEX_RATIO_MIN || k > APEX_RATIO_MAX {
        warn!("Apex ratio {} outside [{}, {}] will be clamped", k, APEX_RATIO_MIN, APEX_RATIO_MAX);
    }
    Ok(k)
}

fn direction(name: &'static str, v: [f64; 3]) -> Result<Tuple4D> {
    let t = Tuple4D::from(v).as_vector();
    if t.magnitude() > 0.0 && t.magnitude().is_finite() {
        Ok(t)
    } else {
        Err(SceneError::InvalidParameter {
            name,
            value: t.magnitude(),
            reason: "must be a finite non-zero vector",
        })
    }
}

fn half_spaces(planes: &[PlaneJson]) -> Result<Vec<HalfSpace>> {
    if planes.is_empty() {
        return Err(SceneError::InvalidParameter {
            name: "planes",
            value: 0.0,
            reason: "a polyhedron needs at least one plane",
        });
    }

    planes.iter()
        .map(|plane| {
            let normal = direction("normal", plane.normal)?;
            Ok(HalfSpace::new(normal, finite("offset", plane.offset)?))
        })
        .collect()
}

fn trimming(trim: TrimParams) -> Result<TrimParams> {
    let phi_max = finite("phi_max", trim.phi_max)?;
    if phi_max <= 0.0 || phi_max > TWO_PI {
        return Err(SceneError::InvalidParameter {
            name: "phi_max",
            value: phi_max,
            reason: "must lie in (0, 2pi]",
        });
    }

    if finite("y_min", trim.y_min)? > finite("y_max", trim.y_max)? {
        return Err(SceneError::InvalidParameter {
            name: "y_min",
            value: trim.y_min,
            reason: "must not exceed y_max",
        });
    }
    Ok(trim)
}

/* Tests */

#[test]
fn parses_shapes_and_solids() {
    let world = parse_world(r#"{
        "shapes": [
            { "type": "sphere", "tag": { "object_id": 1 } },
            { "type": "cone", "k": 0.5, "transform": [ { "translate": [0, 3, 0] } ] },
            { "type": "trimmed_sphere", "trim": { "phi_max": 3.0 } }
        ],
        "solids": [
            {
                "type": "difference",
                "left": { "type": "box" },
                "right": { "type": "sphere", "transform": [ { "scale": [1.2, 1.2, 1.2] } ] }
            }
        ]
    }"#).unwrap();

    assert_eq!(world.shapes.len(), 3);
    assert_eq!(world.shapes[0].tag.object_id, 1);
    assert_eq!(world.shapes[1].ty, ShapeType::Cone(0.5));
    assert_eq!(world.shapes[2].ty, ShapeType::TrimmedSphere(TrimParams::new(-1.0, 1.0, 3.0)));
    assert_eq!(world.solids.len(), 1);
    assert_eq!(world.solids[0].leaf_count(), 2);
}

#[test]
fn transforms_compose_left_to_right() {
    let steps = [TransformJson::Translate([5.0, 0.0, 0.0]), TransformJson::Scale([2.0, 2.0, 2.0])];
    let p = placement(&steps).unwrap();

    // Scaled first, then translated.
    assert_eq!(p.point_to_world(&Tuple4D::point(1.0, 0.0, 0.0)), Tuple4D::point(7.0, 0.0, 0.0));
}

#[test]
fn singular_transform_is_an_error() {
    let err = parse_world(r#"{ "shapes": [
        { "type": "sphere", "transform": [ { "scale": [1, 0, 1] } ] }
    ] }"#).unwrap_err();

    assert!(matches!(err, SceneError::Transform(_)));
}

#[test]
fn invalid_parameters_are_rejected() {
    let negative = parse_world(r#"{ "shapes": [ { "type": "capsule", "height": -1 } ] }"#);
    let empty = parse_world(r#"{ "solids": [ { "type": "convex_polyhedron", "planes": [] } ] }"#);
    let sweep = parse_world(r#"{ "shapes": [ { "type": "trimmed_cone", "trim": { "phi_max": 0 } } ] }"#);

    assert!(matches!(negative, Err(SceneError::InvalidParameter { name: "height", .. })));
    assert!(matches!(empty, Err(SceneError::InvalidParameter { name: "planes", .. })));
    assert!(matches!(sweep, Err(SceneError::InvalidParameter { name: "phi_max", .. })));
}

#[test]
fn negative_hyperboloid_ratio_loads_two_sheets() {
    let world = parse_world(r#"{ "shapes": [
        { "type": "trimmed_hyperboloid", "k": -2.0 }
    ] }"#).unwrap();
    let down = Ray4D::new(Tuple4D::point(0.0, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));

    assert_eq!(world.shapes[0].ty, ShapeType::TrimmedHyperboloid(-2.0, TrimParams::default()));
    // Upper sheet vertex at y = 1/sqrt(3).
    let hit = world.nearest_hit(&down).unwrap();
    approx::assert_abs_diff_eq!(hit.t, 5.0 - 1.0 / 3f64.sqrt(), epsilon = 1e-9);

    let flat = parse_world(r#"{ "shapes": [ { "type": "trimmed_hyperboloid", "k": 0 } ] }"#);
    assert!(matches!(flat, Err(SceneError::InvalidParameter { name: "k", .. })));
}

#[test]
fn unknown_kind_is_a_json_error() {
    let err = parse_world(r#"{ "shapes": [ { "type": "teapot" } ] }"#).unwrap_err();
    assert!(matches!(err, SceneError::Json(_)));
}

#[test]
fn parses_rays() {
    let rays = parse_rays(r#"[ { "origin": [0, 0, -5], "direction": [0, 0, 1] } ]"#).unwrap();

    assert_eq!(rays.len(), 1);
    assert!(rays[0].origin.is_point());
    assert_eq!(rays[0].direction, Tuple4D::vector(0.0, 0.0, 1.0));
}
