use serde::{ Serialize, Deserialize };

use crate::consts::NO_HIT;
use crate::tuple::Tuple4D;
use crate::color::Color;

/// The nearest crossing of a ray with a surface.
///
/// `t` is `NO_HIT` when the ray misses, in which case `normal` and `uv` carry
/// no meaning. The normal is not normalized and faces the incoming ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub t: f64,
    pub normal: Tuple4D,
    pub uv: Option<(f64, f64)>,
}

impl Default for Hit {
    fn default() -> Hit {
        Hit::miss()
    }
}

impl Hit {
    pub fn miss() -> Hit {
        Hit { t: NO_HIT, normal: Tuple4D::vector(0.0, 0.0, 0.0), uv: None }
    }

    pub fn new(t: f64, normal: Tuple4D) -> Hit {
        Hit { t, normal, uv: None }
    }

    pub fn with_uv(t: f64, normal: Tuple4D, u: f64, v: f64) -> Hit {
        Hit { t, normal, uv: Some((u, v)) }
    }

    pub fn is_hit(&self) -> bool {
        self.t.is_finite() && self.t > 0.0
    }

    /// Keeps whichever of the two hits is nearer.
    pub fn nearest(self, other: Hit) -> Hit {
        if other.is_hit() && (!self.is_hit() || other.t < self.t) {
            other
        } else {
            self
        }
    }

    /// Replaces this hit with a candidate crossing at `t` if that crossing
    /// lies ahead of the ray origin and is nearer. Returns whether it did.
    pub fn offer(&mut self, t: f64, normal: Tuple4D, uv: Option<(f64, f64)>)
        -> bool {
        if t > 0.0 && t < self.t {
            *self = Hit { t, normal, uv };
            true
        } else {
            false
        }
    }
}

/// The shading model a CSG sub-shape asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Phong,
    Metal,
    ClearCoat,
    Transparent,
}

impl Default for MaterialKind {
    fn default() -> MaterialKind {
        MaterialKind::Phong
    }
}

/// Identity of the solid that contributed a surface.
///
/// CSG composition moves tags around with their surfaces so the caller can
/// shade the combined solid with the right sub-shape's material.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub object_id: usize,
    pub material: MaterialKind,
    pub color: Color,
}

impl Tag {
    pub fn new(object_id: usize, material: MaterialKind, color: Color) -> Tag {
        Tag { object_id, material, color }
    }
}

/// One boundary crossing of a solid: where, the outward normal, and whose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Surface {
    pub t: f64,
    pub normal: Tuple4D,
    pub tag: Tag,
}

impl Surface {
    pub fn new(t: f64, normal: Tuple4D) -> Surface {
        Surface { t, normal, tag: Tag::default() }
    }

    pub fn invalid() -> Surface {
        Surface::new(NO_HIT, Tuple4D::vector(0.0, 0.0, 0.0))
    }

    /// A valid crossing has a finite distance, which may be negative when the
    /// solid surrounds the ray origin.
    pub fn is_valid(&self) -> bool {
        self.t.is_finite()
    }
}

/// Entry and exit crossings of a ray with a solid, `near.t <= far.t`.
///
/// Normals point out of the solid, so the exit normal usually points along
/// the ray. A miss has both slots at `NO_HIT`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DualHit {
    pub near: Surface,
    pub far: Surface,
}

impl Default for DualHit {
    fn default() -> DualHit {
        DualHit::miss()
    }
}

impl DualHit {
    pub fn miss() -> DualHit {
        DualHit { near: Surface::invalid(), far: Surface::invalid() }
    }

    pub fn new(near: Surface, far: Surface) -> DualHit {
        DualHit { near, far }
    }

    pub fn is_valid(&self) -> bool {
        self.near.is_valid() && self.far.is_valid()
    }

    /// Stamps both crossings with `tag`.
    pub fn tagged(mut self, tag: Tag) -> DualHit {
        self.near.tag = tag;
        self.far.tag = tag;
        self
    }

    /// The first crossing ahead of the ray origin, if any.
    pub fn first_visible(&self) -> Option<Surface> {
        if !self.is_valid() {
            None
        } else if self.near.t > 0.0 {
            Some(self.near)
        } else if self.far.t > 0.0 {
            Some(self.far)
        } else {
            None
        }
    }
}

/* Tests */

#[test]
fn miss_is_not_a_hit() {
    assert!(!Hit::miss().is_hit());
    assert!(!DualHit::miss().is_valid());
    assert_eq!(DualHit::miss().first_visible(), None);
}

#[test]
fn offer_only_accepts_nearer_positive() {
    let n = Tuple4D::vector(0.0, 1.0, 0.0);
    let mut hit = Hit::miss();

    assert!(!hit.offer(-1.0, n, None));
    assert!(!hit.offer(0.0, n, None));
    assert!(hit.offer(3.0, n, None));
    assert!(!hit.offer(4.0, n, None));
    assert!(hit.offer(2.0, n, Some((0.5, 0.5))));

    assert_eq!(hit.t, 2.0);
    assert_eq!(hit.uv, Some((0.5, 0.5)));
}

#[test]
fn nearest_never_prefers_sentinel() {
    let n = Tuple4D::vector(0.0, 0.0, -1.0);
    let h = Hit::new(5.0, n);

    assert_eq!(Hit::miss().nearest(h).t, 5.0);
    assert_eq!(h.nearest(Hit::miss()).t, 5.0);
    assert_eq!(h.nearest(Hit::new(2.0, n)).t, 2.0);
}

#[test]
fn first_visible_skips_crossings_behind_origin() {
    let n = Tuple4D::vector(0.0, 0.0, 1.0);
    let inside = DualHit::new(Surface::new(-1.0, -n), Surface::new(1.0, n));
    let behind = DualHit::new(Surface::new(-3.0, -n), Surface::new(-1.0, n));

    assert_eq!(inside.first_visible().map(|s| s.t), Some(1.0));
    assert_eq!(behind.first_visible(), None);
}

#[test]
fn tags_deserialize_with_defaults() {
    let tag: Tag = serde_json::from_str(r#"{ "object_id": 7, "material": "metal" }"#)
        .unwrap();

    assert_eq!(tag.object_id, 7);
    assert_eq!(tag.material, MaterialKind::Metal);
    assert_eq!(tag.color, Color::white());
}
