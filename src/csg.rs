//! Boolean composition of entry/exit intervals, and trees built from it.
//!
//! The three operations only look at the distances of the two intervals.
//! Each surviving surface keeps the tag of the solid it came from, except
//! where noted, so the combined solid can still be shaded per part.

use crate::hit::{ DualHit, Surface };
use crate::placement::Placement;
use crate::ray::Ray4D;
use crate::shape::Solid;

/// Orders two intervals so the one entered first comes first. A miss enters
/// at infinity and so always sorts last.
pub fn nearest_entry_first(a: DualHit, b: DualHit) -> (DualHit, DualHit) {
    if b.near.t < a.near.t {
        (b, a)
    } else {
        (a, b)
    }
}

/// `a ∪ b`, as the nearest occupied stretch along the ray.
///
/// Two intervals separated by a gap are not bridged: the result is the
/// nearer one alone, unless that one lies entirely behind the ray origin.
pub fn union(a: DualHit, b: DualHit) -> DualHit {
    let (a, b) = nearest_entry_first(a, b);
    if !b.is_valid() {
        return a;
    }

    if a.far.t <= 0.0 && a.far.t < b.near.t {
        return b;
    }

    let mut out = a;
    if b.near.t == a.near.t {
        out.near = b.near;
    }
    if b.near.t <= a.far.t && b.far.t > a.far.t {
        out.far = b.far;
    }
    out
}

/// Turns a surface of the subtracted solid into a wall of the cavity it
/// leaves, which faces the other way.
fn carved(s: Surface) -> Surface {
    Surface { normal: -s.normal, ..s }
}

/// `a − b`.
///
/// When `b` sits strictly inside `a` the remainder has two pieces; the
/// front piece is reported unless `b` starts at or behind the ray origin.
pub fn difference(a: DualHit, b: DualHit) -> DualHit {
    if !a.is_valid() {
        return DualHit::miss();
    }
    if !b.is_valid() || b.far.t <= a.near.t || b.near.t >= a.far.t {
        return a;
    }

    let starts_inside = b.near.t > a.near.t;
    let ends_inside = b.far.t < a.far.t;

    match (starts_inside, ends_inside) {
        (true, true) if b.near.t > 0.0 => DualHit::new(a.near, carved(b.near)),
        (true, true) => DualHit::new(carved(b.far), a.far),
        (true, false) => DualHit::new(a.near, carved(b.near)),
        (false, true) => DualHit::new(carved(b.far), a.far),
        (false, false) => DualHit::miss(),
    }
}

/// `a ∩ b`.
///
/// Each surviving surface is tagged with the solid whose volume encloses it:
/// the entry lies on the later-entered solid's boundary inside the other,
/// and likewise for the exit.
pub fn intersection(a: DualHit, b: DualHit) -> DualHit {
    if !a.is_valid() || !b.is_valid() {
        return DualHit::miss();
    }

    let (a, b) = nearest_entry_first(a, b);
    if b.near.t > a.far.t {
        return DualHit::miss();
    }

    let near = Surface { tag: a.near.tag, ..b.near };
    let far = if a.far.t < b.far.t {
        Surface { tag: b.far.tag, ..a.far }
    } else {
        Surface { tag: a.far.tag, ..b.far }
    };
    DualHit::new(near, far)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Difference,
    Intersection,
}

impl CsgOp {
    pub fn apply(self, left: DualHit, right: DualHit) -> DualHit {
        match self {
            CsgOp::Union => union(left, right),
            CsgOp::Difference => difference(left, right),
            CsgOp::Intersection => intersection(left, right),
        }
    }
}

/// A CSG tree. Built once and only read while tracing.
#[derive(Clone, Debug, PartialEq)]
pub enum CsgNode {
    Leaf(Solid),

    /// `placement` maps the children's shared frame into this node's parent.
    Op {
        op: CsgOp,
        left: Box<CsgNode>,
        right: Box<CsgNode>,
        placement: Placement,
    },
}

impl From<Solid> for CsgNode {
    fn from(solid: Solid) -> CsgNode {
        CsgNode::Leaf(solid)
    }
}

impl CsgNode {
    pub fn op(op: CsgOp, left: CsgNode, right: CsgNode) -> CsgNode {
        CsgNode::Op {
            op,
            left: Box::new(left),
            right: Box::new(right),
            placement: Placement::identity(),
        }
    }

    pub fn union(left: CsgNode, right: CsgNode) -> CsgNode {
        CsgNode::op(CsgOp::Union, left, right)
    }

    pub fn difference(left: CsgNode, right: CsgNode) -> CsgNode {
        CsgNode::op(CsgOp::Difference, left, right)
    }

    pub fn intersection(left: CsgNode, right: CsgNode) -> CsgNode {
        CsgNode::op(CsgOp::Intersection, left, right)
    }

    /// Replaces the placement of an operation node, or of a leaf's solid.
    pub fn with_placement(mut self, new_placement: Placement) -> CsgNode {
        match self {
            CsgNode::Leaf(ref mut solid) => solid.placement = new_placement,
            CsgNode::Op { ref mut placement, .. } => *placement = new_placement,
        }
        self
    }

    /// Entry and exit of `ray`, given in the parent frame, with normals in
    /// the parent frame.
    pub fn dual_hit(&self, ray: &Ray4D) -> DualHit {
        match self {
            CsgNode::Leaf(solid) => solid.dual_hit(ray),
            CsgNode::Op { op, left, right, placement } => {
                let local = placement.to_local(ray);
                let mut hit = op.apply(left.dual_hit(&local), right.dual_hit(&local));

                if hit.is_valid() {
                    hit.near.normal = placement.normal_to_world(&hit.near.normal);
                    hit.far.normal = placement.normal_to_world(&hit.far.normal);
                }
                hit
            },
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            CsgNode::Leaf(_) => 1,
            CsgNode::Op { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/* Tests */

#[cfg(test)]
use crate::hit::Tag;
#[cfg(test)]
use crate::matrix::Matrix4D;
#[cfg(test)]
use crate::shape::SolidType;
#[cfg(test)]
use crate::tuple::Tuple4D;

#[cfg(test)]
fn interval(t0: f64, t1: f64, id: usize) -> DualHit {
    let tag = Tag { object_id: id, ..Default::default() };
    DualHit::new(
        Surface::new(t0, Tuple4D::vector(0.0, 0.0, -1.0)),
        Surface::new(t1, Tuple4D::vector(0.0, 0.0, 1.0)),
    ).tagged(tag)
}

#[cfg(test)]
fn ball(z: f64, id: usize) -> CsgNode {
    let placement = Placement::new(Matrix4D::translation(0.0, 0.0, z)).unwrap();
    let tag = Tag { object_id: id, ..Default::default() };
    Solid::new(SolidType::Sphere).with_placement(placement).with_tag(tag).into()
}

#[cfg(test)]
fn along_z() -> Ray4D {
    Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0))
}

#[test]
fn nearest_entry_first_puts_misses_last() {
    let a = interval(4.0, 6.0, 1);
    let (first, second) = nearest_entry_first(DualHit::miss(), a);

    assert_eq!(first, a);
    assert!(!second.is_valid());
}

#[test]
fn union_of_overlapping_intervals_spans_both() {
    let hit = union(interval(5.0, 7.0, 2), interval(4.0, 6.0, 1));

    assert_eq!((hit.near.t, hit.far.t), (4.0, 7.0));
    assert_eq!((hit.near.tag.object_id, hit.far.tag.object_id), (1, 2));
}

#[test]
fn union_does_not_bridge_a_gap() {
    let hit = CsgNode::union(ball(0.0, 1), ball(4.0, 2)).dual_hit(&along_z());

    approx::assert_abs_diff_eq!(hit.near.t, 4.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.far.t, 6.0, epsilon = 1e-9);
    assert_eq!(hit.far.tag.object_id, 1);
}

#[test]
fn union_skips_interval_behind_origin() {
    let hit = union(interval(-3.0, -1.0, 1), interval(2.0, 5.0, 2));
    assert_eq!(hit, interval(2.0, 5.0, 2));
}

#[test]
fn union_tie_takes_entry_from_second() {
    let hit = union(interval(4.0, 6.0, 1), interval(4.0, 5.0, 2));

    assert_eq!(hit.near.tag.object_id, 2);
    assert_eq!(hit.far.t, 6.0);
}

#[test]
fn difference_exit_belongs_to_carved_solid() {
    let hit = CsgNode::difference(ball(0.0, 1), ball(1.0, 2)).dual_hit(&along_z());

    approx::assert_abs_diff_eq!(hit.near.t, 4.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.far.t, 5.0, epsilon = 1e-9);
    assert_eq!(hit.near.tag.object_id, 1);
    assert_eq!(hit.far.tag.object_id, 2);
    // The cavity wall faces back into the remaining solid's outside.
    assert!(hit.far.normal.z > 0.0);
}

#[test]
fn difference_entry_belongs_to_carved_solid_from_other_side() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, -1.0));
    let hit = CsgNode::difference(ball(0.0, 1), ball(1.0, 2)).dual_hit(&r);

    approx::assert_abs_diff_eq!(hit.near.t, 5.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.far.t, 6.0, epsilon = 1e-9);
    assert_eq!(hit.near.tag.object_id, 2);
    assert!(hit.near.normal.z > 0.0);
}

#[test]
fn difference_inner_hole_from_inside_keeps_back_piece() {
    // B starts behind the origin, so A's exit is not truncated.
    let hit = difference(interval(-4.0, 6.0, 1), interval(-1.0, 2.0, 2));

    assert_eq!((hit.near.t, hit.far.t), (2.0, 6.0));
    assert_eq!(hit.near.tag.object_id, 2);
}

#[test]
fn difference_fully_covered_is_a_miss() {
    assert!(!difference(interval(4.0, 6.0, 1), interval(3.0, 7.0, 2)).is_valid());
}

#[test]
fn intersection_tags_follow_enclosing_solid() {
    let hit = CsgNode::intersection(ball(0.0, 1), ball(1.0, 2)).dual_hit(&along_z());

    approx::assert_abs_diff_eq!(hit.near.t, 5.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.far.t, 6.0, epsilon = 1e-9);
    // Entry is B's surface inside A, exit is A's surface inside B.
    assert_eq!(hit.near.tag.object_id, 1);
    assert_eq!(hit.far.tag.object_id, 2);
}

#[test]
fn intersection_of_disjoint_intervals_is_a_miss() {
    assert!(!intersection(interval(4.0, 6.0, 1), interval(8.0, 10.0, 2)).is_valid());
}

#[test]
fn invalid_operands_degrade_gracefully() {
    let a = interval(4.0, 6.0, 1);

    assert_eq!(union(a, DualHit::miss()), a);
    assert_eq!(union(DualHit::miss(), a), a);
    assert_eq!(difference(a, DualHit::miss()), a);
    assert!(!difference(DualHit::miss(), a).is_valid());
    assert!(!intersection(a, DualHit::miss()).is_valid());
    assert!(!union(DualHit::miss(), DualHit::miss()).is_valid());
}

#[test]
fn node_placement_scales_children() {
    let node = CsgNode::union(ball(0.0, 1), ball(0.0, 2))
        .with_placement(Placement::new(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap());
    let hit = node.dual_hit(&along_z());

    approx::assert_abs_diff_eq!(hit.near.t, 3.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(hit.far.t, 7.0, epsilon = 1e-9);
    assert_eq!(hit.near.normal.normalize(), Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(node.leaf_count(), 2);
}
