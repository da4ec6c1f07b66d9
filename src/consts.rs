// Runtime parameters
pub const NUM_THREADS: usize = 4;
pub const OUT_FILE: &'static str = "./hits.json";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

/// Distance reported when a ray misses. Larger than any finite distance.
pub const NO_HIT: f64 = f64::INFINITY;

/// Tolerance band applied to every bounds test on a quadric hit point
/// (height clamps, cap radii, box faces).
pub const QUADRIC_EPSILON: f64 = 0.00001;

/// Leading coefficients smaller than this make a quadratic degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Squared wall radius of the single-hit unit cylinder. The caps keep a
/// squared radius of 1.0, so they overhang the wall slightly and the rim
/// never shows a gap.
pub const CYLINDER_WALL_RADIUS_SQ: f64 = 0.99;

// Cone apex ratio bounds
pub const APEX_RATIO_MIN: f64 = 0.01;
pub const APEX_RATIO_MAX: f64 = 1.0;

/// Opening of the unit paraboloid, `x^2 + z^2 + k(y - 1) = 0`.
pub const PARABOLOID_K: f64 = 0.5;

/// Opening of the parametric (trimmed) cone.
pub const TRIMMED_CONE_K: f64 = 0.25;

pub const TWO_PI: f64 = std::f64::consts::PI * 2.0;
