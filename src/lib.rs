pub mod consts;

pub mod tuple;
pub mod matrix;
pub mod ray;

pub mod quadratic;
pub mod color;
pub mod hit;
pub mod unit;
pub mod param;
pub mod dual;
pub mod csg;

pub mod placement;
pub mod shape;
pub mod world;
pub mod scene;
pub mod parallel;

pub mod error;
pub mod logger;
pub mod cli;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
