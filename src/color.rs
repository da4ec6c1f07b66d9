use serde::{ Serialize, Deserialize };

use crate::feq;

/// An RGB color carried through CSG composition as part of a surface tag.
///
/// Components nominally range from 0.0 to 1.0; nothing here clamps them.
#[derive(Copy, Clone, Debug, PartialOrd, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl Default for Color {
    fn default() -> Color {
        Color::white()
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color::rgb(v[0], v[1], v[2])
    }
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }
}

/* Tests */

#[test]
fn default_color_is_white() {
    assert_eq!(Color::default(), Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn colors_compare_approximately() {
    assert_eq!(Color::rgb(0.1 + 0.2, 0.0, 0.0), Color::rgb(0.3, 0.0, 0.0));
    assert_ne!(Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 1.0, 0.0));
}

#[test]
fn color_from_json() {
    let c: Color = serde_json::from_str(r#"{ "r": 0.5, "g": 0.25, "b": 1.0 }"#)
        .unwrap();
    assert_eq!(c, Color::from([0.5, 0.25, 1.0]));
}
