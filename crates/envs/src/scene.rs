//! Renderer-agnostic scene description.
//!
//! Environments never draw. [`Env::scene`](crate::Env::scene) reports the
//! current state as a flat list of primitives in logical canvas coordinates
//! (origin bottom-left, y up, sized by `render_size`) for an external
//! renderer to rasterize.

use glam::DVec2;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        #[serde(with = "vec2")]
        center: DVec2,
        radius: f64,
        color: Color,
        /// Stroke width, or `None` for a filled disc
        outline: Option<f64>,
    },
    Line {
        #[serde(with = "vec2")]
        from: DVec2,
        #[serde(with = "vec2")]
        to: DVec2,
        width: f64,
        color: Color,
    },
    Rect {
        #[serde(with = "vec2")]
        center: DVec2,
        #[serde(with = "vec2")]
        size: DVec2,
        /// Rotation about the centre, radians
        angle: f64,
        color: Color,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub shapes: Vec<Shape>,
}

impl Scene {
    #[must_use]
    pub fn new((width, height): (f64, f64), background: Color) -> Self {
        Self {
            width,
            height,
            background,
            shapes: Vec::new(),
        }
    }

    pub fn circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
            outline: None,
        });
    }

    pub fn ring(&mut self, center: DVec2, radius: f64, width: f64, color: Color) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
            outline: Some(width),
        });
    }

    pub fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color) {
        self.shapes.push(Shape::Line { from, to, width, color });
    }

    pub fn rect(&mut self, center: DVec2, size: DVec2, angle: f64, color: Color) {
        self.shapes.push(Shape::Rect {
            center,
            size,
            angle,
            color,
        });
    }
}

mod vec2 {
    use glam::DVec2;
    use serde::Serializer;

    pub(super) fn serialize<S: Serializer>(v: &DVec2, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq([v.x, v.y])
    }
}
