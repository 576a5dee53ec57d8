//! Pointer-follow hover effects.
//!
//! Both effects are pure functions of the element bounds and the pointer
//! position; nothing is remembered between pointer moves. Leaving the element
//! resets it to [`Transform::IDENTITY`].

use crate::geometry::{Point, Rect};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverConfig {
    /// Fraction of the pointer's offset from center that a magnetic element
    /// follows
    pub magnetic_strength: f32,
    /// Pixels of pointer offset per degree of tilt
    pub tilt_divisor: f32,
    /// Perspective distance of the tilt, in pixels
    pub perspective: f32,
}

impl HoverConfig {
    pub const DEFAULT: Self = Self {
        magnetic_strength: 0.1,
        tilt_divisor: 10.0,
        perspective: 1000.0,
    };
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Pointer offset from the element's center
fn offset_from_center(rect: &Rect, pointer: Point) -> Point {
    let center = rect.center();
    Point::new(pointer.x - center.x, pointer.y - center.y)
}

/// Translation that pulls the element toward the pointer.
pub fn magnetic_offset(rect: &Rect, pointer: Point, config: &HoverConfig) -> Point {
    let offset = offset_from_center(rect, pointer);
    Point::new(
        offset.x * config.magnetic_strength,
        offset.y * config.magnetic_strength,
    )
}

pub fn magnetic_transform(rect: &Rect, pointer: Point, config: &HoverConfig) -> Transform {
    let offset = magnetic_offset(rect, pointer, config);
    Transform::translate(offset.x, offset.y)
}

/// Tilt angles in degrees as (rotate_x, rotate_y). Pointer below center tips
/// the top edge away; pointer right of center turns the right edge away.
pub fn tilt_angles(rect: &Rect, pointer: Point, config: &HoverConfig) -> (f32, f32) {
    if config.tilt_divisor == 0.0 {
        return (0.0, 0.0);
    }
    let offset = offset_from_center(rect, pointer);
    (
        offset.y / config.tilt_divisor,
        -offset.x / config.tilt_divisor,
    )
}

/// `perspective(p) rotateX(x) rotateY(y)`
pub fn tilt_transform(rect: &Rect, pointer: Point, config: &HoverConfig) -> Transform {
    let (rotate_x, rotate_y) = tilt_angles(rect, pointer, config);
    Transform::perspective(config.perspective)
        .then(&Transform::rotate_x_degrees(rotate_x))
        .then(&Transform::rotate_y_degrees(rotate_y))
}
