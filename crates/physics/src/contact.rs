//! # Circle Contacts
//!
//! Position-level constraint helpers for circular bodies in the plane: keep a
//! circle inside a circular arena centred on the origin, and separate two
//! overlapping circles. Both return corrected positions only; velocities are
//! left to the caller's integrator.

use glam::DVec2;

/// Below this centre distance two circles are treated as coincident.
const COINCIDENT_EPSILON: f64 = 1e-12;

/// Overlap between two circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleContact {
    /// Unit vector from circle B towards circle A
    pub normal: DVec2,
    /// Penetration depth, always positive
    pub depth: f64,
}

impl CircleContact {
    /// Half of the penetration along the normal. Add it to A and subtract it
    /// from B to split the correction equally.
    #[must_use]
    pub fn half_correction(&self) -> DVec2 {
        self.normal * (self.depth * 0.5)
    }
}

/// Detects overlap between circle A at `a` and circle B at `b`.
///
/// Coincident centres resolve along +Y.
#[must_use]
pub fn detect_circle_circle(a: DVec2, radius_a: f64, b: DVec2, radius_b: f64) -> Option<CircleContact> {
    let delta = a - b;
    let distance = delta.length();
    let depth = radius_a + radius_b - distance;
    if depth <= 0.0 {
        return None;
    }
    let normal = if distance > COINCIDENT_EPSILON {
        delta / distance
    } else {
        DVec2::Y
    };
    Some(CircleContact { normal, depth })
}

/// Returns the radially clamped position when a circle pokes out of the
/// arena, or `None` when it is already inside.
#[must_use]
pub fn contain_in_circle(position: DVec2, radius: f64, boundary_radius: f64) -> Option<DVec2> {
    let overlap = position.length() + radius - boundary_radius;
    if overlap > 0.0 {
        Some(position.normalize_or_zero() * (boundary_radius - radius))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_circles_do_not_touch() {
        assert_eq!(detect_circle_circle(DVec2::ZERO, 1.0, DVec2::new(3.0, 0.0), 2.0), None);
    }

    #[test]
    fn overlap_is_split_along_the_centre_line() {
        let contact = detect_circle_circle(DVec2::ZERO, 1.0, DVec2::new(2.0, 0.0), 2.0).unwrap();
        assert_eq!(contact.normal, DVec2::new(-1.0, 0.0));
        assert!((contact.depth - 1.0).abs() < 1e-12);

        let a = DVec2::ZERO + contact.half_correction();
        let b = DVec2::new(2.0, 0.0) - contact.half_correction();
        assert!(((a - b).length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_centres_have_a_finite_normal() {
        let contact = detect_circle_circle(DVec2::ONE, 1.0, DVec2::ONE, 1.0).unwrap();
        assert_eq!(contact.normal, DVec2::Y);
        assert!((contact.depth - 2.0).abs() < 1e-12);
    }

    #[test]
    fn clamps_onto_the_boundary() {
        assert_eq!(contain_in_circle(DVec2::new(3.0, 4.0), 1.0, 10.0), None);
        let clamped = contain_in_circle(DVec2::new(30.0, 40.0), 1.0, 10.0).unwrap();
        assert!((clamped - DVec2::new(5.4, 7.2)).length() < 1e-12);
    }
}
