// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment placement frames
//!
//! Prismatic solids are built in local space with the cross-section in the
//! X/Y plane and the member running along +Z. [`segment_frame`] produces
//! the matrix that carries that local space onto a world segment: local +Z
//! lands on `end - start`, the cross-section is rolled about the axis by
//! the entity orientation, and the local origin lands on `start`.

use nalgebra::{Matrix4, Point3, Vector3};

/// Degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Build an orthonormal look-at frame for a segment.
///
/// The returned matrix maps local (x, y, z) to world space with local +Z
/// along `end - start` and the local origin at `start`. `roll` rotates the
/// cross-section about the axis. A zero-length segment yields the identity
/// basis at `start`.
pub fn segment_frame(start: &Point3<f64>, end: &Point3<f64>, roll: f64) -> Matrix4<f64> {
    let axis = end - start;
    let len = axis.norm();

    if len < 1e-12 {
        return Matrix4::new_translation(&Vector3::new(start.x, start.y, start.z));
    }

    let w = axis / len;

    // Reference direction for the basis: world up, unless the axis is
    // (nearly) vertical
    let reference = if w.y.abs() > 0.99 {
        Vector3::z()
    } else {
        Vector3::y()
    };

    let u = reference.cross(&w).normalize();
    let v = w.cross(&u);

    // Roll the cross-section about the axis
    let (sin, cos) = roll.sin_cos();
    let x_axis = u * cos + v * sin;
    let y_axis = v * cos - u * sin;

    // Columns are the world-space directions of the local axes
    Matrix4::new(
        x_axis.x, y_axis.x, w.x, start.x,
        x_axis.y, y_axis.y, w.y, start.y,
        x_axis.z, y_axis.z, w.z, start.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn frame_maps_local_z_onto_the_axis() {
        let start = Point3::new(1.0, 2.0, 3.0);
        let end = Point3::new(5.0, 2.0, 3.0);
        let frame = segment_frame(&start, &end, 0.0);

        let origin = frame.transform_point(&Point3::origin());
        assert_relative_eq!(origin, start, epsilon = 1e-12);

        let tip = frame.transform_point(&Point3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(tip, end, epsilon = 1e-12);
    }

    #[test]
    fn frame_handles_vertical_axis() {
        let start = Point3::origin();
        let end = Point3::new(0.0, 7.0, 0.0);
        let frame = segment_frame(&start, &end, 0.0);

        let tip = frame.transform_point(&Point3::new(0.0, 0.0, 7.0));
        assert_relative_eq!(tip, end, epsilon = 1e-12);

        // Basis stays orthonormal
        let x = frame.transform_vector(&Vector3::x());
        let y = frame.transform_vector(&Vector3::y());
        assert_relative_eq!(x.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(x.dot(&y), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn roll_rotates_the_cross_section() {
        let start = Point3::origin();
        let end = Point3::new(0.0, 0.0, 4.0);

        let plain = segment_frame(&start, &end, 0.0);
        let rolled = segment_frame(&start, &end, std::f64::consts::FRAC_PI_2);

        let px = plain.transform_vector(&Vector3::x());
        let rx = rolled.transform_vector(&Vector3::x());
        // 90 degree roll moves local X onto (plus or minus) the old local Y
        assert_relative_eq!(px.dot(&rx), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_length_segment_is_identity_at_start() {
        let p = Point3::new(4.0, 5.0, 6.0);
        let frame = segment_frame(&p, &p, 1.0);
        let out = frame.transform_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(out, Point3::new(5.0, 7.0, 9.0), epsilon = 1e-12);
    }
}
