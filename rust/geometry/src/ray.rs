// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray casting against solids
//!
//! Probes are finite rays: an origin, a unit direction and a maximum
//! distance. A cast walks the target's rejection ladder (bounding sphere,
//! then AABB, then triangles) and reports the nearest hit within range.
//! Back-face hits count; a probe fired from inside a shell must still
//! register.

use crate::mesh::Solid;
use nalgebra::{Point3, Vector3};

/// Tolerance for a hit at the ray origin itself. Probes start on the
/// surface of their own solid, so a tiny negative t is still a hit.
const T_MIN: f64 = -1e-9;

/// Tolerance for a ray parallel to a triangle plane.
const EPSILON: f64 = 1e-12;

/// A finite probe ray.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
    /// Maximum hit distance along `direction`
    pub max_distance: f64,
}

impl Ray {
    /// Build a probe between two points. Returns `None` for coincident
    /// endpoints, which cannot define a direction.
    pub fn between(origin: Point3<f64>, target: Point3<f64>) -> Option<Self> {
        let offset = target - origin;
        let len = offset.norm();
        if len < EPSILON {
            return None;
        }
        Some(Self {
            origin,
            direction: offset / len,
            max_distance: len,
        })
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// A probe hit on a solid.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f64,
    /// World-space hit position
    pub position: Point3<f64>,
}

/// Möller-Trumbore ray/triangle intersection. Returns the ray parameter of
/// the hit, front or back facing, or `None` for a miss.
fn ray_triangle(
    ray: &Ray,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let p = ray.direction.cross(&edge2);
    let det = edge1.dot(&p);
    // Parallel to the plane; no culling on sign, back faces hit too
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(&p) * inv_det;
    if !(-EPSILON..=1.0 + EPSILON).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < -EPSILON || u + v > 1.0 + EPSILON {
        return None;
    }

    let t = edge2.dot(&q) * inv_det;
    if t < T_MIN || t > ray.max_distance {
        return None;
    }
    Some(t)
}

impl Solid {
    /// Cast a probe against this solid, returning the nearest hit within
    /// the probe's range.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        if !self
            .sphere
            .intersects_ray(&ray.origin, &ray.direction, ray.max_distance)
        {
            return None;
        }
        if !self
            .aabb
            .intersects_ray(&ray.origin, &ray.direction, ray.max_distance)
        {
            return None;
        }

        let mut nearest: Option<f64> = None;
        for tri in self.mesh.indices.chunks_exact(3) {
            let v0 = self.mesh.vertex(tri[0]);
            let v1 = self.mesh.vertex(tri[1]);
            let v2 = self.mesh.vertex(tri[2]);
            if let Some(t) = ray_triangle(ray, &v0, &v1, &v2) {
                if nearest.map_or(true, |best| t < best) {
                    nearest = Some(t);
                }
            }
        }

        nearest.map(|t| RayHit {
            distance: t,
            position: ray.at(t),
        })
    }

    /// True when the probe hits this solid at all. Same ladder as
    /// [`Solid::raycast`] but short-circuits on the first triangle hit.
    pub fn is_hit_by(&self, ray: &Ray) -> bool {
        if !self
            .sphere
            .intersects_ray(&ray.origin, &ray.direction, ray.max_distance)
        {
            return false;
        }
        if !self
            .aabb
            .intersects_ray(&ray.origin, &ray.direction, ray.max_distance)
        {
            return false;
        }

        self.mesh.indices.chunks_exact(3).any(|tri| {
            let v0 = self.mesh.vertex(tri[0]);
            let v1 = self.mesh.vertex(tri[1]);
            let v2 = self.mesh.vertex(tri[2]);
            ray_triangle(ray, &v0, &v1, &v2).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;

    fn unit_box() -> Solid {
        Solid::new(box_mesh(1.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn probe_hits_the_near_face() {
        let solid = unit_box();
        let ray = Ray::between(Point3::new(-5.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0)).unwrap();

        let hit = solid.raycast(&ray).unwrap();
        assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-9);
        assert_relative_eq!(hit.position.x, -0.5, epsilon = 1e-9);
        assert!(solid.is_hit_by(&ray));
    }

    #[test]
    fn probe_stops_at_max_distance() {
        let solid = unit_box();
        // Target short of the box
        let ray = Ray::between(Point3::new(-5.0, 0.0, 0.0), Point3::new(-2.0, 0.0, 0.0)).unwrap();
        assert!(solid.raycast(&ray).is_none());
        assert!(!solid.is_hit_by(&ray));
    }

    #[test]
    fn probe_from_inside_hits_the_back_face() {
        let solid = unit_box();
        let ray = Ray::between(Point3::origin(), Point3::new(3.0, 0.0, 0.0)).unwrap();

        let hit = solid.raycast(&ray).unwrap();
        assert_relative_eq!(hit.distance, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn probe_misses_off_axis() {
        let solid = unit_box();
        let ray = Ray::between(Point3::new(-5.0, 2.0, 0.0), Point3::new(5.0, 2.0, 0.0)).unwrap();
        assert!(solid.raycast(&ray).is_none());
    }

    #[test]
    fn degenerate_probe_is_rejected() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(Ray::between(p, p).is_none());
    }

    #[test]
    fn nearest_of_two_faces_wins() {
        let solid = unit_box();
        let ray = Ray::between(Point3::new(0.0, -4.0, 0.0), Point3::new(0.0, 4.0, 0.0)).unwrap();
        let hit = solid.raycast(&ray).unwrap();
        // Near face at y = -0.5, not the far face at y = +0.5
        assert_relative_eq!(hit.position.y, -0.5, epsilon = 1e-9);
    }
}
