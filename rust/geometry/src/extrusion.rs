// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to 3D meshes

use crate::error::{Error, Result};
use crate::mesh::TriMesh;
use crate::profile::{Profile2D, Triangulation};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Extrude a 2D profile along the Z axis over `0..depth`
pub fn extrude_profile(
    profile: &Profile2D,
    depth: f64,
    transform: Option<Matrix4<f64>>,
) -> Result<TriMesh> {
    if depth <= 0.0 {
        return Err(Error::InvalidExtrusion(
            "Depth must be positive".to_string(),
        ));
    }

    let triangulation = profile.triangulate()?;

    let cap_vertex_count = triangulation.points.len() * 2;
    let side_vertex_count =
        (profile.outer.len() + profile.holes.iter().map(|h| h.len()).sum::<usize>()) * 4;
    let mut mesh = TriMesh::with_capacity(
        cap_vertex_count + side_vertex_count,
        triangulation.indices.len() * 2 + side_vertex_count / 4 * 6,
    );

    // Top and bottom caps
    create_cap_mesh(&triangulation, 0.0, true, &mut mesh);
    create_cap_mesh(&triangulation, depth, false, &mut mesh);

    // Side walls for outer boundary and holes
    create_side_walls(&profile.outer, depth, &mut mesh);
    for hole in &profile.holes {
        create_side_walls(hole, depth, &mut mesh);
    }

    if let Some(mat) = transform {
        mesh.transform(&mat);
    }

    Ok(mesh)
}

/// Create a cap mesh (top or bottom) from triangulation
#[inline]
fn create_cap_mesh(triangulation: &Triangulation, z: f64, reverse: bool, mesh: &mut TriMesh) {
    let base_index = mesh.vertex_count() as u32;

    for point in &triangulation.points {
        mesh.add_vertex(Point3::new(point.x, point.y, z));
    }

    for i in (0..triangulation.indices.len()).step_by(3) {
        let i0 = base_index + triangulation.indices[i] as u32;
        let i1 = base_index + triangulation.indices[i + 1] as u32;
        let i2 = base_index + triangulation.indices[i + 2] as u32;

        // Reverse winding for the bottom cap
        if reverse {
            mesh.add_triangle(i0, i2, i1);
        } else {
            mesh.add_triangle(i0, i1, i2);
        }
    }
}

/// Create side walls for a profile boundary
#[inline]
pub(crate) fn create_side_walls(boundary: &[Point2<f64>], depth: f64, mesh: &mut TriMesh) {
    let base_index = mesh.vertex_count() as u32;
    let mut quad_count = 0u32;

    for i in 0..boundary.len() {
        let j = (i + 1) % boundary.len();

        let p0 = &boundary[i];
        let p1 = &boundary[j];

        // Skip degenerate edges (duplicate consecutive points)
        let edge = Vector3::new(p1.x - p0.x, p1.y - p0.y, 0.0);
        if edge.try_normalize(1e-10).is_none() {
            continue;
        }

        let idx = base_index + (quad_count * 4);
        mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0));
        mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0));
        mesh.add_vertex(Point3::new(p1.x, p1.y, depth));
        mesh.add_vertex(Point3::new(p0.x, p0.y, depth));

        mesh.add_triangle(idx, idx + 1, idx + 2);
        mesh.add_triangle(idx, idx + 2, idx + 3);

        quad_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{create_circle, create_rectangle, ANNULUS_SEGMENTS};

    #[test]
    fn test_extrude_rectangle() {
        let profile = create_rectangle(10.0, 5.0);
        let mesh = extrude_profile(&profile, 20.0, None).unwrap();

        assert!(mesh.vertex_count() > 0);
        assert!(mesh.triangle_count() > 0);

        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min.x - -5.0).abs() < 0.01);
        assert!((bounds.max.x - 5.0).abs() < 0.01);
        assert!((bounds.min.y - -2.5).abs() < 0.01);
        assert!((bounds.max.y - 2.5).abs() < 0.01);
        assert!((bounds.min.z - 0.0).abs() < 0.01);
        assert!((bounds.max.z - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_extrude_with_transform() {
        let profile = create_rectangle(10.0, 5.0);
        let transform = Matrix4::new_translation(&Vector3::new(100.0, 200.0, 300.0));
        let mesh = extrude_profile(&profile, 20.0, Some(transform)).unwrap();

        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min.x - 95.0).abs() < 0.01);
        assert!((bounds.max.x - 105.0).abs() < 0.01);
        assert!((bounds.min.z - 300.0).abs() < 0.01);
        assert!((bounds.max.z - 320.0).abs() < 0.01);
    }

    #[test]
    fn test_extrude_hollow_circle() {
        let profile = create_circle(10.0, Some(5.0), ANNULUS_SEGMENTS);
        let mesh = extrude_profile(&profile, 15.0, None).unwrap();

        // Hollow cylinder: caps + outer walls + inner walls
        assert!(mesh.triangle_count() > ANNULUS_SEGMENTS * 4);
    }

    #[test]
    fn test_invalid_depth() {
        let profile = create_rectangle(10.0, 5.0);
        assert!(extrude_profile(&profile, -1.0, None).is_err());
        assert!(extrude_profile(&profile, 0.0, None).is_err());
    }
}
