// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive solid builders
//!
//! Small meshes composed by the section and equipment synthesizers. Axis
//! conventions: prismatic members extrude along +Z (see `extrusion`),
//! vessels and shells grow along +Y from their base.

use crate::extrusion::extrude_profile;
use crate::mesh::TriMesh;
use crate::profile::create_circle;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Axis-aligned box of the given size, centered at the origin.
pub fn box_mesh(sx: f64, sy: f64, sz: f64) -> TriMesh {
    let hx = sx / 2.0;
    let hy = sy / 2.0;
    let hz = sz / 2.0;

    let mut mesh = TriMesh::with_capacity(8, 36);

    mesh.add_vertex(Point3::new(-hx, -hy, -hz)); // 0
    mesh.add_vertex(Point3::new(hx, -hy, -hz)); // 1
    mesh.add_vertex(Point3::new(hx, hy, -hz)); // 2
    mesh.add_vertex(Point3::new(-hx, hy, -hz)); // 3
    mesh.add_vertex(Point3::new(-hx, -hy, hz)); // 4
    mesh.add_vertex(Point3::new(hx, -hy, hz)); // 5
    mesh.add_vertex(Point3::new(hx, hy, hz)); // 6
    mesh.add_vertex(Point3::new(-hx, hy, hz)); // 7

    // Near face (z = -hz)
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(0, 3, 2);
    // Far face (z = +hz)
    mesh.add_triangle(4, 5, 6);
    mesh.add_triangle(4, 6, 7);
    // Left face (x = -hx)
    mesh.add_triangle(0, 4, 7);
    mesh.add_triangle(0, 7, 3);
    // Right face (x = +hx)
    mesh.add_triangle(1, 2, 6);
    mesh.add_triangle(1, 6, 5);
    // Bottom face (y = -hy)
    mesh.add_triangle(0, 1, 5);
    mesh.add_triangle(0, 5, 4);
    // Top face (y = +hy)
    mesh.add_triangle(3, 7, 6);
    mesh.add_triangle(3, 6, 2);

    mesh
}

/// Box of the given size centered at `center`.
pub fn box_at(center: Point3<f64>, sx: f64, sy: f64, sz: f64) -> TriMesh {
    let mut mesh = box_mesh(sx, sy, sz);
    mesh.translate(Vector3::new(center.x, center.y, center.z));
    mesh
}

/// Annular prism along +Z over `0..length`. `inner` is honored only when
/// `0 < inner < outer`; otherwise the profile degenerates to a solid disk.
pub fn annulus_mesh(outer: f64, inner: Option<f64>, length: f64, segments: usize) -> TriMesh {
    if outer <= 0.0 || length <= 0.0 {
        return TriMesh::new();
    }

    let hole = inner.filter(|&r| r > 0.0 && r < outer);
    let profile = create_circle(outer, hole, segments);
    extrude_profile(&profile, length, None).unwrap_or_default()
}

/// Solid cylinder along +Y from `0..height`.
pub fn cylinder_mesh(radius: f64, height: f64, segments: usize) -> TriMesh {
    if radius <= 0.0 || height <= 0.0 {
        return TriMesh::new();
    }

    let profile = create_circle(radius, None, segments);
    let mut mesh = extrude_profile(&profile, height, None).unwrap_or_default();
    // Extrusion runs along +Z; stand the cylinder up on +Y
    rotate_x(&mut mesh, -PI / 2.0);
    mesh
}

/// UV sphere centered at the origin.
pub fn sphere_mesh(radius: f64, segments: usize) -> TriMesh {
    if radius <= 0.0 {
        return TriMesh::new();
    }

    let rings = (segments / 2).max(3);
    let mut mesh = TriMesh::with_capacity((rings + 1) * segments, rings * segments * 6);

    for ring in 0..=rings {
        let phi = PI * (ring as f64) / (rings as f64);
        let y = radius * phi.cos();
        let r = radius * phi.sin();
        for seg in 0..segments {
            let theta = 2.0 * PI * (seg as f64) / (segments as f64);
            mesh.add_vertex(Point3::new(r * theta.cos(), y, r * theta.sin()));
        }
    }

    let seg_u32 = segments as u32;
    for ring in 0..rings as u32 {
        for seg in 0..seg_u32 {
            let next = (seg + 1) % seg_u32;
            let a = ring * seg_u32 + seg;
            let b = ring * seg_u32 + next;
            let c = (ring + 1) * seg_u32 + seg;
            let d = (ring + 1) * seg_u32 + next;
            mesh.add_triangle(a, c, b);
            mesh.add_triangle(b, c, d);
        }
    }

    mesh
}

/// Open tapered shell along +Y from `0..height`: `segments` trapezoidal
/// side faces connecting a bottom circle to a top circle, no caps.
pub fn frustum_shell(bottom_radius: f64, top_radius: f64, height: f64, segments: usize) -> TriMesh {
    if height <= 0.0 || (bottom_radius <= 0.0 && top_radius <= 0.0) {
        return TriMesh::new();
    }

    let mut mesh = TriMesh::with_capacity(segments * 2, segments * 6);

    for i in 0..segments {
        let theta = 2.0 * PI * (i as f64) / (segments as f64);
        let (sin, cos) = theta.sin_cos();
        mesh.add_vertex(Point3::new(bottom_radius * cos, 0.0, bottom_radius * sin));
        mesh.add_vertex(Point3::new(top_radius * cos, height, top_radius * sin));
    }

    let n = segments as u32;
    for i in 0..n {
        let j = (i + 1) % n;
        let b0 = i * 2;
        let t0 = i * 2 + 1;
        let b1 = j * 2;
        let t1 = j * 2 + 1;
        mesh.add_triangle(b0, t0, t1);
        mesh.add_triangle(b0, t1, b1);
    }

    mesh
}

/// Rotate a mesh about the X axis in-place.
pub fn rotate_x(mesh: &mut TriMesh, angle: f64) {
    let (sin, cos) = angle.sin_cos();
    mesh.positions.chunks_exact_mut(3).for_each(|chunk| {
        let (y, z) = (chunk[1], chunk[2]);
        chunk[1] = y * cos - z * sin;
        chunk[2] = y * sin + z * cos;
    });
}

/// Rotate a mesh about the Y axis in-place.
pub fn rotate_y(mesh: &mut TriMesh, angle: f64) {
    let (sin, cos) = angle.sin_cos();
    mesh.positions.chunks_exact_mut(3).for_each(|chunk| {
        let (x, z) = (chunk[0], chunk[2]);
        chunk[0] = x * cos + z * sin;
        chunk[2] = -x * sin + z * cos;
    });
}
