// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle mesh and bounding volumes
//!
//! Solids here are probe targets, never rendered: positions stay in f64 for
//! stable ray math and no normals are stored.

use nalgebra::{Matrix4, Point3, Vector3};

/// Triangle mesh with f64 positions
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) {
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &TriMesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;
        self.positions.reserve(other.positions.len());
        self.indices.reserve(other.indices.len());
        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex at index
    #[inline]
    pub fn vertex(&self, i: u32) -> Point3<f64> {
        let base = i as usize * 3;
        Point3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// Iterate vertices
    pub fn vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|chunk| Point3::new(chunk[0], chunk[1], chunk[2]))
    }

    /// Translate every vertex in-place
    #[inline]
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            chunk[0] += offset.x;
            chunk[1] += offset.y;
            chunk[2] += offset.z;
        });
    }

    /// Apply a transformation matrix in-place
    #[inline]
    pub fn transform(&mut self, transform: &Matrix4<f64>) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            let point = Point3::new(chunk[0], chunk[1], chunk[2]);
            let transformed = transform.transform_point(&point);
            chunk[0] = transformed.x;
            chunk[1] = transformed.y;
            chunk[2] = transformed.z;
        });
    }

    /// Mirror across the local YZ plane (x -> -x). Winding is left alone:
    /// probing does not cull back faces.
    #[inline]
    pub fn mirror_x(&mut self) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            chunk[0] = -chunk[0];
        });
    }

    /// Mirror across the local XZ plane (y -> -y)
    #[inline]
    pub fn mirror_y(&mut self) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            chunk[1] = -chunk[1];
        });
    }

    /// Rotate about the local Z axis
    #[inline]
    pub fn rotate_z(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            let (x, y) = (chunk[0], chunk[1]);
            chunk[0] = x * cos - y * sin;
            chunk[1] = x * sin + y * cos;
        });
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> Option<Aabb> {
        if self.is_empty() {
            return None;
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        Some(Aabb { min, max })
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Degenerate box at a single point
    pub fn point(p: Point3<f64>) -> Self {
        Self { min: p, max: p }
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Box grown by `eps` on every side
    pub fn expanded(&self, eps: f64) -> Self {
        let d = Vector3::new(eps, eps, eps);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Slab test: does the ray segment `[0, max_distance]` touch this box?
    pub fn intersects_ray(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> bool {
        let mut t_min = 0.0f64;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if d.abs() < 1e-15 {
                if o < lo || o > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }

        true
    }
}

/// Bounding sphere for fast rejection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl BoundingSphere {
    /// Sphere enclosing an Aabb
    pub fn of_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            radius: aabb.size().norm() * 0.5,
        }
    }

    /// Distance from the ray segment `[0, max_distance]` to the center is
    /// within the radius?
    pub fn intersects_ray(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> bool {
        let to_center = self.center - origin;
        let t = to_center.dot(direction).clamp(0.0, max_distance);
        let closest = origin + direction * t;
        (self.center - closest).norm_squared() <= self.radius * self.radius
    }
}

/// Synthesized solid: the mesh plus eagerly computed bounding volumes.
#[derive(Debug, Clone)]
pub struct Solid {
    pub mesh: TriMesh,
    pub aabb: Aabb,
    pub sphere: BoundingSphere,
}

impl Solid {
    /// Wrap a mesh, computing bounds. Empty meshes yield `None`.
    pub fn new(mesh: TriMesh) -> Option<Self> {
        let aabb = mesh.bounds()?;
        let sphere = BoundingSphere::of_aabb(&aabb);
        Some(Self { mesh, aabb, sphere })
    }

    /// Shift the solid (mesh and both bounds) by an offset.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.mesh.translate(offset);
        self.aabb.min += offset;
        self.aabb.max += offset;
        self.sphere.center += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mesh = TriMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_merge() {
        let mut mesh1 = TriMesh::new();
        mesh1.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh1.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh1.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh1.add_triangle(0, 1, 2);

        let mut mesh2 = TriMesh::new();
        mesh2.add_vertex(Point3::new(5.0, 5.0, 5.0));
        mesh2.add_vertex(Point3::new(6.0, 5.0, 5.0));
        mesh2.add_vertex(Point3::new(5.0, 6.0, 5.0));
        mesh2.add_triangle(0, 1, 2);

        mesh1.merge(&mesh2);
        assert_eq!(mesh1.vertex_count(), 6);
        assert_eq!(mesh1.triangle_count(), 2);
        // Indices of the merged mesh are offset
        assert_eq!(&mesh1.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_bounds_and_solid() {
        let mut mesh = TriMesh::new();
        mesh.add_vertex(Point3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(Point3::new(4.0, 5.0, 6.0));
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_triangle(0, 1, 2);

        let solid = Solid::new(mesh).unwrap();
        assert_eq!(solid.aabb.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(solid.aabb.max, Point3::new(4.0, 5.0, 6.0));
        assert!(solid.sphere.radius > 0.0);
    }

    #[test]
    fn test_empty_solid_is_none() {
        assert!(Solid::new(TriMesh::new()).is_none());
    }

    #[test]
    fn test_aabb_ray_slab() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));

        // Straight through the middle
        assert!(aabb.intersects_ray(
            &Point3::new(-5.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            10.0
        ));
        // Pointing away
        assert!(!aabb.intersects_ray(
            &Point3::new(-5.0, 0.0, 0.0),
            &Vector3::new(-1.0, 0.0, 0.0),
            10.0
        ));
        // Too short
        assert!(!aabb.intersects_ray(
            &Point3::new(-5.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            2.0
        ));
        // Parallel but offset
        assert!(!aabb.intersects_ray(
            &Point3::new(-5.0, 3.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn test_translate_solid_moves_bounds() {
        let mut mesh = TriMesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);

        let mut solid = Solid::new(mesh).unwrap();
        solid.translate(Vector3::new(0.0, -0.5, 0.0));
        assert!((solid.aabb.min.y - -0.5).abs() < 1e-12);
        assert!((solid.sphere.center.y - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_z() {
        let mut mesh = TriMesh::new();
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.rotate_z(std::f64::consts::FRAC_PI_2);
        let v = mesh.vertex(0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }
}
