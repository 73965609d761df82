// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PlantClash Geometry Kernel
//!
//! Solid synthesis and ray casting for clash detection using earcutr
//! triangulation and nalgebra for transformations. Entities are turned into
//! triangle meshes with eager bounding volumes; probes are cast against them
//! through a sphere/AABB/triangle rejection ladder.

pub mod equipment;
pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod primitives;
pub mod profile;
pub mod ray;
pub mod section;
pub mod synth;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use equipment::synthesize_equipment;
pub use error::{Error, Result};
pub use extrusion::extrude_profile;
pub use mesh::{Aabb, BoundingSphere, Solid, TriMesh};
pub use profile::{Profile2D, ANNULUS_SEGMENTS, FLARE_SEGMENTS};
pub use ray::{Ray, RayHit};
pub use section::{
    fitting_offset, principal_axis_angle, section_probe_points, synthesize_section, MM,
    RADIAL_POINTS,
};
pub use synth::synthesize_entity;
pub use transform::{deg_to_rad, segment_frame};
