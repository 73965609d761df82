// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity solid synthesis
//!
//! Turns a normalized [`ClashEntity`] into a world-space [`Solid`]. Each
//! payload kind has its own path: profiles extrude their cross-section
//! along the centerline, pipes extrude an annulus, flare segments become
//! open conical shells and equipment composes primitive solids. Entities
//! whose payload cannot produce geometry (unknown family or kind, zero
//! dimensions, zero length) yield `None` and simply never clash.

use crate::equipment::synthesize_equipment;
use crate::mesh::Solid;
use crate::primitives::{annulus_mesh, frustum_shell};
use crate::profile::{ANNULUS_SEGMENTS, FLARE_SEGMENTS};
use crate::section::{synthesize_section, MM};
use crate::transform::{deg_to_rad, segment_frame};
use nalgebra::Vector3;
use plantclash_core::{ClashEntity, FlareShell, PipeSection, ShapePayload};

/// Synthesize the world-space solid for an entity.
pub fn synthesize_entity(entity: &ClashEntity) -> Option<Solid> {
    let mesh = match &entity.shape {
        ShapePayload::Profile(section) => {
            let mut mesh = synthesize_section(section, entity.length())?;
            let frame = segment_frame(
                &entity.start,
                &entity.end,
                deg_to_rad(entity.orientation_deg),
            );
            mesh.transform(&frame);
            mesh
        }
        ShapePayload::Pipe(pipe) => {
            let mut mesh = pipe_mesh(pipe, entity.length());
            let frame = segment_frame(&entity.start, &entity.end, 0.0);
            mesh.transform(&frame);
            mesh
        }
        ShapePayload::Flare(shell) => {
            let mut mesh = flare_mesh(shell, entity.length());
            mesh.translate(Vector3::new(entity.start.x, entity.start.y, entity.start.z));
            mesh
        }
        ShapePayload::Equipment(spec) => {
            let mut mesh = synthesize_equipment(spec)?;
            mesh.translate(Vector3::new(entity.start.x, entity.start.y, entity.start.z));
            mesh
        }
    };

    Solid::new(mesh)
}

/// Annular pipe run along local +Z. Dimensions arrive in millimeters.
fn pipe_mesh(pipe: &PipeSection, length: f64) -> crate::mesh::TriMesh {
    let outer = pipe.outside_diameter / 2.0 * MM;
    let inner = (pipe.outside_diameter / 2.0 - pipe.wall_thickness) * MM;
    annulus_mesh(outer, Some(inner), length, ANNULUS_SEGMENTS)
}

/// Open conical shell of one flare segment, base at the local origin,
/// growing along +Y. Flare dimensions are already in meters; the outer
/// surface is the internal radius plus the plate thickness.
fn flare_mesh(shell: &FlareShell, height: f64) -> crate::mesh::TriMesh {
    let bottom = shell.bottom_internal_diameter / 2.0 + shell.thickness;
    let top = shell.top_internal_diameter / 2.0 + shell.thickness;
    frustum_shell(bottom, top, height, FLARE_SEGMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use plantclash_core::{MemberRole, SectionFamily, SectionProfile};

    fn entity(shape: ShapePayload, start: Point3<f64>, end: Point3<f64>) -> ClashEntity {
        ClashEntity {
            project: "P".into(),
            model: "M".into(),
            name: "E-1".into(),
            start,
            end,
            orientation_deg: 0.0,
            role: MemberRole::Beam,
            shape,
        }
    }

    #[test]
    fn profile_solid_spans_the_centerline() {
        let shape = ShapePayload::Profile(SectionProfile::new(
            SectionFamily::Box,
            200.0,
            100.0,
            0.0,
            0.0,
        ));
        let e = entity(shape, Point3::new(1.0, 2.0, 3.0), Point3::new(7.0, 2.0, 3.0));
        let solid = synthesize_entity(&e).unwrap();

        assert!((solid.aabb.min.x - 1.0).abs() < 1e-9);
        assert!((solid.aabb.max.x - 7.0).abs() < 1e-9);
        // 200 mm deep, 100 mm wide cross-section around the axis
        assert!((solid.aabb.size().y - 0.1).abs() < 1e-6 || (solid.aabb.size().y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn unknown_family_never_synthesizes() {
        let shape = ShapePayload::Profile(SectionProfile::default());
        let e = entity(shape, Point3::origin(), Point3::new(6.0, 0.0, 0.0));
        assert!(synthesize_entity(&e).is_none());
    }

    #[test]
    fn pipe_solid_matches_its_diameter() {
        let shape = ShapePayload::Pipe(PipeSection::new(219.1, 8.18));
        let e = entity(shape, Point3::origin(), Point3::new(0.0, 0.0, 10.0));
        let solid = synthesize_entity(&e).unwrap();

        let size = solid.aabb.size();
        assert!((size.x - 0.2191).abs() < 1e-3);
        assert!((size.z - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_pipe_never_synthesizes() {
        let shape = ShapePayload::Pipe(PipeSection::new(219.1, 8.18));
        let e = entity(shape, Point3::origin(), Point3::origin());
        assert!(synthesize_entity(&e).is_none());
    }

    #[test]
    fn flare_segment_grows_from_start() {
        let shape = ShapePayload::Flare(FlareShell {
            bottom_elevation: 0.0,
            top_elevation: 12.0,
            bottom_internal_diameter: 3.0,
            top_internal_diameter: 1.5,
            thickness: 0.012,
        });
        let e = entity(
            shape,
            Point3::new(10.0, 0.0, 10.0),
            Point3::new(10.0, 12.0, 10.0),
        );
        let solid = synthesize_entity(&e).unwrap();

        assert!((solid.aabb.min.y - 0.0).abs() < 1e-9);
        assert!((solid.aabb.max.y - 12.0).abs() < 1e-9);
        // Widest at the bottom: internal radius 1.5 plus plate
        assert!((solid.aabb.max.x - (10.0 + 1.512)).abs() < 1e-9);
    }
}
