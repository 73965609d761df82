// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Probe generator
//!
//! An entity tests for interference by firing rays from its own
//! distinguishing points. Profiles probe from their cross-section corners
//! along the member axis, pipes from the centerline plus a start-cap ring,
//! flare segments along their side-face edges, equipment from its placement
//! point out to every vertex of its own solid.
//!
//! Beam-like members (beams, cantilevers, horizontal bracing) are modeled
//! from top-of-steel; their probe origins drop by the fitting offset so
//! they track the same fix-up the aggregator applies to the solids.

use nalgebra::Point3;
use plantclash_core::{ClashEntity, FlareShell, PipeSection, SectionProfile, ShapePayload};
use plantclash_geometry::{
    deg_to_rad, fitting_offset, section_probe_points, segment_frame, Ray, Solid, FLARE_SEGMENTS,
    MM, RADIAL_POINTS,
};

/// Build the probe set for an entity. `own_solid` is the entity's already
/// synthesized solid, consulted only for equipment (whose probes target its
/// own vertices).
pub fn probes_for(entity: &ClashEntity, own_solid: Option<&Solid>) -> Vec<Ray> {
    match &entity.shape {
        ShapePayload::Profile(section) => profile_probes(entity, section),
        ShapePayload::Pipe(pipe) => pipe_probes(entity, pipe),
        ShapePayload::Flare(shell) => flare_probes(entity, shell),
        ShapePayload::Equipment(_) => equipment_probes(entity, own_solid),
    }
}

fn profile_probes(entity: &ClashEntity, section: &SectionProfile) -> Vec<Ray> {
    let len = entity.length();
    if len <= 0.0 {
        return Vec::new();
    }
    let points = section_probe_points(section);
    if points.is_empty() {
        return Vec::new();
    }

    let frame = segment_frame(
        &entity.start,
        &entity.end,
        deg_to_rad(entity.orientation_deg),
    );
    let direction = (entity.end - entity.start) / len;
    let drop = if entity.role.is_beam_like() {
        fitting_offset(section, entity.orientation_deg)
    } else {
        0.0
    };

    points
        .iter()
        .map(|p| {
            let mut origin = frame.transform_point(&Point3::new(p.x, p.y, 0.0));
            origin.y -= drop;
            Ray {
                origin,
                direction,
                max_distance: len,
            }
        })
        .collect()
}

fn pipe_probes(entity: &ClashEntity, pipe: &PipeSection) -> Vec<Ray> {
    let len = entity.length();
    if len <= 0.0 {
        return Vec::new();
    }
    let direction = (entity.end - entity.start) / len;

    // Axis probe first; the ring recovers wall-only contacts the axis
    // misses (a wider pipe enclosing this one)
    let mut rays = vec![Ray {
        origin: entity.start,
        direction,
        max_distance: len,
    }];

    let radius = pipe.outside_diameter / 2.0 * MM;
    if radius > 0.0 {
        let frame = segment_frame(&entity.start, &entity.end, 0.0);
        for i in 0..RADIAL_POINTS {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (RADIAL_POINTS as f64);
            let origin =
                frame.transform_point(&Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0));
            rays.push(Ray {
                origin,
                direction,
                max_distance: len,
            });
        }
    }
    rays
}

/// One probe per side face of the conical shell, bottom-ring vertex toward
/// the matching top-ring vertex. Mirrors the frustum tessellation.
fn flare_probes(entity: &ClashEntity, shell: &FlareShell) -> Vec<Ray> {
    let height = entity.length();
    if height <= 0.0 {
        return Vec::new();
    }
    let bottom_r = shell.bottom_internal_diameter / 2.0 + shell.thickness;
    let top_r = shell.top_internal_diameter / 2.0 + shell.thickness;
    let base = entity.start;

    (0..FLARE_SEGMENTS)
        .filter_map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (FLARE_SEGMENTS as f64);
            let (sin, cos) = theta.sin_cos();
            let bottom = Point3::new(base.x + bottom_r * cos, base.y, base.z + bottom_r * sin);
            let top = Point3::new(
                base.x + top_r * cos,
                base.y + height,
                base.z + top_r * sin,
            );
            Ray::between(bottom, top)
        })
        .collect()
}

fn equipment_probes(entity: &ClashEntity, own_solid: Option<&Solid>) -> Vec<Ray> {
    let Some(solid) = own_solid else {
        return Vec::new();
    };
    solid
        .mesh
        .vertices()
        .filter_map(|vertex| Ray::between(entity.start, vertex))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plantclash_core::{MemberRole, SectionFamily};
    use plantclash_geometry::synthesize_entity;

    fn entity(role: MemberRole, shape: ShapePayload, end: Point3<f64>) -> ClashEntity {
        ClashEntity {
            project: "P".into(),
            model: "M".into(),
            name: "E".into(),
            start: Point3::origin(),
            end,
            orientation_deg: 0.0,
            role,
            shape,
        }
    }

    #[test]
    fn box_profile_probes_from_four_corners() {
        let shape = ShapePayload::Profile(SectionProfile::new(
            SectionFamily::Box,
            200.0,
            100.0,
            8.0,
            6.0,
        ));
        let e = entity(MemberRole::Column, shape, Point3::new(0.0, 6.0, 0.0));
        let probes = probes_for(&e, None);

        assert_eq!(probes.len(), 4);
        for ray in &probes {
            assert_relative_eq!(ray.direction.y, 1.0, epsilon = 1e-12);
            assert_relative_eq!(ray.max_distance, 6.0, epsilon = 1e-12);
            // Origins on the column base, at the section corners
            assert_relative_eq!(ray.origin.y, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn beam_probes_drop_by_the_fitting_offset() {
        let section = SectionProfile::new(SectionFamily::I, 300.0, 150.0, 10.7, 7.1);
        let offset = fitting_offset(&section, 0.0);
        assert!(offset > 0.0);

        let shape = ShapePayload::Profile(section);
        let beam = entity(MemberRole::Beam, shape.clone(), Point3::new(6.0, 0.0, 0.0));
        let column = entity(MemberRole::Column, shape, Point3::new(6.0, 0.0, 0.0));

        let beam_probes = probes_for(&beam, None);
        let column_probes = probes_for(&column, None);
        for (b, c) in beam_probes.iter().zip(column_probes.iter()) {
            assert_relative_eq!(b.origin.y, c.origin.y - offset, epsilon = 1e-12);
        }
    }

    #[test]
    fn pipe_probes_axis_first_then_ring() {
        let shape = ShapePayload::Pipe(PipeSection::new(219.1, 8.18));
        let e = entity(MemberRole::FreePipe, shape, Point3::new(10.0, 0.0, 0.0));
        let probes = probes_for(&e, None);

        assert_eq!(probes.len(), 1 + RADIAL_POINTS);
        assert_relative_eq!(probes[0].origin, Point3::origin(), epsilon = 1e-12);
        // Ring origins sit on the outer radius around the start
        let r = 219.1 / 2.0 * MM;
        for ray in &probes[1..] {
            let radial = (ray.origin.y.powi(2) + ray.origin.z.powi(2)).sqrt();
            assert_relative_eq!(radial, r, epsilon = 1e-9);
            assert_relative_eq!(ray.origin.x, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_length_entities_probe_nothing() {
        let shape = ShapePayload::Pipe(PipeSection::new(219.1, 8.18));
        let e = entity(MemberRole::FreePipe, shape, Point3::origin());
        assert!(probes_for(&e, None).is_empty());
    }

    #[test]
    fn flare_probes_climb_the_shell() {
        let shell = FlareShell {
            bottom_elevation: 0.0,
            top_elevation: 20.0,
            bottom_internal_diameter: 3.0,
            top_internal_diameter: 2.0,
            thickness: 0.012,
        };
        let e = entity(
            MemberRole::FlareSegment,
            ShapePayload::Flare(shell),
            Point3::new(0.0, 20.0, 0.0),
        );
        let probes = probes_for(&e, None);

        assert_eq!(probes.len(), FLARE_SEGMENTS);
        for ray in &probes {
            assert!(ray.direction.y > 0.0);
        }
    }

    #[test]
    fn equipment_probes_fan_out_to_its_vertices() {
        use plantclash_core::{EquipmentKind, EquipmentSpec};

        let spec = EquipmentSpec::new(EquipmentKind::Tank, Point3::new(5.0, 0.0, 5.0));
        let e = ClashEntity {
            project: "P".into(),
            model: String::new(),
            name: "T-1".into(),
            start: spec.position,
            end: spec.position,
            orientation_deg: 0.0,
            role: MemberRole::Equipment,
            shape: ShapePayload::Equipment(spec),
        };
        let solid = synthesize_entity(&e).unwrap();
        let probes = probes_for(&e, Some(&solid));

        assert!(!probes.is_empty());
        assert!(probes.len() <= solid.mesh.vertex_count());
        for ray in &probes {
            assert_relative_eq!(ray.origin, e.start, epsilon = 1e-12);
        }
    }
}
