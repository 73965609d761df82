// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-equipment shape builders
//!
//! One builder per [`EquipmentKind`], each composing primitive solids into
//! the local envelope of the unit. Nominal dimensions are scaled uniformly
//! by the spec's `scale`; explicit `parameters` take precedence. The mesh
//! is produced in local space (base at the origin, Y up) and rotated by the
//! equipment's own X/Y/Z rotations; the caller places it at the entity
//! position.

use crate::mesh::TriMesh;
use crate::primitives::{box_at, cylinder_mesh, frustum_shell, rotate_x, rotate_y, sphere_mesh};
use crate::transform::deg_to_rad;
use nalgebra::{Point3, Vector3};
use plantclash_core::{EquipmentKind, EquipmentSpec};

const SEGMENTS: usize = 16;

/// Resolved sizing for a builder.
struct Dims {
    length: f64,
    diameter: f64,
    height: f64,
    width: f64,
}

fn dims(spec: &EquipmentSpec, length: f64, diameter: f64, height: f64, width: f64) -> Dims {
    let s = if spec.scale > 0.0 { spec.scale } else { 1.0 };
    let p = spec.parameters.unwrap_or_default();
    Dims {
        length: p.length.unwrap_or(length * s).max(0.0),
        diameter: p.diameter.unwrap_or(diameter * s).max(0.0),
        height: p.height.unwrap_or(height * s).max(0.0),
        width: p.width.unwrap_or(width * s).max(0.0),
    }
}

/// Vertical cylinder standing on the origin.
fn vertical_vessel(diameter: f64, height: f64) -> TriMesh {
    cylinder_mesh(diameter / 2.0, height, SEGMENTS)
}

/// Vertical cylinder with hemispherical heads.
fn dished_vessel(diameter: f64, height: f64) -> TriMesh {
    let r = diameter / 2.0;
    let mut mesh = cylinder_mesh(r, height, SEGMENTS);

    let bottom = sphere_mesh(r, SEGMENTS);
    let mut top = bottom.clone();
    top.translate(Vector3::new(0.0, height, 0.0));
    mesh.merge(&bottom);
    mesh.merge(&top);
    mesh
}

/// Horizontal cylinder along X, centered in plan, shell axis at half the
/// diameter above the base.
fn horizontal_vessel(diameter: f64, length: f64) -> TriMesh {
    let mut mesh = cylinder_mesh(diameter / 2.0, length, SEGMENTS);
    // Stand the +Y cylinder over on +X
    mesh.rotate_z(-std::f64::consts::FRAC_PI_2);
    mesh.translate(Vector3::new(-length / 2.0, diameter / 2.0, 0.0));
    mesh
}

/// Two saddle blocks under a horizontal vessel.
fn saddles(diameter: f64, length: f64) -> TriMesh {
    let sx = (length * 0.1).max(0.05);
    let sy = diameter / 2.0;
    let sz = diameter * 0.8;
    let inset = length * 0.25;

    let mut mesh = box_at(Point3::new(-length / 2.0 + inset, sy / 2.0, 0.0), sx, sy, sz);
    mesh.merge(&box_at(
        Point3::new(length / 2.0 - inset, sy / 2.0, 0.0),
        sx,
        sy,
        sz,
    ));
    mesh
}

/// Inline valve body along X with a vertical bonnet.
fn valve_body(diameter: f64, length: f64) -> TriMesh {
    let mut mesh = horizontal_vessel(diameter, length);
    let mut bonnet = cylinder_mesh(diameter * 0.3, diameter * 1.2, SEGMENTS);
    bonnet.translate(Vector3::new(0.0, diameter / 2.0, 0.0));
    mesh.merge(&bonnet);
    mesh
}

fn build_kind(kind: EquipmentKind, spec: &EquipmentSpec) -> TriMesh {
    match kind {
        EquipmentKind::Tank => {
            let d = dims(spec, 0.0, 3.0, 4.0, 0.0);
            vertical_vessel(d.diameter, d.height)
        }
        EquipmentKind::Drum => {
            let d = dims(spec, 0.0, 2.0, 3.5, 0.0);
            dished_vessel(d.diameter, d.height)
        }
        EquipmentKind::HorizontalDrum => {
            let d = dims(spec, 4.0, 2.0, 0.0, 0.0);
            let mut mesh = horizontal_vessel(d.diameter, d.length);
            mesh.merge(&saddles(d.diameter, d.length));
            mesh
        }
        EquipmentKind::Tower => {
            let d = dims(spec, 0.0, 2.0, 12.0, 0.0);
            dished_vessel(d.diameter, d.height)
        }
        EquipmentKind::Reactor => {
            let d = dims(spec, 0.0, 2.5, 6.0, 0.0);
            dished_vessel(d.diameter, d.height)
        }
        EquipmentKind::Silo => {
            let d = dims(spec, 0.0, 3.0, 6.0, 0.0);
            let cone_h = d.diameter * 0.6;
            let mut mesh = frustum_shell(d.diameter * 0.15, d.diameter / 2.0, cone_h, SEGMENTS);
            let mut shell = vertical_vessel(d.diameter, (d.height - cone_h).max(0.0));
            shell.translate(Vector3::new(0.0, cone_h, 0.0));
            mesh.merge(&shell);
            mesh
        }
        EquipmentKind::StorageSphere => {
            let d = dims(spec, 0.0, 6.0, 7.0, 0.0);
            let r = d.diameter / 2.0;
            let mut mesh = sphere_mesh(r, SEGMENTS);
            mesh.translate(Vector3::new(0.0, d.height - r, 0.0));
            for (x, z) in [(r * 0.6, 0.0), (-r * 0.6, 0.0), (0.0, r * 0.6), (0.0, -r * 0.6)] {
                mesh.merge(&box_at(
                    Point3::new(x, (d.height - r) / 2.0, z),
                    0.3,
                    d.height - r,
                    0.3,
                ));
            }
            mesh
        }
        EquipmentKind::ShellTubeExchanger | EquipmentKind::Condenser | EquipmentKind::Reboiler => {
            let d = dims(spec, 5.0, 1.0, 0.0, 0.0);
            let mut mesh = horizontal_vessel(d.diameter, d.length);
            mesh.merge(&saddles(d.diameter, d.length));
            // Channel heads
            let hd = d.diameter * 1.1;
            mesh.merge(&box_at(
                Point3::new(-d.length / 2.0, d.diameter / 2.0, 0.0),
                d.length * 0.06,
                hd,
                hd,
            ));
            mesh.merge(&box_at(
                Point3::new(d.length / 2.0, d.diameter / 2.0, 0.0),
                d.length * 0.06,
                hd,
                hd,
            ));
            mesh
        }
        EquipmentKind::PlateExchanger => {
            let d = dims(spec, 2.0, 0.0, 1.5, 1.0);
            box_at(Point3::new(0.0, d.height / 2.0, 0.0), d.length, d.height, d.width)
        }
        EquipmentKind::AirCooler => {
            let d = dims(spec, 6.0, 0.0, 2.5, 3.0);
            let bay_h = d.height * 0.4;
            let mut mesh = box_at(
                Point3::new(0.0, d.height - bay_h / 2.0, 0.0),
                d.length,
                bay_h,
                d.width,
            );
            // Support legs
            let leg_h = d.height - bay_h;
            for (x, z) in [
                (d.length / 2.0 - 0.2, d.width / 2.0 - 0.2),
                (-d.length / 2.0 + 0.2, d.width / 2.0 - 0.2),
                (d.length / 2.0 - 0.2, -d.width / 2.0 + 0.2),
                (-d.length / 2.0 + 0.2, -d.width / 2.0 + 0.2),
            ] {
                mesh.merge(&box_at(Point3::new(x, leg_h / 2.0, z), 0.25, leg_h, 0.25));
            }
            mesh
        }
        EquipmentKind::Furnace => {
            let d = dims(spec, 4.0, 0.0, 6.0, 4.0);
            let box_h = d.height * 0.6;
            let mut mesh = box_at(
                Point3::new(0.0, box_h / 2.0, 0.0),
                d.length,
                box_h,
                d.width,
            );
            let mut stack = cylinder_mesh(d.width * 0.15, d.height - box_h, SEGMENTS);
            stack.translate(Vector3::new(0.0, box_h, 0.0));
            mesh.merge(&stack);
            mesh
        }
        EquipmentKind::Boiler => {
            let d = dims(spec, 5.0, 1.5, 3.0, 3.0);
            let mut mesh = box_at(
                Point3::new(0.0, d.height / 2.0, 0.0),
                d.length,
                d.height,
                d.width,
            );
            let mut drum = horizontal_vessel(d.diameter, d.length * 0.8);
            drum.translate(Vector3::new(0.0, d.height, 0.0));
            mesh.merge(&drum);
            mesh
        }
        EquipmentKind::Pump => {
            let d = dims(spec, 1.5, 0.5, 0.0, 0.6);
            let mut mesh = box_at(Point3::new(0.0, 0.1, 0.0), d.length, 0.2, d.width);
            let mut casing = horizontal_vessel(d.diameter, d.length * 0.8);
            casing.translate(Vector3::new(0.0, 0.2, 0.0));
            mesh.merge(&casing);
            mesh
        }
        EquipmentKind::Compressor | EquipmentKind::Turbine => {
            let d = dims(spec, 3.0, 1.2, 0.0, 1.5);
            let mut mesh = box_at(Point3::new(0.0, 0.25, 0.0), d.length, 0.5, d.width);
            let mut casing = horizontal_vessel(d.diameter, d.length * 0.7);
            casing.translate(Vector3::new(0.0, 0.5, 0.0));
            mesh.merge(&casing);
            mesh
        }
        EquipmentKind::Blower | EquipmentKind::Fan => {
            let d = dims(spec, 1.0, 1.5, 0.0, 0.8);
            let mut casing = cylinder_mesh(d.diameter / 2.0, d.length, SEGMENTS);
            // Axis horizontal
            rotate_x(&mut casing, std::f64::consts::FRAC_PI_2);
            casing.translate(Vector3::new(0.0, d.diameter / 2.0, -d.length / 2.0));
            let mut mesh = box_at(Point3::new(0.0, 0.1, 0.0), d.width, 0.2, d.width);
            mesh.merge(&casing);
            mesh
        }
        EquipmentKind::Mixer => {
            let d = dims(spec, 0.0, 2.0, 2.5, 0.0);
            let mut mesh = vertical_vessel(d.diameter, d.height);
            let motor = d.diameter * 0.3;
            mesh.merge(&box_at(
                Point3::new(0.0, d.height + motor / 2.0, 0.0),
                motor,
                motor,
                motor,
            ));
            mesh
        }
        EquipmentKind::GateValve | EquipmentKind::GlobeValve | EquipmentKind::CheckValve => {
            let d = dims(spec, 0.6, 0.3, 0.0, 0.0);
            valve_body(d.diameter, d.length)
        }
        EquipmentKind::ControlValve => {
            let d = dims(spec, 0.7, 0.3, 0.0, 0.0);
            let mut mesh = valve_body(d.diameter, d.length);
            // Actuator
            mesh.merge(&box_at(
                Point3::new(0.0, d.diameter * 2.0, 0.0),
                d.diameter,
                d.diameter * 0.8,
                d.diameter,
            ));
            mesh
        }
        EquipmentKind::SafetyValve => {
            let d = dims(spec, 0.4, 0.25, 0.0, 0.0);
            let mut mesh = valve_body(d.diameter, d.length);
            // Side outlet
            let mut outlet = horizontal_vessel(d.diameter * 0.7, d.length * 0.6);
            rotate_y(&mut outlet, std::f64::consts::FRAC_PI_2);
            outlet.translate(Vector3::new(0.0, d.diameter, 0.0));
            mesh.merge(&outlet);
            mesh
        }
        EquipmentKind::Strainer => {
            let d = dims(spec, 0.6, 0.25, 0.0, 0.0);
            let mut mesh = horizontal_vessel(d.diameter, d.length);
            let mut leg = cylinder_mesh(d.diameter * 0.4, d.length * 0.5, SEGMENTS);
            rotate_x(&mut leg, std::f64::consts::FRAC_PI_4);
            leg.translate(Vector3::new(0.0, d.diameter / 2.0, 0.0));
            mesh.merge(&leg);
            mesh
        }
        EquipmentKind::Filter => {
            let d = dims(spec, 0.0, 0.8, 1.8, 0.0);
            dished_vessel(d.diameter, d.height)
        }
        EquipmentKind::Ejector => {
            let d = dims(spec, 1.2, 0.3, 0.0, 0.0);
            let r = d.diameter / 2.0;
            let mut nozzle = frustum_shell(r, r * 0.4, d.length / 2.0, SEGMENTS);
            let mut diffuser = frustum_shell(r * 0.4, r, d.length / 2.0, SEGMENTS);
            diffuser.translate(Vector3::new(0.0, d.length / 2.0, 0.0));
            nozzle.merge(&diffuser);
            // Axis horizontal
            rotate_x(&mut nozzle, std::f64::consts::FRAC_PI_2);
            nozzle.translate(Vector3::new(0.0, r, -d.length / 2.0));
            nozzle
        }
        EquipmentKind::Skid | EquipmentKind::PackageUnit => {
            let d = dims(spec, 4.0, 0.0, 2.2, 2.5);
            box_at(
                Point3::new(0.0, d.height / 2.0, 0.0),
                d.length,
                d.height,
                d.width,
            )
        }
        EquipmentKind::ControlPanel => {
            let d = dims(spec, 0.8, 0.0, 1.8, 0.4);
            box_at(
                Point3::new(0.0, d.height / 2.0, 0.0),
                d.length,
                d.height,
                d.width,
            )
        }
        EquipmentKind::Instrument => {
            let d = dims(spec, 0.25, 0.1, 0.5, 0.25);
            let mut mesh = box_at(
                Point3::new(0.0, d.height, 0.0),
                d.length,
                d.length,
                d.width,
            );
            mesh.merge(&cylinder_mesh(d.diameter / 2.0, d.height, SEGMENTS));
            mesh
        }
    }
}

/// Synthesize the local solid for a process-equipment element.
///
/// Returns `None` when the kind tag was not recognized at ingestion.
pub fn synthesize_equipment(spec: &EquipmentSpec) -> Option<TriMesh> {
    let kind = spec.kind?;
    let mut mesh = build_kind(kind, spec);

    let [rx, ry, rz] = spec.rotation_deg;
    if rx != 0.0 {
        rotate_x(&mut mesh, deg_to_rad(rx));
    }
    if ry != 0.0 {
        rotate_y(&mut mesh, deg_to_rad(ry));
    }
    if rz != 0.0 {
        mesh.rotate_z(deg_to_rad(rz));
    }

    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantclash_core::EquipmentParams;

    fn spec(kind: EquipmentKind) -> EquipmentSpec {
        EquipmentSpec::new(kind, Point3::origin())
    }

    #[test]
    fn every_kind_builds_a_mesh() {
        use EquipmentKind::*;
        let kinds = [
            Tank, Drum, HorizontalDrum, Tower, Reactor, Silo, StorageSphere,
            ShellTubeExchanger, PlateExchanger, AirCooler, Condenser, Reboiler, Furnace,
            Boiler, Pump, Compressor, Blower, Fan, Turbine, Mixer, GateValve, GlobeValve,
            ControlValve, CheckValve, SafetyValve, Strainer, Filter, Ejector, Skid,
            PackageUnit, ControlPanel, Instrument,
        ];
        for kind in kinds {
            let mesh = synthesize_equipment(&spec(kind)).unwrap();
            assert!(!mesh.is_empty(), "{:?} built an empty mesh", kind);
        }
    }

    #[test]
    fn unknown_kind_yields_none() {
        let mut s = spec(EquipmentKind::Tank);
        s.kind = None;
        assert!(synthesize_equipment(&s).is_none());
    }

    #[test]
    fn scale_grows_the_envelope() {
        let small = synthesize_equipment(&spec(EquipmentKind::Tank)).unwrap();
        let mut big_spec = spec(EquipmentKind::Tank);
        big_spec.scale = 2.0;
        let big = synthesize_equipment(&big_spec).unwrap();

        let hs = small.bounds().unwrap().size();
        let hb = big.bounds().unwrap().size();
        assert!(hb.y > hs.y * 1.9);
    }

    #[test]
    fn explicit_parameters_override_scale() {
        let mut s = spec(EquipmentKind::Tank);
        s.scale = 5.0;
        s.parameters = Some(EquipmentParams {
            height: Some(1.0),
            diameter: Some(0.5),
            ..Default::default()
        });
        let mesh = synthesize_equipment(&s).unwrap();
        let size = mesh.bounds().unwrap().size();
        assert!((size.y - 1.0).abs() < 1e-9);
        assert!((size.x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rotation_turns_a_horizontal_drum() {
        let mut s = spec(EquipmentKind::HorizontalDrum);
        s.rotation_deg = [0.0, 90.0, 0.0];
        let turned = synthesize_equipment(&s).unwrap();
        let straight = synthesize_equipment(&spec(EquipmentKind::HorizontalDrum)).unwrap();

        let ts = turned.bounds().unwrap().size();
        let ss = straight.bounds().unwrap().size();
        // Long axis moved from X to Z
        assert!((ts.z - ss.x).abs() < 1e-9);
        assert!((ts.x - ss.z).abs() < 1e-9);
    }
}
