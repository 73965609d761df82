// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural section solids
//!
//! Builds the local solid for a parametric cross-section: the section lies
//! in the local X (width) / Y (depth) plane and is extruded along +Z over
//! the member length. Non-round families are composed from box primitives;
//! round families are extruded annuli. Angle sections are rotated onto
//! their true principal axes.

use crate::mesh::TriMesh;
use crate::primitives::{annulus_mesh, box_at};
use crate::profile::ANNULUS_SEGMENTS;
use nalgebra::{Point2, Point3};
use plantclash_core::{CombinedRule, SectionFamily, SectionProfile};
use smallvec::SmallVec;

/// Millimeters to meters
pub const MM: f64 = 1e-3;

/// Default wall thickness for round sections with no wall specified (mm)
const DEFAULT_ROUND_WALL_MM: f64 = 10.0;

/// Radial probe/ring point count for round sections
pub const RADIAL_POINTS: usize = 8;

/// Principal-axis rotation of an angle section (radians).
///
/// Classical unsymmetric-section theory for an L with leg lengths `h`, `b`
/// and thickness `t` (consistent units): second moments about the corner
/// axes, transferred to the centroid, then
/// `theta = 0.5 * atan(-2 Ixy / (Ix - Iy))`. Equal legs make `Ix == Iy`
/// and the rotation is defined as zero.
pub fn principal_axis_angle(h: f64, b: f64, t: f64) -> f64 {
    if h <= 0.0 || b <= 0.0 || t <= 0.0 {
        return 0.0;
    }

    // Two rectangles: vertical leg t x h, horizontal leg (b - t) x t
    let a1 = t * h;
    let a2 = (b - t).max(0.0) * t;
    let area = a1 + a2;
    if area <= 0.0 {
        return 0.0;
    }

    let xc = (a1 * t / 2.0 + a2 * (b + t) / 2.0) / area;
    let yc = (a1 * h / 2.0 + a2 * t / 2.0) / area;

    // Moments about the corner axes
    let ix0 = t * h.powi(3) / 3.0 + (b - t).max(0.0) * t.powi(3) / 3.0;
    let iy0 = h * t.powi(3) / 3.0 + t * (b.powi(3) - t.powi(3)).max(0.0) / 3.0;
    let ixy0 = t.powi(2) * h.powi(2) / 4.0 + t.powi(2) * (b.powi(2) - t.powi(2)).max(0.0) / 4.0;

    // Transfer to the centroid
    let ix = ix0 - area * yc * yc;
    let iy = iy0 - area * xc * xc;
    let ixy = ixy0 - area * xc * yc;

    let denom = ix - iy;
    if denom.abs() < 1e-9 {
        return 0.0;
    }

    0.5 * (-2.0 * ixy / denom).atan()
}

/// Centroid of an angle section relative to its corner (same units as input).
fn l_centroid(h: f64, b: f64, t: f64) -> (f64, f64) {
    let a1 = t * h;
    let a2 = (b - t).max(0.0) * t;
    let area = a1 + a2;
    if area <= 0.0 {
        return (0.0, 0.0);
    }
    (
        (a1 * t / 2.0 + a2 * (b + t) / 2.0) / area,
        (a1 * h / 2.0 + a2 * t / 2.0) / area,
    )
}

/// Elevation fitting offset of a member against an I/C section (meters).
///
/// Orientation 0/180: half the flange width; 90/270: half the depth;
/// oblique: `sqrt(a^2 - b^2)` with `a = width + depth`, `b = sqrt(2 a^2)/2`.
pub fn fitting_offset(section: &SectionProfile, orientation_deg: f64) -> f64 {
    let orient = orientation_deg.rem_euclid(360.0);
    let mm = if (orient - 0.0).abs() < 1e-9 || (orient - 180.0).abs() < 1e-9 {
        section.width / 2.0
    } else if (orient - 90.0).abs() < 1e-9 || (orient - 270.0).abs() < 1e-9 {
        section.depth / 2.0
    } else {
        let a = section.width + section.depth;
        let b = (2.0 * a * a).sqrt() / 2.0;
        (a * a - b * b).max(0.0).sqrt()
    };
    mm * MM
}

/// Build the base (single-copy) section mesh, centered on the centerline.
fn base_section_mesh(profile: &SectionProfile, length: f64) -> TriMesh {
    let family = match profile.family {
        Some(f) => f,
        None => return TriMesh::new(),
    };

    let d = profile.depth * MM;
    let w = profile.width * MM;
    let tf = profile.flange_thickness * MM;
    let tw = profile.web_thickness * MM;
    let zc = length / 2.0;

    let mut mesh = TriMesh::new();

    match family {
        SectionFamily::I => {
            // Two flanges + web
            mesh.merge(&box_at(Point3::new(0.0, (d - tf) / 2.0, zc), w, tf, length));
            mesh.merge(&box_at(
                Point3::new(0.0, -(d - tf) / 2.0, zc),
                w,
                tf,
                length,
            ));
            mesh.merge(&box_at(
                Point3::new(0.0, 0.0, zc),
                tw,
                (d - 2.0 * tf).max(0.0),
                length,
            ));
        }
        SectionFamily::C => {
            // Web at the back face + two flanges
            mesh.merge(&box_at(Point3::new(-(w - tw) / 2.0, 0.0, zc), tw, d, length));
            mesh.merge(&box_at(Point3::new(0.0, (d - tf) / 2.0, zc), w, tf, length));
            mesh.merge(&box_at(
                Point3::new(0.0, -(d - tf) / 2.0, zc),
                w,
                tf,
                length,
            ));
        }
        SectionFamily::Box => {
            if tf <= 0.0 && tw <= 0.0 {
                // No wall data: solid block
                mesh.merge(&box_at(Point3::new(0.0, 0.0, zc), w, d, length));
            } else {
                let side = if tw > 0.0 { tw } else { tf };
                let cap = if tf > 0.0 { tf } else { tw };
                mesh.merge(&box_at(
                    Point3::new(-(w - side) / 2.0, 0.0, zc),
                    side,
                    d,
                    length,
                ));
                mesh.merge(&box_at(
                    Point3::new((w - side) / 2.0, 0.0, zc),
                    side,
                    d,
                    length,
                ));
                mesh.merge(&box_at(
                    Point3::new(0.0, (d - cap) / 2.0, zc),
                    (w - 2.0 * side).max(0.0),
                    cap,
                    length,
                ));
                mesh.merge(&box_at(
                    Point3::new(0.0, -(d - cap) / 2.0, zc),
                    (w - 2.0 * side).max(0.0),
                    cap,
                    length,
                ));
            }
        }
        SectionFamily::L => {
            // Legs with the corner at the origin, then centroid-centered and
            // rotated onto the principal axes
            let t = if tw > 0.0 { tw } else { tf };
            let (xc, yc) = l_centroid(d, w, t);

            let mut vertical = box_at(
                Point3::new(t / 2.0 - xc, d / 2.0 - yc, zc),
                t,
                d,
                length,
            );
            let horizontal = box_at(
                Point3::new(w / 2.0 - xc, t / 2.0 - yc, zc),
                w,
                t,
                length,
            );
            vertical.merge(&horizontal);

            vertical.rotate_z(principal_axis_angle(d, w, t));
            mesh.merge(&vertical);
        }
        SectionFamily::Round => {
            let outer = d / 2.0;
            let wall = if tw > 0.0 { tw } else { DEFAULT_ROUND_WALL_MM * MM };
            // Extrusion is already along +Z and starts at 0
            mesh.merge(&annulus_mesh(
                outer,
                Some(outer - wall),
                length,
                ANNULUS_SEGMENTS,
            ));
        }
    }

    // Rolled variant: cover plates fused onto the flanges
    if let Some(plates) = &profile.cover_plates {
        if let Some(top) = plates.top {
            let pw = top.width * MM;
            let pt = top.thickness * MM;
            if pw > 0.0 && pt > 0.0 {
                mesh.merge(&box_at(Point3::new(0.0, (d + pt) / 2.0, zc), pw, pt, length));
            }
        }
        if let Some(bottom) = plates.bottom {
            let pw = bottom.width * MM;
            let pt = bottom.thickness * MM;
            if pw > 0.0 && pt > 0.0 {
                mesh.merge(&box_at(
                    Point3::new(0.0, -(d + pt) / 2.0, zc),
                    pw,
                    pt,
                    length,
                ));
            }
        }
    }

    mesh
}

/// Synthesize the local solid for a structural section over `length` meters.
///
/// Returns `None` when the family is unresolved; degenerate dimensions
/// yield an empty or flat mesh that never produces hits.
pub fn synthesize_section(profile: &SectionProfile, length: f64) -> Option<TriMesh> {
    profile.family?;
    if length <= 0.0 {
        return Some(TriMesh::new());
    }

    let base = base_section_mesh(profile, length);

    // Combined variant: two copies placed per rule
    let combined = match profile.combined.as_ref().and_then(|c| c.rule) {
        Some(rule) => {
            let gap = profile
                .combined
                .map(|c| c.gap.max(0.0) * MM)
                .unwrap_or(0.0);
            Some((rule, gap))
        }
        None => None,
    };

    let mesh = match combined {
        None => base,
        Some((rule, gap)) => {
            let half = gap / 2.0;
            let mut first = base.clone();
            let mut second = base;
            match rule {
                CombinedRule::BackToBackDepth => {
                    first.mirror_x();
                    first.translate(nalgebra::Vector3::new(-half, 0.0, 0.0));
                    second.translate(nalgebra::Vector3::new(half, 0.0, 0.0));
                }
                CombinedRule::BackToBackWidth => {
                    first.mirror_y();
                    first.translate(nalgebra::Vector3::new(0.0, -half, 0.0));
                    second.translate(nalgebra::Vector3::new(0.0, half, 0.0));
                }
                CombinedRule::FaceToFaceDepth => {
                    first.translate(nalgebra::Vector3::new(-half, 0.0, 0.0));
                    second.mirror_x();
                    second.translate(nalgebra::Vector3::new(half, 0.0, 0.0));
                }
                CombinedRule::Star => {
                    first.translate(nalgebra::Vector3::new(-half, -half, 0.0));
                    second.rotate_z(std::f64::consts::PI);
                    second.translate(nalgebra::Vector3::new(half, half, 0.0));
                }
            }
            first.merge(&second);
            first
        }
    };

    Some(mesh)
}

/// Distinguishing cross-section points used as probe anchors, in local
/// section space (meters). Shares the exact local conventions of
/// [`synthesize_section`], including the principal-axis rotation of angles.
pub fn section_probe_points(profile: &SectionProfile) -> SmallVec<[Point2<f64>; 8]> {
    let mut points = SmallVec::new();
    let family = match profile.family {
        Some(f) => f,
        None => return points,
    };

    let d = profile.depth * MM;
    let w = profile.width * MM;

    match family {
        SectionFamily::I | SectionFamily::C | SectionFamily::Box => {
            let hw = w / 2.0;
            let hd = d / 2.0;
            points.push(Point2::new(-hw, -hd));
            points.push(Point2::new(hw, -hd));
            points.push(Point2::new(hw, hd));
            points.push(Point2::new(-hw, hd));
        }
        SectionFamily::L => {
            let t = if profile.web_thickness > 0.0 {
                profile.web_thickness * MM
            } else {
                profile.flange_thickness * MM
            };
            let (xc, yc) = l_centroid(d, w, t);
            let theta = principal_axis_angle(d, w, t);
            let (sin, cos) = theta.sin_cos();
            for (x, y) in [(0.0, 0.0), (w, 0.0), (0.0, d)] {
                let (lx, ly) = (x - xc, y - yc);
                points.push(Point2::new(lx * cos - ly * sin, lx * sin + ly * cos));
            }
        }
        SectionFamily::Round => {
            let r = d / 2.0;
            for i in 0..RADIAL_POINTS {
                let theta = 2.0 * std::f64::consts::PI * (i as f64) / (RADIAL_POINTS as f64);
                points.push(Point2::new(r * theta.cos(), r * theta.sin()));
            }
        }
    }

    points
}
