// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element normalizer
//!
//! Flattens the project model and process diagram into the canonical
//! [`ClashEntity`] list. All model-local coordinates are mapped into the
//! global frame here; downstream stages never see a model origin or
//! direction again.
//!
//! Structural members come out as `Profile` entities. Horizontal bracings
//! have no endpoints of their own and are resolved against the beams and
//! cantilevers they anchor to; beams and cantilevers meeting an I- or
//! C-shaped column are foreshortened so the solid stops at the column
//! face instead of its centerline.

use nalgebra::{Point3, Vector3};
use plantclash_core::{
    BracingAnchor, ClashEntity, Flare, FreePipe, Member, MemberRole, ModelKind, PipeSection,
    ProcessDiagram, Project, RackPipe, SectionFamily, SectionProfile, ShapePayload,
    StructuralModel,
};
use plantclash_geometry::fitting_offset;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Plan-coincidence tolerance for matching a member endpoint to a column
/// position (meters).
const PLAN_TOL: f64 = 1e-3;

/// Flatten a project (plus optional process diagram) into clash entities.
pub fn normalize(project: &Project, process: Option<&ProcessDiagram>) -> Vec<ClashEntity> {
    let mut entities = Vec::new();

    for model in &project.models {
        normalize_model(&mut entities, &project.name, model);
    }
    for linked in &project.linked_projects {
        for model in &linked.models {
            normalize_model(&mut entities, &linked.name, model);
        }
        for flare in &linked.flares {
            normalize_flare(&mut entities, &linked.name, flare);
        }
        for pipe in &linked.free_pipes {
            normalize_free_pipe(&mut entities, &linked.name, pipe);
        }
    }
    for flare in &project.flares {
        normalize_flare(&mut entities, &project.name, flare);
    }
    for pipe in &project.free_pipes {
        normalize_free_pipe(&mut entities, &project.name, pipe);
    }
    if let Some(process) = process {
        normalize_process(&mut entities, &project.name, process);
    }

    debug!(count = entities.len(), "normalized entities");
    entities
}

fn profile_entity(
    project: &str,
    model: &StructuralModel,
    name: &str,
    start: Point3<f64>,
    end: Point3<f64>,
    section: &SectionProfile,
    orientation_deg: f64,
    role: MemberRole,
) -> ClashEntity {
    let mut section = section.clone();
    section.sanitize();
    ClashEntity {
        project: project.to_string(),
        model: model.name.clone(),
        name: name.to_string(),
        start: model.direction.to_global(&model.origin, &start),
        end: model.direction.to_global(&model.origin, &end),
        orientation_deg,
        role,
        shape: ShapePayload::Profile(section),
    }
}

fn normalize_model(out: &mut Vec<ClashEntity>, project: &str, model: &StructuralModel) {
    // In frames, columns with an I or C section trim the beams framing
    // into them; rack members keep their stored endpoints
    let fitting_columns: Vec<&Member> = match model.kind {
        ModelKind::PipeRack => Vec::new(),
        ModelKind::OpenFrame | ModelKind::FactoryShed => model
            .columns
            .iter()
            .filter(|c| {
                matches!(
                    c.section.family,
                    Some(SectionFamily::I) | Some(SectionFamily::C)
                )
            })
            .collect(),
    };

    for column in &model.columns {
        out.push(profile_entity(
            project,
            model,
            &column.name,
            column.start,
            column.end,
            &column.section,
            column.orientation_deg,
            MemberRole::Column,
        ));
    }

    for (members, role) in [
        (&model.beams, MemberRole::Beam),
        (&model.cantilevers, MemberRole::Cantilever),
    ] {
        for member in members {
            let (start, end) = fit_to_columns(member, &fitting_columns);
            out.push(profile_entity(
                project,
                model,
                &member.name,
                start,
                end,
                &member.section,
                member.orientation_deg,
                role,
            ));
        }
    }

    for member in &model.v_bracings {
        out.push(profile_entity(
            project,
            model,
            &member.name,
            member.start,
            member.end,
            &member.section,
            member.orientation_deg,
            MemberRole::VerticalBracing,
        ));
    }

    // Index beams and cantilevers once; bracing anchors resolve against it
    // by name
    let anchor_index: FxHashMap<&str, &Member> = model
        .beams
        .iter()
        .chain(model.cantilevers.iter())
        .map(|m| (m.name.as_str(), m))
        .collect();

    for bracing in &model.h_bracings {
        let (Some(start), Some(end)) = (
            resolve_anchor(&bracing.start_anchor, &anchor_index),
            resolve_anchor(&bracing.end_anchor, &anchor_index),
        ) else {
            debug!(bracing = %bracing.name, "unresolvable anchor, skipped");
            continue;
        };
        out.push(profile_entity(
            project,
            model,
            &bracing.name,
            start,
            end,
            &bracing.section,
            bracing.orientation_deg,
            MemberRole::HorizontalBracing,
        ));
    }

    match model.kind {
        ModelKind::PipeRack => {
            for pipe in &model.pipes {
                out.push(rack_pipe_entity(project, model, pipe));
            }
        }
        ModelKind::OpenFrame | ModelKind::FactoryShed => {
            for member in &model.knee_bracings {
                out.push(profile_entity(
                    project,
                    model,
                    &member.name,
                    member.start,
                    member.end,
                    &member.section,
                    member.orientation_deg,
                    MemberRole::KneeBracing,
                ));
            }
            for member in &model.staircases {
                out.push(profile_entity(
                    project,
                    model,
                    &member.name,
                    member.start,
                    member.end,
                    &member.section,
                    member.orientation_deg,
                    MemberRole::Staircase,
                ));
            }
        }
    }
}

/// Endpoint of a horizontal-bracing anchor: a point `offset` meters along
/// the named member's axis from its start. `None` when the name does not
/// resolve or the member is degenerate.
fn resolve_anchor(
    anchor: &BracingAnchor,
    index: &FxHashMap<&str, &Member>,
) -> Option<Point3<f64>> {
    let member = index.get(anchor.member.as_str())?;
    let axis = member.end - member.start;
    let len = axis.norm();
    if len < 1e-12 {
        return None;
    }
    Some(member.start + axis / len * anchor.offset)
}

/// Foreshorten beam/cantilever endpoints that land on a column centerline,
/// so the member stops at the column face.
fn fit_to_columns(member: &Member, columns: &[&Member]) -> (Point3<f64>, Point3<f64>) {
    let mut start = member.start;
    let mut end = member.end;
    let axis = end - start;
    let len = axis.norm();
    if len < PLAN_TOL {
        return (start, end);
    }
    let dir = axis / len;

    for column in columns {
        let offset = fitting_offset(&column.section, member.orientation_deg);
        if offset <= 0.0 {
            continue;
        }
        if plan_coincident(&start, &column.start) {
            start += dir * offset;
        }
        if plan_coincident(&end, &column.start) {
            end -= dir * offset;
        }
    }
    (start, end)
}

fn plan_coincident(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a.x - b.x).abs() < PLAN_TOL && (a.z - b.z).abs() < PLAN_TOL
}

fn rack_pipe_entity(project: &str, model: &StructuralModel, pipe: &RackPipe) -> ClashEntity {
    // Endpoints are optional: a pipe the routing never placed degenerates
    // to a point at the model origin and synthesizes nothing
    let start = pipe.start.unwrap_or_else(Point3::origin);
    let end = pipe.end.unwrap_or_else(Point3::origin);
    ClashEntity {
        project: project.to_string(),
        model: model.name.clone(),
        name: pipe.name.clone(),
        start: model.direction.to_global(&model.origin, &start),
        end: model.direction.to_global(&model.origin, &end),
        orientation_deg: 0.0,
        role: MemberRole::RackPipe,
        shape: ShapePayload::Pipe(sanitize_pipe(&pipe.section)),
    }
}

fn normalize_flare(out: &mut Vec<ClashEntity>, project: &str, flare: &Flare) {
    for (i, segment) in flare.segments.iter().enumerate() {
        let lift = |elevation: f64| flare.position + Vector3::new(0.0, elevation, 0.0);
        out.push(ClashEntity {
            project: project.to_string(),
            model: flare.name.clone(),
            name: format!("{}/{}", flare.name, i + 1),
            start: lift(segment.bottom_elevation),
            end: lift(segment.top_elevation),
            orientation_deg: 0.0,
            role: MemberRole::FlareSegment,
            shape: ShapePayload::Flare(*segment),
        });
    }
}

fn normalize_free_pipe(out: &mut Vec<ClashEntity>, project: &str, pipe: &FreePipe) {
    out.push(ClashEntity {
        project: project.to_string(),
        model: String::new(),
        name: pipe.name.clone(),
        start: pipe.start,
        end: pipe.end,
        orientation_deg: 0.0,
        role: MemberRole::FreePipe,
        shape: ShapePayload::Pipe(sanitize_pipe(&pipe.effective_section())),
    });
}

/// Re-clamp a pipe section that may have arrived with negative dimensions.
fn sanitize_pipe(section: &PipeSection) -> PipeSection {
    PipeSection::new(section.outside_diameter, section.wall_thickness)
}

fn normalize_process(out: &mut Vec<ClashEntity>, project: &str, process: &ProcessDiagram) {
    // Hash-map order is arbitrary; sort for a deterministic entity list
    let mut names: Vec<&String> = process.equipment.keys().collect();
    names.sort();

    for name in names {
        let spec = &process.equipment[name];
        out.push(ClashEntity {
            project: project.to_string(),
            model: String::new(),
            name: name.clone(),
            start: spec.position,
            end: spec.position,
            orientation_deg: 0.0,
            role: MemberRole::Equipment,
            shape: ShapePayload::Equipment(spec.clone()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantclash_core::{Direction, HorizontalBracing, PipeSection};

    fn member(name: &str, start: Point3<f64>, end: Point3<f64>) -> Member {
        Member {
            name: name.into(),
            start,
            end,
            section: SectionProfile::new(SectionFamily::I, 300.0, 150.0, 10.7, 7.1),
            orientation_deg: 0.0,
        }
    }

    fn open_frame(name: &str) -> StructuralModel {
        StructuralModel {
            name: name.into(),
            kind: ModelKind::OpenFrame,
            origin: Point3::origin(),
            direction: Direction::PlusX,
            columns: Vec::new(),
            beams: Vec::new(),
            cantilevers: Vec::new(),
            h_bracings: Vec::new(),
            v_bracings: Vec::new(),
            knee_bracings: Vec::new(),
            staircases: Vec::new(),
            pipes: Vec::new(),
        }
    }

    fn project_with(model: StructuralModel) -> Project {
        let mut project = Project::empty("U-100");
        project.models.push(model);
        project
    }

    #[test]
    fn members_are_mapped_through_the_direction_table() {
        let mut model = open_frame("OF-1");
        model.origin = Point3::new(100.0, 0.0, 50.0);
        model.direction = Direction::PlusZ;
        model.beams.push(member(
            "B-1",
            Point3::new(0.0, 6.0, 0.0),
            Point3::new(4.0, 6.0, 0.0),
        ));

        let entities = normalize(&project_with(model), None);
        assert_eq!(entities.len(), 1);
        // +Z: (x, z) -> (-z, x)
        assert_eq!(entities[0].start, Point3::new(100.0, 6.0, 50.0));
        assert_eq!(entities[0].end, Point3::new(100.0, 6.0, 54.0));
    }

    #[test]
    fn bracing_anchors_resolve_to_points_on_their_members() {
        let mut model = open_frame("OF-1");
        model.beams.push(member(
            "B-1",
            Point3::new(0.0, 6.0, 0.0),
            Point3::new(8.0, 6.0, 0.0),
        ));
        model.beams.push(member(
            "B-2",
            Point3::new(0.0, 6.0, 4.0),
            Point3::new(8.0, 6.0, 4.0),
        ));
        model.h_bracings.push(HorizontalBracing {
            name: "HB-1".into(),
            start_anchor: BracingAnchor {
                member: "B-1".into(),
                offset: 2.0,
            },
            end_anchor: BracingAnchor {
                member: "B-2".into(),
                offset: 6.0,
            },
            section: SectionProfile::new(SectionFamily::L, 75.0, 75.0, 0.0, 6.0),
            orientation_deg: 0.0,
        });

        let entities = normalize(&project_with(model), None);
        let bracing = entities
            .iter()
            .find(|e| e.role == MemberRole::HorizontalBracing)
            .unwrap();
        assert_eq!(bracing.start, Point3::new(2.0, 6.0, 0.0));
        assert_eq!(bracing.end, Point3::new(6.0, 6.0, 4.0));
    }

    #[test]
    fn bracing_with_unknown_anchor_is_skipped() {
        let mut model = open_frame("OF-1");
        model.beams.push(member(
            "B-1",
            Point3::new(0.0, 6.0, 0.0),
            Point3::new(8.0, 6.0, 0.0),
        ));
        model.h_bracings.push(HorizontalBracing {
            name: "HB-1".into(),
            start_anchor: BracingAnchor {
                member: "B-1".into(),
                offset: 2.0,
            },
            end_anchor: BracingAnchor {
                member: "B-99".into(),
                offset: 0.0,
            },
            section: SectionProfile::default(),
            orientation_deg: 0.0,
        });

        let entities = normalize(&project_with(model), None);
        assert!(entities
            .iter()
            .all(|e| e.role != MemberRole::HorizontalBracing));
    }

    #[test]
    fn beam_is_foreshortened_at_an_i_column() {
        let mut model = open_frame("OF-1");
        // Column with 150 mm flange width at the beam's start
        model.columns.push(member(
            "C-1",
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 6.0, 0.0),
        ));
        model.beams.push(member(
            "B-1",
            Point3::new(0.0, 6.0, 0.0),
            Point3::new(5.0, 6.0, 0.0),
        ));

        let entities = normalize(&project_with(model), None);
        let beam = entities
            .iter()
            .find(|e| e.role == MemberRole::Beam)
            .unwrap();
        // Orientation 0: offset = width / 2 = 75 mm
        assert!((beam.start.x - 0.075).abs() < 1e-9);
        assert!((beam.end.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn rack_beam_is_not_foreshortened() {
        let mut model = open_frame("PR-1");
        model.kind = ModelKind::PipeRack;
        model.columns.push(member(
            "C-1",
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 6.0, 0.0),
        ));
        model.beams.push(member(
            "B-1",
            Point3::new(0.0, 6.0, 0.0),
            Point3::new(5.0, 6.0, 0.0),
        ));

        let entities = normalize(&project_with(model), None);
        let beam = entities
            .iter()
            .find(|e| e.role == MemberRole::Beam)
            .unwrap();
        // Column fitting applies to frames only; rack members keep their
        // stored endpoints
        assert_eq!(beam.start, Point3::new(0.0, 6.0, 0.0));
        assert_eq!(beam.end, Point3::new(5.0, 6.0, 0.0));
    }

    #[test]
    fn rack_pipe_keeps_endpoints() {
        let mut model = open_frame("PR-1");
        model.kind = ModelKind::PipeRack;
        model.pipes.push(RackPipe {
            name: "P-101".into(),
            start: Some(Point3::new(0.0, 4.0, 1.0)),
            end: Some(Point3::new(12.0, 4.0, 1.0)),
            section: PipeSection::new(219.1, 8.18),
        });
        model.pipes.push(RackPipe {
            name: "P-102".into(),
            start: None,
            end: None,
            section: PipeSection::new(219.1, 8.18),
        });

        let entities = normalize(&project_with(model), None);
        let placed = entities.iter().find(|e| e.name == "P-101").unwrap();
        assert_eq!(placed.start, Point3::new(0.0, 4.0, 1.0));
        assert_eq!(placed.end, Point3::new(12.0, 4.0, 1.0));

        let unplaced = entities.iter().find(|e| e.name == "P-102").unwrap();
        assert_eq!(unplaced.start, unplaced.end);
    }

    #[test]
    fn linked_projects_keep_their_own_name() {
        let mut project = Project::empty("U-100");
        let mut linked_model = open_frame("OF-9");
        linked_model.beams.push(member(
            "B-1",
            Point3::origin(),
            Point3::new(4.0, 0.0, 0.0),
        ));
        project
            .linked_projects
            .push(plantclash_core::LinkedProject {
                name: "U-200".into(),
                models: vec![linked_model],
                flares: Vec::new(),
                free_pipes: Vec::new(),
            });

        let entities = normalize(&project, None);
        assert_eq!(entities[0].project, "U-200");
        assert_eq!(entities[0].model, "OF-9");
    }

    #[test]
    fn flare_segments_stack_vertically() {
        let mut project = Project::empty("U-100");
        project.flares.push(Flare {
            name: "FL-1".into(),
            position: Point3::new(50.0, 0.0, 50.0),
            segments: vec![
                plantclash_core::FlareShell {
                    bottom_elevation: 0.0,
                    top_elevation: 20.0,
                    bottom_internal_diameter: 3.0,
                    top_internal_diameter: 2.0,
                    thickness: 0.012,
                },
                plantclash_core::FlareShell {
                    bottom_elevation: 20.0,
                    top_elevation: 45.0,
                    bottom_internal_diameter: 2.0,
                    top_internal_diameter: 1.2,
                    thickness: 0.012,
                },
            ],
        });

        let entities = normalize(&project, None);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].start, Point3::new(50.0, 0.0, 50.0));
        assert_eq!(entities[0].end, Point3::new(50.0, 20.0, 50.0));
        assert_eq!(entities[1].start, Point3::new(50.0, 20.0, 50.0));
        assert_eq!(entities[1].name, "FL-1/2");
    }

    #[test]
    fn process_equipment_is_sorted_by_name() {
        use plantclash_core::{EquipmentKind, EquipmentSpec};

        let mut process = ProcessDiagram::default();
        process.equipment.insert(
            "T-200".into(),
            EquipmentSpec::new(EquipmentKind::Tank, Point3::new(5.0, 0.0, 0.0)),
        );
        process.equipment.insert(
            "P-100".into(),
            EquipmentSpec::new(EquipmentKind::Pump, Point3::origin()),
        );

        let project = Project::empty("U-100");
        let entities = normalize(&project, Some(&process));
        assert_eq!(entities[0].name, "P-100");
        assert_eq!(entities[1].name, "T-200");
        assert_eq!(entities[0].start, entities[0].end);
    }
}
