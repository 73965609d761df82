// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clash aggregator
//!
//! Runs every ordered entity pair through the exclusion filter and the
//! probe/collision pipeline and collects [`ClashRecord`]s. Pairs are
//! ordered, so a contact between A and B may produce two records, one from
//! each side's probes; reviewers expect both perspectives.
//!
//! No spatial broad-phase: every pair is considered. The per-solid bounding
//! volumes reject distant pairs cheaply during the cast itself.

use nalgebra::Vector3;
use plantclash_core::{ClashEntity, ClashRecord, ProcessDiagram, Project, ShapePayload};
use plantclash_geometry::{fitting_offset, synthesize_entity, Solid};
use tracing::{debug, info_span, trace};

use crate::collide::first_hit;
use crate::normalize::normalize;
use crate::probes::probes_for;

/// Detect clashes across a project and optional process diagram.
pub fn detect(project: &Project, process: Option<&ProcessDiagram>) -> Vec<ClashRecord> {
    let span = info_span!("clash_detection", project = %project.name);
    let _enter = span.enter();

    let entities = normalize(project, process);
    let solids = synthesize_all(&entities);

    let mut records = Vec::new();
    for (i, current) in entities.iter().enumerate() {
        let probes = probes_for(current, solids[i].as_ref());
        if probes.is_empty() {
            continue;
        }

        for (j, other) in entities.iter().enumerate() {
            if i == j || excluded(current, other) {
                continue;
            }
            let Some(solid) = solids[j].as_ref() else {
                continue;
            };
            if let Some(pos) = first_hit(&probes, solid) {
                trace!(current = %current.name, other = %other.name, "hit");
                records.push(ClashRecord::new(
                    records.len() as u32 + 1,
                    pos,
                    current,
                    other,
                ));
            }
        }
    }

    debug!(records = records.len(), "clash detection complete");
    records
}

/// Synthesize every entity's solid once, indexed by entity position.
/// Beam-like solids get the top-of-steel elevation fix-up baked in so both
/// sides of a pair see the same geometry.
fn synthesize_all(entities: &[ClashEntity]) -> Vec<Option<Solid>> {
    entities
        .iter()
        .map(|entity| {
            let mut solid = synthesize_entity(entity)?;
            let drop = beam_drop(entity);
            if drop > 0.0 {
                solid.translate(Vector3::new(0.0, -drop, 0.0));
            }
            Some(solid)
        })
        .collect()
}

fn beam_drop(entity: &ClashEntity) -> f64 {
    if !entity.role.is_beam_like() {
        return 0.0;
    }
    match &entity.shape {
        ShapePayload::Profile(section) => fitting_offset(section, entity.orientation_deg),
        _ => 0.0,
    }
}

/// Pair exclusion: entities of the same model never clash when they share a
/// name or are both profiles or both flare segments. Everything across
/// model or project boundaries stays in play.
pub fn excluded(a: &ClashEntity, b: &ClashEntity) -> bool {
    a.project == b.project
        && a.model == b.model
        && (a.name == b.name
            || (a.shape.is_profile() && b.shape.is_profile())
            || (a.shape.is_flare() && b.shape.is_flare()))
}
