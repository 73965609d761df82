// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical clash entities and clash records
//!
//! Every structural/piping/process element is normalized into a
//! [`ClashEntity`]: an identity triple, a centerline and exactly one shape
//! payload. The payload is a sum type, so "exactly one shape is set" holds
//! by construction.

use crate::equipment::EquipmentSpec;
use crate::section::{PipeSection, FlareShell, SectionProfile};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Origin role of an entity within its model. Drives the beam-fitting
/// elevation fix-up during probing and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Column,
    Beam,
    Cantilever,
    HorizontalBracing,
    VerticalBracing,
    KneeBracing,
    Staircase,
    RackPipe,
    FreePipe,
    FlareSegment,
    Equipment,
}

impl MemberRole {
    /// Roles whose solids are modeled from top-of-steel and need the
    /// elevation fix-up.
    pub fn is_beam_like(&self) -> bool {
        matches!(
            self,
            MemberRole::Beam | MemberRole::Cantilever | MemberRole::HorizontalBracing
        )
    }
}

/// The single shape payload of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapePayload {
    Profile(SectionProfile),
    Pipe(PipeSection),
    Flare(FlareShell),
    Equipment(EquipmentSpec),
}

impl ShapePayload {
    pub fn is_profile(&self) -> bool {
        matches!(self, ShapePayload::Profile(_))
    }

    pub fn is_flare(&self) -> bool {
        matches!(self, ShapePayload::Flare(_))
    }
}

/// Canonical clash element: identity, centerline and shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashEntity {
    pub project: String,
    pub model: String,
    pub name: String,
    /// Centerline start in the global frame (meters)
    pub start: Point3<f64>,
    /// Centerline end; equals `start` for point-like equipment
    pub end: Point3<f64>,
    /// Cross-section roll about the centerline axis (degrees)
    #[serde(default)]
    pub orientation_deg: f64,
    pub role: MemberRole,
    pub shape: ShapePayload,
}

impl ClashEntity {
    /// Centerline length (meters). Zero for point-like entities.
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// Identity of one side of a clash record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashElementRef {
    pub project: String,
    pub model: String,
    pub name: String,
}

impl From<&ClashEntity> for ClashElementRef {
    fn from(entity: &ClashEntity) -> Self {
        Self {
            project: entity.project.clone(),
            model: entity.model.clone(),
            name: entity.name.clone(),
        }
    }
}

/// One candidate interference. Created by the aggregator, never mutated by
/// the engine; `remark` and `ignore` belong to the downstream reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashRecord {
    /// Sequential id starting at 1
    pub id: u32,
    /// First probe hit point (global frame, meters)
    pub pos: Point3<f64>,
    pub elements: [ClashElementRef; 2],
    /// Free text, populated later by a human
    pub remark: String,
    /// Defaults to true; a reviewer clears it explicitly
    pub ignore: bool,
}

impl ClashRecord {
    pub fn new(id: u32, pos: Point3<f64>, current: &ClashEntity, other: &ClashEntity) -> Self {
        Self {
            id,
            pos,
            elements: [current.into(), other.into()],
            remark: String::new(),
            ignore: true,
        }
    }
}
