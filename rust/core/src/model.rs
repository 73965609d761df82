// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project model input types
//!
//! The shapes the caller hands to the engine: structural models with their
//! member collections, flare stacks, free pipes and linked read-only
//! sub-projects. Every optional collection defaults to empty so partial
//! models stay clash-testable.

use crate::equipment::EquipmentSpec;
use crate::section::{PipeSection, FlareShell, SectionProfile};
use nalgebra::Point3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Serde default for points: the global origin.
pub(crate) fn origin() -> Point3<f64> {
    Point3::origin()
}

/// Structural model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "Pipe Rack")]
    PipeRack,
    #[serde(rename = "Open Frame")]
    OpenFrame,
    #[serde(rename = "Factory Shed")]
    FactoryShed,
}

/// Cardinal orientation of a structural model in the global frame.
///
/// Maps a model-local (x, z) plan position into the global plan per a fixed
/// table; elevation (y) always passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+X")]
    PlusX,
    #[serde(rename = "-X")]
    MinusX,
    #[serde(rename = "+Z")]
    PlusZ,
    #[serde(rename = "-Z")]
    MinusZ,
}

impl Direction {
    /// Transform a model-local point into the global frame given the model
    /// origin.
    pub fn to_global(&self, origin: &Point3<f64>, local: &Point3<f64>) -> Point3<f64> {
        let (gx, gz) = match self {
            Direction::PlusX => (local.x, local.z),
            Direction::MinusX => (-local.x, -local.z),
            Direction::PlusZ => (-local.z, local.x),
            Direction::MinusZ => (local.z, -local.x),
        };
        Point3::new(origin.x + gx, origin.y + local.y, origin.z + gz)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::PlusX
    }
}

/// A straight structural member (column, beam, cantilever, bracing, stair
/// stringer) in model-local coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default = "origin")]
    pub start: Point3<f64>,
    #[serde(default = "origin")]
    pub end: Point3<f64>,
    #[serde(default)]
    pub section: SectionProfile,
    /// Cross-section roll about the member axis (degrees)
    #[serde(default)]
    pub orientation_deg: f64,
}

/// Anchor of one horizontal-bracing end: a named beam/cantilever and a
/// distance along that member's axis from its start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracingAnchor {
    pub member: String,
    /// Offset along the anchor member's local axis (meters)
    #[serde(default)]
    pub offset: f64,
}

/// Horizontal bracing: endpoints derived from the members it ties together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizontalBracing {
    pub name: String,
    pub start_anchor: BracingAnchor,
    pub end_anchor: BracingAnchor,
    #[serde(default)]
    pub section: SectionProfile,
    #[serde(default)]
    pub orientation_deg: f64,
}

/// A pipe run belonging to a pipe-rack model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackPipe {
    pub name: String,
    /// Local endpoints when the rack routing has placed the pipe
    #[serde(default)]
    pub start: Option<Point3<f64>>,
    #[serde(default)]
    pub end: Option<Point3<f64>>,
    #[serde(default)]
    pub section: PipeSection,
}

/// One structural model (pipe rack, open frame, factory shed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralModel {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    /// Base position of the model in the global frame
    #[serde(default = "origin")]
    pub origin: Point3<f64>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub columns: Vec<Member>,
    #[serde(default)]
    pub beams: Vec<Member>,
    #[serde(default)]
    pub cantilevers: Vec<Member>,
    #[serde(default)]
    pub h_bracings: Vec<HorizontalBracing>,
    #[serde(default)]
    pub v_bracings: Vec<Member>,
    #[serde(default)]
    pub knee_bracings: Vec<Member>,
    #[serde(default)]
    pub staircases: Vec<Member>,
    #[serde(default)]
    pub pipes: Vec<RackPipe>,
}

/// Flare stack: base position plus a run of conical shell segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flare {
    pub name: String,
    #[serde(default = "origin")]
    pub position: Point3<f64>,
    #[serde(default)]
    pub segments: Vec<FlareShell>,
}

/// A pipe not attached to any structural model, in global coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreePipe {
    pub name: String,
    #[serde(default = "origin")]
    pub start: Point3<f64>,
    #[serde(default = "origin")]
    pub end: Point3<f64>,
    /// Assigned cross-section, if any
    #[serde(default)]
    pub section: Option<PipeSection>,
    /// Raw fallback dimensions used when no section is assigned (mm)
    #[serde(default)]
    pub outside_diameter: Option<f64>,
    #[serde(default)]
    pub wall_thickness: Option<f64>,
}

impl FreePipe {
    /// Effective cross-section: the assigned one, else the raw OD/WT fields,
    /// else a zero section (which never clashes).
    pub fn effective_section(&self) -> PipeSection {
        if let Some(section) = self.section {
            return section;
        }
        PipeSection::new(
            self.outside_diameter.unwrap_or(0.0),
            self.wall_thickness.unwrap_or(0.0),
        )
    }
}

/// A read-only linked sub-project contributing additional entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedProject {
    pub name: String,
    #[serde(default)]
    pub models: Vec<StructuralModel>,
    #[serde(default)]
    pub flares: Vec<Flare>,
    #[serde(default)]
    pub free_pipes: Vec<FreePipe>,
}

/// The complete project model handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub models: Vec<StructuralModel>,
    #[serde(default)]
    pub linked_projects: Vec<LinkedProject>,
    #[serde(default)]
    pub flares: Vec<Flare>,
    #[serde(default)]
    pub free_pipes: Vec<FreePipe>,
}

impl Project {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
            linked_projects: Vec::new(),
            flares: Vec::new(),
            free_pipes: Vec::new(),
        }
    }
}

/// Process diagram: named equipment elements.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProcessDiagram {
    #[serde(default)]
    pub equipment: FxHashMap<String, EquipmentSpec>,
}
