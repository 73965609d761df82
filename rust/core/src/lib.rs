// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PlantClash Core
//!
//! Data model for the plant clash-detection engine: project input types,
//! cross-section descriptors, the canonical clash entity and the clash
//! record. Loose string tags (section families, combination rules,
//! equipment types) are resolved into closed enums at this boundary.

pub mod entity;
pub mod equipment;
pub mod error;
pub mod model;
pub mod section;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use entity::{ClashElementRef, ClashEntity, ClashRecord, MemberRole, ShapePayload};
pub use equipment::{EquipmentKind, EquipmentParams, EquipmentSpec};
pub use error::{Error, Result};
pub use model::{
    BracingAnchor, Direction, Flare, FreePipe, HorizontalBracing, LinkedProject, Member,
    ModelKind, ProcessDiagram, Project, RackPipe, StructuralModel,
};
pub use section::{
    Combined, CombinedRule, CoverPlates, FlareShell, PipeSection, Plate, SectionFamily,
    SectionProfile,
};
