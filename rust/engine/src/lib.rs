// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PlantClash Engine
//!
//! Clash detection for plant layouts. A [`ClashRequest`] carries the
//! project model and optional process diagram; [`run`] normalizes every
//! element into clash entities, synthesizes their solids and fires
//! ray probes across all ordered entity pairs, returning the candidate
//! interferences as [`ClashRecord`]s.
//!
//! The engine is a pure function of its input: no state survives a run,
//! and a run never fails — elements that cannot produce geometry simply
//! drop out of consideration.

pub mod collide;
pub mod detect;
pub mod normalize;
pub mod probes;

use plantclash_core::{ClashRecord, ProcessDiagram, Project};
use serde::{Deserialize, Serialize};

pub use collide::first_hit;
pub use detect::{detect, excluded};
pub use normalize::normalize;
pub use probes::probes_for;

/// Input payload of a detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashRequest {
    pub project: Project,
    #[serde(default)]
    pub process: Option<ProcessDiagram>,
}

/// Output payload of a detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashResponse {
    pub records: Vec<ClashRecord>,
}

/// Run clash detection to completion for one request.
pub fn run(request: &ClashRequest) -> ClashResponse {
    ClashResponse {
        records: detect(&request.project, request.process.as_ref()),
    }
}
