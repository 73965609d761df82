// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collision tester

use nalgebra::Point3;
use plantclash_geometry::{Ray, Solid};

/// Fire probes in order against a solid; the first probe that hits decides
/// the contact point (its nearest intersection) and the rest are skipped.
pub fn first_hit(probes: &[Ray], solid: &Solid) -> Option<Point3<f64>> {
    probes
        .iter()
        .find_map(|ray| solid.raycast(ray).map(|hit| hit.position))
}
