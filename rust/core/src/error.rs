// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when resolving loose boundary tags
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown section family tag: {0}")]
    UnknownSectionFamily(String),

    #[error("Unknown combination rule: {0}")]
    UnknownCombinedRule(String),

    #[error("Unknown equipment type: {0}")]
    UnknownEquipmentKind(String),
}
