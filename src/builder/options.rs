// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

use crate::types::DEFAULT_MAX_JOIN_DEPTH;

/// Order of the merged argument list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentOrder {
    /// Order in which names first appear across the resolvers.
    #[default]
    FirstOccurrence,
    Alphabetical,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BuilderOptions {
    /// Levels of generic parameters reconciled by a join before the
    /// parameter is left open (`?`).
    pub max_join_depth: usize,
    pub argument_order: ArgumentOrder,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            max_join_depth: DEFAULT_MAX_JOIN_DEPTH,
            argument_order: ArgumentOrder::FirstOccurrence,
        }
    }
}
