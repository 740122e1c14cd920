// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::types::{ElementId, ElementKind};

/// Errors reported by a [`Surface`](crate::Surface).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The handle refers to an element that was removed.
    #[error("element {0} is stale")]
    StaleElement(ElementId),
    /// Children were requested under an element that cannot hold them.
    #[error("element {id} is a {kind:?} and cannot hold children")]
    NotAContainer {
        /// The would-be parent.
        id: ElementId,
        /// Its kind.
        kind: ElementKind,
    },
    /// The document root cannot be removed.
    #[error("the document root cannot be removed")]
    RemoveRoot,
}
