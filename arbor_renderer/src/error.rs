// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_scene::SceneError;
use arbor_tree::DecodeError;

/// Errors reported by [`TreeRenderer`](crate::TreeRenderer).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The surface rejected a mutation.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// The JSON payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The operation needs a tree, but nothing has been rendered yet.
    #[error("no tree has been rendered")]
    NotRendered,
}
