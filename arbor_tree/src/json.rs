// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON payload decoding.

use serde::Deserialize;

use crate::node::TreeNode;

/// Error returned when a payload is not a JSON tree record.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input is not valid JSON, or not an object of the expected shape.
    #[error("malformed tree payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Either a bare node record or the `{ "root": { ... } }` wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Wrapped { root: TreeNode },
    Bare(TreeNode),
}

impl From<Payload> for TreeNode {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Wrapped { root } | Payload::Bare(root) => root,
        }
    }
}

/// Decode a tree from a JSON string.
///
/// Accepts either a node record or an object whose `root` field is one.
///
/// ```rust
/// let tree = arbor_tree::from_json(r#"{"label":"x>0","data":1.0,"children":[{"value":3,"data":0.5}]}"#)?;
/// assert_eq!(tree.label(), Some("x>0"));
/// assert_eq!(tree.children()[0].display_text(), "3");
/// # Ok::<(), arbor_tree::DecodeError>(())
/// ```
pub fn from_json(input: &str) -> Result<TreeNode, DecodeError> {
    let payload: Payload = serde_json::from_str(input)?;
    Ok(payload.into())
}

/// Decode a tree from JSON bytes. See [`from_json`].
pub fn from_json_slice(input: &[u8]) -> Result<TreeNode, DecodeError> {
    let payload: Payload = serde_json::from_slice(input)?;
    Ok(payload.into())
}
