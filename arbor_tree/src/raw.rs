// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The loosely-typed record shape used on the wire.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::node::{Branch, Leaf, TreeNode};

/// `{ label, data, value, children }` as emitted by notebook hosts.
///
/// Every field is optional here; [`TreeNode`] decides the variant when the
/// record is converted.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    data: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<RawNode>>,
}

impl From<RawNode> for TreeNode {
    fn from(raw: RawNode) -> Self {
        let data = raw.data.unwrap_or(0.0);
        match raw.children {
            Some(children) if !children.is_empty() => Self::Branch(Branch {
                label: raw.label.unwrap_or_default(),
                data,
                children: children.into_iter().map(Self::from).collect(),
            }),
            _ => Self::Leaf(Leaf {
                value: raw.value,
                data,
            }),
        }
    }
}

impl From<TreeNode> for RawNode {
    fn from(node: TreeNode) -> Self {
        match node {
            TreeNode::Branch(b) => Self {
                label: Some(b.label),
                data: Some(b.data),
                value: None,
                children: Some(b.children.into_iter().map(Self::from).collect()),
            },
            TreeNode::Leaf(l) => Self {
                label: None,
                data: Some(l.data),
                value: l.value,
                children: None,
            },
        }
    }
}
