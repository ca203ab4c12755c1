/*!
 * List Types
 * Node handles and list errors
 */

use crate::core::types::PoolPtr;
use crate::memory::MemoryError;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// List operation result
pub type ListResult<T> = Result<T, ListError>;

/// List errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ListError {
    #[error("Anchor node is not present in the list")]
    #[diagnostic(
        code(list::not_found),
        help("The node may have been deleted. Search for it again before inserting around it.")
    )]
    NotFound,

    #[error("Node with data {0} not found")]
    #[diagnostic(code(list::value_not_found))]
    ValueNotFound(u16),

    #[error("The list is empty")]
    #[diagnostic(code(list::empty))]
    EmptyList,

    #[error("Pool error: {0}")]
    #[diagnostic(code(list::memory))]
    Memory(#[from] MemoryError),
}

/// Handle to a node stored in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRef(PoolPtr);

impl NodeRef {
    #[inline]
    pub(crate) fn new(ptr: PoolPtr) -> Self {
        Self(ptr)
    }

    /// Pool region backing this node
    #[inline]
    pub fn ptr(self) -> PoolPtr {
        self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node@{}", self.0)
    }
}
