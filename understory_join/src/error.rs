// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the join engine.

/// Contract violations reported by the join engine.
///
/// These are programmer errors: the engine is deterministic and in-memory, so none of them
/// is worth retrying.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// A [`ValueBox`](crate::ValueBox) was read as a type other than the one it stores.
    #[error("value box holds `{found}` but `{expected}` was requested")]
    TypeMismatch {
        /// Type name that was requested.
        expected: &'static str,
        /// Type name actually stored.
        found: &'static str,
    },
    /// A [`Document`](crate::Document) query ran without a root node.
    #[error("document has no root node")]
    NullRoot,
    /// A forwarding join reached a group whose parent carries no bound value.
    #[error("group parent has no bound value to forward into the join")]
    UnboundParent,
}
