use thiserror::Error;

use crate::{
    ir::{TypeId, ValueId},
    location::MemoryLocation,
    path::AccessPath,
};

/// The generic Error type covering every failure this library can surface.
///
/// The algebra is a pure, deterministic analysis, so its error taxonomy is
/// short and sharp:
///
/// - **Unrepresentable locations are not errors.** Operands whose base or
///   path cannot be statically derived are silently skipped by enumeration;
///   no variant exists for them.
/// - **Invariant violations are caller or oracle bugs.** Every variant here
///   indicates that a precondition was broken upstream: a value map seeded
///   incompletely, an aggregation handed the wrong child set, an oracle
///   contradicting its own shape answers. Pass drivers must abort analysis
///   of the affected routine rather than keep a possibly-unsound result.
///
/// There are no retries and no partial-recovery variants by design.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Value reduction finished its leaf-to-root walk with more than one
    /// live map entry.
    ///
    /// Reduction over a well-formed input map always terminates with
    /// exactly one entry (the root location). Anything else means the map
    /// was not seeded with the root's complete leaf decomposition.
    #[error("value reduction finished with {remaining} live entries, expected exactly one")]
    ReductionIncomplete {
        /// Number of entries left in the drained map.
        remaining: usize,
    },

    /// A node's child location had no recorded value during reduction.
    ///
    /// The value map passed to reduction must cover the root's full leaf
    /// set; a missing child is a precondition violation, not a case that
    /// is silently handled.
    #[error("no value recorded for child location {0}")]
    MissingChildValue(MemoryLocation),

    /// An aggregation was requested with a child set that does not match
    /// the shape oracle's first-level decomposition of the target type.
    #[error("aggregate of {ty} expects {expected} children, got {actual}")]
    AggregateArity {
        /// The aggregate type being built.
        ty: TypeId,
        /// Child count the shape oracle reports for `ty`.
        expected: usize,
        /// Child count actually supplied.
        actual: usize,
    },

    /// The shape oracle reported no sub-node for a path that was derived
    /// from its own decomposition answers.
    #[error("type {ty} has no sub-node at path {path}")]
    ShapeMismatch {
        /// The type being projected.
        ty: TypeId,
        /// The path the oracle could not resolve.
        path: AccessPath,
    },

    /// An insertion point handed to the materializer is not in the
    /// routine's instruction stream.
    #[error("insertion point {0} is not in the instruction stream")]
    InvalidInsertionPoint(ValueId),
}

/// The result type used throughout this library.
pub type Result<T> = std::result::Result<T, Error>;
