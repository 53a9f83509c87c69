//! # mempath Prelude
//!
//! Convenient re-exports of the types and traits most callers touch.
//! Import this module once instead of spelling out individual paths when
//! driving the algebra from a pass.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all mempath operations
pub use crate::Error;

/// The result type used throughout mempath
pub use crate::Result;

// ================================================================================================
// Paths and Locations
// ================================================================================================

/// Access paths and the single projection steps they are made of
pub use crate::path::{AccessPath, ProjectionStep};

/// Memory locations and location sets
pub use crate::location::{LocationSet, MemoryLocation};

/// Partial values and value maps
pub use crate::value::{LocationValue, LocationValueMap};

/// The dense location intern table
pub use crate::vault::{AccessCounts, LocationVault};

// ================================================================================================
// Oracle Boundaries
// ================================================================================================

/// Type decomposition oracle and the table-driven implementation
pub use crate::shape::{ShapeTable, TypeShape, TypeShapeOracle};

/// Alias and escape oracles with their baseline implementations
pub use crate::alias::{
    AliasOracle, ConservativeEscapeOracle, EscapeOracle, StructuralAliasOracle,
};

// ================================================================================================
// IR Substrate and Materialization
// ================================================================================================

/// The minimal IR the algebra operates on
pub use crate::ir::{Routine, SourceTag, TypeId, Value, ValueDef, ValueId};

/// IR synthesis entry points
pub use crate::materialize::{build_access_chain, build_aggregate, AccessKind};
