//! Minimal aggregate-typed IR substrate.
//!
//! The algebra does not own a compiler's real IR; it only needs value
//! identities, the handful of defining operations that matter to memory
//! tracking, and an instruction stream it can splice synthesized
//! instructions into. This module provides exactly that:
//!
//! - [`ValueId`], [`TypeId`], [`SourceTag`] - opaque dense identities
//! - [`ValueDef`] / [`Value`] - defining operations and value records
//! - [`Routine`] - value arena plus ordered instruction stream
//!
//! Embedders with a richer IR implement the oracle traits against their own
//! representation and mirror accesses into a [`Routine`], or replace this
//! module wholesale; nothing elsewhere in the crate looks inside values
//! beyond what [`ValueDef`] exposes.

mod routine;
mod value;

pub use routine::Routine;
pub use value::{SourceTag, TypeId, Value, ValueDef, ValueId};
