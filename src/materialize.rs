//! Emission of extraction chains and aggregations.
//!
//! This is the only module that creates IR. Everything else in the crate
//! reasons symbolically over `(base, path)` pairs; when a consumer finally
//! needs a concrete value or address, [`build_access_chain`] turns a pair
//! into one projection instruction per step, and [`build_aggregate`]
//! recombines a complete first-level child set into one aggregate value.
//!
//! The single most important behavior here is the no-op fast path: an empty
//! path returns the base unchanged, with zero instructions emitted. The
//! reduction engine is built around steering as many answers as possible
//! onto that path.
//!
//! Synthesized instructions are inserted immediately before the insertion
//! point and carry the source tag threaded in by the caller (normally the
//! insertion point's own tag), so reconstructed values stay attributable to
//! the access they answer.

use crate::{
    error::{Error, Result},
    ir::{Routine, SourceTag, TypeId, ValueDef, ValueId},
    path::AccessPath,
    shape::TypeShapeOracle,
};

/// Whether an access chain walks addresses or extracts values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AccessKind {
    /// Emit address projections; the result is the sub-region's address.
    Address,
    /// Emit value projections; the result is the extracted child value.
    Value,
}

/// Emits one projection instruction per step of `path`, threading each
/// step's result into the next, inserted immediately before `point`.
///
/// Returns `base` unchanged if `path` is empty.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if the oracle cannot type a step of the path.
/// - [`Error::InvalidInsertionPoint`] if `point` is not in the routine's
///   instruction stream.
pub fn build_access_chain(
    routine: &mut Routine,
    base: ValueId,
    path: &AccessPath,
    point: ValueId,
    kind: AccessKind,
    tag: SourceTag,
    oracle: &dyn TypeShapeOracle,
) -> Result<ValueId> {
    // No projections means the base already is the answer.
    if path.is_empty() {
        return Ok(base);
    }

    let mut current = base;
    for &step in path.steps() {
        let parent_ty = routine.ty(current);
        let step_path = AccessPath::from(step);
        let child_ty =
            oracle
                .subtype(parent_ty, &step_path)
                .ok_or_else(|| Error::ShapeMismatch {
                    ty: parent_ty,
                    path: step_path,
                })?;
        let def = match kind {
            AccessKind::Address => ValueDef::AddressProjection {
                base: current,
                step,
            },
            AccessKind::Value => ValueDef::ValueProjection {
                base: current,
                step,
            },
        };
        current = routine.insert_before(point, def, child_ty, tag)?;
    }
    Ok(current)
}

/// Emits one aggregation instruction combining `children` into a value of
/// `ty`, inserted immediately before `point`.
///
/// `children` must be exactly the first-level decomposition the shape
/// oracle reports for `ty`, in that order. A mismatched child set is a
/// programming error in the caller, not a recoverable runtime condition.
///
/// # Errors
///
/// - [`Error::AggregateArity`] if the child count does not match the shape
///   oracle's first-level decomposition of `ty`.
/// - [`Error::InvalidInsertionPoint`] if `point` is not in the routine's
///   instruction stream.
pub fn build_aggregate(
    routine: &mut Routine,
    ty: TypeId,
    children: &[ValueId],
    point: ValueId,
    tag: SourceTag,
    oracle: &dyn TypeShapeOracle,
) -> Result<ValueId> {
    let expected = oracle.child_paths(ty).len();
    if children.len() != expected {
        return Err(Error::AggregateArity {
            ty,
            expected,
            actual: children.len(),
        });
    }
    routine.insert_before(
        point,
        ValueDef::Aggregate {
            elements: children.to_vec(),
        },
        ty,
        tag,
    )
}
