//! Partial values and the bottom-up value reduction engine.
//!
//! A [`LocationValue`] is a symbolic slice of an SSA value: "the sub-value
//! reached by applying `path` to `base`". Forwarding passes track one per
//! leaf location; when a whole aggregate must be reconstructed in front of
//! a load, [`LocationValue::reduce`] combines the per-leaf slices back into
//! a single value.
//!
//! Reduction walks the root location's projection tree leaves-to-root and
//! applies the cheapest applicable rule at each inner node:
//!
//! 1. A single child's value with a non-empty path collapses to its parent
//!    slice by dropping the last path step. No IR is emitted.
//! 2. Several children that are all slices of one shared base likewise
//!    collapse to the common parent slice. No IR is emitted.
//! 3. Otherwise the children's values are materialized and recombined with
//!    one aggregation instruction.
//!
//! Rules 1 and 2 are the point of the path representation: a value that was
//! only ever tracked piecewise, but whose pieces all came from the same
//! source, is forwarded as that source with zero new instructions.

use std::collections::BTreeMap;
use std::fmt;

use crate::{
    error::{Error, Result},
    ir::{Routine, ValueId},
    location::MemoryLocation,
    materialize::{build_access_chain, build_aggregate, AccessKind},
    path::AccessPath,
    shape::TypeShapeOracle,
};

/// Values keyed by the location they were written to or read from, ordered
/// for deterministic iteration.
pub type LocationValueMap = BTreeMap<MemoryLocation, LocationValue>;

/// A symbolic sub-value: a defining SSA value plus the projection path
/// selecting a slice of it.
///
/// An empty path means the value is *materialized*: `base` itself is the
/// answer and no extraction is needed to use it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationValue {
    base: ValueId,
    path: AccessPath,
}

impl LocationValue {
    /// Creates a value slice from a base value and path.
    #[must_use]
    pub const fn new(base: ValueId, path: AccessPath) -> Self {
        Self { base, path }
    }

    /// Creates the materialized value `base` itself.
    #[must_use]
    pub const fn whole(base: ValueId) -> Self {
        Self {
            base,
            path: AccessPath::empty(),
        }
    }

    /// Returns the defining SSA value.
    #[must_use]
    pub const fn base(&self) -> ValueId {
        self.base
    }

    /// Returns the projection path selecting this slice.
    #[must_use]
    pub const fn path(&self) -> &AccessPath {
        &self.path
    }

    /// Returns `true` if the slice is the base value itself and can be used
    /// without emitting extraction instructions.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns the slice one level up, or `None` if this value is already
    /// materialized.
    #[must_use]
    pub fn strip_last_projection(&self) -> Option<Self> {
        Some(Self::new(self.base, self.path.strip_last_step()?))
    }

    /// Decomposes this slice into one slice per indivisible leaf of its
    /// type, in the shape oracle's leaf order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the oracle cannot type this
    /// slice's path against the base value's type.
    pub fn expand(&self, routine: &Routine, oracle: &dyn TypeShapeOracle) -> Result<Vec<Self>> {
        let ty = oracle
            .subtype(routine.ty(self.base), &self.path)
            .ok_or_else(|| Error::ShapeMismatch {
                ty: routine.ty(self.base),
                path: self.path.clone(),
            })?;
        Ok(oracle
            .leaf_paths(ty)
            .iter()
            .map(|suffix| Self::new(self.base, self.path.concat(suffix)))
            .collect())
    }

    /// Turns this slice into a concrete SSA value, emitting one value
    /// projection per path step immediately before `point`. A materialized
    /// slice returns its base with zero instructions.
    ///
    /// # Errors
    ///
    /// Propagates materializer errors ([`Error::ShapeMismatch`],
    /// [`Error::InvalidInsertionPoint`]).
    pub fn materialize(
        &self,
        routine: &mut Routine,
        point: ValueId,
        oracle: &dyn TypeShapeOracle,
    ) -> Result<ValueId> {
        let tag = routine.source_tag(point);
        build_access_chain(
            routine,
            self.base,
            &self.path,
            point,
            AccessKind::Value,
            tag,
            oracle,
        )
    }

    /// Combines the per-location values in `values` into the single value
    /// of the whole region rooted at `root`, emitting any instructions
    /// immediately before `point`, and returns the resulting SSA value.
    ///
    /// `values` must cover the entire leaf decomposition of `root` (an
    /// entry at an inner node covers the leaves below it). On success the
    /// map is drained down to the single root entry.
    ///
    /// A node that already has an entry is taken as-is and its subtree is
    /// never descended into, so coverage at any level suffices and
    /// re-running reduction on an already reduced map returns the same
    /// value and emits nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingChildValue`] if a needed child has no entry.
    /// - [`Error::ReductionIncomplete`] if the walk finishes with anything
    ///   other than exactly one live entry.
    /// - [`Error::ShapeMismatch`] / [`Error::InvalidInsertionPoint`] from
    ///   shape queries and materialization.
    pub fn reduce(
        root: &MemoryLocation,
        values: &mut LocationValueMap,
        routine: &mut Routine,
        point: ValueId,
        oracle: &dyn TypeShapeOracle,
    ) -> Result<ValueId> {
        let tag = routine.source_tag(point);
        let mut nodes = Vec::new();
        Self::push_uncovered_postorder(root, values, routine, oracle, &mut nodes)?;
        for node in nodes {
            let children = node.first_level_locations(routine, oracle)?;
            if children.is_empty() {
                continue;
            }
            // Reference internals were never decomposed, so there is
            // nothing to recombine below one.
            let ty = node
                .ty(routine, oracle)
                .ok_or_else(|| Error::ShapeMismatch {
                    ty: routine.ty(node.base()),
                    path: node.path().clone(),
                })?;
            if oracle.is_reference(ty) {
                continue;
            }

            let first = values
                .get(&children[0])
                .cloned()
                .ok_or_else(|| Error::MissingChildValue(children[0].clone()))?;

            // Rule 1: a lone child slice is the parent slice, one step up.
            if children.len() == 1 {
                if let Some(parent) = first.strip_last_projection() {
                    Self::replace_children(values, &children, &node, parent);
                    continue;
                }
            }

            // Rule 2: sibling slices of one shared base collapse the same
            // way. Every child must be a strict slice; a materialized
            // child has no last step to strip.
            if children.len() > 1 {
                let mut shared = !first.is_materialized();
                for child in &children[1..] {
                    let value = values
                        .get(child)
                        .ok_or_else(|| Error::MissingChildValue(child.clone()))?;
                    shared &= value.base == first.base && !value.is_materialized();
                }
                if shared {
                    if let Some(parent) = first.strip_last_projection() {
                        Self::replace_children(values, &children, &node, parent);
                        continue;
                    }
                }
            }

            // Rule 3: materialize every child and recombine.
            let mut parts = Vec::with_capacity(children.len());
            for child in &children {
                let value = values
                    .get(child)
                    .cloned()
                    .ok_or_else(|| Error::MissingChildValue(child.clone()))?;
                parts.push(value.materialize(routine, point, oracle)?);
            }
            let fresh = build_aggregate(routine, ty, &parts, point, tag, oracle)?;
            Self::replace_children(values, &children, &node, Self::whole(fresh));
        }

        if values.len() != 1 {
            return Err(Error::ReductionIncomplete {
                remaining: values.len(),
            });
        }
        let result = values
            .values()
            .next()
            .cloned()
            .ok_or(Error::ReductionIncomplete { remaining: 0 })?;
        result.materialize(routine, point, oracle)
    }

    /// Post-order enumeration of the projection tree under `node`, pruned
    /// at any node that already has a map entry: a recorded value covers
    /// everything below it, so the subtree needs no visiting at all.
    fn push_uncovered_postorder(
        node: &MemoryLocation,
        values: &LocationValueMap,
        routine: &Routine,
        oracle: &dyn TypeShapeOracle,
        out: &mut Vec<MemoryLocation>,
    ) -> Result<()> {
        if values.contains_key(node) {
            return Ok(());
        }
        let ty = node
            .ty(routine, oracle)
            .ok_or_else(|| Error::ShapeMismatch {
                ty: routine.ty(node.base()),
                path: node.path().clone(),
            })?;
        if !oracle.is_reference(ty) {
            for child in node.first_level_locations(routine, oracle)? {
                Self::push_uncovered_postorder(&child, values, routine, oracle, out)?;
            }
        }
        out.push(node.clone());
        Ok(())
    }

    fn replace_children(
        values: &mut LocationValueMap,
        children: &[MemoryLocation],
        node: &MemoryLocation,
        value: Self,
    ) {
        for child in children {
            values.remove(child);
        }
        values.insert(node.clone(), value);
    }
}

impl fmt::Display for LocationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}{}", self.base, self.path)
        }
    }
}
