//! Memory locations: a base identity plus an access path.
//!
//! A [`MemoryLocation`] denotes "the memory reachable by applying `path`
//! starting at `base`". Locations are the keys of everything downstream
//! (the vault's dense index, the value map handed to reduction, the live
//! sets a dead-store pass coarsens), so they are small, immutable,
//! totally ordered value types.
//!
//! # Identity is two-tier
//!
//! Exact `ValueId` equality decides whether two locations are *the same*
//! location (cheap, total, usable as a map key). Whether two *different*
//! locations overlap is a separate question answered by the alias oracle in
//! [`MemoryLocation::must_alias`] / [`MemoryLocation::may_alias`]. Keeping
//! these tiers apart is what lets the vault intern locations without ever
//! consulting alias analysis.
//!
//! # Validity
//!
//! Not every memory operand has a statically knowable base and path.
//! [`MemoryLocation::resolve`] returns `None` for such operands and callers
//! skip them; an unrepresentable location is never an error, and invalid
//! locations are never constructed.

use std::collections::BTreeSet;
use std::fmt;

use crate::{
    alias::{AliasOracle, EscapeOracle},
    error::{Error, Result},
    ir::{Routine, TypeId, ValueDef, ValueId},
    materialize::{build_access_chain, AccessKind},
    path::AccessPath,
    shape::TypeShapeOracle,
};

/// A set of memory locations, ordered for deterministic iteration.
pub type LocationSet = BTreeSet<MemoryLocation>;

/// A region of memory: an opaque base identity plus the access path from
/// that base down to the region.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemoryLocation {
    base: ValueId,
    path: AccessPath,
}

impl MemoryLocation {
    /// Creates a location from a base identity and path.
    #[must_use]
    pub const fn new(base: ValueId, path: AccessPath) -> Self {
        Self { base, path }
    }

    /// Creates the location of the whole object rooted at `base`.
    #[must_use]
    pub const fn root(base: ValueId) -> Self {
        Self {
            base,
            path: AccessPath::empty(),
        }
    }

    /// Returns the base identity.
    #[must_use]
    pub const fn base(&self) -> ValueId {
        self.base
    }

    /// Returns the access path.
    #[must_use]
    pub const fn path(&self) -> &AccessPath {
        &self.path
    }

    /// Returns the type of the region this location denotes, or `None` if
    /// the oracle cannot resolve the path against the base's type.
    #[must_use]
    pub fn ty(&self, routine: &Routine, oracle: &dyn TypeShapeOracle) -> Option<TypeId> {
        oracle.subtype(routine.ty(self.base), &self.path)
    }

    /// Derives the location accessed through `operand` by stripping address
    /// projections down to the underlying base identity.
    ///
    /// Returns `None` when no base/path can be statically determined (the
    /// operand or something on its chain is opaque). Callers skip such
    /// operands; partial coverage is expected and sound.
    #[must_use]
    pub fn resolve(routine: &Routine, operand: ValueId) -> Option<Self> {
        let mut steps = Vec::new();
        let mut current = operand;
        loop {
            match routine.def(current) {
                ValueDef::AddressProjection { base, step } => {
                    steps.push(*step);
                    current = *base;
                }
                // Allocations, arguments, and loaded pointers are opaque
                // roots the algebra can key on.
                ValueDef::StackAlloc
                | ValueDef::HeapAlloc
                | ValueDef::Argument { .. }
                | ValueDef::Load { .. } => {
                    steps.reverse();
                    return Some(Self::new(current, AccessPath::from_steps(steps)));
                }
                ValueDef::ValueProjection { .. }
                | ValueDef::Aggregate { .. }
                | ValueDef::Store { .. }
                | ValueDef::Opaque => return None,
            }
        }
    }

    /// Expands this location into one location per indivisible leaf
    /// sub-region, in the shape oracle's leaf order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the oracle cannot type this
    /// location's path.
    pub fn expand(&self, routine: &Routine, oracle: &dyn TypeShapeOracle) -> Result<Vec<Self>> {
        let ty = self.ty_or_err(routine, oracle)?;
        Ok(oracle
            .leaf_paths(ty)
            .iter()
            .map(|suffix| Self::new(self.base, self.path.concat(suffix)))
            .collect())
    }

    /// Returns this location's immediate children, one per first-level
    /// child of its type. Empty for leaves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the oracle cannot type this
    /// location's path.
    pub fn first_level_locations(
        &self,
        routine: &Routine,
        oracle: &dyn TypeShapeOracle,
    ) -> Result<Vec<Self>> {
        let ty = self.ty_or_err(routine, oracle)?;
        Ok(oracle
            .child_paths(ty)
            .iter()
            .map(|suffix| Self::new(self.base, self.path.concat(suffix)))
            .collect())
    }

    /// Enumerates every node of the projection tree rooted at this
    /// location, children always preceding their parent (post-order,
    /// leaves first; the root is last).
    ///
    /// Descent stops at leaves and at reference-typed nodes, whose
    /// internals are opaque.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the oracle cannot type a node
    /// derived from its own decomposition.
    pub fn project_tree_postorder(
        &self,
        routine: &Routine,
        oracle: &dyn TypeShapeOracle,
    ) -> Result<Vec<Self>> {
        let mut nodes = Vec::new();
        self.push_postorder(routine, oracle, &mut nodes)?;
        Ok(nodes)
    }

    fn push_postorder(
        &self,
        routine: &Routine,
        oracle: &dyn TypeShapeOracle,
        out: &mut Vec<Self>,
    ) -> Result<()> {
        let ty = self.ty_or_err(routine, oracle)?;
        if !oracle.is_reference(ty) {
            for suffix in oracle.child_paths(ty) {
                let child = Self::new(self.base, self.path.concat(&suffix));
                child.push_postorder(routine, oracle, out)?;
            }
        }
        out.push(self.clone());
        Ok(())
    }

    /// Coarsens `set` bottom-up under the projection tree rooted at
    /// `base`: whenever all immediate children of a node are present, they
    /// are replaced by the node itself.
    ///
    /// Never emits IR; this purely rewrites location identities so a
    /// location set stays as coarse as the available knowledge allows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the oracle cannot type a node of
    /// the tree.
    pub fn reduce(
        base: &Self,
        set: &mut LocationSet,
        routine: &Routine,
        oracle: &dyn TypeShapeOracle,
    ) -> Result<()> {
        for node in base.project_tree_postorder(routine, oracle)? {
            let first_level = node.first_level_locations(routine, oracle)?;
            // Leaf of the projection tree.
            if first_level.is_empty() {
                continue;
            }
            // Reference internals are opaque; the reference is the leaf.
            if node
                .ty(routine, oracle)
                .is_some_and(|ty| oracle.is_reference(ty))
            {
                continue;
            }
            if first_level.iter().all(|child| set.contains(child)) {
                for child in &first_level {
                    set.remove(child);
                }
                set.insert(node);
            }
        }
        Ok(())
    }

    /// Returns `true` iff the two locations certainly denote the same
    /// memory: bases must-alias and paths are identical.
    #[must_use]
    pub fn must_alias(&self, other: &Self, aa: &dyn AliasOracle) -> bool {
        aa.must_alias(self.base, other.base) && self.path == other.path
    }

    /// Returns `false` iff the two locations are provably disjoint: the
    /// bases are no-alias, or the paths diverge into distinct sibling
    /// children after their common prefix.
    ///
    /// Locations whose paths are in a strict prefix relation (one is an
    /// ancestor of the other) are reported as may-alias. That is
    /// intentional: the ancestor covers the descendant.
    #[must_use]
    pub fn may_alias(&self, other: &Self, aa: &dyn AliasOracle) -> bool {
        if aa.no_alias(self.base, other.base) {
            return false;
        }
        if self.path.has_non_empty_symmetric_difference(&other.path) {
            return false;
        }
        true
    }

    /// Returns `true` if this location's base cannot be observed after the
    /// routine exits: a stack allocation, or a heap allocation the escape
    /// oracle proves non-escaping. Everything else is conservatively
    /// observable.
    #[must_use]
    pub fn is_non_escaping_local(&self, routine: &Routine, ea: &dyn EscapeOracle) -> bool {
        // A stack slot is definitely dead at the end of the routine.
        if routine.is_stack_allocation(self.base) {
            return true;
        }
        if routine.is_allocation(self.base) && !ea.escapes(self.base) {
            return true;
        }
        false
    }

    /// Builds the address of this location by emitting one address
    /// projection per path step immediately before `point`. Returns the
    /// base unchanged when the path is empty.
    ///
    /// # Errors
    ///
    /// Propagates materializer errors ([`Error::ShapeMismatch`],
    /// [`Error::InvalidInsertionPoint`]).
    pub fn materialize_address(
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
            AccessKind::Address,
            tag,
            oracle,
        )
    }

    fn ty_or_err(&self, routine: &Routine, oracle: &dyn TypeShapeOracle) -> Result<TypeId> {
        self.ty(routine, oracle).ok_or_else(|| Error::ShapeMismatch {
            ty: routine.ty(self.base),
            path: self.path.clone(),
        })
    }
}

impl fmt::Display for MemoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}{}", self.base, self.path)
        }
    }
}
