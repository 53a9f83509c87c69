//! The location vault: a dense intern table of leaf locations.
//!
//! Bit-vector dataflow needs every location a routine touches mapped to a
//! small dense index, decided once and never revisited. [`LocationVault`]
//! owns that mapping: [`LocationVault::enumerate`] resolves a memory
//! operand, expands it to its indivisible leaves, and interns each unseen
//! leaf at the next free index. Indices are assigned in discovery order,
//! so enumerating a routine's instructions in program order yields the
//! same numbering on every run.
//!
//! Operands that cannot be resolved to a base and path, and locations
//! whose type the shape oracle cannot decompose, are skipped. Partial
//! coverage is the expected mode of operation; passes simply stay
//! conservative about accesses the vault does not track.

use std::collections::BTreeMap;

use crate::{
    ir::{Routine, ValueDef, ValueId},
    location::MemoryLocation,
    shape::TypeShapeOracle,
};

/// How many loads and stores a whole-routine enumeration visited,
/// trackable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessCounts {
    /// Load instructions visited.
    pub loads: usize,
    /// Store instructions visited.
    pub stores: usize,
}

/// Interned leaf locations with dense, stable indices.
#[derive(Debug, Clone, Default)]
pub struct LocationVault {
    locations: Vec<MemoryLocation>,
    index: BTreeMap<MemoryLocation, usize>,
    resolved: BTreeMap<ValueId, MemoryLocation>,
}

impl LocationVault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `operand`, expands it to leaves, and interns every leaf
    /// not yet present. Returns `true` if the operand's location is
    /// tracked afterwards.
    ///
    /// Unresolvable operands and undecomposable types are skipped and
    /// reported as untracked. Re-enumerating an operand already seen is a
    /// cheap cache hit.
    pub fn enumerate(
        &mut self,
        routine: &Routine,
        operand: ValueId,
        oracle: &dyn TypeShapeOracle,
    ) -> bool {
        if self.resolved.contains_key(&operand) {
            return true;
        }
        let Some(location) = MemoryLocation::resolve(routine, operand) else {
            return false;
        };
        let Ok(leaves) = location.expand(routine, oracle) else {
            return false;
        };
        for leaf in leaves {
            if !self.index.contains_key(&leaf) {
                self.index.insert(leaf.clone(), self.locations.len());
                self.locations.push(leaf);
            }
        }
        self.resolved.insert(operand, location);
        true
    }

    /// Enumerates every load source and store destination in the routine,
    /// in program order, and reports how many of each were visited.
    ///
    /// Counts cover untracked accesses too; passes use them to size their
    /// dataflow work and to bail out of routines with no memory traffic,
    /// not as a coverage measure.
    pub fn enumerate_all(
        &mut self,
        routine: &Routine,
        oracle: &dyn TypeShapeOracle,
    ) -> AccessCounts {
        let mut counts = AccessCounts::default();
        for value in routine.instructions() {
            match *routine.def(value) {
                ValueDef::Load { address } => {
                    counts.loads += 1;
                    self.enumerate(routine, address, oracle);
                }
                ValueDef::Store { address, .. } => {
                    counts.stores += 1;
                    self.enumerate(routine, address, oracle);
                }
                _ => {}
            }
        }
        counts
    }

    /// Number of interned leaf locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Returns the location interned at `index`, if any.
    #[must_use]
    pub fn location(&self, index: usize) -> Option<&MemoryLocation> {
        self.locations.get(index)
    }

    /// Returns the dense index of `location`, if interned.
    #[must_use]
    pub fn index_of(&self, location: &MemoryLocation) -> Option<usize> {
        self.index.get(location).copied()
    }

    /// Iterates interned locations in index order.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryLocation> {
        self.locations.iter()
    }

    /// Returns the resolved location cached for `operand`, if it was
    /// successfully enumerated.
    #[must_use]
    pub fn resolved_location(&self, operand: ValueId) -> Option<&MemoryLocation> {
        self.resolved.get(&operand)
    }
}
