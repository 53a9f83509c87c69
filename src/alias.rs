//! Alias and escape oracle boundaries.
//!
//! Like type shapes, aliasing facts come from outside the algebra. The
//! traits here are the seams an embedding compiler plugs its own analyses
//! into; [`MemoryLocation`](crate::MemoryLocation) combines their
//! base-level answers with path comparison to answer location-level
//! queries.
//!
//! Both trait contracts are one-sided. `must_alias` may only return `true`
//! when the two identities certainly name the same object, and `no_alias`
//! may only return `true` when they certainly do not; returning `false` is
//! always sound. The two `true`s are mutually exclusive for any pair, and
//! an oracle answering `false` to both simply does not know.
//!
//! The implementations shipped here are the baseline every embedder can
//! fall back on: [`StructuralAliasOracle`] derives facts from value
//! identity and allocation sites alone, and [`ConservativeEscapeOracle`]
//! assumes every heap allocation escapes.

use crate::ir::{Routine, ValueId};

/// Answers base-identity aliasing queries.
pub trait AliasOracle {
    /// Returns `true` only if `a` and `b` certainly name the same object.
    fn must_alias(&self, a: ValueId, b: ValueId) -> bool;

    /// Returns `true` only if `a` and `b` certainly name disjoint objects.
    fn no_alias(&self, a: ValueId, b: ValueId) -> bool;
}

/// Answers whether an allocation can be observed after its routine exits.
pub trait EscapeOracle {
    /// Returns `false` only if `allocation` provably never escapes.
    fn escapes(&self, allocation: ValueId) -> bool;
}

/// Alias facts derivable from the instruction stream alone.
///
/// A value identity must-aliases exactly itself, and two *distinct*
/// allocation instructions can never name the same object. Everything else
/// is unknown. This is deliberately weak; it is still enough to disambiguate
/// the local stack traffic that redundant-load and dead-store passes feed
/// on.
#[derive(Debug, Clone, Copy)]
pub struct StructuralAliasOracle<'a> {
    routine: &'a Routine,
}

impl<'a> StructuralAliasOracle<'a> {
    /// Creates an oracle reading allocation sites from `routine`.
    #[must_use]
    pub const fn new(routine: &'a Routine) -> Self {
        Self { routine }
    }
}

impl AliasOracle for StructuralAliasOracle<'_> {
    fn must_alias(&self, a: ValueId, b: ValueId) -> bool {
        a == b
    }

    fn no_alias(&self, a: ValueId, b: ValueId) -> bool {
        a != b && self.routine.is_allocation(a) && self.routine.is_allocation(b)
    }
}

/// The escape oracle of last resort: every allocation escapes.
///
/// Sound for any program. Use it when no escape analysis is wired up; the
/// only cost is that heap locals are never classified as dead at routine
/// exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeEscapeOracle;

impl EscapeOracle for ConservativeEscapeOracle {
    fn escapes(&self, _allocation: ValueId) -> bool {
        true
    }
}
