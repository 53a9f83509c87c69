//! Access paths: ordered projection sequences from a base to a sub-region.
//!
//! An [`AccessPath`] describes how to walk from the start of a memory object
//! (or from a whole aggregate value) down to one of its sub-regions, one
//! [`ProjectionStep`] at a time. Paths are the common currency of the whole
//! crate: [`crate::MemoryLocation`] and [`crate::LocationValue`] are both a
//! base identity plus a path, and every alias or coverage question
//! ultimately decomposes into path comparisons.
//!
//! # Design Rationale
//!
//! ## Immutability
//!
//! Paths are immutable value types. Every operation that "changes" a path
//! ([`AccessPath::append`], [`AccessPath::concat`],
//! [`AccessPath::strip_last_step`]) returns a new path, which keeps paths
//! safe to use as map and set keys while a reduction is rewriting the
//! surrounding tables.
//!
//! ## Total order
//!
//! Paths are ordered by pairwise step comparison and then by length, which
//! is exactly the derived lexicographic order of the underlying step
//! sequence. The order carries no semantic meaning; it exists so locations
//! can key deterministic `BTreeMap`/`BTreeSet` collections.
//!
//! ## Prefix reasoning
//!
//! The prefix relation is the basis of all may-alias reasoning over paths:
//! two paths can only denote overlapping storage if one is a prefix of the
//! other. When both sides retain a non-empty remainder after the shared
//! prefix, they have diverged into distinct sibling children and are
//! provably disjoint; see
//! [`AccessPath::has_non_empty_symmetric_difference`].
//!
//! # Example
//!
//! ```rust
//! use mempath::{AccessPath, ProjectionStep};
//!
//! let x = AccessPath::empty().append(ProjectionStep::Field(0));
//! let x_elem = x.append(ProjectionStep::Index(3));
//!
//! assert!(x.is_prefix_of(&x_elem));
//! assert_eq!(x_elem.strip_last_step(), Some(x.clone()));
//!
//! let y = AccessPath::empty().append(ProjectionStep::Field(1));
//! assert!(x.has_non_empty_symmetric_difference(&y));
//! ```

use std::fmt;

/// A single projection out of an aggregate: one level of field, tuple
/// element, enum payload, or fixed-array element selection.
///
/// Steps only ever come from the type-shape oracle's decomposition of a
/// statically shaped type, so a step is always valid for the type it was
/// derived from; there is no "malformed step" case to defend against.
///
/// The derived `Ord` (variant order, then index) supplies the pairwise step
/// comparison used by [`AccessPath`]'s total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectionStep {
    /// Selects the n-th field of a struct.
    Field(u32),
    /// Selects the n-th element of a tuple.
    Tuple(u32),
    /// Selects the payload of the n-th enum case.
    EnumCase(u32),
    /// Selects the n-th element of a fixed-extent array.
    Index(u32),
}

impl fmt::Display for ProjectionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(n) => write!(f, ".f{n}"),
            Self::Tuple(n) => write!(f, ".{n}"),
            Self::EnumCase(n) => write!(f, "#{n}"),
            Self::Index(n) => write!(f, "[{n}]"),
        }
    }
}

/// An ordered, comparable sequence of projection steps from a base down to
/// a specific sub-region.
///
/// The empty path denotes the base itself, unprojected. Paths are built by
/// appending steps validated against the type-shape oracle and are never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessPath {
    steps: Vec<ProjectionStep>,
}

impl AccessPath {
    /// Returns the empty path, denoting the unprojected base.
    #[must_use]
    pub const fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Builds a path from a step sequence.
    #[must_use]
    pub fn from_steps(steps: Vec<ProjectionStep>) -> Self {
        Self { steps }
    }

    /// Returns a new path with `step` appended.
    #[must_use]
    pub fn append(&self, step: ProjectionStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Returns a new path consisting of `self` followed by all of `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut steps = self.steps.clone();
        steps.extend_from_slice(&other.steps);
        Self { steps }
    }

    /// Returns a new path with the last step removed, or `None` if the path
    /// is already empty.
    #[must_use]
    pub fn strip_last_step(&self) -> Option<Self> {
        if self.steps.is_empty() {
            return None;
        }
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    /// Returns `true` iff `self` is a (non-strict) prefix of `other`.
    ///
    /// Every path is a prefix of itself, and the empty path is a prefix of
    /// every path.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.steps.len() <= other.steps.len() && other.steps[..self.steps.len()] == self.steps[..]
    }

    /// Returns `true` iff, after stripping the common prefix, *both* paths
    /// still have a non-empty remainder.
    ///
    /// A `true` result means the two paths diverge into distinct sibling
    /// children of the same node and therefore denote disjoint storage. A
    /// `false` result covers equal paths and strict prefix relations, both
    /// of which may overlap.
    #[must_use]
    pub fn has_non_empty_symmetric_difference(&self, other: &Self) -> bool {
        let common = self
            .steps
            .iter()
            .zip(other.steps.iter())
            .take_while(|(a, b)| a == b)
            .count();
        common < self.steps.len() && common < other.steps.len()
    }

    /// Returns the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` iff the path has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the steps of the path in order.
    #[must_use]
    pub fn steps(&self) -> &[ProjectionStep] {
        &self.steps
    }

    /// Returns the last step, if any.
    #[must_use]
    pub fn last_step(&self) -> Option<ProjectionStep> {
        self.steps.last().copied()
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl From<ProjectionStep> for AccessPath {
    fn from(step: ProjectionStep) -> Self {
        Self { steps: vec![step] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(steps: &[ProjectionStep]) -> AccessPath {
        AccessPath::from_steps(steps.to_vec())
    }

    #[test]
    fn test_empty_path() {
        let p = AccessPath::empty();
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        assert_eq!(p.strip_last_step(), None);
        assert_eq!(format!("{p}"), "<root>");
    }

    #[test]
    fn test_append_does_not_mutate() {
        let p = AccessPath::empty();
        let q = p.append(ProjectionStep::Field(1));
        assert!(p.is_empty());
        assert_eq!(q.len(), 1);
        assert_eq!(q.last_step(), Some(ProjectionStep::Field(1)));
    }

    #[test]
    fn test_concat() {
        let a = path(&[ProjectionStep::Field(0), ProjectionStep::Index(2)]);
        let b = path(&[ProjectionStep::Tuple(1)]);
        let c = a.concat(&b);
        assert_eq!(
            c.steps(),
            &[
                ProjectionStep::Field(0),
                ProjectionStep::Index(2),
                ProjectionStep::Tuple(1)
            ]
        );
        // Concat with the empty path is the identity.
        assert_eq!(a.concat(&AccessPath::empty()), a);
        assert_eq!(AccessPath::empty().concat(&a), a);
    }

    #[test]
    fn test_prefix_reflexive() {
        let p = path(&[ProjectionStep::Field(0), ProjectionStep::Field(1)]);
        assert!(p.is_prefix_of(&p));
    }

    #[test]
    fn test_empty_is_prefix_of_everything() {
        let e = AccessPath::empty();
        assert!(e.is_prefix_of(&e));
        assert!(e.is_prefix_of(&path(&[ProjectionStep::EnumCase(4)])));
    }

    #[test]
    fn test_strict_prefix() {
        let a = path(&[ProjectionStep::Field(0)]);
        let ab = path(&[ProjectionStep::Field(0), ProjectionStep::Index(9)]);
        assert!(a.is_prefix_of(&ab));
        assert!(!ab.is_prefix_of(&a));
    }

    #[test]
    fn test_symmetric_difference_siblings() {
        let x = path(&[ProjectionStep::Field(0)]);
        let y = path(&[ProjectionStep::Field(1)]);
        assert!(x.has_non_empty_symmetric_difference(&y));
        assert!(y.has_non_empty_symmetric_difference(&x));
    }

    #[test]
    fn test_symmetric_difference_prefix_and_equal() {
        let a = path(&[ProjectionStep::Field(0)]);
        let ab = path(&[ProjectionStep::Field(0), ProjectionStep::Field(1)]);
        // A strict prefix leaves one side with an empty remainder.
        assert!(!a.has_non_empty_symmetric_difference(&ab));
        assert!(!ab.has_non_empty_symmetric_difference(&a));
        // Equal paths have no remainder on either side.
        assert!(!a.has_non_empty_symmetric_difference(&a));
    }

    #[test]
    fn test_symmetric_difference_nested_divergence() {
        let a = path(&[
            ProjectionStep::Field(2),
            ProjectionStep::Index(0),
            ProjectionStep::Field(1),
        ]);
        let b = path(&[
            ProjectionStep::Field(2),
            ProjectionStep::Index(1),
            ProjectionStep::Field(1),
        ]);
        assert!(a.has_non_empty_symmetric_difference(&b));
    }

    #[test]
    fn test_strip_last_step() {
        let ab = path(&[ProjectionStep::Field(0), ProjectionStep::Field(1)]);
        let a = ab.strip_last_step().unwrap();
        assert_eq!(a, path(&[ProjectionStep::Field(0)]));
        let root = a.strip_last_step().unwrap();
        assert!(root.is_empty());
        assert_eq!(root.strip_last_step(), None);
    }

    #[test]
    fn test_ordering_pairwise_then_length() {
        let a = path(&[ProjectionStep::Field(0)]);
        let ab = path(&[ProjectionStep::Field(0), ProjectionStep::Field(0)]);
        let b = path(&[ProjectionStep::Field(1)]);
        assert!(a < ab, "a prefix sorts before its extensions");
        assert!(ab < b, "step comparison dominates length");
    }

    #[test]
    fn test_display() {
        let p = path(&[
            ProjectionStep::Field(0),
            ProjectionStep::Index(3),
            ProjectionStep::EnumCase(1),
            ProjectionStep::Tuple(2),
        ]);
        assert_eq!(format!("{p}"), ".f0[3]#1.2");
    }
}
