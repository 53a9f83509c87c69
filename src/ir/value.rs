//! Value identities, defining operations, and debug metadata.
//!
//! Every IR value is identified by a dense [`ValueId`] into its routine's
//! value arena and carries the operation that defined it ([`ValueDef`]), a
//! [`TypeId`], and a [`SourceTag`]. The algebra treats value identities as
//! opaque: exact `ValueId` equality answers "same value", and anything
//! beyond that is delegated to the alias oracle.

use std::fmt;

use crate::path::ProjectionStep;

/// Unique identifier for an IR value within one [`crate::Routine`].
///
/// A lightweight handle into the routine's value arena. Identifiers are
/// dense, stable for the lifetime of the routine, and totally ordered so
/// they can key `BTreeMap`/`BTreeSet` collections.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId(usize);

impl ValueId {
    /// Creates a value identifier from a raw arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Opaque identifier for an aggregate type.
///
/// The crate assigns no meaning to type identifiers; their shape is supplied
/// entirely by the [`crate::TypeShapeOracle`] the caller provides.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(usize);

impl TypeId {
    /// Creates a type identifier from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Source-location/debug-scope metadata attached to an instruction.
///
/// The materializer copies the insertion point's tag onto every instruction
/// it synthesizes, so reconstructed values remain attributable to the access
/// they answer. The tag is threaded as an explicit parameter rather than
/// ambient builder state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceTag(u32);

impl SourceTag {
    /// The tag used for values with no meaningful source attribution,
    /// such as routine arguments.
    pub const NONE: Self = Self(0);

    /// Creates a tag from a raw debug-scope token.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw debug-scope token.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

/// The operation defining an IR value.
///
/// This is the minimal instruction set the algebra needs: allocations and
/// arguments supply base identities, address/value projections walk into
/// aggregates one step at a time, [`ValueDef::Aggregate`] recombines a full
/// child set, and loads/stores are the accesses the vault enumerates.
/// [`ValueDef::Opaque`] stands for anything else; operands defined by it
/// have no statically knowable location and are skipped by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValueDef {
    /// A routine argument.
    Argument {
        /// Position in the routine's signature.
        index: u16,
    },
    /// A stack allocation; provably dead at routine exit.
    StackAlloc,
    /// A heap allocation; liveness beyond the routine is the escape
    /// oracle's question.
    HeapAlloc,
    /// One projection step applied to an address, yielding the address of
    /// the selected child.
    AddressProjection {
        /// The address being projected.
        base: ValueId,
        /// The child selected.
        step: ProjectionStep,
    },
    /// One projection step applied to a value, extracting the selected
    /// child value.
    ValueProjection {
        /// The value being projected.
        base: ValueId,
        /// The child selected.
        step: ProjectionStep,
    },
    /// Recombines the complete ordered first-level child set into one
    /// aggregate value.
    Aggregate {
        /// Child values, one per first-level child of the result type, in
        /// shape-oracle order.
        elements: Vec<ValueId>,
    },
    /// Reads the value stored at an address.
    Load {
        /// The address read.
        address: ValueId,
    },
    /// Writes a value to an address. Produces no usable result; the arena
    /// slot exists so stores sit in the instruction stream like everything
    /// else.
    Store {
        /// The value written.
        value: ValueId,
        /// The address written.
        address: ValueId,
    },
    /// Any defining operation the algebra does not model.
    Opaque,
}

impl ValueDef {
    /// Returns `true` for stack or heap allocations.
    #[must_use]
    pub const fn is_allocation(&self) -> bool {
        matches!(self, Self::StackAlloc | Self::HeapAlloc)
    }
}

/// An IR value: its defining operation, type, and debug metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    def: ValueDef,
    ty: TypeId,
    tag: SourceTag,
}

impl Value {
    /// Creates a value record.
    #[must_use]
    pub const fn new(def: ValueDef, ty: TypeId, tag: SourceTag) -> Self {
        Self { def, ty, tag }
    }

    /// Returns the defining operation.
    #[must_use]
    pub const fn def(&self) -> &ValueDef {
        &self.def
    }

    /// Returns the value's type.
    ///
    /// For addresses this is the pointee type: an allocation's type is the
    /// allocated type, and an address projection's type is the selected
    /// child's type.
    #[must_use]
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    /// Returns the source tag.
    #[must_use]
    pub const fn tag(&self) -> SourceTag {
        self.tag
    }
}
