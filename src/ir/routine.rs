//! Routines: a value arena plus an ordered instruction stream.
//!
//! A [`Routine`] owns every IR value of one function under analysis and the
//! program order its instructions execute in. It is deliberately small: the
//! algebra only needs to enumerate loads and stores, chase projection chains
//! back to their base identities, and splice synthesized
//! extraction/aggregation instructions in front of an insertion point.
//!
//! Values live in a dense arena indexed by [`ValueId`]; instructions are the
//! subset of values that sit in the stream (arguments are values without a
//! position). Insertion never invalidates existing identifiers, which is
//! what keeps interned [`crate::MemoryLocation`]s stable for the duration of
//! one routine's analysis.

use std::fmt;

use crate::{
    error::{Error, Result},
    ir::value::{SourceTag, TypeId, Value, ValueDef, ValueId},
    path::ProjectionStep,
};

/// One routine's IR: values, program order, and debug metadata.
#[derive(Debug, Clone)]
pub struct Routine {
    name: String,
    values: Vec<Value>,
    /// Instruction stream in program order. Arguments are not listed here.
    order: Vec<ValueId>,
}

impl Routine {
    /// Creates an empty routine.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Returns the routine's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of values in the arena, instructions and
    /// arguments alike.
    ///
    /// Because the arena is append-only, the difference between two
    /// readings of this counter is exactly the number of instructions
    /// synthesized in between; tests use it to pin down the
    /// zero-instruction fast paths.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Returns the number of instructions in the stream.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.order.len()
    }

    /// Returns the value record for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this routine's arena.
    #[must_use]
    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.index()]
    }

    /// Returns the defining operation of `id`.
    #[must_use]
    pub fn def(&self, id: ValueId) -> &ValueDef {
        self.value(id).def()
    }

    /// Returns the type of `id`.
    #[must_use]
    pub fn ty(&self, id: ValueId) -> TypeId {
        self.value(id).ty()
    }

    /// Returns the source tag of `id`.
    #[must_use]
    pub fn source_tag(&self, id: ValueId) -> SourceTag {
        self.value(id).tag()
    }

    /// Returns `true` if `id` is a stack allocation.
    #[must_use]
    pub fn is_stack_allocation(&self, id: ValueId) -> bool {
        matches!(self.def(id), ValueDef::StackAlloc)
    }

    /// Returns `true` if `id` is a stack or heap allocation.
    #[must_use]
    pub fn is_allocation(&self, id: ValueId) -> bool {
        self.def(id).is_allocation()
    }

    /// Iterates over the instruction stream in program order.
    pub fn instructions(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.order.iter().copied()
    }

    /// Adds a routine argument. Arguments are values but not instructions;
    /// they carry no source tag.
    pub fn argument(&mut self, index: u16, ty: TypeId) -> ValueId {
        self.push_value(Value::new(ValueDef::Argument { index }, ty, SourceTag::NONE))
    }

    /// Appends an instruction at the end of the stream.
    pub fn append(&mut self, def: ValueDef, ty: TypeId, tag: SourceTag) -> ValueId {
        let id = self.push_value(Value::new(def, ty, tag));
        self.order.push(id);
        id
    }

    /// Inserts an instruction immediately before `point` in the stream and
    /// returns the fresh value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInsertionPoint`] if `point` is not an
    /// instruction of this routine (for example, an argument).
    pub fn insert_before(
        &mut self,
        point: ValueId,
        def: ValueDef,
        ty: TypeId,
        tag: SourceTag,
    ) -> Result<ValueId> {
        let position = self
            .order
            .iter()
            .position(|&id| id == point)
            .ok_or(Error::InvalidInsertionPoint(point))?;
        let id = self.push_value(Value::new(def, ty, tag));
        self.order.insert(position, id);
        Ok(id)
    }

    /// Appends a stack allocation of `ty`.
    pub fn stack_alloc(&mut self, ty: TypeId, tag: SourceTag) -> ValueId {
        self.append(ValueDef::StackAlloc, ty, tag)
    }

    /// Appends a heap allocation of `ty`.
    pub fn heap_alloc(&mut self, ty: TypeId, tag: SourceTag) -> ValueId {
        self.append(ValueDef::HeapAlloc, ty, tag)
    }

    /// Appends an opaque instruction producing a value of `ty`.
    pub fn opaque(&mut self, ty: TypeId, tag: SourceTag) -> ValueId {
        self.append(ValueDef::Opaque, ty, tag)
    }

    /// Appends an address projection selecting `step` out of `base`.
    /// `ty` is the selected child's type.
    pub fn project_address(
        &mut self,
        base: ValueId,
        step: ProjectionStep,
        ty: TypeId,
        tag: SourceTag,
    ) -> ValueId {
        self.append(ValueDef::AddressProjection { base, step }, ty, tag)
    }

    /// Appends a value projection extracting `step` out of `base`.
    /// `ty` is the extracted child's type.
    pub fn project_value(
        &mut self,
        base: ValueId,
        step: ProjectionStep,
        ty: TypeId,
        tag: SourceTag,
    ) -> ValueId {
        self.append(ValueDef::ValueProjection { base, step }, ty, tag)
    }

    /// Appends a load through `address`. The result type is the address's
    /// pointee type.
    pub fn load(&mut self, address: ValueId, tag: SourceTag) -> ValueId {
        let ty = self.ty(address);
        self.append(ValueDef::Load { address }, ty, tag)
    }

    /// Appends a store of `value` through `address`.
    pub fn store(&mut self, value: ValueId, address: ValueId, tag: SourceTag) -> ValueId {
        let ty = self.ty(value);
        self.append(ValueDef::Store { value, address }, ty, tag)
    }

    /// Appends an aggregate construction of `ty` from `elements`.
    pub fn aggregate(&mut self, ty: TypeId, elements: Vec<ValueId>, tag: SourceTag) -> ValueId {
        self.append(ValueDef::Aggregate { elements }, ty, tag)
    }

    fn push_value(&mut self, value: Value) -> ValueId {
        let id = ValueId::new(self.values.len());
        self.values.push(value);
        id
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "routine {}:", self.name)?;
        for id in self.instructions() {
            let value = self.value(id);
            write!(f, "  {id} = {}", value.def().as_ref())?;
            match value.def() {
                ValueDef::Argument { index } => write!(f, " {index}")?,
                ValueDef::AddressProjection { base, step }
                | ValueDef::ValueProjection { base, step } => write!(f, " {base} {step}")?,
                ValueDef::Aggregate { elements } => {
                    for element in elements {
                        write!(f, " {element}")?;
                    }
                }
                ValueDef::Load { address } => write!(f, " {address}")?,
                ValueDef::Store { value, address } => write!(f, " {value}, {address}")?,
                ValueDef::StackAlloc | ValueDef::HeapAlloc | ValueDef::Opaque => {}
            }
            writeln!(f, " : {} {}", value.ty(), value.tag())?;
        }
        Ok(())
    }
}
