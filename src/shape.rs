//! The type-shape oracle boundary and a table-driven implementation.
//!
//! The algebra never introspects types itself. Everything it knows about an
//! aggregate's layout (which children it has, which sub-regions are
//! indivisible) comes from a [`TypeShapeOracle`] the embedding compiler
//! provides. The oracle must be deterministic: repeated queries for the
//! same type within one compilation must return identical answers, and the
//! core does not defend against an oracle that contradicts itself.
//!
//! [`ShapeTable`] is a ready-made oracle for statically shaped types
//! (structs, tuples, enums with per-case payloads, fixed-extent arrays).
//! Embedders with their own type system implement the trait directly
//! instead; the rest of the crate only ever talks to the trait.

use crate::{
    ir::TypeId,
    path::{AccessPath, ProjectionStep},
};

/// Enumerates the decomposition of aggregate types.
///
/// Both queries return path *suffixes* relative to the queried type; callers
/// append them to whatever path led to that type. `leaf_paths` of an
/// indivisible type is the single empty path (the type itself is the leaf),
/// and `child_paths` of an indivisible type is empty.
pub trait TypeShapeOracle {
    /// Returns one path per indivisible sub-region of `ty`, in a fixed
    /// depth-first order.
    fn leaf_paths(&self, ty: TypeId) -> Vec<AccessPath>;

    /// Returns one single-step path per immediate child of `ty`, in
    /// declaration order.
    fn child_paths(&self, ty: TypeId) -> Vec<AccessPath>;

    /// Returns the type of the sub-node reached by walking `path` from
    /// `ty`, or `None` if the path does not fit the type's shape.
    fn subtype(&self, ty: TypeId, path: &AccessPath) -> Option<TypeId>;

    /// Returns `true` if `ty` is a class-reference type.
    ///
    /// Reference-typed nodes are opaque to the algebra: their internals are
    /// never decomposed and the reference itself is the leaf.
    fn is_reference(&self, ty: TypeId) -> bool;
}

/// The statically known shape of one registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// An indivisible value (scalar).
    Leaf,
    /// A class reference; opaque beyond the reference itself.
    Reference,
    /// A struct with the given field types.
    Struct(Vec<TypeId>),
    /// A tuple with the given element types.
    Tuple(Vec<TypeId>),
    /// An enum with one payload type per case.
    Enum(Vec<TypeId>),
    /// A fixed-extent array.
    Array {
        /// Element type.
        element: TypeId,
        /// Number of elements, resolved statically.
        length: usize,
    },
}

/// A registry of statically shaped types implementing [`TypeShapeOracle`].
///
/// Types are registered bottom-up and identified by the dense [`TypeId`]
/// the table hands back.
///
/// # Example
///
/// ```rust
/// use mempath::{ShapeTable, TypeShapeOracle};
///
/// let mut shapes = ShapeTable::new();
/// let int = shapes.leaf();
/// let point = shapes.struct_of(vec![int, int]);
/// let segment = shapes.struct_of(vec![point, point]);
///
/// // segment decomposes into four scalar leaves.
/// assert_eq!(shapes.leaf_paths(segment).len(), 4);
/// // ...reachable through two first-level children.
/// assert_eq!(shapes.child_paths(segment).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShapeTable {
    shapes: Vec<TypeShape>,
}

impl ShapeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shape and returns its type id.
    pub fn add(&mut self, shape: TypeShape) -> TypeId {
        let id = TypeId::new(self.shapes.len());
        self.shapes.push(shape);
        id
    }

    /// Registers an indivisible scalar type.
    pub fn leaf(&mut self) -> TypeId {
        self.add(TypeShape::Leaf)
    }

    /// Registers a class-reference type.
    pub fn reference(&mut self) -> TypeId {
        self.add(TypeShape::Reference)
    }

    /// Registers a struct type.
    pub fn struct_of(&mut self, fields: Vec<TypeId>) -> TypeId {
        self.add(TypeShape::Struct(fields))
    }

    /// Registers a tuple type.
    pub fn tuple_of(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.add(TypeShape::Tuple(elements))
    }

    /// Registers an enum type with one payload type per case.
    pub fn enum_of(&mut self, cases: Vec<TypeId>) -> TypeId {
        self.add(TypeShape::Enum(cases))
    }

    /// Registers a fixed-extent array type.
    pub fn array_of(&mut self, element: TypeId, length: usize) -> TypeId {
        self.add(TypeShape::Array { element, length })
    }

    /// Returns the registered shape of `ty`, if known.
    #[must_use]
    pub fn shape(&self, ty: TypeId) -> Option<&TypeShape> {
        self.shapes.get(ty.index())
    }

    /// One `(step, child type)` pair per immediate child, in declaration
    /// order. Empty for leaves, references, and unknown ids.
    ///
    /// Child counts must fit the `u32` step index space; wider shapes
    /// cannot be described by a [`ProjectionStep`] and panic here rather
    /// than silently mapping distinct children onto one step.
    fn children_with_steps(&self, ty: TypeId) -> Vec<(ProjectionStep, TypeId)> {
        let index = |i: usize| u32::try_from(i).expect("child index exceeds u32 step range");
        match self.shape(ty) {
            Some(TypeShape::Struct(fields)) => fields
                .iter()
                .enumerate()
                .map(|(i, &f)| (ProjectionStep::Field(index(i)), f))
                .collect(),
            Some(TypeShape::Tuple(elements)) => elements
                .iter()
                .enumerate()
                .map(|(i, &e)| (ProjectionStep::Tuple(index(i)), e))
                .collect(),
            Some(TypeShape::Enum(cases)) => cases
                .iter()
                .enumerate()
                .map(|(i, &c)| (ProjectionStep::EnumCase(index(i)), c))
                .collect(),
            Some(TypeShape::Array { element, length }) => (0..*length)
                .map(|i| (ProjectionStep::Index(index(i)), *element))
                .collect(),
            Some(TypeShape::Leaf | TypeShape::Reference) | None => Vec::new(),
        }
    }

    fn collect_leaves(&self, ty: TypeId, prefix: &AccessPath, out: &mut Vec<AccessPath>) {
        let children = self.children_with_steps(ty);
        if children.is_empty() || self.is_reference(ty) {
            out.push(prefix.clone());
            return;
        }
        for (step, child_ty) in children {
            self.collect_leaves(child_ty, &prefix.append(step), out);
        }
    }

    fn child_type(&self, ty: TypeId, step: ProjectionStep) -> Option<TypeId> {
        self.children_with_steps(ty)
            .into_iter()
            .find_map(|(s, child)| (s == step).then_some(child))
    }
}

impl TypeShapeOracle for ShapeTable {
    fn leaf_paths(&self, ty: TypeId) -> Vec<AccessPath> {
        let mut out = Vec::new();
        self.collect_leaves(ty, &AccessPath::empty(), &mut out);
        out
    }

    fn child_paths(&self, ty: TypeId) -> Vec<AccessPath> {
        self.children_with_steps(ty)
            .into_iter()
            .map(|(step, _)| AccessPath::from(step))
            .collect()
    }

    fn subtype(&self, ty: TypeId, path: &AccessPath) -> Option<TypeId> {
        let mut current = ty;
        for &step in path.steps() {
            current = self.child_type(current, step)?;
        }
        Some(current)
    }

    fn is_reference(&self, ty: TypeId) -> bool {
        matches!(self.shape(ty), Some(TypeShape::Reference))
    }
}
