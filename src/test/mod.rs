//! Shared fixtures for the unit tests.
//!
//! Two standard layouts cover most scenarios: a `Point` of two scalar
//! fields, and a `Segment` of two `Point`s (four leaves through two
//! intermediate nodes). Each fixture carries a routine with a stack
//! allocation of the layout plus a trailing anchor instruction to use as
//! the insertion point for synthesized IR.

use crate::{
    ir::{Routine, SourceTag, TypeId, ValueId},
    location::MemoryLocation,
    path::{AccessPath, ProjectionStep},
    shape::ShapeTable,
    value::LocationValue,
};

/// A routine with a stack-allocated `Point { x: int, y: int }`.
pub(crate) struct PointFixture {
    pub shapes: ShapeTable,
    pub routine: Routine,
    pub int: TypeId,
    pub point: TypeId,
    /// Stack allocation of `point`.
    pub base: ValueId,
    /// Trailing instruction usable as an insertion point.
    pub anchor: ValueId,
}

/// A routine with a stack-allocated `Segment { from: Point, to: Point }`.
pub(crate) struct SegmentFixture {
    pub shapes: ShapeTable,
    pub routine: Routine,
    pub int: TypeId,
    pub point: TypeId,
    pub segment: TypeId,
    /// Stack allocation of `segment`.
    pub base: ValueId,
    /// Trailing instruction usable as an insertion point.
    pub anchor: ValueId,
}

pub(crate) fn point_fixture() -> PointFixture {
    let mut shapes = ShapeTable::new();
    let int = shapes.leaf();
    let point = shapes.struct_of(vec![int, int]);

    let mut routine = Routine::new("point_routine");
    let base = routine.stack_alloc(point, SourceTag::new(1));
    let anchor = routine.opaque(int, SourceTag::new(9));

    PointFixture {
        shapes,
        routine,
        int,
        point,
        base,
        anchor,
    }
}

pub(crate) fn segment_fixture() -> SegmentFixture {
    let mut shapes = ShapeTable::new();
    let int = shapes.leaf();
    let point = shapes.struct_of(vec![int, int]);
    let segment = shapes.struct_of(vec![point, point]);

    let mut routine = Routine::new("segment_routine");
    let base = routine.stack_alloc(segment, SourceTag::new(1));
    let anchor = routine.opaque(int, SourceTag::new(9));

    SegmentFixture {
        shapes,
        routine,
        int,
        point,
        segment,
        base,
        anchor,
    }
}

/// Shorthand for a location from a base and path steps.
pub(crate) fn loc(base: ValueId, steps: &[ProjectionStep]) -> MemoryLocation {
    MemoryLocation::new(base, AccessPath::from_steps(steps.to_vec()))
}

/// Shorthand for a value slice from a base and path steps.
pub(crate) fn val(base: ValueId, steps: &[ProjectionStep]) -> LocationValue {
    LocationValue::new(base, AccessPath::from_steps(steps.to_vec()))
}
