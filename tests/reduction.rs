//! End-to-end reduction scenarios through the public API.
//!
//! These tests drive the crate the way a redundant-load pass would:
//! 1. Build a routine with loads and stores
//! 2. Enumerate touched locations into a vault
//! 3. Track stored values per leaf location
//! 4. Reduce the value map in front of a load and inspect the emitted IR

use mempath::prelude::*;

/// `Point { x: int, y: int }` and `Segment { from: Point, to: Point }`.
fn shapes() -> (ShapeTable, TypeId, TypeId, TypeId) {
    let mut shapes = ShapeTable::new();
    let int = shapes.leaf();
    let point = shapes.struct_of(vec![int, int]);
    let segment = shapes.struct_of(vec![point, point]);
    (shapes, int, point, segment)
}

fn leaf_values(
    routine: &Routine,
    shapes: &ShapeTable,
    root: &MemoryLocation,
    source: ValueId,
) -> LocationValueMap {
    root.expand(routine, shapes)
        .unwrap()
        .into_iter()
        .map(|leaf| {
            let slice = LocationValue::new(source, leaf.path().clone());
            (leaf, slice)
        })
        .collect()
}

#[test]
fn forwards_piecewise_copy_without_new_instructions() {
    // An aggregate copied field by field: load the whole source, store each
    // extracted leaf into the destination, reload the destination. The
    // reload's value is the original loaded value, recovered symbolically.
    let (shapes, _, _, segment) = shapes();
    let mut routine = Routine::new("piecewise_copy");
    let src = routine.stack_alloc(segment, SourceTag::new(1));
    let dst = routine.stack_alloc(segment, SourceTag::new(2));
    let whole = routine.load(src, SourceTag::new(3));

    let dst_root = MemoryLocation::root(dst);
    for leaf in dst_root.expand(&routine, &shapes).unwrap() {
        let mut slice_val = whole;
        let mut addr = dst;
        for &step in leaf.path().steps() {
            let ty = shapes.subtype(routine.ty(slice_val), &step.into()).unwrap();
            slice_val = routine.project_value(slice_val, step, ty, SourceTag::new(4));
            let addr_ty = shapes.subtype(routine.ty(addr), &step.into()).unwrap();
            addr = routine.project_address(addr, step, addr_ty, SourceTag::new(4));
        }
        routine.store(slice_val, addr, SourceTag::new(4));
    }
    let reload = routine.load(dst, SourceTag::new(5));

    // The pass records, per leaf, which slice of `whole` was stored.
    let mut values = leaf_values(&routine, &shapes, &dst_root, whole);
    assert_eq!(values.len(), 4);

    let before = routine.value_count();
    let forwarded =
        LocationValue::reduce(&dst_root, &mut values, &mut routine, reload, &shapes).unwrap();

    assert_eq!(forwarded, whole, "the copy is forwarded as its source");
    assert_eq!(routine.value_count(), before, "and costs zero instructions");
}

#[test]
fn reconstructs_mixed_provenance_with_minimal_ir() {
    // segment.from was written from one loaded point, segment.to from two
    // unrelated scalars. Reduction collapses `from` for free and spends
    // exactly one aggregation on `to` and one on the root.
    let (shapes, int, point, segment) = shapes();
    let mut routine = Routine::new("mixed_provenance");
    let seg = routine.stack_alloc(segment, SourceTag::new(1));
    let other = routine.stack_alloc(point, SourceTag::new(2));
    let from_val = routine.load(other, SourceTag::new(3));
    let a = routine.opaque(int, SourceTag::new(4));
    let b = routine.opaque(int, SourceTag::new(5));
    let reload = routine.load(seg, SourceTag::new(6));

    let f = |n| ProjectionStep::Field(n);
    let mut values = LocationValueMap::new();
    values.insert(
        MemoryLocation::new(seg, AccessPath::from_steps(vec![f(0), f(0)])),
        LocationValue::new(from_val, f(0).into()),
    );
    values.insert(
        MemoryLocation::new(seg, AccessPath::from_steps(vec![f(0), f(1)])),
        LocationValue::new(from_val, f(1).into()),
    );
    values.insert(
        MemoryLocation::new(seg, AccessPath::from_steps(vec![f(1), f(0)])),
        LocationValue::whole(a),
    );
    values.insert(
        MemoryLocation::new(seg, AccessPath::from_steps(vec![f(1), f(1)])),
        LocationValue::whole(b),
    );

    let root = MemoryLocation::root(seg);
    let before = routine.value_count();
    let out = LocationValue::reduce(&root, &mut values, &mut routine, reload, &shapes).unwrap();

    assert_eq!(routine.value_count(), before + 2);
    let ValueDef::Aggregate { elements } = routine.def(out) else {
        panic!("root must be an aggregate");
    };
    assert_eq!(elements[0], from_val, "from half collapsed symbolically");
    assert_eq!(
        routine.def(elements[1]),
        &ValueDef::Aggregate {
            elements: vec![a, b]
        },
        "to half needed one aggregation"
    );
}

#[test]
fn vault_enumeration_drives_alias_queries() {
    // Enumerate a routine's accesses, then answer the disambiguation
    // questions a pass would ask about the interned leaves.
    let (shapes, int, point, _) = shapes();
    let mut routine = Routine::new("vault_alias");
    let p = routine.stack_alloc(point, SourceTag::new(1));
    let q = routine.stack_alloc(point, SourceTag::new(2));
    let px = routine.project_address(p, ProjectionStep::Field(0), int, SourceTag::new(3));
    let qx = routine.project_address(q, ProjectionStep::Field(0), int, SourceTag::new(4));
    let v = routine.opaque(int, SourceTag::new(5));
    routine.store(v, px, SourceTag::new(5));
    routine.load(qx, SourceTag::new(6));
    routine.load(p, SourceTag::new(7));

    let mut vault = LocationVault::new();
    let counts = vault.enumerate_all(&routine, &shapes);
    assert_eq!(counts, AccessCounts { loads: 2, stores: 1 });
    // p.x, q.x, p.y in discovery order.
    assert_eq!(vault.len(), 3);

    let aa = StructuralAliasOracle::new(&routine);
    let p_x = vault.resolved_location(px).unwrap();
    let q_x = vault.resolved_location(qx).unwrap();
    let p_root = vault.resolved_location(p).unwrap();

    assert!(!p_x.may_alias(q_x, &aa), "separate stack slots are disjoint");
    assert!(p_x.may_alias(p_root, &aa), "whole object covers its field");
    assert!(p_x.must_alias(&p_x.clone(), &aa));
}

#[test]
fn location_set_coarsening_round_trip() {
    // A dead-store pass accumulates written leaves; once every leaf of the
    // object is covered, the set coarsens to the single root location.
    let (shapes, _, _, segment) = shapes();
    let mut routine = Routine::new("coarsen");
    let seg = routine.stack_alloc(segment, SourceTag::new(1));

    let root = MemoryLocation::root(seg);
    let mut written: LocationSet = root
        .expand(&routine, &shapes)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(written.len(), 4);

    MemoryLocation::reduce(&root, &mut written, &routine, &shapes).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written.contains(&root));

    // The object is a non-escaping local, so at routine exit those stores
    // are invisible.
    let ea = ConservativeEscapeOracle;
    assert!(root.is_non_escaping_local(&routine, &ea));
}

#[test]
fn rebuilt_value_is_attributed_to_the_load_it_answers() {
    let (shapes, int, point, _) = shapes();
    let mut routine = Routine::new("attribution");
    let p = routine.stack_alloc(point, SourceTag::new(1));
    let a = routine.opaque(int, SourceTag::new(2));
    let b = routine.opaque(int, SourceTag::new(3));
    let reload = routine.load(p, SourceTag::new(44));

    let f = |n| ProjectionStep::Field(n);
    let mut values = LocationValueMap::new();
    values.insert(MemoryLocation::new(p, f(0).into()), LocationValue::whole(a));
    values.insert(MemoryLocation::new(p, f(1).into()), LocationValue::whole(b));

    let root = MemoryLocation::root(p);
    let out = LocationValue::reduce(&root, &mut values, &mut routine, reload, &shapes).unwrap();

    assert_eq!(routine.source_tag(out), SourceTag::new(44));
    // The synthesized aggregate sits directly in front of the load.
    let order: Vec<_> = routine.instructions().collect();
    let pos = |v| order.iter().position(|&i| i == v).unwrap();
    assert_eq!(pos(out) + 1, pos(reload));
}

#[test]
fn incomplete_tracking_aborts_the_routine() {
    // One leaf was never tracked; reduction refuses rather than guessing.
    let (shapes, int, point, _) = shapes();
    let mut routine = Routine::new("incomplete");
    let p = routine.stack_alloc(point, SourceTag::new(1));
    let a = routine.opaque(int, SourceTag::new(2));
    let reload = routine.load(p, SourceTag::new(3));

    let mut values = LocationValueMap::new();
    values.insert(
        MemoryLocation::new(p, ProjectionStep::Field(0).into()),
        LocationValue::whole(a),
    );

    let root = MemoryLocation::root(p);
    let err =
        LocationValue::reduce(&root, &mut values, &mut routine, reload, &shapes).unwrap_err();
    assert_eq!(
        err,
        Error::MissingChildValue(MemoryLocation::new(p, ProjectionStep::Field(1).into()))
    );
}

#[test]
fn reference_fields_stay_opaque_end_to_end() {
    // struct Node { next: ClassRef, payload: int }: the reference is a
    // leaf, so the node has exactly two trackable locations.
    let (mut shapes, int, _, _) = shapes();
    let class = shapes.reference();
    let node = shapes.struct_of(vec![class, int]);

    let mut routine = Routine::new("opaque_reference");
    let n = routine.stack_alloc(node, SourceTag::new(1));
    routine.load(n, SourceTag::new(2));

    let mut vault = LocationVault::new();
    let counts = vault.enumerate_all(&routine, &shapes);
    assert_eq!(counts, AccessCounts { loads: 1, stores: 0 });
    assert_eq!(vault.len(), 2);
    assert_eq!(
        vault.location(0),
        Some(&MemoryLocation::new(n, ProjectionStep::Field(0).into()))
    );
}
