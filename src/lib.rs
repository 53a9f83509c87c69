// Copyright 2025 The mempath contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # mempath
//!
//! A memory-location and partial-value algebra for compiler passes that
//! reason about loads and stores at sub-object granularity, such as
//! redundant-load elimination and dead-store elimination.
//!
//! Instead of treating a store to `s.from.x` as touching all of `s`, the
//! algebra names the exact region with a [`MemoryLocation`]: an opaque base
//! identity plus an [`AccessPath`] of projection steps. The value that was
//! written is tracked the same way, as a [`LocationValue`] slice of an SSA
//! value. Both sides support *expansion* down to indivisible leaves and
//! *reduction* back up, so a pass can do its dataflow over flat leaf sets
//! and still reconstruct whole aggregates afterwards.
//!
//! ## Features
//!
//! - **Sub-object precision** - locations name fields, tuple and enum
//!   payloads, and array elements, not just whole objects
//! - **Zero-cost forwarding** - values recombined from slices of one
//!   source collapse symbolically, with no new instructions
//! - **Dense interning** - the [`LocationVault`] maps every leaf a routine
//!   touches to a stable small index for bit-vector dataflow
//! - **Oracle boundaries** - type shapes, aliasing, and escape facts come
//!   from traits the embedding compiler implements
//! - **Deterministic** - all collections iterate in a fixed order; two
//!   runs over the same routine make identical decisions
//!
//! ## Quick Start
//!
//! Add `mempath` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mempath = "0.1"
//! ```
//!
//! Forward two field stores into a whole-object load:
//!
//! ```rust
//! use mempath::prelude::*;
//!
//! // struct Point { x: int, y: int }
//! let mut shapes = ShapeTable::new();
//! let int = shapes.leaf();
//! let point = shapes.struct_of(vec![int, int]);
//!
//! // %p = stack_alloc ; store %x -> %p.f0 ; store %y -> %p.f1 ; load %p
//! let mut routine = Routine::new("demo");
//! let p = routine.stack_alloc(point, SourceTag::new(1));
//! let x_addr = routine.project_address(p, ProjectionStep::Field(0), int, SourceTag::new(2));
//! let y_addr = routine.project_address(p, ProjectionStep::Field(1), int, SourceTag::new(3));
//! let x = routine.opaque(int, SourceTag::new(2));
//! let y = routine.opaque(int, SourceTag::new(3));
//! routine.store(x, x_addr, SourceTag::new(2));
//! routine.store(y, y_addr, SourceTag::new(3));
//! let reload = routine.load(p, SourceTag::new(4));
//!
//! // Intern every leaf location the routine's loads and stores touch.
//! let mut vault = LocationVault::new();
//! let counts = vault.enumerate_all(&routine, &shapes);
//! assert_eq!((counts.loads, counts.stores), (1, 2));
//! assert_eq!(vault.len(), 2);
//!
//! // The two stores pin down both leaves; rebuild the whole Point in
//! // front of the load so it can be forwarded.
//! let root = MemoryLocation::root(p);
//! let mut values = LocationValueMap::new();
//! values.insert(
//!     MemoryLocation::new(p, ProjectionStep::Field(0).into()),
//!     LocationValue::whole(x),
//! );
//! values.insert(
//!     MemoryLocation::new(p, ProjectionStep::Field(1).into()),
//!     LocationValue::whole(y),
//! );
//! let forwarded = LocationValue::reduce(&root, &mut values, &mut routine, reload, &shapes)?;
//! assert_eq!(
//!     routine.def(forwarded),
//!     &ValueDef::Aggregate { elements: vec![x, y] }
//! );
//! # Ok::<(), mempath::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - convenient re-exports of the commonly used types
//! - [`path`] - projection steps and access paths
//! - [`shape`] - the type decomposition oracle and a table-driven one
//! - [`location`] - memory locations: expansion, reduction, aliasing
//! - [`value`] - partial values and the bottom-up reduction engine
//! - [`vault`] - dense interning of leaf locations
//! - [`alias`] - alias and escape oracle boundaries
//! - [`materialize`] - the only IR-emitting code in the crate
//! - [`ir`] - the minimal routine/value substrate the algebra runs on
//!
//! The split mirrors how a pass consumes the crate: enumeration fills a
//! [`LocationVault`] up front, the pass does its own dataflow over vault
//! indices, and reduction plus materialization run only where the pass
//! decides to rewrite.
//!
//! ## Validity and Errors
//!
//! Memory operands that cannot be statically resolved to a base and path
//! are *skipped*, never errored on; partial coverage is the normal mode of
//! operation. The [`Error`] variants that do exist all indicate broken
//! preconditions (an incompletely seeded value map, a contradictory shape
//! oracle) and mean the caller must abandon analysis of that routine.

pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

pub mod alias;
pub mod ir;
pub mod location;
pub mod materialize;
pub mod path;
pub mod prelude;
pub mod shape;
pub mod value;
pub mod vault;

/// The error type covering every failure this library can surface
pub use error::Error;

/// The result type used throughout this library
pub use error::Result;

/// Access paths name sub-regions of aggregate values
pub use path::{AccessPath, ProjectionStep};

/// Memory locations are the keys of all downstream analysis
pub use location::{LocationSet, MemoryLocation};

/// Partial values and the reduction engine
pub use value::{LocationValue, LocationValueMap};

/// Dense interning of leaf locations
pub use vault::{AccessCounts, LocationVault};

/// Type decomposition oracle boundary
pub use shape::{ShapeTable, TypeShape, TypeShapeOracle};

/// Alias and escape oracle boundaries
pub use alias::{AliasOracle, ConservativeEscapeOracle, EscapeOracle, StructuralAliasOracle};
