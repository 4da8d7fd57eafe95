//! Fixtura - randomized, structurally valid test fixtures
//!
//! Fixtura builds random instances of arbitrary object graphs described by a
//! type catalog. Users override how individual nodes are generated through
//! selectors; everything else is filled with built-in generators.
//!
//! # Architecture
//!
//! The codebase is layered, leaves first:
//!
//! - [`core`] - Type keys, values, the type catalog, settings
//! - [`select`] - Selectors, scopes and predicate builders
//! - [`generator`] - Generators, hints, identity, the resolver
//! - [`model`] - Node tree, selector bindings, model validation
//! - [`handlers`] - The handler chain choosing a generator per node
//! - [`engine`] - `Fixture`, `Model` and `Session`
//! - [`cli`] - Command-line interface
//! - [`error`] - Errors shared across layers
//!
//! # Resolution Invariants
//!
//! 1. Exact selectors outrank predicate selectors; within a tier the last
//!    declared binding wins
//! 2. Handlers run in a fixed order and the first result wins
//! 3. Every generator handle is initialized at most once per session
//! 4. Any error aborts the value being created

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod model;
pub mod select;

pub use engine::{Fixture, Model, Session};
pub use error::FixtureError;
