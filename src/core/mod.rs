//! core
//!
//! Core domain types, the type catalog, and settings.
//!
//! # Modules
//!
//! - [`types`] - Strong types: TypeKey, FieldRef, Value, Record, etc.
//! - [`catalog`] - Type catalog and the `Reflector` trait
//! - [`config`] - Settings schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Everything here is immutable once built and safe to share

pub mod catalog;
pub mod config;
pub mod types;
