//! generator
//!
//! Value generators and everything that chooses between them.
//!
//! # Overview
//!
//! A [`Generator`] produces one [`Value`] per call and may describe itself
//! through [`Hints`]. Generators are shared behind a [`GeneratorHandle`],
//! which gives each instance a stable identity used for one-time
//! initialization.
//!
//! # Modules
//!
//! - [`hints`] - Hints attached to generated values
//! - [`handle`] - Generator identity and the initialized-set
//! - [`random`] - Seeded random source
//! - [`specs`] - Built-in generators with fluent builders ([`Gen`])
//! - [`resolver`] - Built-in generator lookup by type
//! - [`decorator`] - Delegate/override composition
//! - [`instantiate`] - Blank instances of catalog types
//!
//! # Example
//!
//! ```
//! use fixtura::generator::{Gen, GeneratorContext, GeneratorHandle, Random};
//!
//! let handle: GeneratorHandle = Gen::ints().min(1).max(6).into();
//! handle.init(&GeneratorContext::default());
//!
//! let mut random = Random::new(Some(7));
//! let roll = handle.generate(&mut random).unwrap();
//! assert!((1..=6).contains(&roll.as_int().unwrap()));
//! ```

pub mod decorator;
pub mod handle;
pub mod hints;
pub mod instantiate;
pub mod random;
pub mod resolver;
pub mod specs;

pub use decorator::GeneratorDecorator;
pub use handle::{GeneratorHandle, GeneratorId, InitializedSet};
pub use hints::{AfterGenerate, CollectionHint, GeneratorHint, Hints};
pub use instantiate::{
    CatalogInstantiator, FallbackGenerators, InstantiatingGenerator, Instantiator,
};
pub use random::Random;
pub use resolver::{GeneratorResolver, GeneratorResolverBuilder};
pub use specs::Gen;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::config::Settings;
use crate::core::types::{TypeKey, Value};
use crate::error::AccessError;

/// Errors raised while producing a value.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid range for {what}: {detail}")]
    InvalidRange { what: &'static str, detail: String },

    #[error("{0}: no values to choose from")]
    EmptyChoices(&'static str),

    #[error("{0} only supplies hints and cannot generate values itself")]
    DelegationOnly(String),

    #[error("instantiation failed: {0}")]
    Instantiation(#[from] AccessError),

    #[error("{0}")]
    Failed(String),
}

/// Read-only configuration handed to every generator at initialization.
#[derive(Debug, Clone, Default)]
pub struct GeneratorContext {
    settings: Arc<Settings>,
}

impl GeneratorContext {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// A source of values.
///
/// Implementations must be shareable between threads; the engine never
/// serializes concurrent calls on one instance.
///
/// `init` is called at most once per session for each [`GeneratorHandle`]
/// before the first `generate`. Generators that need settings-derived state
/// resolve it there, typically into a `OnceLock`.
pub trait Generator: Send + Sync + fmt::Debug {
    fn init(&self, _context: &GeneratorContext) {}

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError>;

    fn hints(&self) -> Hints {
        Hints::default()
    }

    /// The type of the values this generator produces, if it is fixed.
    ///
    /// Used to reject a generator bound to a node of an incompatible type.
    fn target_type(&self) -> Option<TypeKey> {
        None
    }

    /// Short name used in logs and error messages.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Value plus the hints of the generator that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorResult {
    pub value: Value,
    pub hints: Hints,
}

impl GeneratorResult {
    pub fn new(value: Value, hints: Hints) -> Self {
        Self { value, hints }
    }
}
