//! handlers
//!
//! The handler chain deciding which generator produces each node's value.
//!
//! # Order
//!
//! Handlers are tried in a fixed order and the first one that finds a
//! generator wins:
//!
//! 1. [`UserSuppliedGeneratorHandler`] - generators bound through selectors
//! 2. [`ResolverHandler`] - built-in generators registered for the type
//! 3. [`InstantiatingHandler`] - blank instances, filled in by the engine
//!
//! The last handler never defers for a catalog type, so with the standard
//! chain [`UsageError::Unresolvable`] is only reachable for types missing
//! from the catalog.
//!
//! # Initialization
//!
//! Every handle is initialized at most once per session. The
//! [`InitializedSet`] in [`SessionState`] is keyed on generator identity, so
//! the same handle resolved for a thousand nodes runs `init` once, while two
//! handles with identical configuration each run it.

mod instantiating;
mod resolver_handler;
mod user_supplied;

pub use instantiating::InstantiatingHandler;
pub use resolver_handler::ResolverHandler;
pub use user_supplied::UserSuppliedGeneratorHandler;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::core::types::Value;
use crate::error::{FixtureError, UsageError};
use crate::generator::{
    FallbackGenerators, GenerateError, GeneratorContext, GeneratorHandle, GeneratorResolver,
    GeneratorResult, InitializedSet, Instantiator, Random,
};
use crate::model::{ModelContext, Node, NodeTree};

/// Mutable state owned by one session.
#[derive(Debug)]
pub struct SessionState {
    pub random: Random,
    pub initialized: InitializedSet,
    pub generator_context: GeneratorContext,
}

impl SessionState {
    pub fn new(seed: Option<u64>, generator_context: GeneratorContext) -> Self {
        Self {
            random: Random::new(seed),
            initialized: InitializedSet::new(),
            generator_context,
        }
    }

    /// Initialize `handle` once for this session.
    pub fn ensure(&mut self, handle: &GeneratorHandle) -> bool {
        self.initialized.ensure(handle, &self.generator_context)
    }

    /// Initialize `handle` if needed, then draw one value.
    pub fn produce(&mut self, handle: &GeneratorHandle) -> Result<Value, GenerateError> {
        self.ensure(handle);
        handle.generate(&mut self.random)
    }
}

/// Outcome of one handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    Found(GeneratorResult),
    Deferred,
}

/// One resolution strategy.
pub trait NodeHandler: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Produce a value for `node`, or defer to the next handler.
    fn attempt(
        &self,
        node: &Node,
        tree: &NodeTree,
        state: &mut SessionState,
    ) -> Result<Attempt, FixtureError>;
}

/// Ordered handlers; the first `Found` wins.
#[derive(Debug)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn NodeHandler>>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Box<dyn NodeHandler>>) -> Self {
        Self { handlers }
    }

    /// User-supplied, then resolver, then instantiating.
    pub fn standard(
        context: Arc<ModelContext>,
        resolver: Arc<GeneratorResolver>,
        instantiator: Arc<dyn Instantiator>,
    ) -> Self {
        let fallbacks = FallbackGenerators::for_catalog(context.catalog(), instantiator.clone());
        Self::new(vec![
            Box::new(UserSuppliedGeneratorHandler::new(
                context,
                resolver.clone(),
                fallbacks,
            )),
            Box::new(ResolverHandler::new(resolver)),
            Box::new(InstantiatingHandler::new(instantiator)),
        ])
    }

    pub fn resolve(
        &self,
        node: &Node,
        tree: &NodeTree,
        state: &mut SessionState,
    ) -> Result<GeneratorResult, FixtureError> {
        for handler in &self.handlers {
            if let Attempt::Found(result) = handler.attempt(node, tree, state)? {
                trace!(path = %tree.path(node.id()), handler = handler.name(), "resolved");
                return Ok(result);
            }
        }
        Err(UsageError::Unresolvable {
            path: tree.path(node.id()),
            target: node.target().clone(),
        }
        .into())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Attach the node path to a generator failure.
pub(crate) fn at_node(path: String, err: GenerateError) -> FixtureError {
    match err {
        GenerateError::Instantiation(source) => FixtureError::access(path, source),
        other => FixtureError::generate(path, other),
    }
}
