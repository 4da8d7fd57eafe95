//! handlers::user_supplied
//!
//! Generators bound through selectors.

use std::sync::Arc;

use tracing::debug;

use super::{at_node, Attempt, NodeHandler, SessionState};
use crate::core::catalog::Reflector;
use crate::core::types::TypeKey;
use crate::error::{AccessError, FixtureError, UsageError};
use crate::generator::{
    FallbackGenerators, Generator, GeneratorDecorator, GeneratorHandle, GeneratorResolver,
    GeneratorResult,
};
use crate::model::{ModelContext, Node, NodeTree};
use crate::select::Selector;

/// Resolves nodes matched by a user binding.
///
/// A delegating binding only contributes hints: its value comes from the
/// resolver's generator for the target type, else from a blank instance.
#[derive(Debug)]
pub struct UserSuppliedGeneratorHandler {
    context: Arc<ModelContext>,
    resolver: Arc<GeneratorResolver>,
    fallbacks: FallbackGenerators,
}

impl UserSuppliedGeneratorHandler {
    pub fn new(
        context: Arc<ModelContext>,
        resolver: Arc<GeneratorResolver>,
        fallbacks: FallbackGenerators,
    ) -> Self {
        Self {
            context,
            resolver,
            fallbacks,
        }
    }

    /// Reject a binding whose values cannot be assigned to the node.
    ///
    /// `produces` is the delegation target when one is given, otherwise the
    /// generator's own target type.
    fn check_compatible(
        &self,
        node: &Node,
        tree: &NodeTree,
        selector: &Selector,
        handle: &GeneratorHandle,
        produces: Option<TypeKey>,
    ) -> Result<(), UsageError> {
        let Some(produces) = produces else {
            return Ok(());
        };
        if self.context.catalog().is_assignable(&produces, node.target()) {
            return Ok(());
        }
        Err(UsageError::IncompatibleGenerator {
            path: tree.path(node.id()),
            target: node.target().clone(),
            produces,
            generator: handle.to_string(),
            selector: selector.to_string(),
        })
    }

    fn delegate_for(
        &self,
        node: &Node,
        tree: &NodeTree,
        target: &TypeKey,
    ) -> Result<GeneratorHandle, FixtureError> {
        if let Some(handle) = self.resolver.resolve(target) {
            return Ok(handle);
        }
        self.fallbacks.get(target).cloned().ok_or_else(|| {
            FixtureError::access(tree.path(node.id()), AccessError::UnknownType(target.clone()))
        })
    }
}

impl NodeHandler for UserSuppliedGeneratorHandler {
    fn name(&self) -> &'static str {
        "user-supplied"
    }

    fn attempt(
        &self,
        node: &Node,
        tree: &NodeTree,
        state: &mut SessionState,
    ) -> Result<Attempt, FixtureError> {
        let Some((selector, handle)) = self.context.generator_for(node, tree) else {
            return Ok(Attempt::Deferred);
        };

        let hints = handle.hints();
        let delegation = hints.generator().filter(|h| h.delegating);
        let explicit_target = delegation.and_then(|h| h.target.clone());
        let produces = match delegation {
            Some(_) => explicit_target.clone(),
            None => handle.target_type(),
        };
        self.check_compatible(node, tree, selector, handle, produces)?;

        if delegation.is_none() {
            let value = state
                .produce(handle)
                .map_err(|e| at_node(tree.path(node.id()), e))?;
            return Ok(Attempt::Found(GeneratorResult::new(value, hints)));
        }

        let target = explicit_target.unwrap_or_else(|| node.target().clone());
        let delegate = self.delegate_for(node, tree, &target)?;
        debug!(
            path = %tree.path(node.id()),
            delegate = %delegate,
            overriding = %handle,
            "delegating"
        );

        let decorator = GeneratorDecorator::new(delegate, handle.clone());
        state.ensure(decorator.delegate());
        state.ensure(decorator.overriding());
        let value = decorator
            .generate(&mut state.random)
            .map_err(|e| at_node(tree.path(node.id()), e))?;
        Ok(Attempt::Found(GeneratorResult::new(value, decorator.hints())))
    }
}
