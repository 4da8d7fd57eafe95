//! handlers::resolver_handler
//!
//! Built-in generators registered for a node's type.

use std::sync::Arc;

use super::{at_node, Attempt, NodeHandler, SessionState};
use crate::error::FixtureError;
use crate::generator::{GeneratorResolver, GeneratorResult};
use crate::model::{Node, NodeTree};

#[derive(Debug)]
pub struct ResolverHandler {
    resolver: Arc<GeneratorResolver>,
}

impl ResolverHandler {
    pub fn new(resolver: Arc<GeneratorResolver>) -> Self {
        Self { resolver }
    }
}

impl NodeHandler for ResolverHandler {
    fn name(&self) -> &'static str {
        "resolver"
    }

    fn attempt(
        &self,
        node: &Node,
        tree: &NodeTree,
        state: &mut SessionState,
    ) -> Result<Attempt, FixtureError> {
        let Some(handle) = self.resolver.resolve(node.target()) else {
            return Ok(Attempt::Deferred);
        };
        let value = state
            .produce(&handle)
            .map_err(|e| at_node(tree.path(node.id()), e))?;
        Ok(Attempt::Found(GeneratorResult::new(value, handle.hints())))
    }
}
