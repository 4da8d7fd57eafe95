//! handlers::instantiating
//!
//! Terminal handler: blank instances the engine fills in afterwards.

use std::sync::Arc;

use super::{Attempt, NodeHandler, SessionState};
use crate::error::FixtureError;
use crate::generator::{AfterGenerate, CollectionHint, GeneratorResult, Hints, Instantiator};
use crate::model::{Node, NodeKind, NodeTree};

#[derive(Debug)]
pub struct InstantiatingHandler {
    instantiator: Arc<dyn Instantiator>,
}

impl InstantiatingHandler {
    pub fn new(instantiator: Arc<dyn Instantiator>) -> Self {
        Self { instantiator }
    }
}

impl NodeHandler for InstantiatingHandler {
    fn name(&self) -> &'static str {
        "instantiating"
    }

    fn attempt(
        &self,
        node: &Node,
        tree: &NodeTree,
        state: &mut SessionState,
    ) -> Result<Attempt, FixtureError> {
        let value = self
            .instantiator
            .instantiate(node.target())
            .map_err(|e| FixtureError::access(tree.path(node.id()), e))?;

        let mut hints = Hints::new().with_after_generate(AfterGenerate::PopulateAll);
        if node.kind() == NodeKind::List {
            let (min, max) = state.generator_context.settings().collection_size();
            let size = state.random.usize_range(min, max);
            hints = hints.with_collection(CollectionHint { size });
        }
        Ok(Attempt::Found(GeneratorResult::new(value, hints)))
    }
}
