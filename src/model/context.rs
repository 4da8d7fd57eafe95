//! model::context
//!
//! Everything the user configured for one fixture: selector bindings,
//! settings, catalog and seed.

use std::sync::Arc;

use crate::core::catalog::TypeCatalog;
use crate::core::config::Settings;
use crate::core::types::TypeKey;
use crate::generator::{GeneratorContext, GeneratorHandle};
use crate::model::node::{Node, NodeTree};
use crate::model::selector_map::SelectorMap;
use crate::select::{Selector, TargetSelector};

/// Immutable configuration of a model.
#[derive(Debug, Clone)]
pub struct ModelContext {
    catalog: Arc<TypeCatalog>,
    settings: Arc<Settings>,
    generators: SelectorMap<GeneratorHandle>,
    ignored: SelectorMap<()>,
    nullable: SelectorMap<()>,
    seed: Option<u64>,
    generator_context: GeneratorContext,
}

impl ModelContext {
    pub fn new(catalog: Arc<TypeCatalog>, settings: Arc<Settings>) -> Self {
        Self {
            catalog,
            generator_context: GeneratorContext::new(settings.clone()),
            settings,
            generators: SelectorMap::new(),
            ignored: SelectorMap::new(),
            nullable: SelectorMap::new(),
            seed: None,
        }
    }

    /// Bind `handle` to every member of `selector`.
    pub fn bind(&mut self, selector: TargetSelector, handle: GeneratorHandle) {
        for s in selector.flatten() {
            self.generators.insert(s, handle.clone());
        }
    }

    pub fn ignore(&mut self, selector: TargetSelector) {
        for s in selector.flatten() {
            self.ignored.insert(s, ());
        }
    }

    pub fn allow_null(&mut self, selector: TargetSelector) {
        for s in selector.flatten() {
            self.nullable.insert(s, ());
        }
    }

    /// Replace the settings. The generator context follows.
    pub fn set_settings(&mut self, settings: Arc<Settings>) {
        self.generator_context = GeneratorContext::new(settings.clone());
        self.settings = settings;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn generator_context(&self) -> &GeneratorContext {
        &self.generator_context
    }

    /// Explicit seed, else the seed from settings.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or_else(|| self.settings.seed())
    }

    /// The user generator bound to the highest-ranked selector matching `node`.
    pub fn generator_for(
        &self,
        node: &Node,
        tree: &NodeTree,
    ) -> Option<(&Selector, &GeneratorHandle)> {
        self.generators.get(node, tree, self.catalog.as_ref())
    }

    /// Explicit target of a delegating binding on `node`, if any.
    pub fn delegated_target(&self, node: &Node, tree: &NodeTree) -> Option<TypeKey> {
        let (_, handle) = self.generator_for(node, tree)?;
        let hints = handle.hints();
        hints
            .generator()
            .filter(|h| h.delegating)
            .and_then(|h| h.target.clone())
    }

    pub fn is_ignored(&self, node: &Node, tree: &NodeTree) -> bool {
        self.ignored.contains(node, tree, self.catalog.as_ref())
    }

    pub fn is_nullable(&self, node: &Node, tree: &NodeTree) -> bool {
        self.nullable.contains(node, tree, self.catalog.as_ref())
    }

    /// Every bound selector: generators, then ignore rules, then nullable rules.
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.generators
            .selectors()
            .chain(self.ignored.selectors())
            .chain(self.nullable.selectors())
    }

    /// Bound selectors that match no node of `tree`.
    pub fn unused_selectors(&self, tree: &NodeTree) -> Vec<String> {
        let reflector = self.catalog.as_ref();
        self.generators
            .unused(tree, reflector)
            .chain(self.ignored.unused(tree, reflector))
            .chain(self.nullable.unused(tree, reflector))
            .map(ToString::to_string)
            .collect()
    }
}
