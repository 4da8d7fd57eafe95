//! engine
//!
//! Builds models from fixture definitions and creates values from them.
//!
//! # Lifecycle
//!
//! ```text
//! Fixture -> to_model() -> Model -> session() -> Session -> create()
//! ```
//!
//! 1. **Fixture**: collect bindings, rules and settings
//! 2. **Model**: build the node tree, validate bindings, assemble the
//!    handler chain. Built once; immutable.
//! 3. **Session**: owns the random source and the initialized-set. Every
//!    `create()` on one session shares them, so each generator is
//!    initialized once per session.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fixtura::core::catalog::TypeCatalog;
//! use fixtura::engine::Fixture;
//! use fixtura::generator::Gen;
//! use fixtura::select::Select;
//!
//! let catalog = Arc::new(
//!     TypeCatalog::builder()
//!         .record("Person", |r| r.field("name", "string").field("age", "i32"))
//!         .build()
//!         .unwrap(),
//! );
//! let select = Select::new(catalog.as_ref());
//!
//! let person = Fixture::of(catalog.clone(), "Person")
//!     .generate(select.field("Person", "age").unwrap(), Gen::ints().range(18, 65))
//!     .set(select.field("Person", "name").unwrap(), "Ada")
//!     .with_seed(42)
//!     .create()
//!     .unwrap();
//!
//! assert_eq!(person.at("name").and_then(|v| v.as_str()), Some("Ada"));
//! let age = person.at("age").and_then(|v| v.as_int()).unwrap();
//! assert!((18..=65).contains(&age));
//! ```

mod session;

pub use session::Session;

use std::sync::Arc;

use tracing::debug;

use crate::core::catalog::TypeCatalog;
use crate::core::config::Settings;
use crate::core::types::{TypeKey, Value};
use crate::error::{FixtureError, UsageError};
use crate::generator::{
    CatalogInstantiator, Gen, GeneratorHandle, GeneratorResolverBuilder, Instantiator,
};
use crate::handlers::HandlerChain;
use crate::model::{self, ModelContext, NodeTree};
use crate::select::TargetSelector;

/// Definition of the values to create for one root type.
#[derive(Debug)]
pub struct Fixture {
    root: String,
    context: ModelContext,
    max_depth: Option<usize>,
    resolver: GeneratorResolverBuilder,
}

impl Fixture {
    /// Start a fixture for `root` with default settings.
    pub fn of(catalog: Arc<TypeCatalog>, root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            context: ModelContext::new(catalog, Arc::new(Settings::defaults())),
            max_depth: None,
            resolver: GeneratorResolverBuilder::default(),
        }
    }

    /// Bind a generator to every node matching `selector`.
    pub fn generate(
        mut self,
        selector: impl Into<TargetSelector>,
        generator: impl Into<GeneratorHandle>,
    ) -> Self {
        self.context.bind(selector.into(), generator.into());
        self
    }

    /// Fix the value of every node matching `selector`.
    pub fn set(self, selector: impl Into<TargetSelector>, value: impl Into<Value>) -> Self {
        self.generate(selector, Gen::constant(value))
    }

    /// Compute the value of every node matching `selector` with `supply`.
    pub fn supply<F>(self, selector: impl Into<TargetSelector>, supply: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.generate(selector, Gen::supplier(supply))
    }

    /// Leave matching nodes null.
    pub fn ignore(mut self, selector: impl Into<TargetSelector>) -> Self {
        self.context.ignore(selector.into());
        self
    }

    /// Let matching nodes be null with the configured probability.
    pub fn with_nullable(mut self, selector: impl Into<TargetSelector>) -> Self {
        self.context.allow_null(selector.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.context.set_seed(seed);
        self
    }

    /// Override the settings' maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.context.set_settings(Arc::new(settings));
        self
    }

    /// Add or replace built-in generator registrations.
    pub fn with_resolver(mut self, resolver: GeneratorResolverBuilder) -> Self {
        self.resolver = resolver;
        self
    }

    /// Build and validate the model.
    ///
    /// # Errors
    ///
    /// - `UsageError::UnknownRoot` if the root type is not in the catalog
    /// - `UsageError::SetterSelectorInFieldMode` / `UnusedSelectors` from
    ///   model validation
    pub fn to_model(self) -> Result<Model, FixtureError> {
        Model::build(self)
    }

    /// Create a single value in a fresh session.
    pub fn create(self) -> Result<Value, FixtureError> {
        self.to_model()?.session().create()
    }

    /// Create `count` values sharing one session.
    pub fn stream(self, count: usize) -> Result<Vec<Value>, FixtureError> {
        let model = self.to_model()?;
        let mut session = model.session();
        (0..count).map(|_| session.create()).collect()
    }
}

/// A validated fixture, ready to create values.
#[derive(Debug)]
pub struct Model {
    context: Arc<ModelContext>,
    tree: NodeTree,
    chain: HandlerChain,
}

impl Model {
    fn build(fixture: Fixture) -> Result<Self, FixtureError> {
        let Fixture {
            root,
            context,
            max_depth,
            resolver,
        } = fixture;

        let catalog = context.catalog().clone();
        let root_key =
            TypeKey::new(root.as_str()).map_err(|_| UsageError::UnknownRoot(root.clone()))?;
        let max_depth = max_depth.unwrap_or_else(|| context.settings().max_depth());
        let tree = NodeTree::build_with(catalog.as_ref(), &root_key, max_depth, &|node, tree| {
            context.delegated_target(node, tree)
        })?;
        model::validate(&context, &tree)?;

        let resolver = Arc::new(resolver.build(catalog.clone()));
        let instantiator: Arc<dyn Instantiator> = Arc::new(CatalogInstantiator::new(catalog));
        let context = Arc::new(context);
        let chain = HandlerChain::standard(context.clone(), resolver, instantiator);

        debug!(root = %root_key, nodes = tree.len(), max_depth, "model built");
        Ok(Self {
            context,
            tree,
            chain,
        })
    }

    /// Start a session with the model's seed, or a random one.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    pub(crate) fn chain(&self) -> &HandlerChain {
        &self.chain
    }
}

