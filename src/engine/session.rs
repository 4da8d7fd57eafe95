//! engine::session
//!
//! Value creation: walks the node tree and assembles one value per call.

use tracing::{debug, trace};

use super::Model;
use crate::core::config::{AssignmentType, OnSetMethodNotFound};
use crate::core::types::Value;
use crate::error::{AccessError, FixtureError};
use crate::generator::{AfterGenerate, CollectionHint, GeneratorResult};
use crate::handlers::SessionState;
use crate::model::{Node, NodeId, NodeKind};

/// Creates values from a model.
///
/// A session owns its random source and initialized-set; use one session
/// per thread.
#[derive(Debug)]
pub struct Session<'m> {
    model: &'m Model,
    state: SessionState,
}

impl<'m> Session<'m> {
    pub(super) fn new(model: &'m Model) -> Self {
        let context = model.context();
        let state = SessionState::new(context.seed(), context.generator_context().clone());
        debug!(seed = state.random.seed(), "session started");
        Self { model, state }
    }

    /// Seed of this session's random source.
    pub fn seed(&self) -> u64 {
        self.state.random.seed()
    }

    /// Number of generators initialized so far.
    pub fn initialized(&self) -> usize {
        self.state.initialized.len()
    }

    /// Create one value of the model's root type.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole value; there is no partial result.
    pub fn create(&mut self) -> Result<Value, FixtureError> {
        let root = self.model.tree().root().id();
        self.node_value(root)
    }

    fn node_value(&mut self, id: NodeId) -> Result<Value, FixtureError> {
        let model = self.model;
        let tree = model.tree();
        let context = model.context();
        let Some(node) = tree.get(id) else {
            return Ok(Value::Null);
        };
        let null_probability = context.settings().null_probability();

        if context.is_ignored(node, tree) || node.is_cyclic() {
            return Ok(Value::Null);
        }
        if context.is_nullable(node, tree) && self.state.random.chance(null_probability) {
            return Ok(Value::Null);
        }

        let GeneratorResult { mut value, hints } =
            model.chain().resolve(node, tree, &mut self.state)?;
        if hints.is_nullable() && self.state.random.chance(null_probability) {
            return Ok(Value::Null);
        }

        let after = hints
            .after_generate()
            .unwrap_or_else(|| context.settings().after_generate());
        // Interface nodes narrowed to a subtype hold records too.
        match value {
            Value::Record(_) => self.populate_record(node, &mut value, after)?,
            Value::List(_) if node.kind() == NodeKind::List => {
                self.populate_list(node, &mut value, after, hints.collection())?
            }
            _ => {}
        }
        Ok(value)
    }

    fn populate_record(
        &mut self,
        node: &Node,
        value: &mut Value,
        after: AfterGenerate,
    ) -> Result<(), FixtureError> {
        if after == AfterGenerate::DoNotModify {
            return Ok(());
        }
        let Some(record) = value.as_record_mut() else {
            return Ok(());
        };
        let model = self.model;
        let settings = model.context().settings();

        for &child_id in node.children() {
            let Some(child) = model.tree().get(child_id) else {
                continue;
            };
            let Some(field) = child.field() else {
                continue;
            };
            if after == AfterGenerate::PopulateNulls && !record.is_unset(&field.name) {
                continue;
            }
            if settings.assignment() == AssignmentType::Method && child.setter().is_none() {
                match settings.on_set_method_not_found() {
                    OnSetMethodNotFound::AssignField => {}
                    OnSetMethodNotFound::Ignore => {
                        trace!(field = %field, "no setter, field left unset");
                        continue;
                    }
                    OnSetMethodNotFound::Fail => {
                        return Err(FixtureError::access(
                            model.tree().path(child_id),
                            AccessError::MissingSetter {
                                ty: field.declaring.clone(),
                                field: field.name.clone(),
                            },
                        ));
                    }
                }
            }
            let child_value = self.node_value(child_id)?;
            record.set(field.name.clone(), child_value);
        }
        Ok(())
    }

    fn populate_list(
        &mut self,
        node: &Node,
        value: &mut Value,
        after: AfterGenerate,
        collection: Option<CollectionHint>,
    ) -> Result<(), FixtureError> {
        if after == AfterGenerate::DoNotModify {
            return Ok(());
        }
        let Value::List(items) = value else {
            return Ok(());
        };
        let Some(&element) = node.children().first() else {
            return Ok(());
        };
        if after == AfterGenerate::PopulateNulls && !items.is_empty() {
            return Ok(());
        }

        let size = match collection {
            Some(hint) => hint.size,
            None => {
                let (min, max) = self.model.context().settings().collection_size();
                self.state.random.usize_range(min, max)
            }
        };
        items.clear();
        for _ in 0..size {
            let item = self.node_value(element)?;
            items.push(item);
        }
        Ok(())
    }
}
