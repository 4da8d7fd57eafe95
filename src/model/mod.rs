//! model
//!
//! The node tree, selector bindings, and the checks run before any value is
//! generated.
//!
//! # Modules
//!
//! - [`node`] - Node tree built from the catalog
//! - [`selector_map`] - Precedence lookup over selector bindings
//! - [`context`] - User configuration for one fixture
//!
//! # Validation
//!
//! [`validate`] runs once per model build:
//!
//! 1. Setter selectors are rejected unless assignment is `method`
//! 2. Selectors matching no node are rejected in strict mode and logged in
//!    lenient mode

pub mod context;
pub mod node;
pub mod selector_map;

pub use context::ModelContext;
pub use node::{Node, NodeId, NodeKind, NodeTree};
pub use selector_map::SelectorMap;

use tracing::{debug, warn};

use crate::core::config::{AssignmentType, Mode};
use crate::error::UsageError;

/// Check a context against the tree it will be applied to.
///
/// # Errors
///
/// - `SetterSelectorInFieldMode` when a setter selector is bound while
///   assignment is `field`
/// - `UnusedSelectors` in strict mode when a selector matches no node
pub fn validate(context: &ModelContext, tree: &NodeTree) -> Result<(), UsageError> {
    let settings = context.settings();

    if settings.assignment() == AssignmentType::Field {
        let setters: Vec<String> = context
            .selectors()
            .filter(|s| s.is_setter())
            .map(ToString::to_string)
            .collect();
        if !setters.is_empty() {
            return Err(UsageError::SetterSelectorInFieldMode(setters));
        }
    }

    let unused = context.unused_selectors(tree);
    if !unused.is_empty() {
        match settings.mode() {
            Mode::Strict => return Err(UsageError::UnusedSelectors(unused)),
            Mode::Lenient => warn!(selectors = ?unused, "selectors matched no node"),
        }
    }

    debug!(nodes = tree.len(), "model validated");
    Ok(())
}
