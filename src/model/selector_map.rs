//! model::selector_map
//!
//! Ordered selector bindings with precedence lookup.

use crate::core::catalog::Reflector;
use crate::model::node::{Node, NodeTree};
use crate::select::{Selector, Tier};

/// Selector bindings in declaration order.
///
/// Lookup returns the binding of the highest [`Tier`] among those matching
/// the node, and the most recently declared one within that tier.
#[derive(Debug, Clone)]
pub struct SelectorMap<V> {
    bindings: Vec<(Selector, V)>,
}

impl<V> Default for SelectorMap<V> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<V> SelectorMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: Selector, value: V) {
        self.bindings.push((selector, value));
    }

    pub fn get(
        &self,
        node: &Node,
        tree: &NodeTree,
        reflector: &dyn Reflector,
    ) -> Option<(&Selector, &V)> {
        let mut best: Option<(Tier, &Selector, &V)> = None;
        for (selector, value) in &self.bindings {
            if !selector.matches(node, tree, reflector) {
                continue;
            }
            let tier = selector.tier();
            if best.map_or(true, |(t, _, _)| tier >= t) {
                best = Some((tier, selector, value));
            }
        }
        best.map(|(_, s, v)| (s, v))
    }

    pub fn contains(&self, node: &Node, tree: &NodeTree, reflector: &dyn Reflector) -> bool {
        self.bindings
            .iter()
            .any(|(s, _)| s.matches(node, tree, reflector))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.bindings.iter().map(|(s, _)| s)
    }

    /// Selectors that match no node of `tree`.
    pub fn unused<'a>(
        &'a self,
        tree: &'a NodeTree,
        reflector: &'a dyn Reflector,
    ) -> impl Iterator<Item = &'a Selector> + 'a {
        self.selectors()
            .filter(move |s| !tree.nodes().iter().any(|n| s.matches(n, tree, reflector)))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::TypeCatalog;
    use crate::core::types::TypeKey;
    use crate::select::Select;

    fn catalog() -> TypeCatalog {
        TypeCatalog::builder()
            .record("Person", |r| r.field("name", "string").field("nick", "string"))
            .build()
            .unwrap()
    }

    fn name_node(tree: &NodeTree) -> &Node {
        tree.nodes()
            .iter()
            .find(|n| n.field().is_some_and(|f| f.name == "name"))
            .unwrap()
    }

    #[test]
    fn exact_beats_predicate_in_either_order() {
        let catalog = catalog();
        let tree = NodeTree::build(&catalog, &TypeKey::new("Person").unwrap(), 8).unwrap();
        let select = Select::new(&catalog);
        let node = name_node(&tree);

        let mut map = SelectorMap::new();
        map.insert(select.field("Person", "name").unwrap(), "exact");
        map.insert(select.fields().of_type("string").to_selector(), "predicate");
        assert_eq!(map.get(node, &tree, &catalog).map(|(_, v)| *v), Some("exact"));

        let mut map = SelectorMap::new();
        map.insert(select.fields().of_type("string").to_selector(), "predicate");
        map.insert(select.field("Person", "name").unwrap(), "exact");
        assert_eq!(map.get(node, &tree, &catalog).map(|(_, v)| *v), Some("exact"));
    }

    #[test]
    fn last_declared_wins_within_tier() {
        let catalog = catalog();
        let tree = NodeTree::build(&catalog, &TypeKey::new("Person").unwrap(), 8).unwrap();
        let select = Select::new(&catalog);
        let node = name_node(&tree);

        let mut map = SelectorMap::new();
        map.insert(select.all_strings(), 1);
        map.insert(select.field_named("name").unwrap(), 2);
        map.insert(select.all_strings(), 3);
        assert_eq!(map.get(node, &tree, &catalog).map(|(_, v)| *v), Some(3));
    }

    #[test]
    fn unused_selectors() {
        let catalog = catalog();
        let tree = NodeTree::build(&catalog, &TypeKey::new("Person").unwrap(), 8).unwrap();
        let select = Select::new(&catalog);

        let mut map = SelectorMap::new();
        map.insert(select.all_strings(), ());
        map.insert(select.all_ints(), ());
        let unused: Vec<String> = map.unused(&tree, &catalog).map(ToString::to_string).collect();
        assert_eq!(unused, ["all(i32)"]);
    }
}
