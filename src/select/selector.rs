//! select::selector
//!
//! Selector values, scopes and groups, and how they match nodes.

use std::fmt;
use std::sync::Arc;

use crate::core::catalog::{MethodKind, Reflector};
use crate::core::types::TypeKey;
use crate::model::node::{Node, NodeTree};

/// Precedence tier of a selector. Exact selectors outrank predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Predicate,
    Exact,
}

/// Target of an exact selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Type(TypeKey),
    Field {
        declaring: Option<TypeKey>,
        name: String,
    },
    Setter {
        declaring: Option<TypeKey>,
        method: String,
        param: Option<TypeKey>,
    },
    Root,
}

impl Target {
    fn matches(&self, node: &Node, reflector: &dyn Reflector) -> bool {
        match self {
            Target::Type(ty) => node.target() == ty,
            Target::Field { declaring, name } => node.field().is_some_and(|f| {
                &f.name == name && declaring.as_ref().map_or(true, |d| &f.declaring == d)
            }),
            Target::Setter {
                declaring,
                method,
                param,
            } => {
                let (Some(setter), Some(field)) = (node.setter(), node.field()) else {
                    return false;
                };
                if setter != method {
                    return false;
                }
                if declaring.as_ref().is_some_and(|d| &field.declaring != d) {
                    return false;
                }
                match param {
                    None => true,
                    Some(param) => reflector
                        .method(&field.declaring, method)
                        .is_some_and(|m| {
                            matches!(&m.kind, MethodKind::Setter { param: p, .. } if p == param)
                        }),
                }
            }
            Target::Root => node.is_root(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Type(ty) => write!(f, "all({ty})"),
            Target::Field {
                declaring: Some(d),
                name,
            } => write!(f, "field({d}.{name})"),
            Target::Field {
                declaring: None,
                name,
            } => write!(f, "field({name})"),
            Target::Setter {
                declaring,
                method,
                param,
            } => {
                write!(f, "setter(")?;
                if let Some(d) = declaring {
                    write!(f, "{d}::")?;
                }
                write!(f, "{method}")?;
                if let Some(p) = param {
                    write!(f, "({p})")?;
                }
                write!(f, ")")
            }
            Target::Root => write!(f, "root()"),
        }
    }
}

/// Test applied by a predicate selector.
pub(crate) type NodeTest = dyn Fn(&Node, &dyn Reflector) -> bool + Send + Sync;

/// A predicate with a description for messages.
#[derive(Clone)]
pub(crate) struct Predicate {
    description: String,
    test: Arc<NodeTest>,
}

impl Predicate {
    pub(crate) fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Node, &dyn Reflector) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(Target),
    Predicate(Predicate),
}

/// Describes which nodes a rule applies to.
///
/// Built through [`Select`](super::Select). Immutable; [`within`](Self::within)
/// returns a narrowed copy.
#[derive(Debug, Clone)]
pub struct Selector {
    matcher: Matcher,
    scopes: Vec<Scope>,
}

impl Selector {
    pub(crate) fn exact(target: Target) -> Self {
        Self {
            matcher: Matcher::Exact(target),
            scopes: Vec::new(),
        }
    }

    pub(crate) fn predicate(predicate: Predicate) -> Self {
        Self {
            matcher: Matcher::Predicate(predicate),
            scopes: Vec::new(),
        }
    }

    /// Restrict matches to nodes below the given scopes.
    ///
    /// Scopes are listed outermost first. A node matches only if, walking
    /// from the node itself towards the root, the innermost scope matches
    /// some node on the path, the next scope matches a node above that one,
    /// and so on.
    pub fn within(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes.extend(scopes);
        self
    }

    /// Use this selector (with its own scopes) as a scope.
    pub fn to_scope(self) -> Scope {
        Scope { selector: self }
    }

    pub fn tier(&self) -> Tier {
        match self.matcher {
            Matcher::Exact(_) => Tier::Exact,
            Matcher::Predicate(_) => Tier::Predicate,
        }
    }

    /// Whether this selector targets a setter method.
    pub fn is_setter(&self) -> bool {
        matches!(self.matcher, Matcher::Exact(Target::Setter { .. }))
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Check the selector and its scopes against a node.
    pub fn matches(&self, node: &Node, tree: &NodeTree, reflector: &dyn Reflector) -> bool {
        let own = match &self.matcher {
            Matcher::Exact(target) => target.matches(node, reflector),
            Matcher::Predicate(p) => (p.test)(node, reflector),
        };
        own && self.scopes_match(node, tree, reflector)
    }

    fn scopes_match(&self, node: &Node, tree: &NodeTree, reflector: &dyn Reflector) -> bool {
        let mut path = tree.ancestors(node.id());
        for scope in self.scopes.iter().rev() {
            let found = path
                .by_ref()
                .any(|candidate| scope.selector.matches(candidate, tree, reflector));
            if !found {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matcher {
            Matcher::Exact(target) => write!(f, "{target}")?,
            Matcher::Predicate(p) => write!(f, "{}", p.description)?,
        }
        if !self.scopes.is_empty() {
            let scopes: Vec<String> = self.scopes.iter().map(ToString::to_string).collect();
            write!(f, ".within({})", scopes.join(", "))?;
        }
        Ok(())
    }
}

/// Restricts a selector to part of the tree.
#[derive(Debug, Clone)]
pub struct Scope {
    selector: Selector,
}

impl Scope {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope({})", self.selector)
    }
}

/// Ordered, non-empty set of selectors matching if any member matches.
#[derive(Debug, Clone)]
pub struct SelectorGroup {
    members: Vec<Selector>,
}

impl SelectorGroup {
    pub(crate) fn new(members: Vec<Selector>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Selector] {
        &self.members
    }

    pub fn matches(&self, node: &Node, tree: &NodeTree, reflector: &dyn Reflector) -> bool {
        self.members
            .iter()
            .any(|s| s.matches(node, tree, reflector))
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        write!(f, "all_of({})", members.join(", "))
    }
}

/// Anything a generator, ignore or nullable rule can be bound to.
#[derive(Debug, Clone)]
pub enum TargetSelector {
    Single(Selector),
    Group(SelectorGroup),
}

impl TargetSelector {
    /// Member selectors; a group contributes each member separately so each
    /// keeps its own tier.
    pub fn flatten(self) -> Vec<Selector> {
        match self {
            TargetSelector::Single(s) => vec![s],
            TargetSelector::Group(g) => g.members,
        }
    }
}

impl From<Selector> for TargetSelector {
    fn from(s: Selector) -> Self {
        TargetSelector::Single(s)
    }
}

impl From<SelectorGroup> for TargetSelector {
    fn from(g: SelectorGroup) -> Self {
        TargetSelector::Group(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::TypeCatalog;

    fn catalog() -> TypeCatalog {
        TypeCatalog::builder()
            .record("Person", |r| {
                r.field("name", "string")
                    .field("home", "Address")
                    .field("work", "Address")
                    .accessors()
            })
            .record("Address", |r| r.field("city", "string").accessors())
            .build()
            .unwrap()
    }

    fn tree(catalog: &TypeCatalog) -> NodeTree {
        NodeTree::build(catalog, &TypeKey::new("Person").unwrap(), 8).unwrap()
    }

    fn find<'t>(tree: &'t NodeTree, path: &str) -> &'t Node {
        tree.nodes()
            .iter()
            .find(|n| tree.path(n.id()) == path)
            .unwrap()
    }

    fn field(declaring: Option<&str>, name: &str) -> Selector {
        Selector::exact(Target::Field {
            declaring: declaring.map(|d| TypeKey::new(d).unwrap()),
            name: name.into(),
        })
    }

    #[test]
    fn type_and_root_targets() {
        let catalog = catalog();
        let tree = tree(&catalog);
        let all_address = Selector::exact(Target::Type(TypeKey::new("Address").unwrap()));
        assert!(all_address.matches(find(&tree, "Person.home"), &tree, &catalog));
        assert!(!all_address.matches(find(&tree, "Person.name"), &tree, &catalog));

        let root = Selector::exact(Target::Root);
        assert!(root.matches(tree.root(), &tree, &catalog));
        assert!(!root.matches(find(&tree, "Person.home"), &tree, &catalog));
    }

    #[test]
    fn field_with_and_without_declaring_type() {
        let catalog = catalog();
        let tree = tree(&catalog);
        let city = find(&tree, "Person.home.city");
        assert!(field(None, "city").matches(city, &tree, &catalog));
        assert!(field(Some("Address"), "city").matches(city, &tree, &catalog));
        assert!(!field(Some("Person"), "city").matches(city, &tree, &catalog));
    }

    #[test]
    fn setter_target_checks_param() {
        let catalog = catalog();
        let tree = tree(&catalog);
        let name = find(&tree, "Person.name");
        let by_param = |param: &str| {
            Selector::exact(Target::Setter {
                declaring: Some(TypeKey::new("Person").unwrap()),
                method: "set_name".into(),
                param: Some(TypeKey::new(param).unwrap()),
            })
        };
        assert!(by_param("string").matches(name, &tree, &catalog));
        assert!(!by_param("i32").matches(name, &tree, &catalog));
        assert!(by_param("string").is_setter());
    }

    #[test]
    fn scope_narrows_to_subtree() {
        let catalog = catalog();
        let tree = tree(&catalog);
        let home_city = find(&tree, "Person.home.city");
        let work_city = find(&tree, "Person.work.city");
        let in_home = field(None, "city").within([field(Some("Person"), "home").to_scope()]);
        assert!(in_home.matches(home_city, &tree, &catalog));
        assert!(!in_home.matches(work_city, &tree, &catalog));
    }

    #[test]
    fn scopes_apply_in_order() {
        let catalog = catalog();
        let tree = tree(&catalog);
        let home_city = find(&tree, "Person.home.city");
        let person = Selector::exact(Target::Type(TypeKey::new("Person").unwrap())).to_scope();
        let address = Selector::exact(Target::Type(TypeKey::new("Address").unwrap())).to_scope();

        let ordered = field(None, "city").within([person.clone(), address.clone()]);
        assert!(ordered.matches(home_city, &tree, &catalog));

        let reversed = field(None, "city").within([address, person]);
        assert!(!reversed.matches(home_city, &tree, &catalog));
    }

    #[test]
    fn display() {
        let scoped = field(Some("Address"), "city").within([field(Some("Person"), "home").to_scope()]);
        assert_eq!(
            scoped.to_string(),
            "field(Address.city).within(scope(field(Person.home)))"
        );
        assert_eq!(Selector::exact(Target::Root).to_string(), "root()");
    }

    #[test]
    fn group_flattens_members() {
        let group = SelectorGroup::new(vec![field(None, "a"), field(None, "b")]);
        assert_eq!(TargetSelector::from(group).flatten().len(), 2);
    }
}
