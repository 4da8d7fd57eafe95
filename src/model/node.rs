//! model::node
//!
//! The node tree: every position reachable from a root type.
//!
//! # Structure
//!
//! Nodes live in a flat arena indexed by [`NodeId`]; the root is always id
//! `0`. Record nodes have one child per field in declaration order, list
//! nodes have a single element child. Expansion stops at `max_depth` and at
//! record types that already appear among a node's ancestors; the latter
//! are marked cyclic and always generate null.
//!
//! A node may be given a concrete subtype of its target while the tree is
//! built (a delegating binding naming a subtype). Its children then follow
//! the fields of that subtype.

use std::fmt::Write as _;

use crate::core::catalog::{Reflector, TypeKind};
use crate::core::types::{FieldRef, TypeKey};
use crate::error::UsageError;

/// Index of a node in its tree.
pub type NodeId = usize;

/// Structural kind of a node's target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Record,
    List,
    Enum,
    Interface,
}

impl NodeKind {
    fn of(kind: Option<&TypeKind>) -> Self {
        match kind {
            Some(TypeKind::Record) => NodeKind::Record,
            Some(TypeKind::List { .. }) => NodeKind::List,
            Some(TypeKind::Enum { .. }) => NodeKind::Enum,
            Some(TypeKind::Interface) => NodeKind::Interface,
            Some(TypeKind::Scalar) | None => NodeKind::Scalar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Record => "record",
            NodeKind::List => "list",
            NodeKind::Enum => "enum",
            NodeKind::Interface => "interface",
        }
    }
}

/// One position in the object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    target: TypeKey,
    kind: NodeKind,
    field: Option<FieldRef>,
    setter: Option<String>,
    depth: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    cyclic: bool,
    concrete: Option<TypeKey>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn target(&self) -> &TypeKey {
        &self.target
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The field this node fills, if its parent is a record.
    pub fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    /// Name of the setter writing this node's field, if the catalog has one.
    pub fn setter(&self) -> Option<&str> {
        self.setter.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Subtype whose fields this node's children describe, when it differs
    /// from the target.
    pub fn concrete(&self) -> Option<&TypeKey> {
        self.concrete.as_ref()
    }

    /// The type the node's children were expanded from.
    pub fn shape(&self) -> &TypeKey {
        self.concrete.as_ref().unwrap_or(&self.target)
    }
}

/// Chooses a concrete subtype for a node while the tree is built.
pub type Refine<'a> = &'a dyn Fn(&Node, &NodeTree) -> Option<TypeKey>;

/// Immutable tree of nodes for one root type.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Build the tree for `root`.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::UnknownRoot` if `root` is not in the catalog.
    pub fn build(
        reflector: &dyn Reflector,
        root: &TypeKey,
        max_depth: usize,
    ) -> Result<Self, UsageError> {
        Self::build_with(reflector, root, max_depth, &|_, _| None)
    }

    /// Build the tree, asking `refine` for a concrete subtype of each node
    /// before its children are expanded.
    ///
    /// Answers that are not a proper subtype of the node's target are
    /// ignored.
    pub fn build_with(
        reflector: &dyn Reflector,
        root: &TypeKey,
        max_depth: usize,
        refine: Refine<'_>,
    ) -> Result<Self, UsageError> {
        if !reflector.contains(root) {
            return Err(UsageError::UnknownRoot(root.to_string()));
        }
        let mut tree = Self { nodes: Vec::new() };
        let mut walk = Walk {
            reflector,
            refine,
            max_depth,
        };
        walk.expand(&mut tree, root.clone(), None, None, 0);
        Ok(tree)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node itself, then each parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.nodes.get(id), move |n| {
            n.parent.and_then(|p| self.nodes.get(p))
        })
    }

    /// Dotted display path, e.g. `Order.lines[].sku`.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments: Vec<String> = self
            .ancestors(id)
            .map(|n| match (&n.field, n.parent) {
                (Some(f), _) => format!(".{}", f.name),
                (None, Some(_)) => "[]".to_string(),
                (None, None) => n.target.to_string(),
            })
            .collect();
        segments.reverse();
        segments.concat()
    }

    /// One line per node, indented by depth.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(0, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let label = match (&node.field, node.parent) {
            (Some(f), _) => f.name.clone(),
            (None, Some(_)) => "[]".to_string(),
            (None, None) => "<root>".to_string(),
        };
        let _ = write!(
            out,
            "{}{}: {} ({})",
            "  ".repeat(node.depth),
            label,
            node.target,
            node.kind.as_str()
        );
        if let Some(setter) = &node.setter {
            let _ = write!(out, " via {setter}");
        }
        if let Some(concrete) = &node.concrete {
            let _ = write!(out, " as {concrete}");
        }
        if node.cyclic {
            out.push_str(" [cyclic]");
        }
        out.push('\n');
        for child in &node.children {
            self.render_node(*child, out);
        }
    }
}

/// One tree build.
struct Walk<'a> {
    reflector: &'a dyn Reflector,
    refine: Refine<'a>,
    max_depth: usize,
}

impl Walk<'_> {
    fn expand(
        &self,
        tree: &mut NodeTree,
        target: TypeKey,
        field: Option<FieldRef>,
        parent: Option<NodeId>,
        depth: usize,
    ) -> NodeId {
        let reflector = self.reflector;
        let kind = NodeKind::of(reflector.describe(&target).map(|d| &d.kind));
        let setter = field
            .as_ref()
            .and_then(|f| reflector.setter_for(&f.declaring, &f.name))
            .map(|m| m.name.clone());

        let id = tree.nodes.len();
        tree.nodes.push(Node {
            id,
            target: target.clone(),
            kind,
            field,
            setter,
            depth,
            parent,
            children: Vec::new(),
            cyclic: false,
            concrete: None,
        });

        let built: &NodeTree = tree;
        let concrete = (self.refine)(&built.nodes[id], built)
            .filter(|ty| ty != &target && reflector.is_assignable(ty, &target));
        let shape = concrete.clone().unwrap_or(target);
        let desc = reflector.describe(&shape);
        let cyclic = matches!(desc.map(|d| &d.kind), Some(TypeKind::Record))
            && parent.is_some_and(|p| tree.ancestors(p).any(|a| a.shape() == &shape));

        let node = &mut tree.nodes[id];
        node.cyclic = cyclic;
        node.concrete = concrete;
        if cyclic || depth >= self.max_depth {
            return id;
        }

        let mut children = Vec::new();
        match desc.map(|d| &d.kind) {
            Some(TypeKind::Record) => {
                let fields = desc.map(|d| d.fields.clone()).unwrap_or_default();
                for f in fields {
                    let field = FieldRef {
                        declaring: shape.clone(),
                        name: f.name,
                        ty: f.ty.clone(),
                    };
                    children.push(self.expand(tree, f.ty, Some(field), Some(id), depth + 1));
                }
            }
            Some(TypeKind::List { element }) => {
                children.push(self.expand(tree, element.clone(), None, Some(id), depth + 1));
            }
            _ => {}
        }
        tree.nodes[id].children = children;
        id
    }
}
