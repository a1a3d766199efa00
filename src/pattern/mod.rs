//! Compiled search patterns.
//!
//! A [Pattern] owns the pattern tree produced by the template compiler and a
//! registry of [SubstitutionHandler]s keyed by node identity. A single
//! logical placeholder may be registered under two alias keys, the
//! identifier leaf and the whole reference expression, because a template may
//! declare it to bind either one.

pub mod placeholder;

use hashbrown::{HashMap, HashSet};
use intern_all::Tok;

use self::placeholder::{Placeholder, SubstitutionHandler};
use crate::rule::node_match::node_match;
use crate::rule::state::State;
use crate::tree::{Node, NodeId, NodeKind};

/// Problems detected while assembling a [Pattern]. Matching itself never
/// produces these; its only failure channel is a [None] outcome.
#[derive(Debug)]
pub enum PatternError {
  /// The occurrence range is empty or admits zero-width-only matches
  BadRange(Tok<String>, usize, usize),
  /// The text filter is not a valid regex
  BadTextFilter(regex::Error),
  /// A handler key refers to a node outside the pattern tree
  UnknownNode(NodeId),
  /// The same placeholder name was registered twice
  DuplicateName(Tok<String>),
}
impl std::fmt::Display for PatternError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::BadRange(name, min, max) => {
        write!(f, "Occurrence range {min}..{max} of ${} is invalid", name.as_str())
      },
      Self::BadTextFilter(e) => write!(f, "Invalid text filter: {e}"),
      Self::UnknownNode(id) => {
        write!(f, "Handler key {id:?} does not occur in the pattern tree")
      },
      Self::DuplicateName(name) => {
        write!(f, "Placeholder ${} registered twice", name.as_str())
      },
    }
  }
}
impl std::error::Error for PatternError {}
impl From<regex::Error> for PatternError {
  fn from(e: regex::Error) -> Self { Self::BadTextFilter(e) }
}

/// A compiled search pattern: the pattern tree plus the identity-keyed
/// placeholder registry. Immutable once built, so attempts against distinct
/// candidates may run in parallel.
#[derive(Clone, Debug)]
pub struct Pattern {
  root: Node,
  handlers: HashMap<NodeId, SubstitutionHandler>,
}
impl Pattern {
  /// The root of the pattern tree
  pub fn root(&self) -> &Node { &self.root }

  /// The handler attached to the given node identity, if any
  pub fn handler(&self, id: NodeId) -> Option<&SubstitutionHandler> {
    self.handlers.get(&id)
  }

  /// Attempt to match a candidate subtree against this whole pattern. Every
  /// attempt starts from an empty binding set; [None] is the sole failure
  /// signal.
  #[must_use]
  pub fn matches<'a>(&self, candidate: &'a Node) -> Option<State<'a>> {
    node_match(self, &self.root, candidate)
  }
}

/// Assembles a [Pattern], validating handler declarations as they are
/// attached
#[derive(Debug)]
pub struct PatternBuilder {
  root: Node,
  ids: HashSet<NodeId>,
  handlers: HashMap<NodeId, SubstitutionHandler>,
  names: HashSet<Tok<String>>,
}
impl PatternBuilder {
  /// Start from a pattern tree
  pub fn new(root: Node) -> Self {
    let mut ids = HashSet::new();
    collect_ids(&root, &mut ids);
    Self { root, ids, handlers: HashMap::new(), names: HashSet::new() }
  }

  /// Attach a placeholder under one or more alias keys. Passing both the
  /// identifier leaf and its enclosing reference expression registers the
  /// same logical placeholder under two keys.
  pub fn attach(
    mut self,
    placeholder: Placeholder,
    keys: &[NodeId],
  ) -> Result<Self, PatternError> {
    if placeholder.max == 0 || placeholder.max < placeholder.min {
      return Err(PatternError::BadRange(
        placeholder.name.clone(),
        placeholder.min,
        placeholder.max,
      ));
    }
    if !self.names.insert(placeholder.name.clone()) {
      return Err(PatternError::DuplicateName(placeholder.name.clone()));
    }
    let handler = SubstitutionHandler::new(placeholder);
    for key in keys {
      if !self.ids.contains(key) {
        return Err(PatternError::UnknownNode(*key));
      }
      self.handlers.insert(*key, handler.clone());
    }
    Ok(self)
  }

  /// Finalize the pattern
  pub fn build(self) -> Pattern {
    Pattern { root: self.root, handlers: self.handlers }
  }
}

/// Walk the tree and record every attachable identity, including identifier
/// leaves
fn collect_ids(node: &Node, ids: &mut HashSet<NodeId>) {
  use NodeKind as K;
  fn opt(n: &Option<Box<Node>>, ids: &mut HashSet<NodeId>) {
    if let Some(n) = n {
      collect_ids(n, ids)
    }
  }
  ids.insert(node.id);
  match &node.kind {
    K::ArrayAccess { array, indices } => {
      collect_ids(array, ids);
      indices.iter().for_each(|n| collect_ids(n, ids));
    },
    K::Binary { lhs, rhs, .. } => {
      collect_ids(lhs, ids);
      collect_ids(rhs, ids);
    },
    K::Literal(_) => (),
    K::Name(ident) => {
      ids.insert(ident.id);
    },
    K::Break { label } | K::Continue { label } | K::This { label } =>
      opt(label, ids),
    K::Super { label, qualifier } => {
      opt(label, ids);
      opt(qualifier, ids);
    },
    K::Return { label, value } => {
      opt(label, ids);
      opt(value, ids);
    },
    K::TypeRef { children } | K::Tree { children, .. } =>
      children.iter().for_each(|n| collect_ids(n, ids)),
    K::Dot { receiver, selector } => {
      collect_ids(receiver, ids);
      collect_ids(selector, ids);
    },
    K::Call { callee, args } => {
      collect_ids(callee, ids);
      args.iter().for_each(|n| collect_ids(n, ids));
    },
  }
}
