//! Abstraction over things that can be applied to a candidate subtree

use super::state::State;
use crate::pattern::Pattern;
use crate::tree::Node;

/// Anything that can be applied to a candidate subtree to yield placeholder
/// bindings. The embedding engine drives candidate selection and
/// backtracking; an implementor only ever decides one pairing.
pub trait Matcher {
  /// Attempt the match; [None] indicates no match and carries no further
  /// diagnostic
  fn apply<'a>(&self, candidate: &'a Node) -> Option<State<'a>>;
}

impl Matcher for Pattern {
  fn apply<'a>(&self, candidate: &'a Node) -> Option<State<'a>> {
    self.matches(candidate)
  }
}
