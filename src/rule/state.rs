//! Bindings accumulated over one match attempt.
//!
//! Entries borrow from the candidate tree, so a state can never outlive the
//! attempt that produced it and a fresh attempt necessarily starts empty.

use hashbrown::HashMap;
use intern_all::Tok;

use crate::tree::{deep_eq_slice, Node};

/// The candidate subtree(s) one placeholder stood in for
#[derive(Clone, Copy, Debug)]
pub enum StateEntry<'a> {
  /// The placeholder matched a single node
  One(&'a Node),
  /// An occurrence-ranged placeholder consumed consecutive siblings
  Many(&'a [Node]),
}
impl<'a> StateEntry<'a> {
  /// Whether two values recorded under the same name agree. Identity is
  /// irrelevant here; a placeholder that occurs twice must stand in for
  /// structurally equal code.
  pub fn compatible(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::One(l), Self::One(r)) => l.deep_eq(r),
      (Self::Many(l), Self::Many(r)) => deep_eq_slice(l, r),
      (..) => false,
    }
  }
}

/// Placeholder bindings of one match attempt
#[derive(Clone, Debug, Default)]
pub struct State<'a>(HashMap<Tok<String>, StateEntry<'a>>);
impl<'a> State<'a> {
  /// The empty binding set, the result of a successful match without
  /// placeholders
  pub fn new() -> Self { Self(HashMap::new()) }

  /// A singleton binding set
  pub fn of(name: Tok<String>, entry: StateEntry<'a>) -> Self {
    Self(HashMap::from_iter([(name, entry)]))
  }

  /// Look up the value bound to a name
  pub fn get(&self, name: &Tok<String>) -> Option<&StateEntry<'a>> {
    self.0.get(name)
  }

  /// Number of bound names
  pub fn len(&self) -> usize { self.0.len() }

  /// Whether no names are bound
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Visit all bindings
  pub fn iter(&self) -> impl Iterator<Item = (&Tok<String>, &StateEntry<'a>)> {
    self.0.iter()
  }

  /// Conjoin two sub-match outcomes. Fails if the same name is bound to
  /// structurally different values, which makes repeated placeholder
  /// occurrences behave as unification constraints.
  #[must_use]
  pub fn merge(mut self, other: Self) -> Option<Self> {
    for (name, entry) in other.0 {
      match self.0.get(&name) {
        Some(prev) if !prev.compatible(&entry) => return None,
        _ => {
          self.0.insert(name, entry);
        },
      }
    }
    Some(self)
  }
}

#[cfg(test)]
mod test {
  use intern_all::i;

  use super::{State, StateEntry};
  use crate::tree::Node;

  #[test]
  fn merge_consistent() {
    let a = Node::name("a");
    let b = Node::name("a");
    let merged = State::of(i("X"), StateEntry::One(&a))
      .merge(State::of(i("X"), StateEntry::One(&b)));
    assert_eq!(merged.unwrap().len(), 1, "equal rebinding collapses");
  }

  #[test]
  fn merge_conflicting() {
    let a = Node::name("a");
    let b = Node::name("b");
    let merged = State::of(i("X"), StateEntry::One(&a))
      .merge(State::of(i("X"), StateEntry::One(&b)));
    assert!(merged.is_none(), "conflicting rebinding fails the match");
  }

  #[test]
  fn merge_disjoint() {
    let a = Node::name("a");
    let b = Node::name("b");
    let merged = State::of(i("X"), StateEntry::One(&a))
      .merge(State::of(i("Y"), StateEntry::One(&b)))
      .unwrap();
    assert_eq!(merged.len(), 2);
  }
}
