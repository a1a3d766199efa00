//! Wildcard constraints and the substitution handler protocol.
//!
//! A handler is consulted only at name-reference nodes; everywhere else
//! matching is structural. Validation and binding are separate steps and the
//! matcher must never bind a node that did not validate.

use intern_all::Tok;
use regex::Regex;

use crate::rule::state::StateEntry;
use crate::tree::Node;

/// The constraints declared for one named wildcard
#[derive(Clone, Debug)]
pub struct Placeholder {
  /// The variable name bindings are recorded under
  pub name: Tok<String>,
  /// If set, the rendered text of every bound node must match
  pub text: Option<Regex>,
  /// Fewest consecutive siblings the wildcard may consume
  pub min: usize,
  /// Most consecutive siblings the wildcard may consume
  pub max: usize,
  /// Bind only candidates whose static type is a subtype of the constraint
  /// type. Reserved; handlers with this flag reject every candidate until
  /// subtype matching is specified.
  pub subtype: bool,
  /// Like [Placeholder::subtype] but excluding the constraint type itself.
  /// Reserved, same treatment.
  pub strict_subtype: bool,
}
impl Placeholder {
  /// A plain substitution: exactly one node, no text filter
  pub fn simple(name: Tok<String>) -> Self {
    Self { name, text: None, min: 1, max: 1, subtype: false, strict_subtype: false }
  }
  /// A wildcard that may consume `min..=max` consecutive siblings
  pub fn ranged(name: Tok<String>, min: usize, max: usize) -> Self {
    Self { min, max, ..Self::simple(name) }
  }
  /// Constrain the rendered text of bound nodes
  pub fn filtered(self, pattern: &str) -> Result<Self, regex::Error> {
    Ok(Self { text: Some(Regex::new(pattern)?), ..self })
  }
}

/// Enforces one [Placeholder]'s constraints and produces its bindings
#[derive(Clone, Debug)]
pub struct SubstitutionHandler {
  placeholder: Placeholder,
}
impl SubstitutionHandler {
  /// Wrap a placeholder declaration
  pub fn new(placeholder: Placeholder) -> Self { Self { placeholder } }

  /// The wrapped declaration
  pub fn placeholder(&self) -> &Placeholder { &self.placeholder }

  /// The name bindings are recorded under
  pub fn name(&self) -> Tok<String> { self.placeholder.name.clone() }

  /// Whether the occurrence range admits anything but exactly one node. Such
  /// a wildcard only makes sense within a sibling sequence.
  pub fn is_vectorial(&self) -> bool {
    self.placeholder.min != 1 || self.placeholder.max != 1
  }

  /// Check a single candidate against the constraints. No side effects.
  #[must_use]
  pub fn validate(&self, node: &Node) -> bool {
    if self.placeholder.subtype || self.placeholder.strict_subtype {
      // Subtype semantics are unspecified, reject rather than guess
      return false;
    }
    match &self.placeholder.text {
      Some(filter) => filter.is_match(&node.to_string()),
      None => true,
    }
  }

  /// Produce the binding for a validated single candidate
  #[must_use]
  pub fn bind<'a>(&self, node: &'a Node) -> (Tok<String>, StateEntry<'a>) {
    (self.name(), StateEntry::One(node))
  }

  /// Check a span of consecutive siblings: length within the occurrence
  /// range and every element passing [SubstitutionHandler::validate]
  #[must_use]
  pub fn validate_seq(&self, nodes: &[Node]) -> bool {
    (self.placeholder.min..=self.placeholder.max).contains(&nodes.len())
      && nodes.iter().all(|node| self.validate(node))
  }

  /// Produce the binding for a validated span
  #[must_use]
  pub fn bind_seq<'a>(&self, nodes: &'a [Node]) -> (Tok<String>, StateEntry<'a>) {
    (self.name(), StateEntry::Many(nodes))
  }
}
