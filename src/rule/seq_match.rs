//! Ordered sibling-sequence matching.
//!
//! Non-vectorial pattern elements pair up with candidate siblings one to
//! one, in order. A name reference whose placeholder admits an occurrence
//! count other than exactly one is vectorial: it may consume a span of
//! consecutive siblings within its range. Split points are searched from the
//! shortest admissible span upward, so the first full-sequence solution is
//! deterministic.

use super::node_match::node_match;
use super::state::State;
use crate::pattern::placeholder::SubstitutionHandler;
use crate::pattern::Pattern;
use crate::tree::{Node, NodeKind};

/// The handler of a pattern element that may consume a variable number of
/// siblings, if it is one
fn vec_handler<'p>(
  ctx: &'p Pattern,
  element: &Node,
) -> Option<&'p SubstitutionHandler> {
  match &element.kind {
    NodeKind::Name(ident) => {
      let handler =
        ctx.handler(ident.id).or_else(|| ctx.handler(element.id))?;
      handler.is_vectorial().then_some(handler)
    },
    _ => None,
  }
}

/// Match two ordered sibling sequences element-wise. Length disagreement not
/// absorbed by an occurrence range is a mismatch; so is any element-level
/// mismatch.
#[must_use]
pub fn seq_match<'a>(
  ctx: &Pattern,
  pattern: &[Node],
  candidate: &'a [Node],
) -> Option<State<'a>> {
  let (first, rest) = match pattern.split_first() {
    Some(pair) => pair,
    None => return candidate.is_empty().then(State::new),
  };
  match vec_handler(ctx, first) {
    None => {
      let (head, tail) = candidate.split_first()?;
      node_match(ctx, first, head)?.merge(seq_match(ctx, rest, tail)?)
    },
    Some(handler) => {
      let floor = handler.placeholder().min;
      let ceil = handler.placeholder().max.min(candidate.len());
      for take in floor..=ceil {
        let (span, tail) = candidate.split_at(take);
        if !handler.validate_seq(span) {
          continue;
        }
        let tail_state = match seq_match(ctx, rest, tail) {
          Some(state) => state,
          None => continue,
        };
        let (name, entry) = handler.bind_seq(span);
        match State::of(name, entry).merge(tail_state) {
          Some(state) => return Some(state),
          None => continue,
        }
      }
      None
    },
  }
}

#[cfg(test)]
mod test {
  use intern_all::i;

  use crate::pattern::placeholder::Placeholder;
  use crate::pattern::PatternBuilder;
  use crate::rule::state::StateEntry;
  use crate::tree::{Ident, Node};

  fn indexed(indices: Vec<Node>) -> Node {
    Node::array_access(Node::name("xs"), indices)
  }

  #[test]
  fn vectorial_consumes_a_span() {
    let ident = Ident::new("rest");
    let key = ident.id;
    let pattern = PatternBuilder::new(indexed(vec![
      Node::literal("0"),
      Node::name_of(ident),
    ]))
    .attach(Placeholder::ranged(i("rest"), 1, 3), &[key])
    .unwrap()
    .build();

    let candidate = indexed(vec![
      Node::literal("0"),
      Node::literal("1"),
      Node::literal("2"),
    ]);
    let state = pattern.matches(&candidate).unwrap();
    assert!(
      matches!(state.get(&i("rest")), Some(StateEntry::Many(s)) if s.len() == 2)
    );
  }

  #[test]
  fn zero_width_needs_min_zero() {
    let mk = |min: usize| {
      let ident = Ident::new("v");
      let key = ident.id;
      PatternBuilder::new(indexed(vec![Node::name_of(ident)]))
        .attach(Placeholder::ranged(i("v"), min, 2), &[key])
        .unwrap()
        .build()
    };
    let empty = indexed(vec![]);
    assert!(mk(0).matches(&empty).is_some());
    assert!(mk(1).matches(&empty).is_none());
  }

  #[test]
  fn occurrence_ceiling_respected() {
    let ident = Ident::new("all");
    let key = ident.id;
    let pattern = PatternBuilder::new(indexed(vec![Node::name_of(ident)]))
      .attach(Placeholder::ranged(i("all"), 0, 2), &[key])
      .unwrap()
      .build();
    let candidate = indexed(vec![
      Node::literal("1"),
      Node::literal("2"),
      Node::literal("3"),
    ]);
    assert!(
      pattern.matches(&candidate).is_none(),
      "three siblings exceed the ceiling of two"
    );
  }

  #[test]
  fn shortest_admissible_span_wins() {
    let a = Ident::new("a");
    let b = Ident::new("b");
    let keys = (a.id, b.id);
    let pattern = PatternBuilder::new(indexed(vec![
      Node::name_of(a),
      Node::name_of(b),
    ]))
    .attach(Placeholder::ranged(i("a"), 0, 3), &[keys.0])
    .unwrap()
    .attach(Placeholder::ranged(i("b"), 0, 3), &[keys.1])
    .unwrap()
    .build();
    let candidate = indexed(vec![Node::literal("1"), Node::literal("2")]);
    let state = pattern.matches(&candidate).unwrap();
    assert!(
      matches!(state.get(&i("a")), Some(StateEntry::Many(s)) if s.is_empty()),
      "the leading vectorial takes as little as possible"
    );
    assert!(
      matches!(state.get(&i("b")), Some(StateEntry::Many(s)) if s.len() == 2)
    );
  }

  #[test]
  fn per_element_filter_applies_to_spans() {
    let ident = Ident::new("nums");
    let key = ident.id;
    let pattern = PatternBuilder::new(indexed(vec![Node::name_of(ident)]))
      .attach(
        Placeholder::ranged(i("nums"), 1, 4).filtered("^[0-9]+$").unwrap(),
        &[key],
      )
      .unwrap()
      .build();
    assert!(pattern
      .matches(&indexed(vec![Node::literal("1"), Node::literal("2")]))
      .is_some());
    assert!(
      pattern
        .matches(&indexed(vec![Node::literal("1"), Node::name("x")]))
        .is_none(),
      "every element of the span must pass the filter"
    );
  }

  #[test]
  fn scalar_elements_stay_positional() {
    let pattern = PatternBuilder::new(indexed(vec![
      Node::literal("1"),
      Node::literal("2"),
    ]))
    .build();
    assert!(pattern
      .matches(&indexed(vec![Node::literal("1"), Node::literal("2")]))
      .is_some());
    assert!(pattern
      .matches(&indexed(vec![Node::literal("1")]))
      .is_none());
    assert!(pattern
      .matches(&indexed(vec![
        Node::literal("1"),
        Node::literal("2"),
        Node::literal("3")
      ]))
      .is_none());
  }

  #[test]
  fn type_ref_children_are_a_sequence() {
    let pattern = PatternBuilder::new(Node::type_ref(vec![
      Node::name("List"),
      Node::name("Int"),
    ]))
    .build();
    assert!(pattern
      .matches(&Node::type_ref(vec![Node::name("List"), Node::name("Int")]))
      .is_some());
    assert!(pattern
      .matches(&Node::type_ref(vec![Node::name("List")]))
      .is_none());
  }
}
