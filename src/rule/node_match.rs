//! The per-kind structural matching rules.
//!
//! One rule per syntactic category, written as a single closed `match` over
//! the pattern/candidate kind pair. Every rule is a pure function from the
//! node pair to an optional binding set; a kind mismatch falls into the
//! catch-all arm, so failing fast cannot leave partial side effects behind.
//! Placeholders are resolved only at name references, the one position in
//! this grammar where a wildcard can stand in for an arbitrary subtree.

use super::seq_match::seq_match;
use super::state::State;
use crate::pattern::Pattern;
use crate::tree::{Ident, Node, NodeKind};

/// Match a single pattern node against a single candidate node, yielding the
/// bindings collected underneath. [None] is the sole failure channel; no
/// rule panics and no rule binds anything on a failed validation.
#[must_use]
pub fn node_match<'a>(
  ctx: &Pattern,
  pattern: &Node,
  candidate: &'a Node,
) -> Option<State<'a>> {
  use NodeKind as K;
  // Name references resolve placeholders and may therefore pair up with a
  // candidate of any kind
  if let K::Name(ident) = &pattern.kind {
    return name_match(ctx, pattern, ident, candidate);
  }
  match (&pattern.kind, &candidate.kind) {
    (
      K::ArrayAccess { array: a1, indices: i1 },
      K::ArrayAccess { array: a2, indices: i2 },
    ) => node_match(ctx, a1, a2)?.merge(seq_match(ctx, i1, i2)?),
    (
      K::Binary { op: o1, lhs: l1, rhs: r1 },
      K::Binary { op: o2, lhs: l2, rhs: r2 },
    ) => {
      // Operator identity first, cheaper than recursing into operands
      if o1 != o2 {
        return None;
      }
      node_match(ctx, l1, l2)?.merge(node_match(ctx, r1, r2)?)
    },
    // Literals have no structure, they compare verbatim
    (K::Literal(t1), K::Literal(t2)) =>
      text_match(t1.as_str(), t2.as_str()).then(State::new),
    (K::Break { label: l1 }, K::Break { label: l2 }) =>
      opt_match(ctx, l1.as_deref(), l2.as_deref()),
    (K::Continue { label: l1 }, K::Continue { label: l2 }) =>
      opt_match(ctx, l1.as_deref(), l2.as_deref()),
    (K::This { label: l1 }, K::This { label: l2 }) =>
      opt_match(ctx, l1.as_deref(), l2.as_deref()),
    (
      K::Super { label: l1, qualifier: q1 },
      K::Super { label: l2, qualifier: q2 },
    ) => opt_match(ctx, l1.as_deref(), l2.as_deref())?
      .merge(opt_match(ctx, q1.as_deref(), q2.as_deref())?),
    (
      K::Return { label: l1, value: v1 },
      K::Return { label: l2, value: v2 },
    ) => opt_match(ctx, l1.as_deref(), l2.as_deref())?
      .merge(opt_match(ctx, v1.as_deref(), v2.as_deref())?),
    (K::TypeRef { children: c1 }, K::TypeRef { children: c2 }) =>
      seq_match(ctx, c1, c2),
    (
      K::Dot { receiver: r1, selector: s1 },
      K::Dot { receiver: r2, selector: s2 },
    ) => node_match(ctx, r1, r2)?.merge(node_match(ctx, s1, s2)?),
    // Only the callee participates; argument filtering belongs to the
    // surrounding engine
    (K::Call { callee: c1, .. }, K::Call { callee: c2, .. }) =>
      node_match(ctx, c1, c2),
    (
      K::Tree { head: h1, children: c1 },
      K::Tree { head: h2, children: c2 },
    ) => {
      if h1 != h2 {
        return None;
      }
      seq_match(ctx, c1, c2)
    },
    (..) => None,
  }
}

/// The name rule, the placeholder resolution point. The handler may be keyed
/// to the identifier leaf or to the whole reference expression, whichever
/// way the template declared it.
fn name_match<'a>(
  ctx: &Pattern,
  pattern: &Node,
  ident: &Ident,
  candidate: &'a Node,
) -> Option<State<'a>> {
  let handler =
    ctx.handler(ident.id).or_else(|| ctx.handler(pattern.id));
  match handler {
    Some(handler) => {
      // validate never binds; a rejected candidate leaves no trace
      if !handler.validate(candidate) {
        return None;
      }
      let (name, entry) = handler.bind(candidate);
      Some(State::of(name, entry))
    },
    None => match &candidate.kind {
      NodeKind::Name(other) =>
        text_match(ident.text.as_str(), other.text.as_str())
          .then(State::new),
      _ => None,
    },
  }
}

/// Match two optional sub-nodes. Both absent is a success, an asymmetry is a
/// failure.
#[must_use]
pub fn opt_match<'a>(
  ctx: &Pattern,
  pattern: Option<&Node>,
  candidate: Option<&'a Node>,
) -> Option<State<'a>> {
  match (pattern, candidate) {
    (None, None) => Some(State::new()),
    (Some(p), Some(c)) => node_match(ctx, p, c),
    (..) => None,
  }
}

/// Verbatim text comparison, no normalization. A named seam so that a
/// pattern-aware comparison can slot in without touching the rules.
#[must_use]
pub fn text_match(pattern: &str, candidate: &str) -> bool {
  pattern == candidate
}
