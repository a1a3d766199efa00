//! Parse-tree representation read by the matcher.
//!
//! Trees are produced by a parsing front end and never mutated here. Every
//! node carries an identity assigned at construction; search patterns attach
//! placeholder handlers to nodes by this identity, never by value.

use std::fmt::Display;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use intern_all::{i, Tok};
use itertools::Itertools;

/// Identity of a single parse-tree node, unique within the process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(NonZeroU64);
impl NodeId {
  /// Allocate the next unused identity
  pub fn new() -> Self {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    let id = NEXT.fetch_add(1, Ordering::Relaxed);
    Self(id.try_into().expect("node ID wraparound"))
  }
}
impl Default for NodeId {
  fn default() -> Self { Self::new() }
}

/// An identifier leaf. It has an identity of its own, distinct from the
/// reference expression that owns it, because a placeholder may be declared
/// to bind either one.
#[derive(Clone, Debug)]
pub struct Ident {
  /// Identity of the leaf
  pub id: NodeId,
  /// The identifier text
  pub text: Tok<String>,
}
impl Ident {
  /// Intern the text and allocate a fresh identity
  pub fn new(text: &str) -> Self { Self { id: NodeId::new(), text: i(text) } }
}
impl Display for Ident {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.text.as_str())
  }
}

/// A parse-tree node: an identity plus a syntactic form
#[derive(Clone, Debug)]
pub struct Node {
  /// Identity, the key for placeholder attachment
  pub id: NodeId,
  /// The syntactic form and its sub-nodes
  pub kind: NodeKind,
}

/// The syntactic categories the matcher knows how to decompose, plus an
/// open-ended remainder ([NodeKind::Tree]) for every other construct.
#[derive(Clone, Debug)]
pub enum NodeKind {
  /// Indexing, eg. `xs[a, b]`
  ArrayAccess {
    /// The indexed expression
    array: Box<Node>,
    /// The ordered index expressions
    indices: Vec<Node>,
  },
  /// Infix application of an operator token
  Binary {
    /// Operator token, eg. `+`
    op: Tok<String>,
    /// Left operand
    lhs: Box<Node>,
    /// Right operand
    rhs: Box<Node>,
  },
  /// A constant literal, kept in its verbatim textual form
  Literal(Tok<String>),
  /// A simple name reference wrapping an identifier leaf
  Name(Ident),
  /// `break`, with an optional target label
  Break {
    /// Target label, if any
    label: Option<Box<Node>>,
  },
  /// `continue`, with an optional target label
  Continue {
    /// Target label, if any
    label: Option<Box<Node>>,
  },
  /// `this`, with an optional target label
  This {
    /// Target label, if any
    label: Option<Box<Node>>,
  },
  /// `super`, which can carry both a label and a supertype qualifier
  Super {
    /// Target label, if any
    label: Option<Box<Node>>,
    /// Supertype qualifier, if any
    qualifier: Option<Box<Node>>,
  },
  /// `return`, with an optional label and an optional returned value
  Return {
    /// Target label, if any
    label: Option<Box<Node>>,
    /// Returned value expression, if any
    value: Option<Box<Node>>,
  },
  /// A type reference, decomposed into its ordered structural children
  /// (qualifiers, type arguments)
  TypeRef {
    /// Ordered structural children of the type element
    children: Vec<Node>,
  },
  /// Qualified access, `receiver.selector`
  Dot {
    /// The left-hand receiver
    receiver: Box<Node>,
    /// The right-hand selector
    selector: Box<Node>,
  },
  /// A call. The argument list is part of the tree but the call rule only
  /// ever consults the callee.
  Call {
    /// The called expression
    callee: Box<Node>,
    /// Ordered argument expressions
    args: Vec<Node>,
  },
  /// Any construct outside the enumerated set; a head token plus ordered
  /// children, matched purely structurally
  Tree {
    /// Token naming the construct
    head: Tok<String>,
    /// Ordered sub-nodes
    children: Vec<Node>,
  },
}

impl Node {
  /// Wrap a syntactic form with a fresh identity
  pub fn new(kind: NodeKind) -> Self { Self { id: NodeId::new(), kind } }

  /// Indexing expression
  pub fn array_access(array: Node, indices: Vec<Node>) -> Self {
    Self::new(NodeKind::ArrayAccess { array: Box::new(array), indices })
  }
  /// Infix operator application
  pub fn binary(op: &str, lhs: Node, rhs: Node) -> Self {
    Self::new(NodeKind::Binary {
      op: i(op),
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    })
  }
  /// Constant literal from its verbatim text
  pub fn literal(text: &str) -> Self { Self::new(NodeKind::Literal(i(text))) }
  /// Simple name reference with a fresh identifier leaf
  pub fn name(text: &str) -> Self { Self::name_of(Ident::new(text)) }
  /// Simple name reference around an existing leaf, for callers that need
  /// the leaf's identity
  pub fn name_of(ident: Ident) -> Self { Self::new(NodeKind::Name(ident)) }
  /// `break`, optionally labeled
  pub fn break_expr(label: Option<Node>) -> Self {
    Self::new(NodeKind::Break { label: label.map(Box::new) })
  }
  /// `continue`, optionally labeled
  pub fn continue_expr(label: Option<Node>) -> Self {
    Self::new(NodeKind::Continue { label: label.map(Box::new) })
  }
  /// `this`, optionally labeled
  pub fn this_expr(label: Option<Node>) -> Self {
    Self::new(NodeKind::This { label: label.map(Box::new) })
  }
  /// `super`, optionally labeled and qualified
  pub fn super_expr(label: Option<Node>, qualifier: Option<Node>) -> Self {
    Self::new(NodeKind::Super {
      label: label.map(Box::new),
      qualifier: qualifier.map(Box::new),
    })
  }
  /// `return`, optionally labeled, optionally carrying a value
  pub fn return_expr(label: Option<Node>, value: Option<Node>) -> Self {
    Self::new(NodeKind::Return {
      label: label.map(Box::new),
      value: value.map(Box::new),
    })
  }
  /// Type reference over its structural children
  pub fn type_ref(children: Vec<Node>) -> Self {
    Self::new(NodeKind::TypeRef { children })
  }
  /// Qualified access
  pub fn dot(receiver: Node, selector: Node) -> Self {
    Self::new(NodeKind::Dot {
      receiver: Box::new(receiver),
      selector: Box::new(selector),
    })
  }
  /// Call expression
  pub fn call(callee: Node, args: Vec<Node>) -> Self {
    Self::new(NodeKind::Call { callee: Box::new(callee), args })
  }
  /// Any other construct
  pub fn tree(head: &str, children: Vec<Node>) -> Self {
    Self::new(NodeKind::Tree { head: i(head), children })
  }

  /// Structural equality, blind to node identity. Used to check that
  /// repeated placeholder occurrences bound equal subtrees, never for
  /// placeholder attachment.
  pub fn deep_eq(&self, other: &Self) -> bool {
    use NodeKind as K;
    match (&self.kind, &other.kind) {
      (
        K::ArrayAccess { array: a1, indices: i1 },
        K::ArrayAccess { array: a2, indices: i2 },
      ) => a1.deep_eq(a2) && deep_eq_slice(i1, i2),
      (
        K::Binary { op: o1, lhs: l1, rhs: r1 },
        K::Binary { op: o2, lhs: l2, rhs: r2 },
      ) => o1 == o2 && l1.deep_eq(l2) && r1.deep_eq(r2),
      (K::Literal(t1), K::Literal(t2)) => t1 == t2,
      (K::Name(n1), K::Name(n2)) => n1.text == n2.text,
      (K::Break { label: l1 }, K::Break { label: l2 }) => opt_deep_eq(l1, l2),
      (K::Continue { label: l1 }, K::Continue { label: l2 }) =>
        opt_deep_eq(l1, l2),
      (K::This { label: l1 }, K::This { label: l2 }) => opt_deep_eq(l1, l2),
      (
        K::Super { label: l1, qualifier: q1 },
        K::Super { label: l2, qualifier: q2 },
      ) => opt_deep_eq(l1, l2) && opt_deep_eq(q1, q2),
      (
        K::Return { label: l1, value: v1 },
        K::Return { label: l2, value: v2 },
      ) => opt_deep_eq(l1, l2) && opt_deep_eq(v1, v2),
      (K::TypeRef { children: c1 }, K::TypeRef { children: c2 }) =>
        deep_eq_slice(c1, c2),
      (
        K::Dot { receiver: r1, selector: s1 },
        K::Dot { receiver: r2, selector: s2 },
      ) => r1.deep_eq(r2) && s1.deep_eq(s2),
      (
        K::Call { callee: c1, args: a1 },
        K::Call { callee: c2, args: a2 },
      ) => c1.deep_eq(c2) && deep_eq_slice(a1, a2),
      (
        K::Tree { head: h1, children: c1 },
        K::Tree { head: h2, children: c2 },
      ) => h1 == h2 && deep_eq_slice(c1, c2),
      (..) => false,
    }
  }
}

/// Element-wise [Node::deep_eq] over two sequences
pub fn deep_eq_slice(left: &[Node], right: &[Node]) -> bool {
  left.len() == right.len()
    && left.iter().zip(right.iter()).all(|(l, r)| l.deep_eq(r))
}

fn opt_deep_eq(left: &Option<Box<Node>>, right: &Option<Box<Node>>) -> bool {
  match (left, right) {
    (None, None) => true,
    (Some(l), Some(r)) => l.deep_eq(r),
    (..) => false,
  }
}

fn fmt_label(
  f: &mut std::fmt::Formatter<'_>,
  label: &Option<Box<Node>>,
) -> std::fmt::Result {
  match label {
    Some(l) => write!(f, "@{l}"),
    None => Ok(()),
  }
}

impl Display for Node {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    use NodeKind as K;
    match &self.kind {
      K::ArrayAccess { array, indices } => {
        write!(f, "{array}[{}]", indices.iter().join(", "))
      },
      K::Binary { op, lhs, rhs } => {
        write!(f, "{lhs} {} {rhs}", op.as_str())
      },
      K::Literal(text) => write!(f, "{}", text.as_str()),
      K::Name(ident) => write!(f, "{ident}"),
      K::Break { label } => {
        write!(f, "break")?;
        fmt_label(f, label)
      },
      K::Continue { label } => {
        write!(f, "continue")?;
        fmt_label(f, label)
      },
      K::This { label } => {
        write!(f, "this")?;
        fmt_label(f, label)
      },
      K::Super { label, qualifier } => {
        write!(f, "super")?;
        fmt_label(f, label)?;
        match qualifier {
          Some(q) => write!(f, "<{q}>"),
          None => Ok(()),
        }
      },
      K::Return { label, value } => {
        write!(f, "return")?;
        fmt_label(f, label)?;
        match value {
          Some(v) => write!(f, " {v}"),
          None => Ok(()),
        }
      },
      K::TypeRef { children } => write!(f, "{}", children.iter().join(" ")),
      K::Dot { receiver, selector } => write!(f, "{receiver}.{selector}"),
      K::Call { callee, args } => {
        write!(f, "{callee}({})", args.iter().join(", "))
      },
      K::Tree { head, children } => {
        write!(f, "{}({})", head.as_str(), children.iter().join(" "))
      },
    }
  }
}
